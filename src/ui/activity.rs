use chrono::{DateTime, Local};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::App;
use crate::session::format_clock;
use crate::system::network::format_bytes;

const SPARK_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Draw the live activity panel:
///
///   ┌──────────────────── netpulse ────────────────────┐
///   │ ↓ 2.0 KB/s            ↑ 512 B/s          ● online │
///   │ Received 1.2 GB   Sent 300.0 MB                   │
///   │ ▁▁▂▃▅▇█▅▃▂▁▁▁▂▂▃                                  │
///   │ [||||||||||||||||              ] 02:05 left        │
///   │ Running · every 1.0s · updated 12:00:01           │
///   └───────────────────────────────────────────────────┘
pub fn draw_activity(f: &mut Frame, app: &App, area: Rect) {
    let cs = &app.color_scheme;
    let now = Local::now();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" netpulse ")
        .title_alignment(Alignment::Center)
        .border_style(Style::default().fg(cs.border))
        .title_style(Style::default().fg(cs.title).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(cs.bg));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let show_gauge = app.session.as_ref().is_some_and(|s| s.ends_at.is_some());
    let mut constraints = vec![Constraint::Length(1)];
    if app.show_totals {
        constraints.push(Constraint::Length(1));
    }
    if app.show_history {
        constraints.push(Constraint::Min(1));
    }
    if show_gauge {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Length(1));

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let mut row = 0;
    draw_speed_line(f, app, rows[row]);
    row += 1;
    if app.show_totals {
        draw_totals_line(f, app, rows[row]);
        row += 1;
    }
    if app.show_history {
        draw_history(f, app, rows[row]);
        row += 1;
    }
    if show_gauge {
        draw_countdown(f, app, rows[row], now);
        row += 1;
    }
    let status = Paragraph::new(status_text(app, now)).style(Style::default().fg(cs.status_text));
    f.render_widget(status, rows[row]);
}

/// "↓ 2.0 KB/s   ↑ 512 B/s   ● online"
fn draw_speed_line(f: &mut Frame, app: &App, area: Rect) {
    let cs = &app.color_scheme;
    let net = &app.network_info;

    let (dot, label, color) = if app.connected {
        ("● ", "online", cs.online)
    } else {
        ("○ ", "offline", cs.offline)
    };

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(38),
            Constraint::Percentage(38),
            Constraint::Percentage(24),
        ])
        .split(area);

    // Grey until the first real measurement lands
    let (down_style, up_style) = if net.rate.is_some() {
        (cs.speed_style(cs.download), cs.speed_style(cs.upload))
    } else {
        (cs.label_style(), cs.label_style())
    };
    let down = Line::from(vec![
        Span::styled("↓ ", cs.label_style()),
        Span::styled(net.download.clone(), down_style),
    ]);
    let up = Line::from(vec![
        Span::styled("↑ ", cs.label_style()),
        Span::styled(net.upload.clone(), up_style),
    ]);
    let conn = Line::from(vec![
        Span::styled(dot, Style::default().fg(color)),
        Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD)),
    ]);

    f.render_widget(Paragraph::new(down), cols[0]);
    f.render_widget(Paragraph::new(up), cols[1]);
    f.render_widget(Paragraph::new(conn).alignment(Alignment::Right), cols[2]);
}

fn draw_totals_line(f: &mut Frame, app: &App, area: Rect) {
    let cs = &app.color_scheme;
    let net = &app.network_info;
    let line = Line::from(vec![
        Span::styled("Received ", cs.label_style()),
        Span::styled(format_bytes(net.total_rx), Style::default().fg(cs.totals)),
        Span::styled("   Sent ", cs.label_style()),
        Span::styled(format_bytes(net.total_tx), Style::default().fg(cs.totals)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn draw_history(f: &mut Frame, app: &App, area: Rect) {
    let cs = &app.color_scheme;
    let history: Vec<u64> = app.history.iter().copied().collect();
    let spark = sparkline(&history, area.width as usize);
    f.render_widget(
        Paragraph::new(spark).style(Style::default().fg(cs.sparkline)),
        // Pin to the bottom row so the graph sits on the status line
        Rect {
            y: area.y + area.height.saturating_sub(1),
            height: area.height.min(1),
            ..area
        },
    );
}

/// "[||||||||        ] 02:05 left"
fn draw_countdown(f: &mut Frame, app: &App, area: Rect, now: DateTime<Local>) {
    let cs = &app.color_scheme;
    let Some(session) = app.session.as_ref() else {
        return;
    };
    let (Some(remaining), Some(progress)) = (session.remaining(now), session.progress(now)) else {
        return;
    };

    let suffix = format!(" {} left", format_clock(remaining));
    let available = (area.width as usize).saturating_sub(suffix.chars().count() + 2);
    // The bar drains as the countdown runs
    let (filled, empty) = bar_split(1.0 - progress, available);

    let line = Line::from(vec![
        Span::styled("[", cs.label_style()),
        Span::styled("|".repeat(filled), Style::default().fg(cs.gauge)),
        Span::styled(" ".repeat(empty), Style::default().bg(cs.gauge_bg)),
        Span::styled("]", cs.label_style()),
        Span::styled(suffix, cs.label_style()),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

/// Split `width` cells into (filled, empty) for a fraction in 0..=1.
pub fn bar_split(fraction: f64, width: usize) -> (usize, usize) {
    let fraction = if fraction.is_finite() { fraction.clamp(0.0, 1.0) } else { 0.0 };
    let filled = ((fraction * width as f64).round() as usize).min(width);
    (filled, width - filled)
}

/// Render the most recent `width` values as block characters, scaled to the peak.
pub fn sparkline(values: &[u64], width: usize) -> String {
    let start = values.len().saturating_sub(width);
    let window = &values[start..];
    let peak = window.iter().copied().max().unwrap_or(0);

    window
        .iter()
        .map(|&v| {
            if peak == 0 {
                SPARK_CHARS[0]
            } else {
                let idx = (v as f64 / peak as f64 * (SPARK_CHARS.len() - 1) as f64).round() as usize;
                SPARK_CHARS[idx.min(SPARK_CHARS.len() - 1)]
            }
        })
        .collect()
}

/// One-line summary of the session state
pub fn status_text(app: &App, now: DateTime<Local>) -> String {
    let interval = format!("every {:.1}s", app.update_interval_ms as f64 / 1000.0);

    let Some(session) = app.session.as_ref() else {
        return match app.ended_at {
            Some(ended) => format!("Ended at {} · press s to start again", ended.format("%H:%M:%S")),
            None => "Stopped · press s to start".to_string(),
        };
    };

    if session.is_paused() {
        return format!("Paused · {} elapsed · press p to resume", format_clock(session.elapsed(now)));
    }

    if let Some(err) = &app.last_skip {
        return format!("Waiting · {err}");
    }

    match session.last_update {
        Some(last) => format!(
            "Running · {interval} · updated {} · {} elapsed",
            last.format("%H:%M:%S"),
            format_clock(session.elapsed(now))
        ),
        None => format!("Running · {interval} · measuring baseline…"),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::config::NetpulseConfig;
    use crate::error::SampleError;

    fn at(secs: i64) -> DateTime<Local> {
        Local.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn sparkline_scales_to_peak_and_keeps_latest() {
        assert_eq!(sparkline(&[0, 7, 14], 3), "▁▅█");
        assert_eq!(sparkline(&[100, 0, 7, 14], 3), "▁▅█");
        assert_eq!(sparkline(&[0, 0], 5), "▁▁");
        assert_eq!(sparkline(&[], 5), "");
    }

    #[test]
    fn bar_split_bounds() {
        assert_eq!(bar_split(0.5, 10), (5, 5));
        assert_eq!(bar_split(1.5, 10), (10, 0));
        assert_eq!(bar_split(-1.0, 10), (0, 10));
        assert_eq!(bar_split(f64::NAN, 4), (0, 4));
        assert_eq!(bar_split(0.5, 0), (0, 0));
    }

    #[test]
    fn status_follows_session_lifecycle() {
        let mut app = App::new(&NetpulseConfig::default());
        assert_eq!(status_text(&app, at(0)), "Stopped · press s to start");

        app.start_session(at(0));
        assert!(status_text(&app, at(0)).contains("measuring baseline"));

        app.last_skip = Some(SampleError::InterfaceEnumeration);
        assert!(status_text(&app, at(1)).starts_with("Waiting"));

        app.toggle_pause(at(2));
        assert!(status_text(&app, at(3)).starts_with("Paused · 00:02"));

        app.end_session(at(4));
        assert!(status_text(&app, at(5)).starts_with("Ended at"));
    }
}
