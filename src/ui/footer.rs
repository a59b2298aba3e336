use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{App, AppMode};

/// Key bar: (key_label, description)
const KEYS_STOPPED: &[(&str, &str)] = &[
    ("F1", "Help  "),
    ("s", "Start "),
    ("+-", "Rate  "),
    ("c", "Colors"),
    ("w", "Save  "),
    ("F10", "Quit "),
];

const KEYS_RUNNING: &[(&str, &str)] = &[
    ("F1", "Help  "),
    ("p", "Pause "),
    ("x", "Stop  "),
    ("+-", "Rate  "),
    ("c", "Colors"),
    ("w", "Save  "),
    ("F10", "Quit "),
];

const KEYS_PAUSED: &[(&str, &str)] = &[
    ("F1", "Help  "),
    ("p", "Resume"),
    ("x", "Stop  "),
    ("F10", "Quit "),
];

const KEYS_HELP: &[(&str, &str)] = &[("Esc", "Close ")];

/// Draw the bottom key bar: key on the accent colour, label on dark.
pub fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let cs = &app.color_scheme;

    // Full-width background first
    let bg_fill = " ".repeat(area.width as usize);
    f.render_widget(
        Paragraph::new(bg_fill).style(Style::default().bg(cs.footer_label_bg)),
        area,
    );

    let keys = footer_keys(app);
    let spans: Vec<Span> = keys
        .iter()
        .flat_map(|(key, desc)| {
            [
                Span::styled(key.to_string(), cs.footer_key_style()),
                Span::styled(desc.to_string(), cs.footer_label_style()),
            ]
        })
        .collect();

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn footer_keys(app: &App) -> &'static [(&'static str, &'static str)] {
    if app.mode == AppMode::Help {
        KEYS_HELP
    } else if app.is_paused() {
        KEYS_PAUSED
    } else if app.is_running() {
        KEYS_RUNNING
    } else {
        KEYS_STOPPED
    }
}

#[cfg(test)]
mod tests {
    use chrono::Local;

    use super::*;
    use crate::config::NetpulseConfig;

    #[test]
    fn keys_follow_state() {
        let mut app = App::new(&NetpulseConfig::default());
        assert!(footer_keys(&app).iter().any(|(k, _)| *k == "s"));

        app.start_session(Local::now());
        assert!(footer_keys(&app).iter().any(|(k, _)| *k == "x"));

        app.toggle_pause(Local::now());
        assert!(footer_keys(&app).iter().any(|(_, d)| d.starts_with("Resume")));

        app.mode = AppMode::Help;
        assert_eq!(footer_keys(&app).len(), 1);
    }
}
