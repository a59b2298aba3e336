use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::App;

/// Draw the Help popup (F1)
pub fn draw_help(f: &mut Frame, app: &App) {
    let cs = &app.color_scheme;
    let area = centered_rect(60, 80, f.area());
    f.render_widget(Clear, area);

    let section = |title: &'static str| {
        Line::from(Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD).fg(Color::Yellow),
        ))
    };

    let help_text = vec![
        Line::from(Span::styled(
            " netpulse - live network speed panel ",
            Style::default().fg(cs.popup_title).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section(" Session "),
        Line::from("  s           Start monitoring (new session)"),
        Line::from("  x           Stop monitoring"),
        Line::from("  p/z/Space   Pause/resume the display and countdown"),
        Line::from(""),
        section(" Sampling "),
        Line::from("  + / =       Sample less often"),
        Line::from("  -           Sample more often"),
        Line::from(""),
        section(" Display "),
        Line::from("  c           Cycle colour scheme"),
        Line::from("  t           Toggle totals"),
        Line::from("  g           Toggle speed history"),
        Line::from("  w           Save settings"),
        Line::from(""),
        section(" General "),
        Line::from("  F1/h/?      Show this help"),
        Line::from("  F10/q       Quit netpulse"),
        Line::from("  Ctrl+C      Quit"),
        Line::from(""),
        Line::from(format!(
            "  Colours: {}   Interval: {} ms",
            app.color_scheme_id.name(),
            app.update_interval_ms
        )),
        Line::from(""),
        Line::from(Span::styled(
            " Press Esc or F1 to close ",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help ")
                .title_alignment(Alignment::Center)
                .border_style(Style::default().fg(cs.popup_border)),
        )
        .style(Style::default().fg(cs.popup_text).bg(cs.popup_bg))
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}

/// Create a centered rectangle with percentage width/height
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
