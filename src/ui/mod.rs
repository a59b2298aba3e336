pub mod activity;
pub mod footer;
pub mod help;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::{App, AppMode};

/// Render the complete UI
pub fn draw(f: &mut Frame, app: &App) {
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // activity panel
            Constraint::Length(1), // footer (key bar)
        ])
        .split(size);

    activity::draw_activity(f, app, chunks[0]);
    footer::draw_footer(f, app, chunks[1]);

    if app.mode == AppMode::Help {
        help::draw_help(f, app);
    }
}
