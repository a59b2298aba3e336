use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, AppMode};

/// Handle a single key input event.
pub fn handle_input(app: &mut App, key: KeyEvent) {
    // Ctrl+C quits from anywhere
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.mode {
        AppMode::Normal => handle_normal_mode(app, key),
        AppMode::Help => handle_help_mode(app, key),
    }
}

// ── Normal mode ─────────────────────────────────────────────────────────

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::F(10) | KeyCode::Char('q') => app.should_quit = true,

        KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('h') => app.mode = AppMode::Help,

        // ── Session lifecycle ──
        KeyCode::Char('s') => app.start_session(Local::now()),
        KeyCode::Char('x') => app.end_session(Local::now()),
        KeyCode::Char('p') | KeyCode::Char('z') | KeyCode::Char(' ') => {
            app.toggle_pause(Local::now())
        }

        // ── Sampling interval ──
        KeyCode::Char('+') | KeyCode::Char('=') => app.interval_up(),
        KeyCode::Char('-') => app.interval_down(),

        // ── Display ──
        KeyCode::Char('c') => app.cycle_color_scheme(),
        KeyCode::Char('t') => {
            app.show_totals = !app.show_totals;
            app.settings_dirty = true;
        }
        KeyCode::Char('g') => {
            app.show_history = !app.show_history;
            app.settings_dirty = true;
        }

        KeyCode::Char('w') => app.request_save(),

        _ => {}
    }
}

// ── Help popup ──────────────────────────────────────────────────────────

fn handle_help_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Char('h') => {
            app.mode = AppMode::Normal;
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Request;
    use crate::config::NetpulseConfig;

    fn press(app: &mut App, code: KeyCode) {
        handle_input(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn help_opens_and_closes() {
        let mut app = App::new(&NetpulseConfig::default());
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.mode, AppMode::Help);
        // q closes the popup rather than quitting
        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.mode, AppMode::Normal);
        assert!(!app.should_quit);
    }

    #[test]
    fn quit_keys() {
        let mut app = App::new(&NetpulseConfig::default());
        press(&mut app, KeyCode::F(10));
        assert!(app.should_quit);

        let mut app = App::new(&NetpulseConfig::default());
        app.mode = AppMode::Help;
        handle_input(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn session_keys_queue_monitor_requests() {
        let mut app = App::new(&NetpulseConfig::default());
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Char('p'));
        assert!(app.is_paused());
        press(&mut app, KeyCode::Char('p'));
        assert!(!app.is_paused());
        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Char('w'));
        assert_eq!(
            app.take_requests(),
            vec![Request::StartMonitor, Request::StopMonitor, Request::SaveConfig]
        );
    }

    #[test]
    fn display_toggles_mark_settings_dirty() {
        let mut app = App::new(&NetpulseConfig::default());
        press(&mut app, KeyCode::Char('t'));
        assert!(!app.show_totals);
        assert!(app.settings_dirty);
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.color_scheme_id, crate::color_scheme::ColorSchemeId::Monochrome);
    }
}
