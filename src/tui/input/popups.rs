use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::App;

/// Reminder popup: Enter or Esc dismisses every listed reminder
pub(super) fn handle_reminders(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
        app.dismiss_reminders();
    }
}

/// Validation message: Enter or Esc returns to whatever was underneath
pub(super) fn handle_message(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
        app.message = None;
    }
}

/// Help overlay intercepts ? and Esc
pub(super) fn handle_help(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
        app.show_help = false;
    }
}
