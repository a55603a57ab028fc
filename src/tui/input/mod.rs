mod confirm;
mod form;
mod navigate;
mod popups;
mod search;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Mode, Status};

use confirm::handle_confirm;
use form::handle_form;
use navigate::handle_navigate;
use popups::{handle_help, handle_message, handle_reminders};
use search::handle_search;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    // Ctrl-C quits from anywhere
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if matches!(app.status, Some(Status::Info(_))) {
        app.status = None;
    }

    // Reminder popup sits on top of everything, then the message popup
    if !app.reminders.is_empty() {
        handle_reminders(app, key);
        return;
    }
    if app.message.is_some() {
        handle_message(app, key);
        return;
    }
    if app.show_help {
        handle_help(app, key);
        return;
    }

    let key = normalize_key(key);
    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Search => handle_search(app, key),
        Mode::Form => handle_form(app, key),
        Mode::Confirm => handle_confirm(app, key),
    }
}

/// Some terminals report Shift+g as ('g', SHIFT); fold it to ('G', SHIFT).
fn normalize_key(mut key: KeyEvent) -> KeyEvent {
    if let KeyCode::Char(c) = key.code
        && key.modifiers.contains(KeyModifiers::SHIFT)
        && c.is_ascii_lowercase()
    {
        key.code = KeyCode::Char(c.to_ascii_uppercase());
    }
    key
}

#[cfg(test)]
pub(crate) fn press(app: &mut App, code: KeyCode) {
    handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
}

#[cfg(test)]
pub(crate) fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::app_with_tasks;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn ctrl_c_quits_from_form() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_tasks(&tmp, &[]);
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.mode, Mode::Form);
        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
    }

    #[test]
    fn reminder_popup_takes_input_first() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_tasks(&tmp, &[("Buy milk", "2025-06-01 09:00", false)]);
        app.scan_reminders("2025-06-01 09:00");
        // 'q' does not quit while the reminder is shown
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Enter);
        assert!(app.reminders.is_empty());
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn shifted_lowercase_is_normalized() {
        let key = normalize_key(KeyEvent::new(KeyCode::Char('g'), KeyModifiers::SHIFT));
        assert_eq!(key.code, KeyCode::Char('G'));
    }
}
