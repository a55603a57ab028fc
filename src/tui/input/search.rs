use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Mode};

pub(super) fn handle_search(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        // Cancel search
        (_, KeyCode::Esc) => {
            app.mode = Mode::Navigate;
            app.search_input.clear();
        }

        // Execute search: jump to the first match at or after the cursor
        (_, KeyCode::Enter) => {
            app.mode = Mode::Navigate;
            if app.search_input.is_empty() {
                app.last_search = None;
            } else {
                app.last_search = Some(std::mem::take(&mut app.search_input));
                app.search_step(true, true);
            }
        }

        (_, KeyCode::Backspace) => {
            app.search_input.pop();
        }

        // Type character
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
            app.search_input.push(c);
        }

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use crate::tui::app::Mode;
    use crate::tui::input::{press, type_text};
    use crate::tui::render::test_helpers::app_with_tasks;

    #[test]
    fn search_jumps_and_cycles() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_tasks(
            &tmp,
            &[
                ("bread", "2025-06-01", false),
                ("milk", "2025-06-01", false),
                ("eggs", "2025-06-01", false),
                ("oat milk", "2025-06-01", false),
            ],
        );
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.mode, Mode::Search);
        type_text(&mut app, "milk");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.last_search.as_deref(), Some("milk"));
        assert_eq!(app.cursor, 1);

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.cursor, 3);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.cursor, 1);
        press(&mut app, KeyCode::Char('N'));
        assert_eq!(app.cursor, 3);
    }

    #[test]
    fn search_escape_keeps_previous_pattern() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_tasks(&tmp, &[("milk", "2025-06-01", false)]);
        app.last_search = Some("milk".into());
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "xyz");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.last_search.as_deref(), Some("milk"));
        assert!(app.search_input.is_empty());
    }
}
