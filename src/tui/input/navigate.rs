use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, Mode};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        // Cursor
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(-1),
        KeyCode::Char('g') | KeyCode::Home => app.jump_top(),
        KeyCode::Char('G') | KeyCode::End => app.jump_bottom(),
        KeyCode::PageDown => app.move_cursor(10),
        KeyCode::PageUp => app.move_cursor(-10),

        // Task actions
        KeyCode::Char(' ') | KeyCode::Char('x') => app.toggle_done(),
        KeyCode::Char('a') => app.open_add_form(),
        KeyCode::Char('e') | KeyCode::Enter => app.open_edit_form(),
        KeyCode::Char('d') | KeyCode::Delete => app.request_delete(),

        // View
        KeyCode::Char('h') => app.toggle_hide_done(),
        KeyCode::Char('r') => app.reload(),
        KeyCode::Char('?') => app.show_help = true,

        // Search
        KeyCode::Char('/') => {
            app.search_input.clear();
            app.mode = Mode::Search;
        }
        KeyCode::Char('n') => app.search_step(true, false),
        KeyCode::Char('N') => app.search_step(false, false),
        KeyCode::Esc => app.last_search = None,

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use crate::tui::app::Mode;
    use crate::tui::input::press;
    use crate::tui::render::test_helpers::app_with_tasks;

    #[test]
    fn cursor_moves_and_clamps() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_tasks(
            &tmp,
            &[
                ("one", "2025-06-01", false),
                ("two", "2025-06-01", false),
                ("three", "2025-06-01", false),
            ],
        );
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.cursor, 0);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.cursor, 2);
        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.cursor, 0);
        press(&mut app, KeyCode::Char('G'));
        assert_eq!(app.cursor, 2);
    }

    #[test]
    fn space_toggles_done_both_ways() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_tasks(&tmp, &[("one", "2025-06-01", false)]);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.store.tasks()[0].done);
        press(&mut app, KeyCode::Char('x'));
        assert!(!app.store.tasks()[0].done);
    }

    #[test]
    fn keys_on_empty_list_are_harmless() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_tasks(&tmp, &[]);
        for code in [
            KeyCode::Char('j'),
            KeyCode::Char('G'),
            KeyCode::Char(' '),
            KeyCode::Char('e'),
            KeyCode::Char('d'),
            KeyCode::Char('n'),
        ] {
            press(&mut app, code);
        }
        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.store.is_empty());
    }

    #[test]
    fn help_toggles() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_tasks(&tmp, &[]);
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        // other keys are swallowed by the overlay
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Esc);
        assert!(!app.show_help);
    }
}
