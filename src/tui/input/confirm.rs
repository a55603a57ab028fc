use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::App;

pub(super) fn handle_confirm(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        // Confirm: y
        (KeyModifiers::NONE, KeyCode::Char('y')) => app.confirm_delete(),
        // Cancel: n or Esc
        (KeyModifiers::NONE, KeyCode::Char('n')) | (_, KeyCode::Esc) => app.cancel_delete(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use crate::store::TaskStore;
    use crate::tui::app::Mode;
    use crate::tui::input::press;
    use crate::tui::render::test_helpers::app_with_tasks;

    #[test]
    fn y_deletes_and_persists() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_tasks(
            &tmp,
            &[("one", "2025-06-01", false), ("two", "2025-06-01", false)],
        );
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.mode, Mode::Confirm);
        // unrelated keys keep the popup open
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.mode, Mode::Confirm);
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.mode, Mode::Navigate);

        let (store, _) = TaskStore::open(app.store.path().to_path_buf());
        assert_eq!(store.len(), 1);
        assert_eq!(store.tasks()[0].title, "two");
    }

    #[test]
    fn n_and_esc_cancel() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_tasks(&tmp, &[("one", "2025-06-01", false)]);
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.mode, Mode::Navigate);
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.store.len(), 1);
        assert!(app.pending_delete.is_none());
    }
}
