use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::App;

pub(super) fn handle_form(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => {
            app.close_form();
            return;
        }
        (_, KeyCode::Enter) => {
            app.submit_form();
            return;
        }
        _ => {}
    }

    let Some(form) = app.form.as_mut() else {
        return;
    };
    match (key.modifiers, key.code) {
        // Field switching
        (_, KeyCode::Tab) => form.cycle_field(true),
        (_, KeyCode::BackTab) => form.cycle_field(false),

        // Date/time stepper
        (_, KeyCode::Up) => form.step(1),
        (_, KeyCode::Down) => form.step(-1),

        // Cursor
        (_, KeyCode::Left) => form.cursor_left(),
        (_, KeyCode::Right) => form.cursor_right(),
        (_, KeyCode::Home) => form.cursor_home(),
        (_, KeyCode::End) => form.cursor_end(),

        // Deletion
        (_, KeyCode::Backspace) => form.backspace(),
        (_, KeyCode::Delete) => form.delete(),

        // Text input
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => form.insert_char(c),

        _ => {}
    }
}
