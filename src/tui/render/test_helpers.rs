use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use tempfile::TempDir;

use crate::model::config::Config;
use crate::store::TaskStore;
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// An app over `tasks.json` in `tmp`, seeded with `(title, date, done)` tasks
/// and saved to disk.
pub fn app_with_tasks(tmp: &TempDir, tasks: &[(&str, &str, bool)]) -> App {
    let path = tmp.path().join("tasks.json");
    let mut store = TaskStore::new(path.clone());
    for (title, date, done) in tasks {
        if let Some(id) = store.add(title, "", date) {
            store.set_done(&id, *done);
        }
    }
    store.save().unwrap();

    let (store, err) = TaskStore::open(path);
    assert!(err.is_none());
    App::new(store, &Config::default(), None)
}
