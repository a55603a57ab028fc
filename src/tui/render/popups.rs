use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

use super::centered_rect_fixed;

/// Content of a small bordered popup
struct PopupContent<'a> {
    title: &'a str,
    body: Vec<String>,
    hint: &'a str,
    accent: Color,
}

/// Render the reminder popup: one line per fired task
pub fn render_reminder_popup(frame: &mut Frame, app: &App, area: Rect) {
    render_popup(
        frame,
        app,
        area,
        PopupContent {
            title: "Reminder",
            body: app.reminders.clone(),
            hint: "Enter/Esc dismiss",
            accent: app.theme.yellow,
        },
    );
}

/// Render the blocking validation message
pub fn render_message_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(message) = app.message.as_deref() else {
        return;
    };
    render_popup(
        frame,
        app,
        area,
        PopupContent {
            title: "Cannot save",
            body: vec![message.to_string()],
            hint: "Enter/Esc back",
            accent: app.theme.red,
        },
    );
}

/// Render the delete confirmation for the pending task
pub fn render_confirm_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(task) = app
        .pending_delete
        .as_deref()
        .and_then(|id| app.store.get(id))
    else {
        return;
    };
    render_popup(
        frame,
        app,
        area,
        PopupContent {
            title: "Delete task?",
            body: vec![format!("\u{201c}{}\u{201d}", task.title)],
            hint: "y delete  n/Esc cancel",
            accent: app.theme.highlight,
        },
    );
}

fn render_popup(frame: &mut Frame, app: &App, area: Rect, content: PopupContent) {
    let popup_w: u16 = 52.min(area.width.saturating_sub(2));
    let inner_w = popup_w.saturating_sub(2) as usize;

    let bg = app.theme.background;
    let header_style = Style::default()
        .fg(content.accent)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(app.theme.text_bright).bg(bg);
    let hint_style = Style::default().fg(app.theme.dim).bg(bg);

    let mut styled_lines: Vec<(String, Style)> = Vec::new();
    styled_lines.push((format!(" {}", content.title), header_style));
    styled_lines.push((String::new(), text_style));
    for line in &content.body {
        for s in wrap_text(" ", line, inner_w) {
            styled_lines.push((s, text_style));
        }
    }
    styled_lines.push((String::new(), text_style));
    styled_lines.push((format!(" {}", content.hint), hint_style));

    // Dynamic height from content + 2 for borders
    let popup_h = ((styled_lines.len() as u16) + 2).min(area.height.saturating_sub(2));

    let overlay_area = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, overlay_area);

    let lines: Vec<Line> = styled_lines
        .into_iter()
        .map(|(text, style)| Line::from(Span::styled(text, style)))
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(content.accent).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));

    frame.render_widget(paragraph, overlay_area);
}

/// Word-wrap `text` into lines of at most `max_width` characters.
/// Every line (including the first) is prefixed with `indent`.
fn wrap_text(indent: &str, text: &str, max_width: usize) -> Vec<String> {
    let indent_len = indent.chars().count();
    let mut lines = Vec::new();
    let mut current = indent.to_string();
    let mut current_len = indent_len;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let space = if current_len == indent_len { 0 } else { 1 };
        if current_len + space + word_len > max_width && current_len > indent_len {
            lines.push(current);
            current = indent.to_string();
            current_len = indent_len;
        }
        if current_len > indent_len {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }
    if current_len > indent_len || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::Mode;
    use crate::tui::render::render;
    use crate::tui::render::test_helpers::{TERM_H, TERM_W, app_with_tasks, render_to_string};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn wrap_text_breaks_on_words() {
        assert_eq!(
            wrap_text(" ", "the quick brown fox", 10),
            vec![" the quick", " brown fox"]
        );
        assert_eq!(wrap_text(" ", "", 10), vec![" "]);
    }

    #[test]
    fn reminder_popup_lists_every_fired_task() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_tasks(
            &tmp,
            &[
                ("Buy milk", "2025-06-01 09:00", false),
                ("Call mum", "2025-06-01 09:00", false),
            ],
        );
        app.scan_reminders("2025-06-01 09:00");
        let out = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &mut app));
        assert!(out.contains("Reminder"));
        assert!(out.contains("Task due: Buy milk"));
        assert!(out.contains("Task due: Call mum"));
        assert!(out.contains("Enter/Esc dismiss"));
    }

    #[test]
    fn confirm_popup_names_the_task() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_tasks(&tmp, &[("Buy milk", "2025-06-01", false)]);
        app.request_delete();
        assert_eq!(app.mode, Mode::Confirm);
        let out = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &mut app));
        assert!(out.contains("Delete task?"));
        assert!(out.contains("\u{201c}Buy milk\u{201d}"));
    }

    #[test]
    fn message_popup_over_form() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_tasks(&tmp, &[]);
        app.open_add_form();
        app.submit_form();
        let out = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &mut app));
        assert!(out.contains("Cannot save"));
        assert!(out.contains("enter a task title"));
    }
}
