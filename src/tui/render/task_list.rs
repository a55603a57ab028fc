use chrono::{Local, NaiveDateTime};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::task::{Due, Task};
use crate::tui::app::App;
use crate::util::unicode;

use super::{push_highlighted_spans, spans_width};

/// Width of the date column: fits `YYYY-MM-DD HH:MM`
const DATE_COL: usize = 16;

/// Whether a pending task's due value lies before `now`
fn is_overdue(task: &Task, now: NaiveDateTime) -> bool {
    match task.due() {
        Some(Due::Minute(dt)) => dt < now,
        Some(Due::Day(d)) => d < now.date(),
        None => false,
    }
}

/// Render the task list with the cursor row highlighted
pub fn render_task_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let visible = app.visible_indices();

    if visible.is_empty() {
        let text = if app.store.is_empty() {
            " No tasks yet. Press a to add one."
        } else {
            " All tasks are done. Press h to show them."
        };
        let empty = Paragraph::new(text).style(Style::default().fg(app.theme.dim).bg(bg));
        frame.render_widget(empty, area);
        return;
    }

    let height = area.height as usize;
    app.ensure_cursor_visible(height);

    let width = area.width as usize;
    let now = Local::now().naive_local();
    let search_re = app.active_search_re();
    let match_style = Style::default()
        .fg(app.theme.search_match_fg)
        .bg(app.theme.search_match_bg);

    let mut lines: Vec<Line> = Vec::new();
    for (row, &idx) in visible.iter().enumerate().skip(app.scroll).take(height) {
        let task = &app.store.tasks()[idx];
        let is_cursor = row == app.cursor;
        let row_bg = if is_cursor { app.theme.highlight } else { bg };

        let mut spans: Vec<Span> = Vec::new();
        let check = if task.done { " [x] " } else { " [ ] " };
        let check_color = if task.done {
            app.theme.green
        } else {
            app.theme.text
        };
        spans.push(Span::styled(check, Style::default().fg(check_color).bg(row_bg)));

        let date_fg = if is_cursor {
            app.theme.text_bright
        } else {
            app.theme.date_color(task.done, is_overdue(task, now))
        };
        spans.push(Span::styled(
            format!("{:<width$}  ", task.date, width = DATE_COL),
            Style::default().fg(date_fg).bg(row_bg),
        ));

        let mut title_style = Style::default().bg(row_bg);
        title_style = if task.done {
            title_style
                .fg(app.theme.dim)
                .add_modifier(Modifier::CROSSED_OUT)
        } else {
            title_style.fg(app.theme.text_bright)
        };
        if is_cursor {
            title_style = title_style.fg(app.theme.text_bright).add_modifier(Modifier::BOLD);
        }

        let note_marker = if task.note.is_empty() { "" } else { " +" };
        let used = spans_width(&spans) + note_marker.len();
        let title = unicode::truncate_to_width(&task.title, width.saturating_sub(used));
        push_highlighted_spans(
            &mut spans,
            &title,
            title_style,
            match_style,
            search_re.as_ref(),
        );
        if !note_marker.is_empty() {
            spans.push(Span::styled(
                note_marker,
                Style::default().fg(app.theme.dim).bg(row_bg),
            ));
        }

        // Pad cursor line
        if is_cursor {
            let content_width = spans_width(&spans);
            if content_width < width {
                spans.push(Span::styled(
                    " ".repeat(width - content_width),
                    Style::default().bg(row_bg),
                ));
            }
        }

        lines.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
