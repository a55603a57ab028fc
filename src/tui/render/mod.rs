pub mod form_popup;
pub mod help_overlay;
pub mod popups;
pub mod status_row;
pub mod task_list;

#[cfg(test)]
pub(crate) mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use regex::Regex;

use super::app::{App, Mode};
use crate::util::unicode;

/// Main render function, dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: header (1 row) | content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(1),    // task list
            Constraint::Length(1), // status row
        ])
        .split(area);

    render_header(frame, app, chunks[0]);
    task_list::render_task_list(frame, app, chunks[1]);
    status_row::render_status_row(frame, app, chunks[2]);

    // Overlays, bottom to top
    if app.show_help {
        help_overlay::render_help_overlay(frame, app, area);
    }
    if app.mode == Mode::Form {
        form_popup::render_form_popup(frame, app, area);
    }
    if app.mode == Mode::Confirm {
        popups::render_confirm_popup(frame, app, area);
    }
    if app.message.is_some() {
        popups::render_message_popup(frame, app, area);
    }
    if !app.reminders.is_empty() {
        popups::render_reminder_popup(frame, app, area);
    }
}

/// One-line header: app name and file on the left, counts on the right
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let file_name = app
        .store
        .path()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut spans = vec![
        Span::styled(
            " tasklet ",
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(file_name, Style::default().fg(app.theme.dim).bg(bg)),
    ];

    let total = app.store.len();
    let done = app.store.tasks().iter().filter(|t| t.done).count();
    let mut counts = format!("{} tasks \u{00B7} {} done", total, done);
    if app.hide_done && done > 0 {
        counts.push_str(" (hidden)");
    }
    counts.push(' ');

    let used = spans_width(&spans);
    let counts_width = unicode::display_width(&counts);
    if used + counts_width < width {
        spans.push(Span::styled(
            " ".repeat(width - used - counts_width),
            Style::default().bg(bg),
        ));
        spans.push(Span::styled(
            counts,
            Style::default().fg(app.theme.text).bg(bg),
        ));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        area,
    );
}

/// Push spans for text with regex match highlighting. If no regex or no matches,
/// pushes a single span with `base_style`. Otherwise splits text at match boundaries.
pub(super) fn push_highlighted_spans<'a>(
    spans: &mut Vec<Span<'a>>,
    text: &str,
    base_style: Style,
    highlight_style: Style,
    search_re: Option<&Regex>,
) {
    let re = match search_re {
        Some(r) => r,
        None => {
            spans.push(Span::styled(text.to_string(), base_style));
            return;
        }
    };

    let mut last_end = 0;
    let mut has_match = false;
    for m in re.find_iter(text) {
        if m.start() == m.end() {
            continue;
        }
        has_match = true;
        if m.start() > last_end {
            spans.push(Span::styled(
                text[last_end..m.start()].to_string(),
                base_style,
            ));
        }
        spans.push(Span::styled(
            text[m.start()..m.end()].to_string(),
            highlight_style,
        ));
        last_end = m.end();
    }
    if !has_match {
        spans.push(Span::styled(text.to_string(), base_style));
    } else if last_end < text.len() {
        spans.push(Span::styled(text[last_end..].to_string(), base_style));
    }
}

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

/// A rectangle of fixed size centered in `area`, clipped to it
pub(super) fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}
