use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, FormField, FormKind, FormState};
use crate::util::unicode;

use super::centered_rect_fixed;

/// Columns taken by " Label  " before each value
const LABEL_COL: usize = 8;

/// Render the add/edit form and place the terminal cursor in the active field
pub fn render_form_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(form) = app.form.as_ref() else {
        return;
    };

    let popup_w: u16 = 60.min(area.width.saturating_sub(2));
    let inner_w = popup_w.saturating_sub(2) as usize;
    let value_w = inner_w.saturating_sub(LABEL_COL + 1);

    let bg = app.theme.background;
    let header_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let label_style = Style::default().fg(app.theme.dim).bg(bg);
    let active_label_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let value_style = Style::default().fg(app.theme.text_bright).bg(bg);
    let hint_style = Style::default().fg(app.theme.dim).bg(bg);

    let title = match form.kind {
        FormKind::Add => " Add task",
        FormKind::Edit { .. } => " Edit task",
    };

    let mut lines: Vec<Line> = vec![Line::from(Span::styled(title, header_style)), Line::from("")];
    let mut cursor_row = None;

    for &field in form.fields() {
        let is_active = field == form.field;
        if is_active {
            cursor_row = Some(lines.len());
        }
        let mut spans = vec![Span::styled(
            format!(" {:<width$} ", field.label(), width = LABEL_COL - 2),
            if is_active { active_label_style } else { label_style },
        )];
        spans.push(Span::styled(
            unicode::truncate_to_width(form.value(field), value_w),
            value_style,
        ));
        if matches!(field, FormField::Date | FormField::Time) {
            let shown = unicode::display_width(form.value(field)).min(value_w);
            spans.push(Span::styled(
                format!("{}\u{2191}\u{2193}", " ".repeat(12usize.saturating_sub(shown))),
                hint_style,
            ));
        }
        lines.push(Line::from(spans));
    }

    // The date of an existing task is shown but not editable
    if let FormKind::Edit { .. } = form.kind {
        lines.push(Line::from(vec![
            Span::styled(format!(" {:<width$} ", "Date", width = LABEL_COL - 2), label_style),
            Span::styled(format!("{} (read-only)", form.date), hint_style),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Tab next field  Enter save  Esc cancel",
        hint_style,
    )));

    let popup_h = ((lines.len() as u16) + 2).min(area.height.saturating_sub(2));
    let overlay_area = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .style(Style::default().bg(bg)),
        overlay_area,
    );

    if let Some(row) = cursor_row {
        let col = cursor_col(form, value_w);
        let x = overlay_area.x + 1 + (LABEL_COL + col) as u16;
        let y = overlay_area.y + 1 + row as u16;
        if x < overlay_area.right() && y < overlay_area.bottom() {
            frame.set_cursor_position(Position::new(x, y));
        }
    }
}

/// Display column of the cursor inside the value area
fn cursor_col(form: &FormState, value_w: usize) -> usize {
    unicode::byte_offset_to_display_col(form.value(form.field), form.cursor).min(value_w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::render;
    use crate::tui::render::test_helpers::{TERM_H, TERM_W, app_with_tasks, render_to_string};
    use tempfile::TempDir;

    #[test]
    fn add_form_shows_all_fields() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_tasks(&tmp, &[]);
        app.open_add_form();
        if let Some(form) = app.form.as_mut() {
            form.title = "Buy milk".into();
            form.date = "2025-06-01".into();
        }
        let out = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &mut app));
        assert!(out.contains("Add task"));
        assert!(out.contains(" Title  Buy milk"));
        assert!(out.contains(" Note   "));
        assert!(out.contains(" Date   2025-06-01"));
        assert!(out.contains(" Time   "));
    }

    #[test]
    fn edit_form_shows_read_only_date() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_tasks(&tmp, &[("Buy milk", "2025-06-01 09:00", false)]);
        app.open_edit_form();
        let out = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &mut app));
        assert!(out.contains("Edit task"));
        assert!(out.contains("2025-06-01 09:00 (read-only)"));
        assert!(!out.contains(" Time "));
    }

    #[test]
    fn cursor_col_counts_wide_chars() {
        let mut form = FormState::for_add("2025-06-01".into());
        form.title = "你好".into();
        form.cursor = form.title.len();
        assert_eq!(cursor_col(&form, 40), 4);
        assert_eq!(cursor_col(&form, 3), 3);
    }
}
