use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode, Status};

use super::spans_width;

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let (mut spans, hint) = match app.mode {
        Mode::Search => {
            // Search prompt: /pattern▌
            let spans = vec![
                Span::styled(
                    format!("/{}", app.search_input),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ),
                Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)), // ▌ cursor
            ];
            (spans, "Enter search  Esc cancel")
        }
        _ => {
            let spans = match &app.status {
                Some(Status::Warning(msg)) => vec![Span::styled(
                    format!(" ! {}", msg),
                    Style::default().fg(app.theme.yellow).bg(bg),
                )],
                Some(Status::Info(msg)) => vec![Span::styled(
                    format!(" {}", msg),
                    Style::default().fg(app.theme.text).bg(bg),
                )],
                None => match &app.last_search {
                    Some(pattern) => vec![Span::styled(
                        format!("/{}", pattern),
                        Style::default().fg(app.theme.dim).bg(bg),
                    )],
                    None => Vec::new(),
                },
            };
            let hint = if app.last_search.is_some() {
                "n/N next/prev  ? help"
            } else {
                "? help"
            };
            (spans, hint)
        }
    };

    let content_width = spans_width(&spans);
    let hint_width = hint.chars().count() + 1;
    if content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(
            format!("{} ", hint),
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::{app_with_tasks, render_to_string};
    use tempfile::TempDir;

    fn status_line(app: &App) -> String {
        render_to_string(40, 1, |frame, area| render_status_row(frame, app, area))
    }

    #[test]
    fn idle_shows_help_hint() {
        let tmp = TempDir::new().unwrap();
        let app = app_with_tasks(&tmp, &[]);
        assert_eq!(status_line(&app), format!("{}? help", " ".repeat(33)));
    }

    #[test]
    fn warning_is_shown() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_tasks(&tmp, &[]);
        app.status = Some(Status::Warning("write failed".into()));
        assert!(status_line(&app).starts_with(" ! write failed"));
    }

    #[test]
    fn search_prompt() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_tasks(&tmp, &[]);
        app.mode = Mode::Search;
        app.search_input = "mil".into();
        let line = status_line(&app);
        assert!(line.starts_with("/mil\u{258C}"));
        assert!(line.ends_with("Enter search  Esc cancel"));
    }
}
