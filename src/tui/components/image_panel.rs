//! # Image Panel Component
//!
//! Shows which scan belongs to the selected page and whether it could be
//! loaded. The terminal can't draw the `.webp` itself, so the panel reports
//! the resource path and its load status. Fullscreen mode draws the same
//! panel as an overlay over the whole screen.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear};
use ratatui::Frame;

use crate::core::image::ImageStatus;
use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::tier_status::{render_message, spinner_char};

pub struct ImagePanel<'a> {
    pub app: &'a App,
    pub spinner_frame: usize,
}

impl<'a> ImagePanel<'a> {
    pub fn new(app: &'a App, spinner_frame: usize) -> Self {
        Self { app, spinner_frame }
    }

    fn caption(&self) -> String {
        self.app
            .selection
            .page
            .as_ref()
            .map(|page| page.caption())
            .unwrap_or_default()
    }

    fn body(&self, path: &str) -> Vec<Line<'static>> {
        match self.app.image.status {
            ImageStatus::Loading => vec![Line::from(Span::styled(
                format!("{} Loading image...", spinner_char(self.spinner_frame)),
                Style::default().fg(Color::Yellow),
            ))],
            ImageStatus::Loaded => vec![
                Line::from(Span::styled(
                    "Scan available",
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(path.to_string(), Style::default().fg(Color::Gray))),
            ],
            ImageStatus::Errored => vec![
                Line::from(Span::styled(
                    "Image not found",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(path.to_string(), Style::default().fg(Color::DarkGray))),
            ],
        }
    }

    fn render_overlay(&self, frame: &mut Frame, area: Rect, path: &str) {
        let overlay = centered_rect(90, 90, area);
        frame.render_widget(Clear, overlay);

        let book_id = self.app.selected_book_id().unwrap_or_default();
        let block = Block::bordered()
            .border_style(Style::default().fg(Color::White))
            .title(format!(" {} - Book {} ", self.caption(), book_id))
            .title_bottom(Line::from(" f / Esc Close ").centered());
        render_message(frame, overlay, block, self.body(path));
    }
}

impl Component for ImagePanel<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let image = &self.app.image;
        let Some(path) = image.path.as_deref() else {
            let block = Block::bordered()
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Image ");
            render_message(
                frame,
                area,
                block,
                vec![
                    Line::from("Select a page to view image"),
                    Line::from(Span::styled(
                        "Choose a book and page from the left panel",
                        Style::default().fg(Color::DarkGray),
                    )),
                ],
            );
            return;
        };

        if image.fullscreen {
            let screen = frame.area();
            self.render_overlay(frame, screen, path);
            return;
        }

        let block = Block::bordered()
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" Original Book Image - {} ", self.caption()))
            .title_bottom(Line::from(" f Fullscreen ").right_aligned());
        render_message(frame, area, block, self.body(path));
    }
}

/// Compute a centered rect using percentage of the outer rect.
pub fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_app;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_centered_rect_is_inside() {
        let outer = Rect::new(0, 0, 100, 50);
        let inner = centered_rect(90, 90, outer);
        assert!(inner.width <= 90 && inner.height <= 45);
        assert!(inner.x >= 5 && inner.y >= 2);
    }

    #[test]
    fn test_placeholder_without_page() {
        let app = test_app();
        let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();
        terminal
            .draw(|f| ImagePanel::new(&app, 0).render(f, f.area()))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("Select a page to view image"));
    }
}
