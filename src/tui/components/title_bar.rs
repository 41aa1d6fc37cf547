//! # TitleBar Component
//!
//! Top status bar: the application name, the selected book and the latest
//! status message.
//!
//! Stateless: it receives all data as props and has no internal state.
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar {
//!     book_title: Some("Bhagavad Gita"),
//!     status_message: "Loaded 42 pages",
//! };
//! title_bar.render(frame, area);
//! ```
//!
//! Format: `"Pure Bhakti Base | Bhagavad Gita | Loaded 42 pages"`, with
//! the empty parts dropped.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Top status bar component
pub struct TitleBar<'a> {
    pub book_title: Option<&'a str>,
    pub status_message: &'a str,
}

impl TitleBar<'_> {
    fn title_text(&self) -> String {
        let mut parts = vec!["Pure Bhakti Base"];
        if let Some(title) = self.book_title {
            parts.push(title);
        }
        if !self.status_message.is_empty() {
            parts.push(self.status_message);
        }
        parts.join(" | ")
    }
}

impl Component for TitleBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let line = Line::from(Span::styled(
            self.title_text(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(line, area);
    }
}
