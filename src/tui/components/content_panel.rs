//! # Content Panel Component
//!
//! Scrollable view of the selected page's content. The payload is opaque
//! JSON; objects are shown field by field, text fields wrapped to the panel
//! width, anything nested pretty-printed.

use ratatui::layout::{Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;
use serde_json::Value;
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::tier_status::{render_message, render_tier_status};

/// A titled block of text in the content payload.
#[derive(Debug, PartialEq)]
pub struct Section {
    pub heading: Option<String>,
    pub body: String,
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
        Value::Array(_) | Value::Object(_) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
    }
}

/// Splits a payload into displayable sections.
pub fn sections(value: &Value) -> Vec<Section> {
    match value {
        Value::Object(map) => map
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(key, v)| Section {
                heading: Some(key.clone()),
                body: value_text(v),
            })
            .collect(),
        Value::Null => Vec::new(),
        other => vec![Section {
            heading: None,
            body: value_text(other),
        }],
    }
}

/// Wraps sections to `width` columns.
pub fn content_lines(sections: &[Section], width: usize) -> Vec<Line<'static>> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        if let Some(heading) = &section.heading {
            lines.push(Line::from(Span::styled(
                heading.clone(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
        }
        for paragraph in section.body.lines() {
            if paragraph.trim().is_empty() {
                lines.push(Line::from(""));
                continue;
            }
            for wrapped in textwrap::wrap(paragraph, width) {
                lines.push(Line::from(wrapped.into_owned()));
            }
        }
    }
    lines
}

/// Scroll canvas height; saturates instead of wrapping.
fn content_height(line_count: usize) -> u16 {
    u16::try_from(line_count).unwrap_or(u16::MAX)
}

pub struct ContentPanel<'a> {
    pub app: &'a App,
    pub scroll_state: &'a mut ScrollViewState,
    pub focused: bool,
    pub spinner_frame: usize,
}

impl Component for ContentPanel<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let app = self.app;
        let border = if self.focused { Color::Cyan } else { Color::DarkGray };
        let title = match &app.selection.page {
            Some(page) => format!(" Page Content - {} ", page.caption()),
            None => " Page Content ".to_string(),
        };
        let block = Block::bordered()
            .border_style(Style::default().fg(border))
            .title(title);

        if app.selection.page.is_none() {
            render_message(
                frame,
                area,
                block,
                vec![Line::from(Span::styled(
                    "Select a page to view content",
                    Style::default().fg(Color::DarkGray),
                ))],
            );
            return;
        }
        if render_tier_status(frame, area, block.clone(), &app.content, "page content", self.spinner_frame) {
            return;
        }

        let sections = app
            .content
            .data
            .as_ref()
            .map(|content| sections(&content.0))
            .unwrap_or_default();
        if sections.is_empty() {
            render_message(frame, area, block, vec![Line::from("No content for this page")]);
            return;
        }

        let inner = block.inner(area);
        frame.render_widget(block, area);

        // One column for the scrollbar
        let content_width = inner.width.saturating_sub(1);
        let lines = content_lines(&sections, content_width as usize);
        let height = content_height(lines.len());

        let mut scroll_view = ScrollView::new(Size::new(content_width, height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        scroll_view.render_widget(
            Paragraph::new(lines),
            Rect::new(0, 0, content_width, height),
        );
        frame.render_stateful_widget(scroll_view, inner, self.scroll_state);
    }
}
