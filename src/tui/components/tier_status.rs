//! Loading and error placeholders shared by the tier panels.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};
use ratatui::Frame;

use crate::core::state::TierState;

const SPINNER: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub fn spinner_char(frame_index: usize) -> char {
    SPINNER[frame_index % SPINNER.len()]
}

/// Draws the loading or error placeholder for a tier.
/// Returns false when the tier has data to show instead.
pub fn render_tier_status<T>(
    frame: &mut Frame,
    area: Rect,
    block: Block,
    tier: &TierState<T>,
    what: &str,
    spinner_frame: usize,
) -> bool {
    if tier.loading {
        let text = format!("{} Loading {what}...", spinner_char(spinner_frame));
        render_message(frame, area, block, vec![Line::from(Span::styled(
            text,
            Style::default().fg(Color::Yellow),
        ))]);
        return true;
    }
    if let Some(error) = &tier.error {
        render_message(frame, area, block, error_lines(error));
        return true;
    }
    false
}

pub fn error_lines(error: &str) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            "Something went wrong",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(error.to_string(), Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(Span::styled(
            "Press r to retry",
            Style::default().fg(Color::DarkGray),
        )),
    ]
}

/// Centered, wrapped message inside `block`.
pub fn render_message(frame: &mut Frame, area: Rect, block: Block, lines: Vec<Line>) {
    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
