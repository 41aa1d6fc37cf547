//! # Page List Component
//!
//! Narrow column listing the pages of the selected book in API order.
//! The selected page is marked; the cursor follows it whenever a new page
//! list arrives.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, ListState};
use ratatui::Frame;

use crate::core::action::Action;
use crate::core::state::App;
use crate::tui::components::tier_status::{render_message, render_tier_status};
use crate::tui::components::truncate_to_width;
use crate::tui::event::TuiEvent;

#[derive(Debug, Default)]
pub struct PageListState {
    pub cursor: usize,
    pub list_state: ListState,
    /// (pages generation, loading) the cursor was last synced against.
    synced: Option<(u64, bool)>,
}

impl PageListState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the cursor to the selected page when a new page list arrives.
    pub fn sync(&mut self, app: &App) {
        let key = (app.requests.pages, app.pages.loading);
        if self.synced == Some(key) {
            return;
        }
        self.synced = Some(key);
        self.cursor = app
            .selection
            .page
            .as_ref()
            .and_then(|selected| app.pages.data.iter().position(|p| p == selected))
            .unwrap_or(0);
    }

    pub fn handle_event(&mut self, event: &TuiEvent, app: &App) -> Option<Action> {
        let pages = &app.pages.data;
        self.cursor = self.cursor.min(pages.len().saturating_sub(1));
        match event {
            TuiEvent::CursorUp => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            TuiEvent::CursorDown => {
                if !pages.is_empty() {
                    self.cursor = (self.cursor + 1).min(pages.len() - 1);
                }
                None
            }
            TuiEvent::Submit => pages
                .get(self.cursor)
                .map(|page| Action::SelectPage(page.clone())),
            TuiEvent::Escape if app.selection.page.is_some() => Some(Action::ClearPage),
            _ => None,
        }
    }
}

pub struct PageList<'a> {
    state: &'a mut PageListState,
    app: &'a App,
    focused: bool,
    spinner_frame: usize,
}

impl<'a> PageList<'a> {
    pub fn new(state: &'a mut PageListState, app: &'a App, focused: bool, spinner_frame: usize) -> Self {
        Self {
            state,
            app,
            focused,
            spinner_frame,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let app = self.app;
        let border = if self.focused { Color::Cyan } else { Color::DarkGray };
        let block = Block::bordered()
            .border_style(Style::default().fg(border))
            .title(" Pages ");

        if app.selection.book.is_none() {
            render_message(
                frame,
                area,
                block,
                vec![Line::from(Span::styled("Select a book", Style::default().fg(Color::DarkGray)))],
            );
            return;
        }
        if render_tier_status(frame, area, block.clone(), &app.pages, "pages", self.spinner_frame) {
            return;
        }
        if app.pages.data.is_empty() {
            render_message(frame, area, block, vec![Line::from("No pages")]);
            return;
        }

        let width = block.inner(area).width as usize;
        let items: Vec<ListItem> = app
            .pages
            .data
            .iter()
            .enumerate()
            .map(|(i, page)| {
                let is_selected = app.selection.page.as_ref() == Some(page);
                let marker = if is_selected { "▶ " } else { "  " };
                let caption = truncate_to_width(&page.caption(), width.saturating_sub(2));
                let style = if i == self.state.cursor && self.focused {
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else if is_selected {
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                };
                ListItem::new(Line::from(Span::styled(format!("{marker}{caption}"), style)))
            })
            .collect();

        self.state.list_state.select(Some(self.state.cursor));
        frame.render_stateful_widget(List::new(items).block(block), area, &mut self.state.list_state);
    }
}
