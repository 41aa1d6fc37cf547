//! # Book Shelf Component
//!
//! Top panel: search box, one tab per title bucket, and the books of the
//! current view. While a search term is set the tabs are replaced by a
//! result count, and the list shows matches from the whole library.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `ShelfState` lives in `TuiState`
//! - `BookShelf` is created each frame with borrowed state

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, ListState, Paragraph, Tabs};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::core::action::Action;
use crate::core::state::App;
use crate::tui::components::tier_status::{render_message, render_tier_status};
use crate::tui::components::truncate_to_width;
use crate::tui::event::TuiEvent;

/// Persistent state for the shelf.
#[derive(Debug, Default)]
pub struct ShelfState {
    pub cursor: usize,
    pub searching: bool,
    pub list_state: ListState,
}

impl ShelfState {
    pub fn new() -> Self {
        Self::default()
    }

    fn clamp(&mut self, len: usize) {
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    /// Handles a key while the shelf has focus.
    pub fn handle_event(&mut self, event: &TuiEvent, app: &App) -> Option<Action> {
        let books = app.view.books();
        self.clamp(books.len());

        if self.searching {
            return self.handle_search_event(event, app);
        }

        match event {
            TuiEvent::InputChar('/') => {
                self.searching = true;
                None
            }
            TuiEvent::CursorUp => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            TuiEvent::CursorDown => {
                if !books.is_empty() {
                    self.cursor = (self.cursor + 1).min(books.len() - 1);
                }
                None
            }
            TuiEvent::CursorLeft => self.step_bucket(app, -1),
            TuiEvent::CursorRight => self.step_bucket(app, 1),
            TuiEvent::Submit => books
                .get(self.cursor)
                .map(|book| Action::SelectBook(book.raw.clone())),
            TuiEvent::Escape if app.selection.book.is_some() => Some(Action::ClearBook),
            TuiEvent::ClearLine if !app.search_term.is_empty() => {
                self.cursor = 0;
                Some(Action::SetSearchTerm(String::new()))
            }
            _ => None,
        }
    }

    fn handle_search_event(&mut self, event: &TuiEvent, app: &App) -> Option<Action> {
        let books = app.view.books();
        match event {
            TuiEvent::InputChar(c) => {
                self.cursor = 0;
                let mut term = app.search_term.clone();
                term.push(*c);
                Some(Action::SetSearchTerm(term))
            }
            TuiEvent::Paste(text) => {
                self.cursor = 0;
                let mut term = app.search_term.clone();
                term.push_str(text.lines().next().unwrap_or(""));
                Some(Action::SetSearchTerm(term))
            }
            TuiEvent::Backspace => {
                self.cursor = 0;
                let mut term = app.search_term.clone();
                term.pop()?;
                Some(Action::SetSearchTerm(term))
            }
            TuiEvent::ClearLine => {
                self.cursor = 0;
                Some(Action::SetSearchTerm(String::new()))
            }
            TuiEvent::Escape | TuiEvent::FocusNext | TuiEvent::FocusPrev => {
                self.searching = false;
                None
            }
            TuiEvent::CursorUp => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            TuiEvent::CursorDown => {
                if !books.is_empty() {
                    self.cursor = (self.cursor + 1).min(books.len() - 1);
                }
                None
            }
            TuiEvent::Submit => {
                self.searching = false;
                books
                    .get(self.cursor)
                    .map(|book| Action::SelectBook(book.raw.clone()))
            }
            _ => None,
        }
    }

    /// Moves to the neighbouring tab. An active bucket without books
    /// steps from the position it would sort into.
    fn step_bucket(&mut self, app: &App, delta: isize) -> Option<Action> {
        if !app.search_term.is_empty() {
            return None;
        }
        let keys: Vec<char> = app.index.tabs().into_iter().map(|(key, _)| key).collect();
        if keys.is_empty() {
            return None;
        }
        let target = match keys.binary_search(&app.active_bucket) {
            Ok(pos) => pos as isize + delta,
            Err(insert) if delta > 0 => insert as isize,
            Err(insert) => insert as isize - 1,
        };
        let key = *keys.get(usize::try_from(target).ok()?)?;
        self.cursor = 0;
        Some(Action::SetActiveBucket(key))
    }
}

/// Transient render wrapper for the shelf.
pub struct BookShelf<'a> {
    state: &'a mut ShelfState,
    app: &'a App,
    focused: bool,
    spinner_frame: usize,
}

impl<'a> BookShelf<'a> {
    pub fn new(state: &'a mut ShelfState, app: &'a App, focused: bool, spinner_frame: usize) -> Self {
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
        let count = format!(" {} books ", app.books.data.len());
        let block = Block::bordered()
            .border_style(Style::default().fg(border))
            .title(" Select a Book ")
            .title_top(Line::from(count).right_aligned());

        if render_tier_status(frame, area, block.clone(), &app.books, "books", self.spinner_frame) {
            return;
        }
        if app.books.data.is_empty() {
            render_message(frame, area, block, vec![Line::from("No books available")]);
            return;
        }

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [search_area, tabs_area, list_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(inner);

        self.render_search(frame, search_area);
        self.render_tabs(frame, tabs_area);
        self.render_list(frame, list_area);
    }

    fn render_search(&self, frame: &mut Frame, area: Rect) {
        let term = &self.app.search_term;
        let line = if term.is_empty() && !self.state.searching {
            Line::from(Span::styled(
                "/ Search books...",
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            let cursor = if self.state.searching { "▏" } else { "" };
            Line::from(vec![
                Span::styled("Search: ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    format!("{term}{cursor}"),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
            ])
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let app = self.app;
        if app.view.is_search() {
            let n = app.view.books().len();
            let plural = if n == 1 { "" } else { "s" };
            let text = format!("{n} book{plural} found for \"{}\"", app.search_term);
            frame.render_widget(
                Paragraph::new(Span::styled(text, Style::default().fg(Color::Gray))),
                area,
            );
            return;
        }

        let tabs = app.index.tabs();
        let titles: Vec<Line> = tabs
            .iter()
            .map(|(key, count)| Line::from(format!("{key} ({count})")))
            .collect();
        let selected = tabs.iter().position(|(key, _)| *key == app.active_bucket);
        let widget = Tabs::new(titles)
            .select(selected)
            .style(Style::default().fg(Color::Gray))
            .highlight_style(
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED),
            );
        frame.render_widget(widget, area);
    }

    fn render_list(&mut self, frame: &mut Frame, area: Rect) {
        let app = self.app;
        let books = app.view.books();
        if books.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    app.view.empty_message(),
                    Style::default().fg(Color::DarkGray),
                ))
                .centered(),
                area,
            );
            return;
        }

        self.state.clamp(books.len());
        let selected_id = app.selected_book_id();
        let width = area.width as usize;

        let items: Vec<ListItem> = books
            .iter()
            .enumerate()
            .map(|(i, book)| {
                let is_selected = selected_id == Some(book.id.as_str());
                let marker = if is_selected { " ✓" } else { "" };
                let title = truncate_to_width(&book.title, width.saturating_sub(marker.width()));
                let style = if i == self.state.cursor && self.focused {
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else if is_selected {
                    Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(title, style),
                    Span::styled(marker, style),
                ]))
            })
            .collect();

        self.state.list_state.select(Some(self.state.cursor));
        frame.render_stateful_widget(List::new(items), area, &mut self.state.list_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::update;
    use crate::test_support::test_app;
    use serde_json::json;

    fn loaded_app() -> App {
        let mut app = test_app();
        let effects = update(&mut app, Action::Start);
        let crate::core::action::Effect::FetchBooks(ticket) = effects[0].clone() else {
            panic!("expected books fetch");
        };
        update(
            &mut app,
            Action::BooksFetched {
                ticket,
                result: Ok(json!([
                    {"id": "1", "title": "Amrta"},
                    {"id": "2", "title": "Bhagavad Gita"},
                    {"id": "3", "title": "Brahma Samhita"},
                    {"id": "4", "title": "1984"},
                ])),
            },
        );
        app
    }

    #[test]
    fn test_submit_selects_book_under_cursor() {
        let mut app = loaded_app();
        update(&mut app, Action::SetActiveBucket('B'));
        let mut shelf = ShelfState::new();
        shelf.handle_event(&TuiEvent::CursorDown, &app);
        let action = shelf.handle_event(&TuiEvent::Submit, &app);
        assert_eq!(
            action,
            Some(Action::SelectBook(json!({"id": "3", "title": "Brahma Samhita"})))
        );
    }

    #[test]
    fn test_search_typing_builds_term() {
        let mut app = loaded_app();
        let mut shelf = ShelfState::new();
        assert_eq!(shelf.handle_event(&TuiEvent::InputChar('/'), &app), None);
        assert!(shelf.searching);

        let action = shelf.handle_event(&TuiEvent::InputChar('g'), &app).unwrap();
        assert_eq!(action, Action::SetSearchTerm("g".to_string()));
        update(&mut app, action);

        let action = shelf.handle_event(&TuiEvent::Backspace, &app).unwrap();
        assert_eq!(action, Action::SetSearchTerm(String::new()));

        shelf.handle_event(&TuiEvent::Escape, &app);
        assert!(!shelf.searching);
    }

    #[test]
    fn test_backspace_on_empty_term_is_noop() {
        let app = loaded_app();
        let mut shelf = ShelfState::new();
        shelf.searching = true;
        assert_eq!(shelf.handle_event(&TuiEvent::Backspace, &app), None);
    }

    #[test]
    fn test_bucket_stepping() {
        let mut app = loaded_app();
        let mut shelf = ShelfState::new();
        // tabs: # A B
        assert_eq!(
            shelf.handle_event(&TuiEvent::CursorRight, &app),
            Some(Action::SetActiveBucket('B'))
        );
        assert_eq!(
            shelf.handle_event(&TuiEvent::CursorLeft, &app),
            Some(Action::SetActiveBucket('#'))
        );

        update(&mut app, Action::SetActiveBucket('#'));
        assert_eq!(shelf.handle_event(&TuiEvent::CursorLeft, &app), None);
    }

    #[test]
    fn test_bucket_stepping_from_missing_bucket() {
        let mut app = loaded_app();
        update(&mut app, Action::SetActiveBucket('C'));
        let mut shelf = ShelfState::new();
        assert_eq!(
            shelf.handle_event(&TuiEvent::CursorLeft, &app),
            Some(Action::SetActiveBucket('B'))
        );
        assert_eq!(shelf.handle_event(&TuiEvent::CursorRight, &app), None);
    }

    #[test]
    fn test_escape_clears_selected_book() {
        let mut app = loaded_app();
        let mut shelf = ShelfState::new();
        assert_eq!(shelf.handle_event(&TuiEvent::Escape, &app), None);
        update(&mut app, Action::SelectBook(json!({"id": "1"})));
        assert_eq!(shelf.handle_event(&TuiEvent::Escape, &app), Some(Action::ClearBook));
    }
}
