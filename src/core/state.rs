//! # Application State
//!
//! Core reader state. Domain logic only; presentation state (focus, cursors,
//! scroll offsets) lives in the `tui` module.
//!
//! ```text
//! App
//! ├── books: TierState<Vec<Book>>          // tier 1, fetched on Start
//! ├── pages: TierState<Vec<Page>>          // tier 2, follows selection.book
//! ├── content: TierState<Option<PageContent>> // tier 3, follows selection.page
//! ├── selection: Selection                 // drives the cascade
//! ├── search_term: String                  // shelf search box
//! ├── active_bucket: char                  // shelf tab
//! ├── index: LibraryIndex                  // rebuilt when books change
//! ├── view: BookView                       // what the shelf shows
//! ├── image: ImageView                     // page image path + load status
//! ├── status_message: String               // status bar text
//! └── requests: RequestLedger              // latest request per tier
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use crate::core::config::ResolvedConfig;
use crate::core::image::ImageView;
use crate::core::library::{BookView, DEFAULT_BUCKET, LibraryIndex};
use crate::core::types::{Book, Page, PageContent, PageNumber};

/// `{ data, loading, error }` for one resource tier.
#[derive(Debug, Clone, PartialEq)]
pub struct TierState<T> {
    pub data: T,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T: Default> TierState<T> {
    pub fn idle() -> Self {
        Self {
            data: T::default(),
            loading: false,
            error: None,
        }
    }

    pub fn pending() -> Self {
        Self {
            loading: true,
            ..Self::idle()
        }
    }

    pub fn ready(data: T) -> Self {
        Self {
            data,
            loading: false,
            error: None,
        }
    }

    pub fn failed(message: String) -> Self {
        Self {
            error: Some(message),
            ..Self::idle()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Books,
    Pages,
    Content,
}

impl Tier {
    pub fn label(self) -> &'static str {
        match self {
            Tier::Books => "books",
            Tier::Pages => "pages",
            Tier::Content => "page content",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub book: Option<Book>,
    pub page: Option<Page>,
}

/// Identifies the content a request was issued for.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentKey {
    pub book_id: String,
    pub page_number: PageNumber,
}

/// Tag carried by every fetch: the tier's request generation at issue time
/// plus the selection key the fetch was made for.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket<K> {
    pub generation: u64,
    pub key: K,
}

/// Latest issued generation per tier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestLedger {
    pub books: u64,
    pub pages: u64,
    pub content: u64,
}

impl RequestLedger {
    /// Bumps a tier's generation, invalidating anything in flight for it.
    pub fn next(&mut self, tier: Tier) -> u64 {
        let slot = match tier {
            Tier::Books => &mut self.books,
            Tier::Pages => &mut self.pages,
            Tier::Content => &mut self.content,
        };
        *slot += 1;
        *slot
    }
}

#[derive(Debug, Clone)]
pub struct App {
    pub books: TierState<Vec<Book>>,
    pub pages: TierState<Vec<Page>>,
    pub content: TierState<Option<PageContent>>,
    pub selection: Selection,
    pub search_term: String,
    pub active_bucket: char,
    pub index: LibraryIndex,
    pub view: BookView,
    pub image: ImageView,
    pub status_message: String,
    pub requests: RequestLedger,
}

impl App {
    pub fn new(asset_root: impl Into<String>) -> Self {
        Self {
            books: TierState::pending(),
            pages: TierState::idle(),
            content: TierState::idle(),
            selection: Selection::default(),
            search_term: String::new(),
            active_bucket: DEFAULT_BUCKET,
            index: LibraryIndex::default(),
            view: BookView::default(),
            image: ImageView::new(asset_root),
            status_message: String::from("Loading books..."),
            requests: RequestLedger::default(),
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        let mut app = Self::new(config.asset_root.clone());
        app.active_bucket = config.default_bucket;
        app.refresh_view();
        app
    }

    /// Recomputes the shelf view from the index, search term and bucket.
    pub fn refresh_view(&mut self) {
        self.view = self
            .index
            .view(&self.books.data, &self.search_term, self.active_bucket);
    }

    pub fn selected_book_id(&self) -> Option<&str> {
        self.selection.book.as_ref().map(|book| book.id.as_str())
    }

    /// Key for content of the current selection, if both tiers are selected.
    pub fn content_key(&self) -> Option<ContentKey> {
        let book = self.selection.book.as_ref()?;
        let page = self.selection.page.as_ref()?;
        Some(ContentKey {
            book_id: book.id.clone(),
            page_number: page.page_number.clone(),
        })
    }

    pub fn is_current_books(&self, ticket: &Ticket<()>) -> bool {
        ticket.generation == self.requests.books
    }

    pub fn is_current_pages(&self, ticket: &Ticket<String>) -> bool {
        ticket.generation == self.requests.pages
            && self.selected_book_id() == Some(ticket.key.as_str())
    }

    pub fn is_current_content(&self, ticket: &Ticket<ContentKey>) -> bool {
        ticket.generation == self.requests.content
            && self.content_key().as_ref() == Some(&ticket.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_app;

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert!(app.books.loading);
        assert!(app.books.data.is_empty());
        assert_eq!(app.pages, TierState::idle());
        assert_eq!(app.content, TierState::idle());
        assert_eq!(app.selection, Selection::default());
        assert_eq!(app.active_bucket, 'A');
        assert!(app.search_term.is_empty());
    }

    #[test]
    fn test_ledger_generations_increase_per_tier() {
        let mut ledger = RequestLedger::default();
        assert_eq!(ledger.next(Tier::Pages), 1);
        assert_eq!(ledger.next(Tier::Pages), 2);
        assert_eq!(ledger.next(Tier::Content), 1);
        assert_eq!(ledger.books, 0);
    }

    #[test]
    fn test_tier_state_constructors() {
        let failed: TierState<Vec<Page>> = TierState::failed("boom".to_string());
        assert!(!failed.loading);
        assert!(failed.data.is_empty());
        assert_eq!(failed.error.as_deref(), Some("boom"));

        let pending: TierState<Option<PageContent>> = TierState::pending();
        assert!(pending.loading);
        assert_eq!(pending.data, None);
    }
}
