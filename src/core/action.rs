//! # Actions
//!
//! Everything that can happen in the reader becomes an `Action`.
//! User picks a book? That's `Action::SelectBook(record)`.
//! The pages request comes back? That's `Action::PagesFetched { .. }`.
//!
//! `update()` applies an action to the state and returns the `Effect`s the
//! adapter must run. No I/O here; fetch results come back as actions.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effects
//! ```
//!
//! The cascade: a book change resets the page and content tiers and fetches
//! pages; pages arriving auto-select the lowest-numbered page, which fetches
//! content. Every fetch carries a `Ticket`; completions whose ticket no longer
//! matches the latest request and the current selection are dropped.

use log::{debug, info, warn};
use serde_json::Value;

use crate::core::state::{App, ContentKey, Ticket, Tier, TierState};
use crate::core::library::LibraryIndex;
use crate::core::types::{Book, Page, PageContent, default_page, normalize_books, normalize_pages};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Issue the initial books request.
    Start,
    /// A book-like record picked by the user; its id is re-resolved.
    SelectBook(Value),
    ClearBook,
    SelectPage(Page),
    ClearPage,
    Retry(Tier),
    SetSearchTerm(String),
    SetActiveBucket(char),
    ToggleFullscreen,
    BooksFetched {
        ticket: Ticket<()>,
        result: Result<Value, String>,
    },
    PagesFetched {
        ticket: Ticket<String>,
        result: Result<Value, String>,
    },
    ContentFetched {
        ticket: Ticket<ContentKey>,
        result: Result<Value, String>,
    },
    ImageSettled {
        path: String,
        result: Result<(), String>,
    },
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchBooks(Ticket<()>),
    FetchPages(Ticket<String>),
    FetchContent(Ticket<ContentKey>),
    LoadImage(String),
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Vec<Effect> {
    match action {
        Action::Start => vec![begin_books(app)],
        Action::SelectBook(record) => match Book::from_record(&record) {
            Some(book) => {
                info!("Book selected: {} ({})", book.title, book.id);
                let id = book.id.clone();
                app.selection.book = Some(book);
                begin_pages(app, id)
            }
            None => {
                warn!("Selected book record has no id, clearing selection: {}", record);
                clear_book(app);
                Vec::new()
            }
        },
        Action::ClearBook => {
            clear_book(app);
            Vec::new()
        }
        Action::SelectPage(page) => {
            if app.selection.book.is_none() {
                warn!("Ignoring page selection without a selected book");
                return Vec::new();
            }
            if !app.pages.data.contains(&page) {
                warn!(
                    "Ignoring page {} not in the loaded pages",
                    page.page_number.display()
                );
                return Vec::new();
            }
            info!("Page selected: {}", page.caption());
            set_page(app, page)
        }
        Action::ClearPage => {
            app.selection.page = None;
            clear_content(app);
            sync_image(app).into_iter().collect()
        }
        Action::Retry(tier) => retry(app, tier),
        Action::SetSearchTerm(term) => {
            app.search_term = term;
            app.refresh_view();
            Vec::new()
        }
        Action::SetActiveBucket(key) => {
            app.active_bucket = key;
            app.refresh_view();
            Vec::new()
        }
        Action::ToggleFullscreen => {
            app.image.toggle_fullscreen();
            Vec::new()
        }
        Action::BooksFetched { ticket, result } => {
            if !app.is_current_books(&ticket) {
                debug!("Discarding stale books response (generation {})", ticket.generation);
                return Vec::new();
            }
            match result {
                Ok(raw) => {
                    let books = normalize_books(raw);
                    info!("Loaded {} books", books.len());
                    app.status_message = format!("Loaded {} books", books.len());
                    app.index = LibraryIndex::build(&books);
                    app.books = TierState::ready(books);
                }
                Err(message) => {
                    warn!("Books request failed: {}", message);
                    app.status_message = format!("Failed to load books: {message}");
                    app.index = LibraryIndex::default();
                    app.books = TierState::failed(message);
                }
            }
            app.refresh_view();
            Vec::new()
        }
        Action::PagesFetched { ticket, result } => {
            if !app.is_current_pages(&ticket) {
                debug!(
                    "Discarding stale pages response for book {} (generation {})",
                    ticket.key, ticket.generation
                );
                return Vec::new();
            }
            match result {
                Ok(raw) => {
                    let pages = normalize_pages(raw);
                    info!("Loaded {} pages for book {}", pages.len(), ticket.key);
                    app.status_message = format!("Loaded {} pages", pages.len());
                    let first = default_page(&pages).cloned();
                    app.pages = TierState::ready(pages);
                    match first {
                        Some(page) => {
                            debug!("Auto-selecting page {}", page.page_number.display());
                            set_page(app, page)
                        }
                        None => Vec::new(),
                    }
                }
                Err(message) => {
                    warn!("Pages request for book {} failed: {}", ticket.key, message);
                    app.status_message = format!("Failed to load pages: {message}");
                    app.pages = TierState::failed(message);
                    Vec::new()
                }
            }
        }
        Action::ContentFetched { ticket, result } => {
            if !app.is_current_content(&ticket) {
                debug!(
                    "Discarding stale content response for {}/{} (generation {})",
                    ticket.key.book_id,
                    ticket.key.page_number.display(),
                    ticket.generation
                );
                return Vec::new();
            }
            match result {
                Ok(data) => {
                    app.content = TierState::ready(Some(PageContent(data)));
                }
                Err(message) => {
                    warn!("Content request failed: {}", message);
                    app.status_message = format!("Failed to load page content: {message}");
                    app.content = TierState::failed(message);
                }
            }
            Vec::new()
        }
        Action::ImageSettled { path, result } => {
            if let Err(e) = &result {
                debug!("Image {} failed to load: {}", path, e);
            }
            app.image.finish(&path, result.is_ok());
            Vec::new()
        }
        Action::Quit => vec![Effect::Quit],
    }
}

fn begin_books(app: &mut App) -> Effect {
    let generation = app.requests.next(Tier::Books);
    app.books.loading = true;
    app.books.error = None;
    app.status_message = String::from("Loading books...");
    Effect::FetchBooks(Ticket { generation, key: () })
}

/// Resets everything below the book tier and requests pages for `book_id`.
fn begin_pages(app: &mut App, book_id: String) -> Vec<Effect> {
    app.selection.page = None;
    clear_content(app);
    let generation = app.requests.next(Tier::Pages);
    app.pages = TierState::pending();
    app.status_message = String::from("Loading pages...");

    let mut effects = vec![Effect::FetchPages(Ticket {
        generation,
        key: book_id,
    })];
    effects.extend(sync_image(app));
    effects
}

fn clear_book(app: &mut App) {
    app.selection.book = None;
    app.selection.page = None;
    app.requests.next(Tier::Pages);
    app.pages = TierState::idle();
    clear_content(app);
    sync_image(app);
}

fn clear_content(app: &mut App) {
    app.requests.next(Tier::Content);
    app.content = TierState::idle();
}

fn set_page(app: &mut App, page: Page) -> Vec<Effect> {
    app.selection.page = Some(page);
    let mut effects: Vec<Effect> = begin_content(app).into_iter().collect();
    effects.extend(sync_image(app));
    effects
}

fn begin_content(app: &mut App) -> Option<Effect> {
    let key = app.content_key()?;
    let generation = app.requests.next(Tier::Content);
    app.content = TierState::pending();
    Some(Effect::FetchContent(Ticket { generation, key }))
}

/// Points the image view at the current selection.
fn sync_image(app: &mut App) -> Option<Effect> {
    let book_id = app.selection.book.as_ref().map(|b| b.id.clone());
    let target = match (&book_id, &app.selection.page) {
        (Some(id), Some(page)) => Some((id.as_str(), &page.page_number)),
        _ => None,
    };
    app.image.retarget(target).map(Effect::LoadImage)
}

fn retry(app: &mut App, tier: Tier) -> Vec<Effect> {
    info!("Retry requested for {}", tier.label());
    match tier {
        Tier::Books => vec![begin_books(app)],
        Tier::Pages => match app.selected_book_id() {
            Some(id) => {
                let id = id.to_string();
                begin_pages(app, id)
            }
            None => {
                debug!("Pages retry ignored: no book selected");
                Vec::new()
            }
        },
        Tier::Content => {
            let effect = begin_content(app);
            if effect.is_none() {
                debug!("Content retry ignored: no book and page selected");
            }
            effect.into_iter().collect()
        }
    }
}
