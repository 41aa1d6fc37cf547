use async_trait::async_trait;
use pbb::core::action::{Action, Effect, update};
use pbb::core::config::DEFAULT_ASSET_ROOT;
use pbb::core::image::ImageStatus;
use pbb::core::state::{App, Tier};
use pbb::core::types::PageNumber;
use pbb::gateway::dispatch::perform;
use pbb::gateway::{GatewayError, ResourceGateway};
use serde_json::{Value, json};
use tokio_test::{assert_err, assert_ok};

// ============================================================================
// Helper Functions
// ============================================================================

/// In-memory library: two books, pages per book, content echoing the request.
/// Only scans for page 1 exist. `broken_pages` makes the pages call fail.
struct FakeLibrary {
    broken_pages: bool,
}

#[async_trait]
impl ResourceGateway for FakeLibrary {
    fn name(&self) -> &str {
        "fake"
    }

    async fn list_books(&self) -> Result<Value, GatewayError> {
        Ok(json!({"data": [
            {"id": "b1", "title": "Arcana Dipika"},
            {"id": "b2", "original_book_title": "Bhakti Rasāyana"},
        ]}))
    }

    async fn list_pages(&self, book_id: &str) -> Result<Value, GatewayError> {
        if self.broken_pages {
            return Err(GatewayError::Network("connection reset".to_string()));
        }
        match book_id {
            "b1" => Ok(json!({"page_maps": [{"page_number": 2}, {"page_number": 1}]})),
            "b2" => Ok(json!([{"page_number": "3"}, {"page_number": "2x"}])),
            _ => Err(GatewayError::Api {
                status: 404,
                message: "no such book".to_string(),
            }),
        }
    }

    async fn get_page_content(
        &self,
        book_id: &str,
        page_number: &PageNumber,
    ) -> Result<Value, GatewayError> {
        Ok(json!({"book": book_id, "page": page_number.display()}))
    }

    async fn load_asset(&self, path: &str) -> Result<usize, GatewayError> {
        if path.ends_with("/1.webp") {
            Ok(1024)
        } else {
            Err(GatewayError::Api {
                status: 404,
                message: "not found".to_string(),
            })
        }
    }
}

/// Performs effects in order, feeding outcomes back until nothing is left.
async fn settle(app: &mut App, gateway: &dyn ResourceGateway, effects: Vec<Effect>) {
    let mut queue = effects;
    while !queue.is_empty() {
        let mut next = Vec::new();
        for effect in queue {
            if let Some(action) = perform(effect, gateway).await {
                next.extend(update(app, action));
            }
        }
        queue = next;
    }
}

async fn started(gateway: &dyn ResourceGateway) -> App {
    let mut app = App::new(DEFAULT_ASSET_ROOT);
    let effects = update(&mut app, Action::Start);
    settle(&mut app, gateway, effects).await;
    app
}

fn content_of(app: &App) -> Option<Value> {
    app.content.data.as_ref().map(|content| content.0.clone())
}

// ============================================================================
// Cascade
// ============================================================================

#[tokio::test]
async fn test_full_cascade_from_start_to_content() {
    let gateway = FakeLibrary { broken_pages: false };
    let mut app = started(&gateway).await;
    assert_eq!(app.books.data.len(), 2);
    assert!(!app.books.loading);

    let raw = app.books.data[0].raw.clone();
    let effects = update(&mut app, Action::SelectBook(raw));
    settle(&mut app, &gateway, effects).await;

    // Lowest page number wins even though it is listed second
    let page = assert_ok!(app.selection.page.clone().ok_or("no page"));
    assert_eq!(page.page_number, PageNumber::from(1));
    assert_eq!(content_of(&app), Some(json!({"book": "b1", "page": "1"})));
    assert_eq!(app.image.path.as_deref(), Some("/pbb_book_pages/b1/1.webp"));
    assert_eq!(app.image.status, ImageStatus::Loaded);
}

#[tokio::test]
async fn test_unparsable_page_number_is_default_and_scan_missing() {
    let gateway = FakeLibrary { broken_pages: false };
    let mut app = started(&gateway).await;

    let raw = app.books.data[1].raw.clone();
    let effects = update(&mut app, Action::SelectBook(raw));
    settle(&mut app, &gateway, effects).await;

    let page = assert_ok!(app.selection.page.clone().ok_or("no page"));
    assert_eq!(page.page_number.display(), "2x");
    assert_eq!(app.image.status, ImageStatus::Errored);
    assert_eq!(content_of(&app), Some(json!({"book": "b2", "page": "2x"})));
}

#[tokio::test]
async fn test_switching_books_resets_lower_tiers() {
    let gateway = FakeLibrary { broken_pages: false };
    let mut app = started(&gateway).await;

    let first = app.books.data[0].raw.clone();
    let effects = update(&mut app, Action::SelectBook(first));
    settle(&mut app, &gateway, effects).await;
    assert!(content_of(&app).is_some());

    let second = app.books.data[1].raw.clone();
    update(&mut app, Action::SelectBook(second));

    assert!(app.selection.page.is_none());
    assert!(app.pages.loading);
    assert!(app.pages.data.is_empty());
    assert!(app.content.data.is_none());
    assert!(app.image.path.is_none());
}

// ============================================================================
// Staleness
// ============================================================================

#[tokio::test]
async fn test_out_of_order_pages_responses() {
    let gateway = FakeLibrary { broken_pages: false };
    let mut app = started(&gateway).await;

    let first = app.books.data[0].raw.clone();
    let second = app.books.data[1].raw.clone();
    let slow = update(&mut app, Action::SelectBook(first));
    let fast = update(&mut app, Action::SelectBook(second));

    // The later request completes first
    settle(&mut app, &gateway, fast).await;
    let b2_content = content_of(&app);
    assert_eq!(b2_content, Some(json!({"book": "b2", "page": "2x"})));

    settle(&mut app, &gateway, slow).await;
    assert_eq!(app.selected_book_id(), Some("b2"));
    assert_eq!(app.pages.data.len(), 2);
    assert_eq!(app.pages.data[0].page_number.display(), "3");
    assert_eq!(content_of(&app), b2_content);
}

#[tokio::test]
async fn test_content_for_abandoned_page_is_dropped() {
    let gateway = FakeLibrary { broken_pages: false };
    let mut app = started(&gateway).await;

    let raw = app.books.data[0].raw.clone();
    let effects = update(&mut app, Action::SelectBook(raw));
    settle(&mut app, &gateway, effects).await;

    let page_two = app.pages.data[0].clone();
    let page_one = app.pages.data[1].clone();
    let stale = update(&mut app, Action::SelectPage(page_two));
    let current = update(&mut app, Action::SelectPage(page_one));

    settle(&mut app, &gateway, current).await;
    settle(&mut app, &gateway, stale).await;

    assert_eq!(content_of(&app), Some(json!({"book": "b1", "page": "1"})));
    // The stale scan signal for page 2 does not touch the page 1 status
    assert_eq!(app.image.status, ImageStatus::Loaded);
}

// ============================================================================
// Errors and retry
// ============================================================================

#[tokio::test]
async fn test_pages_failure_then_retry() {
    let broken = FakeLibrary { broken_pages: true };
    assert_err!(broken.list_pages("b1").await);
    let mut app = started(&broken).await;

    let raw = app.books.data[0].raw.clone();
    let effects = update(&mut app, Action::SelectBook(raw));
    settle(&mut app, &broken, effects).await;

    assert_eq!(app.pages.error.as_deref(), Some("network error: connection reset"));
    assert!(app.content.error.is_none());
    assert!(!app.books.loading && app.books.error.is_none());

    let healthy = FakeLibrary { broken_pages: false };
    let effects = update(&mut app, Action::Retry(Tier::Pages));
    assert!(app.pages.error.is_none());
    settle(&mut app, &healthy, effects).await;
    assert_eq!(app.pages.data.len(), 2);
    assert_eq!(content_of(&app), Some(json!({"book": "b1", "page": "1"})));
}
