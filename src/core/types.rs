//! # Library Records
//!
//! The API has shipped several record shapes over time, so books and pages
//! are resolved from raw JSON with fixed field priorities. The raw record is
//! kept alongside the resolved fields.
//!
//! ```text
//! Book  id:    id > _id > book_id
//!       title: original_book_title > english_book_title > title > name > "Book {id}"
//! Page  page_number (display as received, sort key = integer parse or 0)
//!       page_label  (optional)
//! ```

use log::{debug, warn};
use serde_json::{Map, Value};

const BOOK_ID_FIELDS: &[&str] = &["id", "_id", "book_id"];
const BOOK_TITLE_FIELDS: &[&str] = &[
    "original_book_title",
    "english_book_title",
    "title",
    "name",
];

/// Text of a scalar field, or None when absent, null or an empty string.
fn field_text(record: &Value, field: &str) -> Option<String> {
    match record.get(field)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_field_text(record: &Value, fields: &[&str]) -> Option<String> {
    fields.iter().find_map(|field| field_text(record, field))
}

/// Resolves a book id from a raw record.
pub fn resolve_book_id(record: &Value) -> Option<String> {
    first_field_text(record, BOOK_ID_FIELDS)
}

/// Resolves the displayable title, falling back to `Book {id}`.
pub fn resolve_book_title(record: &Value) -> String {
    first_field_text(record, BOOK_TITLE_FIELDS).unwrap_or_else(|| {
        let id = resolve_book_id(record).unwrap_or_else(|| "Unknown".to_string());
        format!("Book {id}")
    })
}

// ============================================================================
// Book
// ============================================================================

#[derive(Debug, Clone)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub raw: Value,
}

impl Book {
    /// Returns None when no id field resolves.
    pub fn from_record(record: &Value) -> Option<Book> {
        let id = resolve_book_id(record)?;
        Some(Book {
            title: resolve_book_title(record),
            id,
            raw: record.clone(),
        })
    }
}

impl PartialEq for Book {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Book {}

// ============================================================================
// Page
// ============================================================================

/// A page number exactly as the API sent it.
#[derive(Debug, Clone, PartialEq)]
pub struct PageNumber(Value);

impl PageNumber {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    /// Display form: strings as-is, numbers in decimal, anything else empty.
    pub fn display(&self) -> String {
        match &self.0 {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        }
    }

    /// Integer used for ordering. Unparsable values sort as 0; floats count
    /// only when integral (`3.0`).
    pub fn sort_key(&self) -> i64 {
        match &self.0 {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
                .unwrap_or(0),
            Value::String(s) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.display().is_empty()
    }
}

impl From<i64> for PageNumber {
    fn from(n: i64) -> Self {
        Self(Value::from(n))
    }
}

impl From<&str> for PageNumber {
    fn from(s: &str) -> Self {
        Self(Value::from(s))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub page_number: PageNumber,
    pub page_label: Option<String>,
    pub raw: Value,
}

impl Page {
    pub fn from_record(record: &Value) -> Page {
        Page {
            page_number: PageNumber::new(record.get("page_number").cloned().unwrap_or(Value::Null)),
            page_label: field_text(record, "page_label"),
            raw: record.clone(),
        }
    }

    /// Label shown to the user: the page label, or `Page {n}`.
    pub fn caption(&self) -> String {
        match &self.page_label {
            Some(label) => label.clone(),
            None => format!("Page {}", self.page_number.display()),
        }
    }
}

/// Picks the default page: first element of a stable ascending sort by
/// page sort key. The input order is left untouched.
pub fn default_page(pages: &[Page]) -> Option<&Page> {
    let mut sorted: Vec<&Page> = pages.iter().collect();
    sorted.sort_by_key(|page| page.page_number.sort_key());
    sorted.first().copied()
}

/// Opaque page content payload.
#[derive(Debug, Clone, PartialEq)]
pub struct PageContent(pub Value);

// ============================================================================
// Response Normalization
// ============================================================================

/// Which list a response is expected to carry. Decides the envelope probe order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingKind {
    Books,
    Pages,
}

impl ListingKind {
    pub fn envelope_keys(self) -> &'static [&'static str] {
        match self {
            ListingKind::Books => &["books", "data"],
            ListingKind::Pages => &["page_maps", "pages", "data"],
        }
    }
}

/// Shape of a raw list response.
#[derive(Debug, PartialEq)]
pub enum Listing {
    Bare(Vec<Value>),
    Envelope(Map<String, Value>),
    Unrecognized,
}

impl Listing {
    pub fn classify(raw: Value) -> Listing {
        match raw {
            Value::Array(items) => Listing::Bare(items),
            Value::Object(map) => Listing::Envelope(map),
            _ => Listing::Unrecognized,
        }
    }

    /// Extracts the record list; unrecognized shapes yield an empty list.
    pub fn into_records(self, kind: ListingKind) -> Vec<Value> {
        match self {
            Listing::Bare(items) => items,
            Listing::Envelope(mut map) => {
                for key in kind.envelope_keys() {
                    if !matches!(map.get(*key), Some(Value::Array(_))) {
                        continue;
                    }
                    if let Some(Value::Array(items)) = map.remove(*key) {
                        return items;
                    }
                }
                debug!(
                    "{:?} envelope has none of {:?}, treating as empty",
                    kind,
                    kind.envelope_keys()
                );
                Vec::new()
            }
            Listing::Unrecognized => {
                debug!("Unrecognized {:?} response shape, treating as empty", kind);
                Vec::new()
            }
        }
    }
}

pub fn normalize_books(raw: Value) -> Vec<Book> {
    Listing::classify(raw)
        .into_records(ListingKind::Books)
        .iter()
        .filter_map(|record| {
            let book = Book::from_record(record);
            if book.is_none() {
                warn!("Dropping book record without an id: {}", record);
            }
            book
        })
        .collect()
}

pub fn normalize_pages(raw: Value) -> Vec<Page> {
    Listing::classify(raw)
        .into_records(ListingKind::Pages)
        .iter()
        .map(Page::from_record)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_book_id_priority() {
        let record = json!({"book_id": "c", "_id": "b", "id": "a"});
        assert_eq!(resolve_book_id(&record).as_deref(), Some("a"));

        let record = json!({"id": "", "_id": "b", "book_id": "c"});
        assert_eq!(resolve_book_id(&record).as_deref(), Some("b"));

        let record = json!({"book_id": 17});
        assert_eq!(resolve_book_id(&record).as_deref(), Some("17"));

        assert_eq!(resolve_book_id(&json!({"id": null})), None);
    }

    #[test]
    fn test_book_title_priority_and_fallback() {
        let record = json!({
            "id": "1",
            "name": "Name",
            "title": "Title",
            "english_book_title": "English",
            "original_book_title": "Original",
        });
        assert_eq!(resolve_book_title(&record), "Original");

        let record = json!({"id": "1", "original_book_title": "", "title": "Title", "name": "Name"});
        assert_eq!(resolve_book_title(&record), "Title");

        assert_eq!(resolve_book_title(&json!({"_id": "42"})), "Book 42");
        assert_eq!(resolve_book_title(&json!({})), "Book Unknown");
    }

    #[test]
    fn test_books_equal_by_id() {
        let a = Book::from_record(&json!({"id": "x", "title": "One"})).unwrap();
        let b = Book::from_record(&json!({"_id": "x", "title": "Two"})).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_page_number_sort_key() {
        assert_eq!(PageNumber::from("3").sort_key(), 3);
        assert_eq!(PageNumber::from(" 12 ").sort_key(), 12);
        assert_eq!(PageNumber::from("2x").sort_key(), 0);
        assert_eq!(PageNumber::from(7).sort_key(), 7);
        assert_eq!(PageNumber::new(json!(2.5)).sort_key(), 0);
        assert_eq!(PageNumber::new(json!(3.0)).sort_key(), 3);
        assert_eq!(PageNumber::new(Value::Null).sort_key(), 0);
    }

    #[test]
    fn test_page_number_display_preserved() {
        assert_eq!(PageNumber::from("2x").display(), "2x");
        assert_eq!(PageNumber::from(" 12 ").display(), " 12 ");
        assert_eq!(PageNumber::from(4).display(), "4");
        assert!(PageNumber::new(Value::Null).is_empty());
    }

    #[test]
    fn test_default_page_uses_sorted_copy() {
        let pages = normalize_pages(json!([
            {"page_number": "3"},
            {"page_number": "1"},
            {"page_number": "2x"},
            {"page_number": "2"},
        ]));
        let chosen = default_page(&pages).unwrap();
        assert_eq!(chosen.page_number.display(), "2x");

        let order: Vec<String> = pages.iter().map(|p| p.page_number.display()).collect();
        assert_eq!(order, vec!["3", "1", "2x", "2"]);
    }

    #[test]
    fn test_integral_float_page_sorts_by_value() {
        let pages = normalize_pages(json!([{"page_number": 3.0}, {"page_number": 2}]));
        assert_eq!(default_page(&pages).unwrap().page_number.sort_key(), 2);
    }

    #[test]
    fn test_default_page_is_stable_for_equal_keys() {
        let pages = normalize_pages(json!([
            {"page_number": "b", "page_label": "first"},
            {"page_number": "a", "page_label": "second"},
        ]));
        assert_eq!(default_page(&pages).unwrap().page_label.as_deref(), Some("first"));
        assert!(default_page(&[]).is_none());
    }

    #[test]
    fn test_page_envelopes_yield_same_list() {
        let list = json!([{"page_number": 1}, {"page_number": 2}]);
        let expected = normalize_pages(list.clone());

        assert_eq!(normalize_pages(json!({"page_maps": list.clone()})), expected);
        assert_eq!(normalize_pages(json!({"pages": list.clone()})), expected);
        assert_eq!(normalize_pages(json!({"data": list.clone()})), expected);
        assert_eq!(expected.len(), 2);
    }

    #[test]
    fn test_envelope_probe_skips_non_sequences() {
        let raw = json!({"page_maps": {"not": "a list"}, "pages": [{"page_number": 9}]});
        let pages = normalize_pages(raw);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].page_number.sort_key(), 9);

        let raw = json!({"page_maps": [], "pages": [{"page_number": 9}]});
        assert!(normalize_pages(raw).is_empty());
    }

    #[test]
    fn test_malformed_responses_are_empty() {
        assert!(normalize_pages(json!("oops")).is_empty());
        assert!(normalize_pages(json!({"items": []})).is_empty());
        assert!(normalize_books(Value::Null).is_empty());
    }

    #[test]
    fn test_book_envelopes_and_dropped_records() {
        let list = json!([{"id": "1", "title": "A"}, {"title": "no id"}, {"_id": "2"}]);
        let books = normalize_books(json!({"books": list.clone()}));
        assert_eq!(books.len(), 2);
        assert_eq!(books[1].title, "Book 2");
        assert_eq!(normalize_books(json!({"data": list})).len(), 2);

        // "pages" is not a books envelope key
        assert!(normalize_books(json!({"pages": [{"id": "1"}]})).is_empty());
    }

    #[test]
    fn test_page_caption() {
        let labeled = Page::from_record(&json!({"page_number": 4, "page_label": "iv"}));
        assert_eq!(labeled.caption(), "iv");
        let plain = Page::from_record(&json!({"page_number": 4}));
        assert_eq!(plain.caption(), "Page 4");
    }
}
