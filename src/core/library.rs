//! # Library Index
//!
//! Groups the book list into alphabetic buckets for the shelf tabs and
//! answers live title searches.
//!
//! ```text
//! books ──► LibraryIndex::build ──► buckets  '#' → [1984]
//!                                            'A' → [amrta]
//!                                            'B' → [Bhagavad Gita]
//!
//! LibraryIndex::view(books, search_term, active_bucket) ──► BookView
//!   term empty     → Bucket(active_bucket)
//!   term non-empty → Search over the full list, tabs ignored
//! ```
//!
//! Pure functions only. The reducer rebuilds the index when the books
//! change and refreshes the view when the term or bucket changes.

use std::collections::BTreeMap;

use crate::core::collate;
use crate::core::types::Book;

/// Bucket key for titles that don't start with A-Z.
pub const OTHER_BUCKET: char = '#';

/// Default active bucket.
pub const DEFAULT_BUCKET: char = 'A';

/// Bucket key for a title: its first character upper-cased if that is A-Z,
/// otherwise `#`.
pub fn bucket_key(title: &str) -> char {
    title
        .chars()
        .next()
        .and_then(|c| c.to_uppercase().next())
        .filter(char::is_ascii_uppercase)
        .unwrap_or(OTHER_BUCKET)
}

/// Case-insensitive substring match against a book title.
pub fn title_matches(book: &Book, term: &str) -> bool {
    book.title.to_lowercase().contains(&term.to_lowercase())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LibraryIndex {
    buckets: BTreeMap<char, Vec<Book>>,
}

impl LibraryIndex {
    pub fn build(books: &[Book]) -> Self {
        let mut buckets: BTreeMap<char, Vec<Book>> = BTreeMap::new();
        for book in books {
            buckets.entry(bucket_key(&book.title)).or_default().push(book.clone());
        }
        for bucket in buckets.values_mut() {
            bucket.sort_by(|a, b| collate::compare(&a.title, &b.title));
        }
        Self { buckets }
    }

    /// Keys of non-empty buckets in ascending order, with their sizes.
    pub fn tabs(&self) -> Vec<(char, usize)> {
        self.buckets.iter().map(|(key, books)| (*key, books.len())).collect()
    }

    /// Books in a bucket. Unknown keys give an empty slice.
    pub fn bucket(&self, key: char) -> &[Book] {
        self.buckets.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn view(&self, books: &[Book], search_term: &str, active_bucket: char) -> BookView {
        if search_term.is_empty() {
            return BookView::Bucket {
                key: active_bucket,
                books: self.bucket(active_bucket).to_vec(),
            };
        }
        BookView::Search {
            term: search_term.to_string(),
            books: books
                .iter()
                .filter(|book| title_matches(book, search_term))
                .cloned()
                .collect(),
        }
    }
}

/// What the shelf shows right now.
#[derive(Debug, Clone, PartialEq)]
pub enum BookView {
    Bucket { key: char, books: Vec<Book> },
    Search { term: String, books: Vec<Book> },
}

impl BookView {
    pub fn books(&self) -> &[Book] {
        match self {
            BookView::Bucket { books, .. } | BookView::Search { books, .. } => books,
        }
    }

    pub fn is_search(&self) -> bool {
        matches!(self, BookView::Search { .. })
    }

    pub fn empty_message(&self) -> String {
        match self {
            BookView::Bucket { .. } => "No books in this category".to_string(),
            BookView::Search { term, .. } => format!("No books found for \"{term}\""),
        }
    }
}

impl Default for BookView {
    fn default() -> Self {
        BookView::Bucket {
            key: DEFAULT_BUCKET,
            books: Vec::new(),
        }
    }
}
