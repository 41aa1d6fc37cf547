//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as parameters:
//! - `TitleBar`: Top status bar with the selected book and status
//! - `ImagePanel`: Page scan path and load status, fullscreen overlay
//! - `ContentPanel`: Page content (scroll offset is borrowed, not owned)
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that keep cursor state in `TuiState` and turn key presses
//! into core `Action`s:
//! - `BookShelf`: search box, bucket tabs, book list
//! - `PageList`: pages of the selected book
//!
//! Components never mutate `App`. They read it as props and return actions
//! for `update()` to apply.
//!
//! ```text
//! components/
//! ├── mod.rs            (this file)
//! ├── title_bar.rs      (Top status bar)
//! ├── book_shelf.rs     (Books tier)
//! ├── page_list.rs      (Pages tier)
//! ├── image_panel.rs    (Page scan)
//! ├── content_panel.rs  (Content tier)
//! └── tier_status.rs    (Loading / error placeholders)
//! ```

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

mod title_bar;
pub use title_bar::TitleBar;

pub mod book_shelf;
pub mod content_panel;
pub mod image_panel;
pub mod page_list;
pub mod tier_status;
pub use book_shelf::{BookShelf, ShelfState};
pub use content_panel::ContentPanel;
pub use image_panel::ImagePanel;
pub use page_list::{PageList, PageListState};

/// Truncate a string to fit within `max_width` columns, adding "..." if needed.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 3 {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string_untouched() {
        assert_eq!(truncate_to_width("Gita", 10), "Gita");
    }

    #[test]
    fn test_truncate_respects_display_width() {
        assert_eq!(truncate_to_width("Śrīmad Bhāgavatam", 10), "Śrīmad ...");
        assert_eq!(truncate_to_width("汉字汉字", 7), "汉字...");
        assert_eq!(truncate_to_width("abcdef", 2), "..");
    }
}
