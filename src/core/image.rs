//! Page image resolution.
//!
//! A page image lives at `{asset_root}/{book_id}/{page_number}.webp`. The
//! only signal about it is whether loading that path succeeded.

use log::debug;

use crate::core::types::PageNumber;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageStatus {
    Loading,
    Loaded,
    Errored,
}

/// Resource path for a page image. Both parts must be non-empty.
pub fn image_path(asset_root: &str, book_id: &str, page_number: &PageNumber) -> Option<String> {
    let page = page_number.display();
    if book_id.is_empty() || page.is_empty() {
        return None;
    }
    Some(format!("{}/{}/{}.webp", asset_root.trim_end_matches('/'), book_id, page))
}

#[derive(Debug, Clone)]
pub struct ImageView {
    pub asset_root: String,
    /// None while no page is selected.
    pub path: Option<String>,
    pub status: ImageStatus,
    pub fullscreen: bool,
}

impl ImageView {
    pub fn new(asset_root: impl Into<String>) -> Self {
        Self {
            asset_root: asset_root.into(),
            path: None,
            status: ImageStatus::Loading,
            fullscreen: false,
        }
    }

    /// Points the view at a page. Returns the path to load when it changed.
    pub fn retarget(&mut self, target: Option<(&str, &PageNumber)>) -> Option<String> {
        let path = target.and_then(|(book_id, page)| image_path(&self.asset_root, book_id, page));
        if path == self.path {
            return None;
        }
        debug!("Image target changed: {:?} -> {:?}", self.path, path);
        self.path = path.clone();
        self.status = ImageStatus::Loading;
        path
    }

    /// Applies a load signal. Signals for a path no longer shown are ignored.
    pub fn finish(&mut self, path: &str, ok: bool) -> bool {
        if self.path.as_deref() != Some(path) {
            debug!("Ignoring image signal for stale path {}", path);
            return false;
        }
        self.status = if ok { ImageStatus::Loaded } else { ImageStatus::Errored };
        true
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
    }
}
