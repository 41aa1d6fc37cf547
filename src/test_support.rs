//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::core::config::DEFAULT_ASSET_ROOT;
use crate::core::types::{Book, PageNumber};
use crate::gateway::{GatewayError, ResourceGateway};

/// A gateway that returns empty listings and has no assets.
pub struct NoopGateway;

#[async_trait]
impl ResourceGateway for NoopGateway {
    fn name(&self) -> &str {
        "noop"
    }

    async fn list_books(&self) -> Result<Value, GatewayError> {
        Ok(json!([]))
    }

    async fn list_pages(&self, _book_id: &str) -> Result<Value, GatewayError> {
        Ok(json!([]))
    }

    async fn get_page_content(
        &self,
        _book_id: &str,
        _page_number: &PageNumber,
    ) -> Result<Value, GatewayError> {
        Ok(Value::Null)
    }

    async fn load_asset(&self, _path: &str) -> Result<usize, GatewayError> {
        Err(GatewayError::Api {
            status: 404,
            message: "not found".to_string(),
        })
    }
}

/// Creates a test App with the default asset root.
pub fn test_app() -> crate::core::state::App {
    crate::core::state::App::new(DEFAULT_ASSET_ROOT)
}

pub fn book_record(id: &str, title: &str) -> Value {
    json!({"id": id, "title": title})
}

/// Books with ids `0..n` and the given titles, in order.
pub fn books(titles: &[&str]) -> Vec<Book> {
    titles
        .iter()
        .enumerate()
        .filter_map(|(i, title)| Book::from_record(&book_record(&i.to_string(), title)))
        .collect()
}
