//! HTTP gateway for the Pure Bhakti Base API.
//!
//! ```text
//! GET {api}/books
//! GET {api}/books/{book_id}/pages
//! GET {api}/books/{book_id}/pages/{page_number}
//! GET {assets}{path}
//! ```

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{Response, Url};
use serde_json::Value;

use crate::core::config::ResolvedConfig;
use crate::core::types::PageNumber;
use crate::gateway::{GatewayError, ResourceGateway};

pub struct HttpGateway {
    api_base_url: String,
    asset_base_url: String,
    client: reqwest::Client,
}

impl HttpGateway {
    pub fn new(
        api_base_url: impl Into<String>,
        asset_base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, GatewayError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| GatewayError::Config(e.to_string()))?;

        Ok(Self {
            api_base_url: api_base_url.into(),
            asset_base_url: asset_base_url.into(),
            client,
        })
    }

    pub fn from_config(config: &ResolvedConfig) -> Result<Self, GatewayError> {
        Self::new(
            config.api_base_url.clone(),
            config.asset_base_url.clone(),
            config.request_timeout,
        )
    }

    /// Builds `{api}/seg/seg/...` with each segment percent-encoded.
    fn api_url(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        let mut url = Url::parse(&self.api_base_url)
            .map_err(|e| GatewayError::Config(format!("invalid API URL {}: {e}", self.api_base_url)))?;
        url.path_segments_mut()
            .map_err(|_| GatewayError::Config(format!("API URL cannot be a base: {}", self.api_base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Appends an asset path to the asset base, one encoded segment per
    /// `/`-separated part, so ids holding `#` or `?` stay in the path.
    fn asset_url(&self, path: &str) -> Result<Url, GatewayError> {
        let mut url = Url::parse(&self.asset_base_url)
            .map_err(|e| GatewayError::Config(format!("invalid asset URL {}: {e}", self.asset_base_url)))?;
        url.path_segments_mut()
            .map_err(|_| GatewayError::Config(format!("asset URL cannot be a base: {}", self.asset_base_url)))?
            .pop_if_empty()
            .extend(path.split('/').filter(|segment| !segment.is_empty()));
        Ok(url)
    }

    async fn get(&self, url: Url) -> Result<Response, GatewayError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("API error for {}: {} - {}", url, status, err_body);
            return Err(GatewayError::Api {
                status,
                message: err_body,
            });
        }
        Ok(response)
    }

    async fn get_json(&self, url: Url) -> Result<Value, GatewayError> {
        let response = self.get(url).await?;
        response
            .json::<Value>()
            .await
            .map_err(|e| GatewayError::Parse(e.to_string()))
    }
}

#[async_trait]
impl ResourceGateway for HttpGateway {
    fn name(&self) -> &str {
        "http"
    }

    async fn list_books(&self) -> Result<Value, GatewayError> {
        let url = self.api_url(&["books"])?;
        info!("Requesting book list");
        self.get_json(url).await
    }

    async fn list_pages(&self, book_id: &str) -> Result<Value, GatewayError> {
        let url = self.api_url(&["books", book_id, "pages"])?;
        info!("Requesting pages for book {}", book_id);
        self.get_json(url).await
    }

    async fn get_page_content(
        &self,
        book_id: &str,
        page_number: &PageNumber,
    ) -> Result<Value, GatewayError> {
        let page = page_number.display();
        let url = self.api_url(&["books", book_id, "pages", &page])?;
        info!("Requesting content for book {} page {}", book_id, page);

        // Content is opaque; a non-JSON body is kept as text.
        let body = self
            .get(url)
            .await?
            .text()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;
        Ok(serde_json::from_str(&body).unwrap_or(Value::String(body)))
    }

    async fn load_asset(&self, path: &str) -> Result<usize, GatewayError> {
        let url = self.asset_url(path)?;
        let bytes = self
            .get(url)
            .await?
            .bytes()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;
        debug!("Loaded asset {} ({} bytes)", path, bytes.len());
        Ok(bytes.len())
    }
}
