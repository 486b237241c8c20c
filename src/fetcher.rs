//! Remote message fetcher
//!
//! Walks the paginated message API until it runs dry. Pagination is strictly
//! sequential; the only concurrency bound is the client's connection pool.

use crate::models::{Message, RemotePage};
use crate::Result;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{info, warn};

/// Outcome of requesting a single page.
#[derive(Debug)]
pub enum PageResponse {
    Page(RemotePage),
    /// The endpoint answered with a non-200 status, read as end of data.
    EndOfData(u16),
}

/// Trait for a paginated message source
#[async_trait]
pub trait MessageSource: Send + Sync {
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<PageResponse>;
}

/// Message source backed by the remote HTTP API.
pub struct HttpMessageSource {
    client: Client,
    url: String,
}

impl HttpMessageSource {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            // Caps idle connections only; reqwest has no limit on open ones.
            // Pages are fetched one at a time, so at most one is in flight.
            .pool_max_idle_per_host(5)
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl MessageSource for HttpMessageSource {
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<PageResponse> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("page", page), ("limit", limit)])
            .send()
            .await?;

        let status = response.status();
        info!("Page {}: {}", page, status.as_u16());

        if status != StatusCode::OK {
            return Ok(PageResponse::EndOfData(status.as_u16()));
        }

        Ok(PageResponse::Page(response.json().await?))
    }
}

/// Pagination knobs for [`fetch_all`].
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    pub page_size: u32,
    /// Pause between pages so the remote service is not hammered.
    pub page_delay: Duration,
    /// Hard stop for servers that never report a total nor run out of pages.
    pub max_pages: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: 100,
            page_delay: Duration::from_millis(100),
            max_pages: 10_000,
        }
    }
}

/// Fetch every message from `source`.
///
/// Any error aborts the walk and yields an empty corpus: a partially fetched
/// corpus is never served.
pub async fn fetch_all(source: &dyn MessageSource, config: &PaginationConfig) -> Vec<Message> {
    match paginate(source, config).await {
        Ok(messages) => {
            info!("Finished: {} messages fetched", messages.len());
            messages
        }
        Err(e) => {
            warn!("Fetch failed: {}. Messages list is empty.", e);
            Vec::new()
        }
    }
}

async fn paginate(source: &dyn MessageSource, config: &PaginationConfig) -> Result<Vec<Message>> {
    let mut messages = Vec::new();
    let mut api_total: Option<u64> = None;
    let mut total_seen = false;
    let mut page = 0u32;

    loop {
        if page >= config.max_pages {
            warn!("Reached page limit ({}), stopping", config.max_pages);
            break;
        }

        let data = match source.fetch_page(page, config.page_size).await? {
            PageResponse::Page(data) => data,
            PageResponse::EndOfData(status) => {
                info!("End of data (HTTP {}), stopping", status);
                break;
            }
        };

        if data.is_empty() {
            info!("Empty page, stopping");
            break;
        }

        // Only the first page that carries a total is consulted, even when
        // that total turns out to be unusable.
        if !total_seen && data.has_total() {
            total_seen = true;
            api_total = data.total();
            if let Some(total) = api_total {
                info!("API reports total: {}", total);
            }
        }

        let batch = data.into_messages();
        let batch_len = batch.len();
        messages.extend(batch);
        info!("{} messages (total: {})", batch_len, messages.len());

        if let Some(total) = api_total {
            if messages.len() as u64 >= total {
                info!("Reached API total ({}), stopping", total);
                break;
            }
        }

        page += 1;
        tokio::time::sleep(config.page_delay).await;
    }

    Ok(messages)
}
