//! Repository traits describing the media catalog adapter.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::media::{MediaItem, MediaType};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

/// Published items of one type, optionally narrowed to a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFilter {
    pub media_type: MediaType,
    pub category: Option<String>,
}

impl MediaFilter {
    pub fn new(media_type: MediaType, category: Option<String>) -> Self {
        Self {
            media_type,
            category: category.filter(|value| !value.is_empty()),
        }
    }

    pub fn matches(&self, item: &MediaItem) -> bool {
        item.published
            && item.media_type == self.media_type
            && self
                .category
                .as_deref()
                .is_none_or(|category| item.category.as_deref() == Some(category))
    }
}

/// A one-based page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPageRequest {
    pub filter: MediaFilter,
    pub page: u32,
    pub page_size: u32,
}

impl MediaPageRequest {
    pub fn offset(&self) -> usize {
        (self.page.max(1) as usize - 1).saturating_mul(self.page_size as usize)
    }
}

/// One page of items; `has_next` is decided by fetching one extra row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPage {
    pub items: Vec<MediaItem>,
    pub has_next: bool,
}

impl MediaPage {
    /// Build a page from up to `page_size + 1` rows.
    pub fn from_overfetch(mut rows: Vec<MediaItem>, page_size: u32) -> Self {
        let page_size = page_size as usize;
        let has_next = rows.len() > page_size;
        rows.truncate(page_size);
        Self {
            items: rows,
            has_next,
        }
    }
}

/// Read access to the media catalog.
///
/// Listings only ever contain published items, newest first
/// (`created_at` descending, then `id` descending).
#[async_trait]
pub trait MediaRepo: Send + Sync {
    async fn list_media_paged(&self, request: &MediaPageRequest) -> Result<MediaPage, RepoError>;

    async fn count_media(&self, filter: &MediaFilter) -> Result<u64, RepoError>;

    async fn list_latest_media(
        &self,
        media_type: MediaType,
        limit: u32,
    ) -> Result<Vec<MediaItem>, RepoError>;

    /// Look up an item by uid regardless of type or publication state.
    async fn get_media_by_uid(&self, uid: &str) -> Result<Option<MediaItem>, RepoError>;
}
