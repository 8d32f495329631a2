use std::sync::Arc;

use tracing::debug;

use crate::application::pagination::{Pagination, PaginationInput, build_pagination, total_pages};
use crate::application::repos::{MediaFilter, MediaPageRequest, MediaRepo, RepoError};
use crate::domain::media::{MediaItem, MediaType};

/// Items per home-page strip.
pub const LATEST_LIMIT: u32 = 8;

/// Listing page size per media type.
pub fn page_size(media_type: MediaType) -> u32 {
    match media_type {
        MediaType::Video => 12,
        MediaType::Audio => 10,
    }
}

/// Heading of the listing page for a media type.
pub fn listing_title(media_type: MediaType) -> &'static str {
    match media_type {
        MediaType::Video => "Videos",
        MediaType::Audio => "Luister",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub media_type: MediaType,
    pub category: Option<String>,
    /// Requested page, already parsed; clamped against the item count.
    pub page: u32,
}

/// One resolved listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub media_type: MediaType,
    pub category: Option<String>,
    pub page: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub items: Vec<MediaItem>,
}

impl Listing {
    pub fn pagination(&self) -> Pagination {
        build_pagination(&PaginationInput {
            page: self.page,
            total_pages: self.total_pages,
            has_next: self.has_next,
            base_path: self.media_type.type_path(),
            category: self.category.as_deref(),
        })
    }
}

/// Newest published items of each type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LatestMedia {
    pub videos: Vec<MediaItem>,
    pub audio: Vec<MediaItem>,
}

#[derive(Clone)]
pub struct CatalogService {
    repo: Arc<dyn MediaRepo>,
}

impl CatalogService {
    pub fn new(repo: Arc<dyn MediaRepo>) -> Self {
        Self { repo }
    }

    /// Resolve a listing page, clamping the requested page into range.
    pub async fn listing(&self, query: ListingQuery) -> Result<Listing, RepoError> {
        let filter = MediaFilter::new(query.media_type, query.category);
        let page_size = page_size(query.media_type);

        let total = self.repo.count_media(&filter).await?;
        let total_pages = total_pages(total, page_size);
        let page = query.page.clamp(1, total_pages);
        if page != query.page {
            debug!(
                requested = query.page,
                page, total_pages, "clamped listing page"
            );
        }

        let request = MediaPageRequest {
            filter,
            page,
            page_size,
        };
        let result = self.repo.list_media_paged(&request).await?;

        Ok(Listing {
            media_type: query.media_type,
            category: request.filter.category,
            page,
            total_pages,
            has_next: result.has_next,
            items: result.items,
        })
    }

    /// A published item of `media_type`, or `None` when it should 404.
    pub async fn detail(
        &self,
        media_type: MediaType,
        uid: &str,
    ) -> Result<Option<MediaItem>, RepoError> {
        let item = self.repo.get_media_by_uid(uid).await?;
        Ok(item.filter(|item| item.published && item.media_type == media_type))
    }

    pub async fn latest(&self) -> Result<LatestMedia, RepoError> {
        let (videos, audio) = futures::try_join!(
            self.repo.list_latest_media(MediaType::Video, LATEST_LIMIT),
            self.repo.list_latest_media(MediaType::Audio, LATEST_LIMIT),
        )?;
        Ok(LatestMedia { videos, audio })
    }
}
