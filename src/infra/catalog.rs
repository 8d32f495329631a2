//! In-memory media catalog, optionally loaded from a TOML seed file.
//!
//! ```toml
//! [[media]]
//! uid = "kom-ons-sing"
//! type = "video"
//! title = "Kom ons sing"
//! stream_url = "https://youtu.be/abc123"
//! category = "film"
//! created_at = 1700000000
//! ```

use std::{cmp::Reverse, path::Path};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use crate::application::repos::{
    MediaFilter, MediaPage, MediaPageRequest, MediaRepo, RepoError,
};
use crate::domain::media::{MediaItem, MediaType};

use super::error::InfraError;

#[derive(Debug, Default, Deserialize)]
struct SeedFile {
    #[serde(default)]
    media: Vec<MediaItem>,
}

/// Read-only catalog held in memory, newest first.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    items: Vec<MediaItem>,
}

impl InMemoryCatalog {
    /// Build a catalog; items without an id are numbered in input order.
    pub fn new(mut items: Vec<MediaItem>) -> Self {
        let mut next_id = items.iter().map(|item| item.id).max().unwrap_or(0);
        for item in items.iter_mut().filter(|item| item.id == 0) {
            next_id += 1;
            item.id = next_id;
        }
        items.sort_by_key(|item| Reverse((item.created_at, item.id)));
        Self { items }
    }

    pub fn from_toml(text: &str) -> Result<Self, InfraError> {
        Self::parse(text)
            .map_err(|err| InfraError::configuration(format!("invalid catalog seed: {err}")))
    }

    pub async fn load(path: &Path) -> Result<Self, InfraError> {
        let text = tokio::fs::read_to_string(path).await?;
        let catalog =
            Self::parse(&text).map_err(|err| InfraError::catalog_seed(path, err.to_string()))?;
        info!(path = %path.display(), items = catalog.len(), "loaded media catalog");
        Ok(catalog)
    }

    fn parse(text: &str) -> Result<Self, toml::de::Error> {
        let seed: SeedFile = toml::from_str(text)?;
        Ok(Self::new(seed.media))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn matching<'a>(&'a self, filter: &'a MediaFilter) -> impl Iterator<Item = &'a MediaItem> {
        self.items.iter().filter(move |item| filter.matches(item))
    }
}

#[async_trait]
impl MediaRepo for InMemoryCatalog {
    async fn list_media_paged(&self, request: &MediaPageRequest) -> Result<MediaPage, RepoError> {
        if request.page_size == 0 {
            return Err(RepoError::InvalidInput {
                message: "page size must be greater than zero".to_string(),
            });
        }
        let rows = self
            .matching(&request.filter)
            .skip(request.offset())
            .take(request.page_size as usize + 1)
            .cloned()
            .collect();
        Ok(MediaPage::from_overfetch(rows, request.page_size))
    }

    async fn count_media(&self, filter: &MediaFilter) -> Result<u64, RepoError> {
        Ok(self.matching(filter).count() as u64)
    }

    async fn list_latest_media(
        &self,
        media_type: MediaType,
        limit: u32,
    ) -> Result<Vec<MediaItem>, RepoError> {
        let filter = MediaFilter::new(media_type, None);
        Ok(self
            .matching(&filter)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn get_media_by_uid(&self, uid: &str) -> Result<Option<MediaItem>, RepoError> {
        Ok(self.items.iter().find(|item| item.uid == uid).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = r#"
[[media]]
uid = "old"
type = "video"
title = "Old"
stream_url = "https://youtu.be/old"
created_at = 100

[[media]]
uid = "new"
type = "video"
title = "New"
stream_url = "https://youtu.be/new"
category = "film"
created_at = 200

[[media]]
uid = "draft"
type = "video"
title = "Draft"
stream_url = "https://youtu.be/draft"
published = false
created_at = 300

[[media]]
uid = "story"
type = "audio"
title = "Story"
stream_url = "https://cdn.example.com/story.mp3"
category = "story"
created_at = 200
"#;

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::from_toml(SEED).expect("seed parses")
    }

    #[test]
    fn ids_are_assigned_in_input_order() {
        let catalog = catalog();
        let old = catalog.items.iter().find(|item| item.uid == "old").unwrap();
        let story = catalog.items.iter().find(|item| item.uid == "story").unwrap();
        assert_eq!(old.id, 1);
        assert_eq!(story.id, 4);
    }

    #[test]
    fn invalid_seed_is_a_configuration_error() {
        let err = InMemoryCatalog::from_toml("[[media]]\nuid = 3").unwrap_err();
        assert!(matches!(err, InfraError::Configuration { .. }));
    }

    #[tokio::test]
    async fn load_reports_the_seed_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("catalog.toml");
        tokio::fs::write(&path, "[[media]]\nuid = 3\n")
            .await
            .expect("write seed");

        let err = InMemoryCatalog::load(&path).await.unwrap_err();
        match err {
            InfraError::CatalogSeed { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("unexpected error: {other}"),
        }

        tokio::fs::write(&path, SEED).await.expect("write seed");
        let catalog = InMemoryCatalog::load(&path).await.expect("seed loads");
        assert!(!catalog.is_empty());
    }

    #[tokio::test]
    async fn listings_skip_drafts_and_order_newest_first() {
        let catalog = catalog();
        let filter = MediaFilter::new(MediaType::Video, None);
        let page = catalog
            .list_media_paged(&MediaPageRequest {
                filter: filter.clone(),
                page: 1,
                page_size: 10,
            })
            .await
            .unwrap();

        let uids: Vec<_> = page.items.iter().map(|item| item.uid.as_str()).collect();
        assert_eq!(uids, vec!["new", "old"]);
        assert!(!page.has_next);
        assert_eq!(catalog.count_media(&filter).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn equal_timestamps_break_ties_by_id() {
        let mut items = Vec::new();
        for uid in ["a", "b", "c"] {
            let mut item = catalog().items[0].clone();
            item.id = 0;
            item.uid = uid.to_string();
            item.created_at = 5;
            item.published = true;
            item.media_type = MediaType::Video;
            items.push(item);
        }
        let catalog = InMemoryCatalog::new(items);
        let latest = catalog
            .list_latest_media(MediaType::Video, 10)
            .await
            .unwrap();
        let uids: Vec<_> = latest.iter().map(|item| item.uid.as_str()).collect();
        assert_eq!(uids, vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn over_fetch_reports_next_page() {
        let page = catalog()
            .list_media_paged(&MediaPageRequest {
                filter: MediaFilter::new(MediaType::Video, None),
                page: 1,
                page_size: 1,
            })
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert!(page.has_next);
    }

    #[tokio::test]
    async fn category_filter_applies() {
        let filter = MediaFilter::new(MediaType::Video, Some("film".to_string()));
        assert_eq!(catalog().count_media(&filter).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn uid_lookup_ignores_publication_state() {
        let draft = catalog().get_media_by_uid("draft").await.unwrap().unwrap();
        assert!(!draft.published);
        assert!(catalog().get_media_by_uid("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn load_reads_seed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        std::fs::write(&path, SEED).unwrap();

        let catalog = InMemoryCatalog::load(&path).await.unwrap();
        assert_eq!(catalog.len(), 4);
    }
}
