//! Mediashelf Response Cache
//!
//! Cache-aside layer that keeps fully rendered responses in a blob store:
//!
//! - Entries live under `<version>:<scope>:<url>`; bumping the version tag
//!   orphans every older entry without deleting it.
//! - Freshness is a per-entry `expiresAt` deadline (unix seconds) stored as
//!   custom blob metadata next to the HTTP metadata.
//! - Only anonymous GET requests are served from or written to the store, and
//!   only successful responses are written.
//! - Store failures never fail a request; the cache degrades to always-compute.
//!
//! Concurrent misses for the same key may all compute and write; the last
//! writer wins.
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! backend = "memory"        # memory | filesystem | disabled
//! response_ttl_seconds = 5
//! template_ttl_seconds = 300
//! version = "v1"
//! ```

mod clock;
mod config;
mod entry;
mod keys;
mod middleware;
mod request;
mod response;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CacheConfig;
pub use entry::{CacheEntry, EXPIRES_AT_FIELD, HttpMetadata};
pub use keys::{CacheKey, digest_key};
pub use middleware::{CacheState, HTMX_REQUEST_HEADER, is_htmx_request, response_cache_layer};
pub use request::RequestDescriptor;
pub use response::{
    METRIC_RESPONSE_CACHE_BYPASS, METRIC_RESPONSE_CACHE_HIT, METRIC_RESPONSE_CACHE_MISS,
    METRIC_RESPONSE_CACHE_STORE_ERROR, ResponseCache,
};
pub use store::{BlobStore, BlobStoreError, MemoryBlobStore, PutOptions, StoredObject};
