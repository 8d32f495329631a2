//! Stored response entries and their HTTP metadata.

use std::collections::BTreeMap;

use axum::{
    body::Body,
    http::{
        HeaderMap, HeaderName, HeaderValue,
        header::{
            CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_ENCODING, CONTENT_LANGUAGE, CONTENT_TYPE,
        },
    },
    response::Response,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::store::{PutOptions, StoredObject};

/// Custom metadata field holding the freshness deadline.
pub const EXPIRES_AT_FIELD: &str = "expiresAt";

/// The subset of response headers that round-trips through the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_control: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_disposition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_encoding: Option<String>,
}

impl HttpMetadata {
    /// Capture the stored headers from an outgoing response.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            content_type: header_string(headers, &CONTENT_TYPE),
            cache_control: header_string(headers, &CACHE_CONTROL),
            content_language: header_string(headers, &CONTENT_LANGUAGE),
            content_disposition: header_string(headers, &CONTENT_DISPOSITION),
            content_encoding: header_string(headers, &CONTENT_ENCODING),
        }
    }

    /// Write every present field back as a header.
    pub fn write_headers(&self, headers: &mut HeaderMap) {
        let fields = [
            (CONTENT_TYPE, self.content_type.as_deref()),
            (CACHE_CONTROL, self.cache_control.as_deref()),
            (CONTENT_LANGUAGE, self.content_language.as_deref()),
            (CONTENT_DISPOSITION, self.content_disposition.as_deref()),
            (CONTENT_ENCODING, self.content_encoding.as_deref()),
        ];
        for (name, value) in fields {
            let Some(value) = value else { continue };
            if let Ok(header_value) = HeaderValue::from_bytes(value.as_bytes()) {
                headers.insert(name, header_value);
            }
        }
    }
}

/// Header value as UTF-8 text; non-ASCII bytes such as RFC 6266 filenames
/// are kept as is.
fn header_string(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| std::str::from_utf8(value.as_bytes()).ok())
        .map(str::to_string)
}

/// A rendered response together with its freshness deadline.
///
/// Immutable once written; a later miss overwrites it wholesale.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub body: Bytes,
    pub http_metadata: HttpMetadata,
    /// Unix seconds after which the entry is stale.
    pub expires_at: i64,
}

impl CacheEntry {
    /// Entry written at `written_at` that stays fresh for `ttl_secs`.
    pub fn new(body: Bytes, http_metadata: HttpMetadata, written_at: i64, ttl_secs: u64) -> Self {
        let ttl = i64::try_from(ttl_secs).unwrap_or(i64::MAX);
        Self {
            body,
            http_metadata,
            expires_at: written_at.saturating_add(ttl),
        }
    }

    /// Rebuild an entry from a stored blob.
    ///
    /// A missing or unparsable deadline reads as `0`, i.e. stale.
    pub fn from_object(object: StoredObject) -> Self {
        let expires_at = object
            .custom_metadata
            .get(EXPIRES_AT_FIELD)
            .and_then(|value| value.trim().parse::<i64>().ok())
            .unwrap_or(0);
        Self {
            body: object.body,
            http_metadata: object.http_metadata,
            expires_at,
        }
    }

    pub fn is_fresh(&self, now: i64) -> bool {
        self.expires_at > now
    }

    /// Split into the body and store options for a `put`.
    pub fn into_put(self) -> (Bytes, PutOptions) {
        let mut custom_metadata = BTreeMap::new();
        custom_metadata.insert(EXPIRES_AT_FIELD.to_string(), self.expires_at.to_string());
        (
            self.body,
            PutOptions {
                http_metadata: self.http_metadata,
                custom_metadata,
            },
        )
    }

    /// Serve the entry: status 200, stored body, reconstructed headers.
    pub fn into_response(self) -> Response {
        let Self {
            body,
            http_metadata,
            ..
        } = self;
        let mut response = Response::new(Body::from(body));
        http_metadata.write_headers(response.headers_mut());
        response
    }
}
