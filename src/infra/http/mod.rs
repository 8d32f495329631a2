mod middleware;
mod public;

pub use middleware::RequestContext;
pub use public::{HttpState, build_router};

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::domain::identity::Identity;

/// Who is looking at the page, as far as rendering is concerned.
///
/// Reads the [`Identity`] an upstream resolver may have attached; absent
/// means anonymous.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewer {
    pub signed_in: bool,
}

impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let signed_in = parts
            .extensions
            .get::<Identity>()
            .is_some_and(Identity::is_signed_in);
        Ok(Self { signed_in })
    }
}
