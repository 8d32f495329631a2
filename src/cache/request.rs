//! What the response cache needs to know about a request.

use axum::http::{Method, Request};

use crate::domain::identity::Identity;

/// Method, URL and authentication status of an inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: String,
    pub authenticated: bool,
}

impl RequestDescriptor {
    pub fn new(method: Method, url: impl Into<String>, authenticated: bool) -> Self {
        Self {
            method,
            url: url.into(),
            authenticated,
        }
    }

    /// Describe an axum request.
    ///
    /// The request counts as authenticated when the identity resolver left a
    /// signed-in [`Identity`] in its extensions.
    pub fn from_request<B>(request: &Request<B>) -> Self {
        let authenticated = request
            .extensions()
            .get::<Identity>()
            .is_some_and(Identity::is_signed_in);
        Self {
            method: request.method().clone(),
            url: request.uri().to_string(),
            authenticated,
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;

    use super::*;

    #[test]
    fn anonymous_get_request() {
        let request = Request::builder()
            .uri("/videos?page=2")
            .body(Body::empty())
            .unwrap();
        let descriptor = RequestDescriptor::from_request(&request);
        assert_eq!(descriptor.method, Method::GET);
        assert_eq!(descriptor.url, "/videos?page=2");
        assert!(!descriptor.authenticated);
    }

    #[test]
    fn identity_extension_marks_request_authenticated() {
        let mut request = Request::builder()
            .method(Method::POST)
            .uri("/")
            .body(Body::empty())
            .unwrap();
        request.extensions_mut().insert(Identity::new("user_1"));
        let descriptor = RequestDescriptor::from_request(&request);
        assert_eq!(descriptor.method, Method::POST);
        assert!(descriptor.authenticated);
    }

    #[test]
    fn blank_identity_is_not_authenticated() {
        let mut request = Request::builder().uri("/").body(Body::empty()).unwrap();
        request.extensions_mut().insert(Identity::new(""));
        assert!(!RequestDescriptor::from_request(&request).authenticated);
    }
}
