use std::sync::Arc;

use axum::{
    Extension, Router,
    body::Body,
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use http_body_util::BodyExt;
use mediashelf::{
    application::{catalog::CatalogService, render::SiteRenderer, templates::TemplateCache},
    cache::{CacheConfig, MemoryBlobStore, ResponseCache},
    domain::identity::Identity,
    infra::{
        catalog::InMemoryCatalog,
        http::{HttpState, build_router},
        templates::EmbeddedTemplates,
    },
};
use tower::ServiceExt;

const SEED: &str = r#"
[[media]]
uid = "treintjie"
type = "video"
category = "film"
title = "Die klein treintjie"
description = "Choo choo"
stream_url = "https://youtu.be/abc123"
featured = true
created_at = 300

[[media]]
uid = "alfabet"
type = "video"
category = "story"
title = "Sing saam"
stream_url = "https://www.youtube.com/watch?v=xyz789"
created_at = 200

[[media]]
uid = "konyn"
type = "audio"
category = "story"
title = "Konyn en Skilpad"
stream_url = "https://cdn.example.com/konyn.mp3"
created_at = 250

[[media]]
uid = "geheim"
type = "video"
title = "Nog nie klaar nie"
stream_url = "https://youtu.be/hidden"
published = false
created_at = 400
"#;

struct TestApp {
    router: Router,
    store: Arc<MemoryBlobStore>,
}

fn app() -> TestApp {
    let catalog = InMemoryCatalog::from_toml(SEED).expect("seed parses");
    let store = Arc::new(MemoryBlobStore::new());
    let templates = TemplateCache::new(Arc::new(EmbeddedTemplates), 300);
    let state = HttpState {
        catalog: Arc::new(CatalogService::new(Arc::new(catalog))),
        renderer: Arc::new(SiteRenderer::new(Arc::new(templates))),
        cache: ResponseCache::new(CacheConfig::default(), store.clone()),
        sign_in_url: Arc::from("https://accounts.example.com/sign-in"),
    };
    TestApp {
        router: build_router(state),
        store,
    }
}

async fn get(router: &Router, uri: &str) -> (StatusCode, String) {
    send(router, Request::builder().uri(uri).body(Body::empty()).expect("request")).await
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router responds");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();
    (status, String::from_utf8(bytes.to_vec()).expect("utf-8 body"))
}

#[tokio::test]
async fn home_page_renders_inside_layout() {
    let app = app();
    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).expect("request"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("text/html; charset=utf-8")
    );

    let (_, body) = get(&app.router, "/").await;
    assert!(body.contains("<title>Kinderklub"));
    assert!(body.contains(r#"href="https://accounts.example.com/sign-in""#));
}

#[tokio::test]
async fn latest_fragment_lists_published_items() {
    let app = app();
    let (status, body) = get(&app.router, "/_fragments/home-latest").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Die klein treintjie"));
    assert!(body.contains("Konyn en Skilpad"));
    assert!(!body.contains("Nog nie klaar nie"));
    assert!(!body.contains("<html"));
}

#[tokio::test]
async fn video_listing_shows_only_published_videos() {
    let app = app();
    let (status, body) = get(&app.router, "/videos").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Die klein treintjie"));
    assert!(body.contains("Sing saam"));
    assert!(!body.contains("Konyn en Skilpad"));
    assert!(!body.contains("Nog nie klaar nie"));
    assert!(body.contains(r#"<div id="media-list">"#));
}

#[tokio::test]
async fn category_filter_narrows_listing() {
    let app = app();
    let (status, body) = get(&app.router, "/videos?category=story").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Sing saam"));
    assert!(!body.contains("Die klein treintjie"));
}

#[tokio::test]
async fn htmx_request_returns_list_fragment() {
    let app = app();
    let request = Request::builder()
        .uri("/videos?page=1")
        .header("HX-Request", "true")
        .body(Body::empty())
        .expect("request");
    let (status, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with(r#"<div id="media-list">"#));
    assert!(!body.contains("<html"));
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn out_of_range_page_is_clamped() {
    let app = app();
    let (status, body) = get(&app.router, "/audio?page=99").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Konyn en Skilpad"));
}

#[tokio::test]
async fn detail_pages_resolve_by_type() {
    let app = app();
    let (status, body) = get(&app.router, "/videos/treintjie").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("https://www.youtube.com/embed/abc123"));

    let (status, body) = get(&app.router, "/audio/konyn").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("https://cdn.example.com/konyn.mp3"));
}

#[tokio::test]
async fn missing_wrong_type_or_unpublished_detail_is_not_found() {
    let app = app();
    for uri in ["/videos/nope", "/audio/treintjie", "/videos/geheim"] {
        let (status, body) = get(&app.router, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert!(body.contains("404"), "{uri}");
    }
}

#[tokio::test]
async fn unknown_path_falls_back_to_not_found_page() {
    let app = app();
    let (status, body) = get(&app.router, "/does/not/exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Hierdie bladsy bestaan nie."));
}

#[tokio::test]
async fn static_pages_render() {
    let app = app();
    for (uri, heading) in [("/contact", "Kontak"), ("/shop", "Winkel"), ("/terms", "Terme")] {
        let (status, body) = get(&app.router, uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert!(body.contains(heading), "{uri}");
    }
}

#[tokio::test]
async fn anonymous_listing_is_cached_under_versioned_key() {
    let app = app();
    get(&app.router, "/videos?page=1").await;
    get(&app.router, "/").await;
    assert_eq!(
        app.store.keys(),
        vec![
            "v1:/videos:/videos?page=1".to_string(),
            "v1:home:/".to_string(),
        ]
    );

    let (status, _) = get(&app.router, "/videos?page=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.store.len(), 2);
}

#[tokio::test]
async fn detail_and_static_pages_are_not_cached() {
    let app = app();
    get(&app.router, "/videos/treintjie").await;
    get(&app.router, "/contact").await;
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn signed_in_viewer_bypasses_cache() {
    let app = app();
    let router = app.router.clone().layer(Extension(Identity::new("user_42")));

    let (status, body) = get(&router, "/videos").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Ingeteken"));
    assert!(app.store.is_empty());
}
