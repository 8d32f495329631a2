use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    middleware,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;

use crate::{
    application::{
        catalog::{CatalogService, ListingQuery, listing_title},
        error::HttpError,
        pagination::parse_page,
        render::{ListLayout, ListPage, SiteRenderer, StaticPage},
    },
    cache::{CacheState, ResponseCache, is_htmx_request, response_cache_layer},
    domain::media::MediaType,
    presentation::{html::auth_link, pagination::render_pagination},
};

use super::{
    Viewer,
    middleware::{log_responses, set_request_context},
};

/// Key scope of the cached home page.
const HOME_SCOPE: &str = "home";

#[derive(Clone)]
pub struct HttpState {
    pub catalog: Arc<CatalogService>,
    pub renderer: Arc<SiteRenderer>,
    pub cache: ResponseCache,
    pub sign_in_url: Arc<str>,
}

impl HttpState {
    fn auth_link(&self, viewer: Viewer) -> String {
        auth_link(viewer.signed_in, &self.sign_in_url)
    }
}

pub fn build_router(state: HttpState) -> Router {
    // Full pages behind the response cache; htmx fragment requests skip it in
    // the middleware.
    let home_routes = cached(
        Router::new().route("/", get(home)),
        &state.cache,
        HOME_SCOPE,
    );
    let video_routes = cached(
        Router::new().route("/videos", get(video_list)),
        &state.cache,
        MediaType::Video.type_path(),
    );
    let audio_routes = cached(
        Router::new().route("/audio", get(audio_list)),
        &state.cache,
        MediaType::Audio.type_path(),
    );

    let uncached = Router::new()
        .route("/_fragments/home-latest", get(home_latest))
        .route("/videos/{uid}", get(video_detail))
        .route("/audio/{uid}", get(audio_detail))
        .route("/contact", get(contact))
        .route("/shop", get(shop))
        .route("/terms", get(terms));

    home_routes
        .merge(video_routes)
        .merge(audio_routes)
        .merge(uncached)
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

fn cached(
    routes: Router<HttpState>,
    cache: &ResponseCache,
    scope: &'static str,
) -> Router<HttpState> {
    routes.layer(middleware::from_fn_with_state(
        CacheState::new(cache.clone(), scope),
        response_cache_layer,
    ))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ListQuery {
    page: Option<String>,
    category: Option<String>,
}

async fn home(State(state): State<HttpState>, viewer: Viewer) -> Result<Response, HttpError> {
    let body = state.renderer.home(&state.auth_link(viewer)).await?;
    Ok(Html(body).into_response())
}

async fn home_latest(State(state): State<HttpState>) -> Result<Response, HttpError> {
    let latest = state.catalog.latest().await?;
    let body = state
        .renderer
        .home_latest(&latest.videos, &latest.audio)
        .await?;
    Ok(Html(body).into_response())
}

async fn video_list(
    State(state): State<HttpState>,
    viewer: Viewer,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Response, HttpError> {
    media_list(&state, viewer, &headers, query, MediaType::Video).await
}

async fn audio_list(
    State(state): State<HttpState>,
    viewer: Viewer,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Response, HttpError> {
    media_list(&state, viewer, &headers, query, MediaType::Audio).await
}

async fn media_list(
    state: &HttpState,
    viewer: Viewer,
    headers: &HeaderMap,
    query: ListQuery,
    media_type: MediaType,
) -> Result<Response, HttpError> {
    let listing = state
        .catalog
        .listing(ListingQuery {
            media_type,
            category: query.category,
            page: parse_page(query.page.as_deref()),
        })
        .await?;
    let pagination = render_pagination(&listing.pagination());

    let body = if is_htmx_request(headers) {
        state
            .renderer
            .media_list_content(
                &listing.items,
                Some(&pagination),
                ListLayout::for_type(media_type),
            )
            .await?
    } else {
        state
            .renderer
            .list_page(ListPage {
                title: listing_title(media_type),
                media_type,
                items: &listing.items,
                category: listing.category.as_deref(),
                pagination: &pagination,
                auth_link: &state.auth_link(viewer),
            })
            .await?
    };
    Ok(Html(body).into_response())
}

async fn video_detail(
    State(state): State<HttpState>,
    viewer: Viewer,
    Path(uid): Path<String>,
) -> Result<Response, HttpError> {
    media_detail(&state, viewer, &uid, MediaType::Video).await
}

async fn audio_detail(
    State(state): State<HttpState>,
    viewer: Viewer,
    Path(uid): Path<String>,
) -> Result<Response, HttpError> {
    media_detail(&state, viewer, &uid, MediaType::Audio).await
}

async fn media_detail(
    state: &HttpState,
    viewer: Viewer,
    uid: &str,
    media_type: MediaType,
) -> Result<Response, HttpError> {
    match state.catalog.detail(media_type, uid).await? {
        Some(item) => {
            let body = state
                .renderer
                .detail_page(&item, &state.auth_link(viewer))
                .await?;
            Ok(Html(body).into_response())
        }
        None => not_found_page(state, viewer).await,
    }
}

async fn contact(State(state): State<HttpState>, viewer: Viewer) -> Result<Response, HttpError> {
    static_page(&state, viewer, StaticPage::Contact).await
}

async fn shop(State(state): State<HttpState>, viewer: Viewer) -> Result<Response, HttpError> {
    static_page(&state, viewer, StaticPage::Shop).await
}

async fn terms(State(state): State<HttpState>, viewer: Viewer) -> Result<Response, HttpError> {
    static_page(&state, viewer, StaticPage::Terms).await
}

async fn static_page(
    state: &HttpState,
    viewer: Viewer,
    page: StaticPage,
) -> Result<Response, HttpError> {
    let body = state
        .renderer
        .static_page(page, &state.auth_link(viewer))
        .await?;
    Ok(Html(body).into_response())
}

async fn not_found(State(state): State<HttpState>, viewer: Viewer) -> Result<Response, HttpError> {
    not_found_page(&state, viewer).await
}

async fn not_found_page(state: &HttpState, viewer: Viewer) -> Result<Response, HttpError> {
    let body = state.renderer.not_found(&state.auth_link(viewer)).await?;
    Ok((StatusCode::NOT_FOUND, Html(body)).into_response())
}
