use std::{process, sync::Arc};

use mediashelf::{
    application::{
        catalog::CatalogService, error::AppError, render::SiteRenderer, templates::TemplateCache,
    },
    cache::{BlobStore, CacheConfig, MemoryBlobStore, ResponseCache},
    config::{self, CacheBackend, Settings},
    infra::{
        blob_store::FsBlobStore, catalog::InMemoryCatalog, error::InfraError, http, telemetry,
        templates,
    },
};
use tokio::net::TcpListener;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
    }
}

async fn run_serve(settings: Settings) -> Result<(), AppError> {
    let state = build_http_state(&settings).await?;
    let router = http::build_router(state);

    let listener = TcpListener::bind(settings.server.addr)
        .await
        .map_err(InfraError::from)?;
    info!(addr = %settings.server.addr, "mediashelf listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(InfraError::from)?;

    info!("mediashelf stopped");
    Ok(())
}

async fn build_http_state(settings: &Settings) -> Result<http::HttpState, AppError> {
    let cache_config = CacheConfig::from(&settings.cache);
    let store = build_blob_store(settings).await?;
    let cache = ResponseCache::new(cache_config.clone(), store);

    let source = templates::from_settings(&settings.templates)?;
    let template_cache = TemplateCache::new(source, cache_config.template_ttl_secs);
    let renderer = SiteRenderer::new(Arc::new(template_cache));

    let catalog = match settings.catalog.seed_file.as_deref() {
        Some(path) => InMemoryCatalog::load(path).await?,
        None => {
            warn!("no catalog seed file configured; serving an empty catalog");
            InMemoryCatalog::default()
        }
    };

    Ok(http::HttpState {
        catalog: Arc::new(CatalogService::new(Arc::new(catalog))),
        renderer: Arc::new(renderer),
        cache,
        sign_in_url: Arc::from(settings.auth.sign_in_url.as_str()),
    })
}

async fn build_blob_store(settings: &Settings) -> Result<Arc<dyn BlobStore>, AppError> {
    let store: Arc<dyn BlobStore> = match settings.cache.backend {
        CacheBackend::Filesystem => {
            let store = FsBlobStore::open(&settings.cache.directory)
                .await
                .map_err(|err| InfraError::cache_store(&settings.cache.directory, err))?;
            info!(directory = %store.root().display(), "using filesystem response cache");
            Arc::new(store)
        }
        CacheBackend::Memory => Arc::new(MemoryBlobStore::new()),
        CacheBackend::Disabled => {
            info!("response cache disabled");
            Arc::new(MemoryBlobStore::new())
        }
    };
    Ok(store)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
