use std::sync::Once;

use metrics::{Unit, describe_counter};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::application::templates::{METRIC_TEMPLATE_CACHE_HIT, METRIC_TEMPLATE_CACHE_MISS};
use crate::cache::{
    METRIC_RESPONSE_CACHE_BYPASS, METRIC_RESPONSE_CACHE_HIT, METRIC_RESPONSE_CACHE_MISS,
    METRIC_RESPONSE_CACHE_STORE_ERROR,
};
use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

/// Register descriptions for every cache counter with the installed recorder.
pub fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            METRIC_RESPONSE_CACHE_HIT,
            Unit::Count,
            "Total number of responses served from the response cache."
        );
        describe_counter!(
            METRIC_RESPONSE_CACHE_MISS,
            Unit::Count,
            "Total number of response cache misses, including stale entries."
        );
        describe_counter!(
            METRIC_RESPONSE_CACHE_BYPASS,
            Unit::Count,
            "Total number of requests that skipped the response cache."
        );
        describe_counter!(
            METRIC_RESPONSE_CACHE_STORE_ERROR,
            Unit::Count,
            "Total number of blob store reads or writes that failed."
        );
        describe_counter!(
            METRIC_TEMPLATE_CACHE_HIT,
            Unit::Count,
            "Total number of template loads served from memory."
        );
        describe_counter!(
            METRIC_TEMPLATE_CACHE_MISS,
            Unit::Count,
            "Total number of template loads that fetched from the source."
        );
    });
}
