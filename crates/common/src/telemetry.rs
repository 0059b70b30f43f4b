//! Telemetry and logging setup.
//!
//! Flow log lines are ordinary `tracing` events on the `flowlog` target, so
//! any subscriber can route them. This module installs the default one.

use crate::config::TelemetryConfig;
use anyhow::{Context, Result};
use tracing::Subscriber;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// Target every flow log line is emitted on
pub const FLOW_LOG_TARGET: &str = "flowlog";

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence when set; otherwise the filter is built from
/// `log_level` plus a dedicated directive for the flow log target.
///
/// # Examples
///
/// ```no_run
/// use flowlog_common::config::TelemetryConfig;
/// use flowlog_common::telemetry::init_tracing;
///
/// init_tracing(&TelemetryConfig::default()).expect("Failed to initialize tracing");
/// ```
pub fn init_tracing(config: &TelemetryConfig) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(filter_directives(config))
            .context("Failed to parse log filter directives")?,
    };

    let registry = Registry::default().with(env_filter);

    if config.json_logging {
        registry
            .with(json_layer())
            .try_init()
            .context("Failed to initialize tracing subscriber")?;
    } else {
        registry
            .with(pretty_layer())
            .try_init()
            .context("Failed to initialize tracing subscriber")?;
    }

    tracing::info!(service = %config.service_name, "Tracing initialized");

    Ok(())
}

/// Filter directives derived from the telemetry configuration
pub fn filter_directives(config: &TelemetryConfig) -> String {
    format!(
        "{},{}={}",
        config.log_level, FLOW_LOG_TARGET, config.flow_log_level
    )
}

/// Create a JSON logging layer
fn json_layer<S>() -> impl Layer<S>
where
    S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_thread_ids(true)
        .with_target(true)
        .with_level(true)
}

/// Create a pretty-formatted logging layer
fn pretty_layer<S>() -> impl Layer<S>
where
    S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .pretty()
        .with_thread_names(true)
        .with_target(true)
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
}
