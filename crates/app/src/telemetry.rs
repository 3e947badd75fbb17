use std::{
    sync::{Mutex, OnceLock, PoisonError},
    time::Instant,
};

use metrics::{describe_counter, describe_gauge, describe_histogram, gauge, Unit};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use quick_listicle_util::{AppConfig, Environment};
use thiserror::Error;
use tracing_subscriber::{
    fmt::{self, time::UtcTime},
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter, Layer, Registry,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Upper bounds for KV round trips; the store is a remote HTTPS endpoint.
const KV_BUCKETS: &[f64] = &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0];

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to initialize tracing: {0}")]
    Tracing(#[from] TryInitError),
    #[error("failed to install prometheus recorder: {0}")]
    Metrics(#[from] BuildError),
}

static RECORDER: Mutex<Option<PrometheusHandle>> = Mutex::new(None);
static STARTED: OnceLock<Instant> = OnceLock::new();

fn git_sha() -> &'static str {
    option_env!("GIT_SHA").unwrap_or("unknown")
}

/// Pretty human output while developing, one JSON object per line in production.
fn output_layer(environment: Environment) -> Box<dyn Layer<Registry> + Send + Sync> {
    match environment {
        Environment::Production => fmt::layer()
            .json()
            .with_timer(UtcTime::rfc_3339())
            .with_target(false)
            .boxed(),
        Environment::Development | Environment::Test => fmt::layer()
            .pretty()
            .with_timer(UtcTime::rfc_3339())
            .with_target(false)
            .boxed(),
    }
}

/// Installs the global subscriber. `RUST_LOG` overrides the default `info` filter.
pub fn init_tracing(config: &AppConfig) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(output_layer(config.environment).with_filter(filter))
        .try_init()?;

    tracing::info!(
        stage = "telemetry",
        env = config.environment.as_str(),
        version = VERSION,
        git_sha = git_sha(),
        store_configured = config.store.is_configured(),
        "tracing initialized"
    );
    Ok(())
}

/// Installs the Prometheus recorder on first use and returns its handle.
///
/// Later calls share the same recorder, so tests can build as many
/// routers as they like.
pub fn init_metrics() -> Result<PrometheusHandle, TelemetryError> {
    let mut slot = RECORDER.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(handle) = slot.as_ref() {
        return Ok(handle.clone());
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(Matcher::Full("kv_request_seconds".into()), KV_BUCKETS)?
        .install_recorder()?;
    describe_site_metrics();
    gauge!("app_build_info", "version" => VERSION, "git" => git_sha()).set(1.0);
    STARTED.get_or_init(Instant::now);

    *slot = Some(handle.clone());
    Ok(handle)
}

fn describe_site_metrics() {
    describe_counter!(
        "sites_add_total",
        "Add-site requests by result: created, duplicate, invalid, not_configured or error"
    );
    describe_counter!(
        "sites_list_total",
        "List-sites requests by result: ok, not_configured or error"
    );
    describe_histogram!(
        "kv_request_seconds",
        Unit::Seconds,
        "Round trip of a single KV REST command, labelled by command"
    );
    describe_gauge!("app_build_info", "Version and git revision of the running binary");
    describe_gauge!("app_uptime_seconds", Unit::Seconds, "Time since metrics were installed");
}

/// Renders the exposition text, refreshing the uptime gauge first.
pub fn render_metrics(handle: &PrometheusHandle) -> String {
    let uptime = STARTED
        .get()
        .map(|started| started.elapsed().as_secs_f64())
        .unwrap_or_default();
    gauge!("app_uptime_seconds").set(uptime);
    handle.render()
}
