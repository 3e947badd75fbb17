use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use quick_listicle_storage::SiteStore;

use crate::{sites, telemetry};

pub const SITES_PATH: &str = "/api/sites";

#[derive(Clone)]
pub struct AppState {
    metrics: PrometheusHandle,
    store: SiteStore,
}

impl AppState {
    pub fn new(metrics: PrometheusHandle, store: SiteStore) -> Self {
        Self { metrics, store }
    }

    pub fn metrics(&self) -> &PrometheusHandle {
        &self.metrics
    }

    pub fn store(&self) -> &SiteStore {
        &self.store
    }
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(sites::page))
        .route(SITES_PATH, get(sites::list).post(sites::add))
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn metrics(State(state): State<AppState>) -> Response {
    let body = telemetry::render_metrics(state.metrics());
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        Body::from(body),
    )
        .into_response()
}
