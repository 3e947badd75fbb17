use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use metrics::counter;
use quick_listicle_core::{
    listing::{render_html, FetchOutcome, ListingView},
    validate_domain, AddSiteResponse, DomainError, ListSitesResponse,
};
use quick_listicle_storage::SiteStore;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::error::ApiError;
use crate::router::AppState;

pub const NOT_CONFIGURED_MESSAGE: &str =
    "Site store not configured. Set KV_REST_API_URL and KV_REST_API_TOKEN.";

/// `POST /api/sites`: validates `{ "domain": string }` and adds it to the collection.
pub async fn add(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let domain = parse_domain(&body).map_err(|err| {
        warn!(stage = "api", status = %err.status(), error = %err.message(), "rejected add-site request");
        counter!("sites_add_total", "result" => "invalid").increment(1);
        err
    })?;

    let SiteStore::Configured(repo) = state.store() else {
        counter!("sites_add_total", "result" => "not_configured").increment(1);
        return Err(ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            NOT_CONFIGURED_MESSAGE,
        ));
    };

    let outcome = repo.add(&domain).await.map_err(|err| {
        error!(stage = "api", %domain, error = %err, "failed to save domain");
        counter!("sites_add_total", "result" => "error").increment(1);
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save domain")
            .with_details(err.to_string())
    })?;

    let label = if outcome.inserted { "created" } else { "duplicate" };
    counter!("sites_add_total", "result" => label).increment(1);
    info!(stage = "api", %domain, total = outcome.total, inserted = outcome.inserted, "domain saved");

    let response = AddSiteResponse {
        success: true,
        domain,
        total_sites: outcome.total,
    };
    Ok(Json(response).into_response())
}

/// `GET /api/sites`: lists the collection, reporting degraded modes in the body.
pub async fn list(State(state): State<AppState>) -> (StatusCode, Json<ListSitesResponse>) {
    let (status, body) = load_sites(&state).await;
    (status, Json(body))
}

/// `GET /`: renders the listing page from a single in-process fetch.
pub async fn page(State(state): State<AppState>) -> (StatusCode, Html<String>) {
    let (status, body) = load_sites(&state).await;
    let view = ListingView::from_outcome(FetchOutcome::Response {
        success: status.is_success(),
        body,
    });
    (status, Html(render_html(&view)))
}

async fn load_sites(state: &AppState) -> (StatusCode, ListSitesResponse) {
    let SiteStore::Configured(repo) = state.store() else {
        counter!("sites_list_total", "result" => "not_configured").increment(1);
        return (
            StatusCode::OK,
            ListSitesResponse::not_configured(NOT_CONFIGURED_MESSAGE),
        );
    };

    match repo.list().await {
        Ok(sites) => {
            counter!("sites_list_total", "result" => "ok").increment(1);
            (StatusCode::OK, ListSitesResponse::connected(sites))
        }
        Err(err) => {
            error!(stage = "api", error = %err, "failed to fetch sites");
            counter!("sites_list_total", "result" => "error").increment(1);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ListSitesResponse::failed("Failed to fetch sites", err.to_string()),
            )
        }
    }
}

/// Extracts and validates the `domain` field without touching the store.
fn parse_domain(body: &[u8]) -> Result<String, ApiError> {
    let payload: Value = serde_json::from_slice(body)
        .map_err(|err| ApiError::bad_request("Invalid request body").with_details(err.to_string()))?;

    let domain = payload
        .get("domain")
        .and_then(Value::as_str)
        .ok_or(DomainError::Missing)?;
    validate_domain(domain)?;

    Ok(domain.to_string())
}
