mod error;
#[cfg(test)]
mod fake_kv;
mod router;
mod sites;
mod telemetry;

use std::net::SocketAddr;

use quick_listicle_storage::SiteStore;
use quick_listicle_util::{load_env_file, AppConfig};
use tracing::{info, warn};

const USER_AGENT: &str = concat!("quick-listicle/", env!("CARGO_PKG_VERSION"));

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    load_env_file();
    let config = AppConfig::from_env()?;

    telemetry::init_tracing(&config)?;
    let metrics = telemetry::init_metrics()?;

    let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
    let store = SiteStore::from_config(&config.store, http);
    match &store {
        SiteStore::Configured(repo) => match repo.ping().await {
            Ok(()) => info!(stage = "store", key = repo.key(), "site store reachable"),
            Err(err) => warn!(stage = "store", error = %err, "site store did not answer ping"),
        },
        SiteStore::NotConfigured => warn!(
            stage = "store",
            "KV_REST_API_URL or KV_REST_API_TOKEN missing; serving in not-configured mode"
        ),
    }

    let state = router::AppState::new(metrics, store);

    let addr: SocketAddr = config.bind_addr;
    info!(stage = "app", %addr, env = %config.environment.as_str(), "starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router::app_router(state))
        .await
        .map_err(|err| err.into())
}
