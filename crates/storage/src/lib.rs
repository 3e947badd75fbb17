use quick_listicle_core::SITES_KEY;
use quick_listicle_kv::{KvClient, KvError};
use quick_listicle_util::StoreConfig;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

/// Handle to the site collection, or the record that it is unavailable.
///
/// Built once at startup from [`StoreConfig`] and shared by every request.
#[derive(Clone)]
pub enum SiteStore {
    Configured(SiteRepository),
    NotConfigured,
}

impl SiteStore {
    /// Builds the store from the resolved credentials.
    pub fn from_config(config: &StoreConfig, http: Client) -> Self {
        match config {
            StoreConfig::Configured { url, token } => {
                let kv = KvClient::new(url.clone(), token.clone(), http);
                Self::Configured(SiteRepository::new(kv, SITES_KEY))
            }
            StoreConfig::NotConfigured => Self::NotConfigured,
        }
    }
}

/// Repository over the external set holding saved domains.
#[derive(Clone)]
pub struct SiteRepository {
    kv: KvClient,
    key: String,
}

impl SiteRepository {
    pub fn new(kv: KvClient, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Adds a domain and reads back the collection size.
    ///
    /// The two calls are not atomic; a concurrent add may be reflected in the
    /// returned total.
    pub async fn add(&self, domain: &str) -> Result<AddOutcome, StoreError> {
        let added = self.kv.sadd(&self.key, &[domain]).await?;
        let total = self.kv.scard(&self.key).await?;
        debug!(stage = "store", domain, inserted = added > 0, total, "site added");

        Ok(AddOutcome {
            inserted: added > 0,
            total,
        })
    }

    /// Lists every saved domain in store order.
    pub async fn list(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.kv.smembers(&self.key).await?)
    }

    /// Verifies the store answers with the configured credentials.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.kv.ping().await?;
        Ok(())
    }
}

/// Result of adding a domain to the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddOutcome {
    pub inserted: bool,
    pub total: u64,
}

/// Errors raised by the site store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("key-value store error: {0}")]
    Kv(#[from] KvError),
}
