use serde::{Deserialize, Serialize};

/// Key of the external set holding every saved domain.
pub const SITES_KEY: &str = "quick-listicle-sites";

/// Body accepted by `POST /api/sites`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddSiteRequest {
    pub domain: String,
}

/// Successful reply to `POST /api/sites`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSiteResponse {
    pub success: bool,
    pub domain: String,
    pub total_sites: u64,
}

/// Reply to `GET /api/sites`.
///
/// `message` carries guidance in the not-configured mode; `error` and
/// `details` are only present when the read failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSitesResponse {
    #[serde(default)]
    pub sites: Vec<String>,
    #[serde(default)]
    pub backend_connected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ListSitesResponse {
    pub fn connected(sites: Vec<String>) -> Self {
        Self {
            sites,
            backend_connected: true,
            message: None,
            error: None,
            details: None,
        }
    }

    pub fn not_configured(message: impl Into<String>) -> Self {
        Self {
            sites: Vec::new(),
            backend_connected: false,
            message: Some(message.into()),
            error: None,
            details: None,
        }
    }

    pub fn failed(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            sites: Vec::new(),
            backend_connected: false,
            message: None,
            error: Some(error.into()),
            details: Some(details.into()),
        }
    }
}

/// Error body shared by every failing API response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
