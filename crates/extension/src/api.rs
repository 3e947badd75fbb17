use quick_listicle_core::{
    AddSiteRequest, AddSiteResponse, ErrorBody, FetchOutcome, ListSitesResponse,
};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080/api/sites";

/// HTTP client for the `/api/sites` collection endpoint.
#[derive(Clone)]
pub struct SiteApiClient {
    http: Client,
    endpoint: Url,
}

impl SiteApiClient {
    pub fn new(endpoint: Url, http: Client) -> Self {
        Self { http, endpoint }
    }

    /// Posts a domain to the collection.
    ///
    /// Transport failures are errors; any HTTP reply, including a rejection,
    /// is returned as a [`SaveReply`].
    pub async fn add_site(&self, domain: &str) -> Result<SaveReply, SiteApiError> {
        let request = AddSiteRequest {
            domain: domain.to_string(),
        };
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(stage = "popup", %status, "add-site reply received");

        if status.is_success() {
            if let Ok(saved) = serde_json::from_str::<AddSiteResponse>(&body) {
                if saved.success {
                    return Ok(SaveReply::Saved(saved));
                }
            }
        }

        let error = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .map(|body| body.error);
        Ok(SaveReply::Rejected { status, error })
    }

    /// Fetches the collection once, folding every failure into the outcome.
    pub async fn list_sites(&self) -> FetchOutcome {
        match self.fetch_sites().await {
            Ok((status, body)) => FetchOutcome::Response {
                success: status.is_success(),
                body,
            },
            Err(err) => FetchOutcome::Failed(err.to_string()),
        }
    }

    async fn fetch_sites(&self) -> Result<(StatusCode, ListSitesResponse), SiteApiError> {
        let response = self.http.get(self.endpoint.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;
        let parsed = serde_json::from_str(&body).map_err(|_| SiteApiError::Status {
            status,
            body: body.clone(),
        })?;
        Ok((status, parsed))
    }
}

/// Reply to an add-site request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveReply {
    Saved(AddSiteResponse),
    Rejected {
        status: StatusCode,
        error: Option<String>,
    },
}

/// Errors produced by the site API client.
#[derive(Debug, Error)]
pub enum SiteApiError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {status}: {body}")]
    Status { status: StatusCode, body: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use quick_listicle_core::ListingView;
    use serde_json::json;

    fn client(server: &MockServer) -> SiteApiClient {
        SiteApiClient::new(
            Url::parse(&server.url("/api/sites")).expect("url"),
            Client::new(),
        )
    }

    #[tokio::test]
    async fn add_site_posts_domain() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/sites")
                    .json_body(json!({ "domain": "openai.com" }));
                then.status(200).json_body(json!({
                    "success": true,
                    "domain": "openai.com",
                    "totalSites": 1
                }));
            })
            .await;

        let reply = client(&server).add_site("openai.com").await.expect("reply");
        mock.assert_async().await;
        assert_eq!(
            reply,
            SaveReply::Saved(AddSiteResponse {
                success: true,
                domain: "openai.com".into(),
                total_sites: 1
            })
        );
    }

    #[tokio::test]
    async fn add_site_surfaces_rejection_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/sites");
                then.status(400)
                    .json_body(json!({ "error": "Invalid domain format" }));
            })
            .await;

        let reply = client(&server).add_site("bad host").await.expect("reply");
        assert_eq!(
            reply,
            SaveReply::Rejected {
                status: StatusCode::BAD_REQUEST,
                error: Some("Invalid domain format".into())
            }
        );
    }

    #[tokio::test]
    async fn list_sites_maps_to_listing() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/sites");
                then.status(200).json_body(json!({
                    "sites": ["openai.com"],
                    "backendConnected": true
                }));
            })
            .await;

        let outcome = client(&server).list_sites().await;
        let view = ListingView::from_outcome(outcome);
        assert!(matches!(view, ListingView::Sites(ref entries) if entries.len() == 1));
    }

    #[tokio::test]
    async fn list_sites_with_non_json_reply_fails() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/sites");
                then.status(502).body("bad gateway");
            })
            .await;

        let outcome = client(&server).list_sites().await;
        match outcome {
            FetchOutcome::Failed(message) => assert!(message.contains("502")),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
