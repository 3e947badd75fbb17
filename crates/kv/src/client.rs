use std::time::Instant;

use metrics::histogram;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use thiserror::Error;
use url::Url;

/// Client for a Redis-compatible REST endpoint (Upstash style).
///
/// Every command is a `POST` to the base URL whose JSON body is the command
/// and its arguments, authorized with a bearer token.
#[derive(Clone)]
pub struct KvClient {
    http: Client,
    base_url: Url,
    token: String,
}

impl KvClient {
    /// Creates a new client for the provided endpoint and token.
    pub fn new(base_url: Url, token: impl Into<String>, http: Client) -> Self {
        Self {
            http,
            base_url,
            token: token.into(),
        }
    }

    /// Adds members to a set, returning how many were not already present.
    pub async fn sadd(&self, key: &str, members: &[&str]) -> Result<u64, KvError> {
        let mut args = Vec::with_capacity(members.len() + 2);
        args.push("SADD");
        args.push(key);
        args.extend_from_slice(members);
        self.command(&args).await
    }

    /// Returns the cardinality of a set; missing keys count as empty.
    pub async fn scard(&self, key: &str) -> Result<u64, KvError> {
        self.command(&["SCARD", key]).await
    }

    /// Returns every member of a set in store order.
    pub async fn smembers(&self, key: &str) -> Result<Vec<String>, KvError> {
        let members: Option<Vec<String>> = self.command(&["SMEMBERS", key]).await?;
        Ok(members.unwrap_or_default())
    }

    pub async fn ping(&self) -> Result<String, KvError> {
        self.command(&["PING"]).await
    }

    /// Sends a raw command and decodes its `result`.
    ///
    /// Each round trip is recorded in `kv_request_seconds`, labelled with the
    /// command name.
    pub async fn command<T>(&self, args: &[&str]) -> Result<T, KvError>
    where
        T: DeserializeOwned,
    {
        let start = Instant::now();
        let response = self
            .http
            .post(self.base_url.clone())
            .bearer_auth(&self.token)
            .json(args)
            .send()
            .await;
        histogram!("kv_request_seconds", "command" => command_label(args))
            .record(start.elapsed().as_secs_f64());

        parse_reply(response?).await
    }
}

fn command_label(args: &[&str]) -> String {
    args.first()
        .map(|name| name.to_ascii_uppercase())
        .unwrap_or_else(|| "UNKNOWN".to_string())
}

#[derive(Debug, Deserialize)]
struct Reply {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Errors produced by the KV client.
#[derive(Debug, Error)]
pub enum KvError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("command rejected: {0}")]
    Command(String),
    #[error("unexpected status {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("reply missing result")]
    MissingResult,
    #[error("failed to decode reply: {0}")]
    Decode(#[from] serde_json::Error),
}

async fn parse_reply<T>(response: Response) -> Result<T, KvError>
where
    T: DeserializeOwned,
{
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        if let Ok(Reply {
            error: Some(message),
            ..
        }) = serde_json::from_str(&body)
        {
            return Err(KvError::Command(message));
        }
        return Err(KvError::Status { status, body });
    }

    let reply: Reply = serde_json::from_str(&body)?;
    if let Some(message) = reply.error {
        return Err(KvError::Command(message));
    }
    match reply.result {
        Some(value) => Ok(serde_json::from_value(value)?),
        // `null` results are only valid for optional targets such as SMEMBERS on a missing key.
        None => serde_json::from_value(Value::Null).map_err(|_| KvError::MissingResult),
    }
}
