//! In-process stand-in for the hosted Redis REST endpoint used by router tests.

use std::{
    collections::{BTreeSet, HashMap},
    sync::{Arc, Mutex},
};

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use url::Url;

#[derive(Default)]
struct Inner {
    sets: HashMap<String, BTreeSet<String>>,
    calls: usize,
    failure: Option<String>,
}

#[derive(Clone)]
pub struct FakeKv {
    inner: Arc<Mutex<Inner>>,
    url: Url,
}

impl FakeKv {
    pub async fn spawn() -> Self {
        let inner = Arc::new(Mutex::new(Inner::default()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake kv");
        let addr = listener.local_addr().expect("local addr");
        let router = Router::new()
            .route("/", post(handle))
            .with_state(inner.clone());
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("fake kv server");
        });

        Self {
            inner,
            url: Url::parse(&format!("http://{addr}/")).expect("fake kv url"),
        }
    }

    pub fn url(&self) -> Url {
        self.url.clone()
    }

    pub fn calls(&self) -> usize {
        self.inner.lock().expect("fake kv poisoned").calls
    }

    pub fn insert(&self, member: &str) {
        self.inner
            .lock()
            .expect("fake kv poisoned")
            .sets
            .entry(quick_listicle_core::SITES_KEY.to_string())
            .or_default()
            .insert(member.to_string());
    }

    pub fn members(&self) -> Vec<String> {
        self.inner
            .lock()
            .expect("fake kv poisoned")
            .sets
            .get(quick_listicle_core::SITES_KEY)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Makes every subsequent command fail with the given Redis error.
    pub fn fail_with(&self, message: &str) {
        self.inner.lock().expect("fake kv poisoned").failure = Some(message.to_string());
    }
}

async fn handle(
    State(inner): State<Arc<Mutex<Inner>>>,
    headers: HeaderMap,
    Json(args): Json<Vec<String>>,
) -> (StatusCode, Json<Value>) {
    let mut inner = inner.lock().expect("fake kv poisoned");
    inner.calls += 1;

    if !headers.contains_key(header::AUTHORIZATION) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Unauthorized" })),
        );
    }
    if let Some(message) = inner.failure.clone() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": message })));
    }

    let command = args.first().map(|c| c.to_ascii_uppercase()).unwrap_or_default();
    let key = args.get(1).cloned().unwrap_or_default();
    let result = match command.as_str() {
        "SADD" => {
            let set = inner.sets.entry(key).or_default();
            let added = args
                .iter()
                .skip(2)
                .filter(|member| set.insert((*member).clone()))
                .count();
            json!(added)
        }
        "SCARD" => json!(inner.sets.get(&key).map(BTreeSet::len).unwrap_or(0)),
        "SMEMBERS" => json!(inner
            .sets
            .get(&key)
            .map(|set| set.iter().cloned().collect::<Vec<_>>())
            .unwrap_or_default()),
        "PING" => json!("PONG"),
        other => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("ERR unknown command '{other}'") })),
            );
        }
    };

    (StatusCode::OK, Json(json!({ "result": result })))
}
