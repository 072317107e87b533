//! Full-replace key-value store.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::PublishError;

pub const DEFAULT_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// The store's response envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct KvResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<Value>,
    #[serde(default)]
    pub messages: Vec<Value>,
}

impl KvResponse {
    /// `Ok` when the write succeeded, otherwise the envelope's errors and
    /// messages as display strings.
    pub fn into_result(self) -> Result<(), PublishError> {
        if self.success {
            return Ok(());
        }
        Err(PublishError::Rejected {
            errors: self.errors.iter().map(display_value).collect(),
            messages: self.messages.iter().map(display_value).collect(),
        })
    }
}

/// Strings verbatim, everything else as compact JSON.
fn display_value(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Stores one value under one key, replacing whatever was there.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<KvResponse, PublishError>;
}

// ---------------------------------------------------------------------------
// Cloudflare-style HTTP store
// ---------------------------------------------------------------------------

/// Retry delays in seconds (exponential backoff: 1s, 2s, 4s).
const RETRY_DELAYS_SECS: [u64; 3] = [1, 2, 4];

/// `PUT {api_base}/accounts/{account}/storage/kv/namespaces/{namespace}/values/{key}`.
///
/// Transport failures and transient statuses (408, 429, 5xx) are retried
/// with backoff; any other answer is returned as-is.
pub struct CloudflareKv {
    client: reqwest::Client,
    api_base: String,
    account_id: String,
    namespace_id: String,
    token: Option<String>,
    retry_delays: Vec<Duration>,
}

impl CloudflareKv {
    pub fn new(
        api_base: impl Into<String>,
        account_id: impl Into<String>,
        namespace_id: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, PublishError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            account_id: account_id.into(),
            namespace_id: namespace_id.into(),
            token: token.filter(|t| !t.is_empty()),
            retry_delays: RETRY_DELAYS_SECS.iter().map(|s| Duration::from_secs(*s)).collect(),
        })
    }

    /// Replace the backoff schedule; one retry per delay.
    pub fn with_retry_delays(mut self, delays: Vec<Duration>) -> Self {
        self.retry_delays = delays;
        self
    }

    pub fn value_url(&self, key: &str) -> String {
        format!(
            "{}/accounts/{}/storage/kv/namespaces/{}/values/{key}",
            self.api_base, self.account_id, self.namespace_id
        )
    }

    async fn try_put(&self, url: &str, token: &str, body: Vec<u8>) -> Result<KvResponse, PublishError> {
        let response = self
            .client
            .put(url)
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        let status = response.status();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());

        if is_transient_status(status.as_u16()) {
            return Err(PublishError::HttpStatus {
                status: status.as_u16(),
                body: text,
            });
        }
        match serde_json::from_str::<KvResponse>(&text) {
            Ok(envelope) => Ok(envelope),
            Err(_) if !status.is_success() => Err(PublishError::HttpStatus {
                status: status.as_u16(),
                body: text,
            }),
            Err(e) => Err(PublishError::Serialize(e)),
        }
    }
}

fn is_transient_status(status: u16) -> bool {
    matches!(status, 408 | 429) || (500..600).contains(&status)
}

fn is_retryable(error: &PublishError) -> bool {
    match error {
        PublishError::Request(_) => true,
        PublishError::HttpStatus { status, .. } => is_transient_status(*status),
        _ => false,
    }
}

#[async_trait]
impl KvStore for CloudflareKv {
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<KvResponse, PublishError> {
        let Some(token) = self.token.as_deref() else {
            return Ok(KvResponse {
                success: false,
                errors: vec![Value::String(format!("KV token not set; skipping PUT {key}"))],
                messages: Vec::new(),
            });
        };
        let url = self.value_url(key);

        for (attempt, delay) in self.retry_delays.iter().enumerate() {
            match self.try_put(&url, token, body.clone()).await {
                Err(e) if is_retryable(&e) => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        key,
                        error = %e,
                        "KV write attempt failed, retrying"
                    );
                    tokio::time::sleep(*delay).await;
                }
                other => return other,
            }
        }

        // Final attempt after the last backoff.
        self.try_put(&url, token, body).await
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Keeps values in memory; can be told to reject writes.
#[derive(Debug, Default)]
pub struct InMemoryKv {
    values: Mutex<HashMap<String, Vec<u8>>>,
    reject: bool,
}

impl InMemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that answers every write with `success: false`.
    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::default()
        }
    }

    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.values.lock().await.get(key).cloned()
    }
}

#[async_trait]
impl KvStore for InMemoryKv {
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<KvResponse, PublishError> {
        if self.reject {
            return Ok(KvResponse {
                success: false,
                errors: vec![Value::String(format!("write to {key} rejected"))],
                messages: Vec::new(),
            });
        }
        self.values.lock().await.insert(key.to_string(), body);
        Ok(KvResponse {
            success: true,
            ..KvResponse::default()
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use axum::http::StatusCode;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn missing_token_reports_failure_without_sending() {
        let kv = CloudflareKv::new("http://127.0.0.1:9", "acct", "ns", None, Duration::from_secs(1))
            .unwrap();
        let response = kv.put("item_data", b"{}".to_vec()).await.unwrap();
        assert!(!response.success);
        assert_eq!(response.errors, vec![json!("KV token not set; skipping PUT item_data")]);
    }

    #[test]
    fn value_url_layout() {
        let kv = CloudflareKv::new(DEFAULT_API_BASE, "acct", "ns", Some("t".into()), Duration::from_secs(1))
            .unwrap();
        assert_eq!(
            kv.value_url("item_data"),
            "https://api.cloudflare.com/client/v4/accounts/acct/storage/kv/namespaces/ns/values/item_data"
        );
    }

    #[test]
    fn rejected_envelope_keeps_every_error_and_message() {
        let envelope: KvResponse = serde_json::from_value(json!({
            "success": false,
            "errors": [{"code": 10000, "message": "Authentication error"}, "quota"],
            "messages": ["retry later"]
        }))
        .unwrap();
        assert_matches!(envelope.into_result(), Err(PublishError::Rejected { errors, messages }) => {
            assert_eq!(errors.len(), 2);
            assert!(errors[0].contains("Authentication error"));
            assert_eq!(errors[1], "quota");
            assert_eq!(messages, vec!["retry later"]);
        });
    }

    // --- retries ---

    const VALUE_PATH: &str = "/accounts/acct/storage/kv/namespaces/ns/values/item_data";

    /// A store that answers the first `failures` writes with `status`.
    async fn flaky_store(failures: usize, status: StatusCode) -> (CloudflareKv, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = axum::Router::new().route(
            VALUE_PATH,
            axum::routing::put(move || {
                let counter = counter.clone();
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) < failures {
                        let envelope = json!({
                            "success": false,
                            "errors": [{"code": 10013, "message": "upstream unavailable"}],
                            "messages": []
                        });
                        (status, axum::Json(envelope))
                    } else {
                        (StatusCode::OK, axum::Json(json!({"success": true, "errors": [], "messages": []})))
                    }
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let kv = CloudflareKv::new(format!("http://{addr}"), "acct", "ns", Some("t".into()), Duration::from_secs(5))
            .unwrap()
            .with_retry_delays(vec![Duration::ZERO; 3]);
        (kv, hits)
    }

    #[tokio::test]
    async fn transient_failure_is_retried() {
        let (kv, hits) = flaky_store(1, StatusCode::SERVICE_UNAVAILABLE).await;
        let response = kv.put("item_data", b"{}".to_vec()).await.unwrap();
        assert!(response.success);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn persistent_failure_gives_up_after_every_retry() {
        let (kv, hits) = flaky_store(usize::MAX, StatusCode::BAD_GATEWAY).await;
        assert_matches!(
            kv.put("item_data", b"{}".to_vec()).await,
            Err(PublishError::HttpStatus { status: 502, .. })
        );
        assert_eq!(hits.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let (kv, hits) = flaky_store(usize::MAX, StatusCode::BAD_REQUEST).await;
        let response = kv.put("item_data", b"{}".to_vec()).await.unwrap();
        assert!(!response.success);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn transient_statuses() {
        assert!(is_transient_status(503));
        assert!(is_transient_status(429));
        assert!(is_transient_status(408));
        assert!(!is_transient_status(400));
        assert!(!is_transient_status(200));
    }

    // --- in-memory ---

    #[tokio::test]
    async fn in_memory_store_round_trip() {
        let kv = InMemoryKv::new();
        assert!(kv.put("k", b"v".to_vec()).await.unwrap().success);
        assert_eq!(kv.get("k").await.as_deref(), Some(&b"v"[..]));
        assert!(!InMemoryKv::rejecting().put("k", vec![]).await.unwrap().success);
    }
}
