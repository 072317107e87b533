//! Operator alerts over a chat webhook, with exponential-backoff retry.
//!
//! [`WebhookAlerter`] posts a Discord-style embed to the configured URL.
//! Failed attempts are retried three times (1 s, 2 s, 4 s). Without a URL
//! alerts are only logged.

use std::time::Duration;

use crate::error::AlertError;

/// Retry delays in seconds (exponential backoff: 1s, 2s, 4s).
const RETRY_DELAYS_SECS: [u64; 3] = [1, 2, 4];

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Embed descriptions longer than this are cut.
const MAX_DESCRIPTION_CHARS: usize = 4000;

pub struct WebhookAlerter {
    client: reqwest::Client,
    url: Option<String>,
}

impl WebhookAlerter {
    pub fn new(url: Option<String>) -> Result<Self, AlertError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            url: url.filter(|u| !u.is_empty()),
        })
    }

    /// An alerter that only logs.
    pub fn disabled() -> Self {
        Self {
            client: reqwest::Client::new(),
            url: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.url.is_some()
    }

    /// Send an alert, retrying before giving up.
    pub async fn alert(&self, title: &str, description: &str) -> Result<(), AlertError> {
        tracing::error!(title, description, "Operator alert");
        let Some(url) = self.url.as_deref() else {
            return Ok(());
        };
        let payload = embed_payload(title, description);

        let mut last_err: Option<AlertError> = None;

        for (attempt, delay_secs) in RETRY_DELAYS_SECS.iter().enumerate() {
            match self.try_send(url, &payload).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        error = %e,
                        "Alert delivery attempt failed, retrying"
                    );
                    last_err = Some(e);
                    tokio::time::sleep(Duration::from_secs(*delay_secs)).await;
                }
            }
        }

        // Final attempt after the last backoff.
        match self.try_send(url, &payload).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::error!(error = %e, "Alert delivery failed after all retries");
                Err(last_err.unwrap_or(e))
            }
        }
    }

    async fn try_send(&self, url: &str, payload: &serde_json::Value) -> Result<(), AlertError> {
        let response = self.client.post(url).json(payload).send().await?;
        if !response.status().is_success() {
            return Err(AlertError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

fn embed_payload(title: &str, description: &str) -> serde_json::Value {
    let description: String = description.chars().take(MAX_DESCRIPTION_CHARS).collect();
    serde_json::json!({
        "embeds": [{
            "title": title,
            "description": description,
        }]
    })
}
