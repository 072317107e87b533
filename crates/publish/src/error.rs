use std::path::PathBuf;

/// Errors from writing the snapshot out.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Transient status, or any non-2xx status without a readable envelope.
    #[error("KV store returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store answered but reported the write as unsuccessful.
    #[error("KV store rejected the write: errors={errors:?} messages={messages:?}")]
    Rejected {
        errors: Vec<String>,
        messages: Vec<String>,
    },
}

/// Error type for operator alert delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Webhook returned HTTP {0}")]
    HttpStatus(u16),
}
