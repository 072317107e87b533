use std::path::PathBuf;

/// Any failure while fetching build inputs. All of them abort the build.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote server returned a non-2xx status code.
    #[error("{dataset} returned HTTP {status}: {body}")]
    HttpStatus {
        dataset: String,
        status: u16,
        body: String,
    },

    #[error("Failed to decode {dataset}: {source}")]
    Decode {
        dataset: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Presets job failed: {0}")]
    PresetJob(String),

    #[error("Presets are still unavailable after running the presets job")]
    PresetsUnavailable,
}

impl LoadError {
    pub(crate) fn decode(dataset: &str, source: serde_json::Error) -> Self {
        Self::Decode {
            dataset: dataset.to_string(),
            source,
        }
    }
}
