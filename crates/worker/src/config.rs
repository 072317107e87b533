use std::path::PathBuf;
use std::time::Duration;

use stash_pipeline::{ItemErrorPolicy, DEFAULT_ITEM_LINK_BASE};
use stash_publish::kv::DEFAULT_API_BASE;
use stash_publish::DEFAULT_KEY;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has an invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Where game data is read from.
#[derive(Debug, Clone, PartialEq)]
pub enum GameDataLocation {
    Http(String),
    Directory(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Worker configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub game_data: GameDataLocation,
    /// Directory holding `presets.json`.
    pub presets_cache_dir: PathBuf,
    /// Endpoint that rebuilds the presets cache on a miss.
    pub presets_job_url: Option<String>,
    pub database_url: String,
    pub kv_api_base: String,
    pub kv_account_id: String,
    pub kv_namespace_id: String,
    /// Without a token the snapshot is computed and dumped but not published.
    pub kv_api_token: Option<String>,
    pub kv_name: String,
    pub dump_dir: PathBuf,
    pub alert_webhook_url: Option<String>,
    pub item_link_base: String,
    pub item_error_policy: ItemErrorPolicy,
    pub request_timeout: Duration,
    pub log_format: LogFormat,
}

impl WorkerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                                |
    /// |------------------------|----------------------------------------|
    /// | `GAME_DATA_URL`        | unset (read `GAME_DATA_DIR` instead)   |
    /// | `GAME_DATA_DIR`        | `./data`                               |
    /// | `PRESETS_CACHE_DIR`    | `./cache`                              |
    /// | `PRESETS_JOB_URL`      | unset                                  |
    /// | `DATABASE_URL`         | required                               |
    /// | `KV_API_BASE`          | `https://api.cloudflare.com/client/v4` |
    /// | `KV_ACCOUNT_ID`        | empty                                  |
    /// | `KV_NAMESPACE_ID`      | empty                                  |
    /// | `KV_API_TOKEN`         | unset                                  |
    /// | `KV_NAME`              | `item_data`                            |
    /// | `DUMP_DIR`             | `./dumps`                              |
    /// | `ALERT_WEBHOOK_URL`    | unset                                  |
    /// | `ITEM_LINK_BASE`       | `https://tarkov.dev/item`              |
    /// | `ITEM_ERROR_POLICY`    | `skip` (`skip` or `fail`)              |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                                   |
    /// | `LOG_FORMAT`           | `text` (`text` or `json`)              |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let var_or = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let game_data = match var("GAME_DATA_URL") {
            Some(url) => GameDataLocation::Http(url),
            None => GameDataLocation::Directory(var_or("GAME_DATA_DIR", "./data").into()),
        };

        let database_url = var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let item_error_policy = var_or("ITEM_ERROR_POLICY", "skip")
            .parse::<ItemErrorPolicy>()
            .map_err(|e| ConfigError::Invalid {
                var: "ITEM_ERROR_POLICY",
                value: var_or("ITEM_ERROR_POLICY", ""),
                reason: e.to_string(),
            })?;

        let timeout_raw = var_or("REQUEST_TIMEOUT_SECS", "30");
        let request_timeout_secs: u64 = timeout_raw.parse().map_err(|e: std::num::ParseIntError| {
            ConfigError::Invalid {
                var: "REQUEST_TIMEOUT_SECS",
                value: timeout_raw.clone(),
                reason: e.to_string(),
            }
        })?;

        let log_format = match var_or("LOG_FORMAT", "text").to_ascii_lowercase().as_str() {
            "text" => LogFormat::Text,
            "json" => LogFormat::Json,
            other => {
                return Err(ConfigError::Invalid {
                    var: "LOG_FORMAT",
                    value: other.to_string(),
                    reason: "expected 'text' or 'json'".into(),
                })
            }
        };

        Ok(Self {
            game_data,
            presets_cache_dir: var_or("PRESETS_CACHE_DIR", "./cache").into(),
            presets_job_url: var("PRESETS_JOB_URL"),
            database_url,
            kv_api_base: var_or("KV_API_BASE", DEFAULT_API_BASE),
            kv_account_id: var_or("KV_ACCOUNT_ID", ""),
            kv_namespace_id: var_or("KV_NAMESPACE_ID", ""),
            kv_api_token: var("KV_API_TOKEN"),
            kv_name: var_or("KV_NAME", DEFAULT_KEY),
            dump_dir: var_or("DUMP_DIR", "./dumps").into(),
            alert_webhook_url: var("ALERT_WEBHOOK_URL"),
            item_link_base: var_or("ITEM_LINK_BASE", DEFAULT_ITEM_LINK_BASE),
            item_error_policy,
            request_timeout: Duration::from_secs(request_timeout_secs),
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<WorkerConfig, ConfigError> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        WorkerConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_the_database_is_set() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/stash")]).unwrap();
        assert_eq!(config.game_data, GameDataLocation::Directory("./data".into()));
        assert_eq!(config.kv_name, "item_data");
        assert_eq!(config.kv_api_base, "https://api.cloudflare.com/client/v4");
        assert_eq!(config.kv_api_token, None);
        assert_eq!(config.item_error_policy, ItemErrorPolicy::SkipItem);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn game_data_url_wins_over_directory() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/stash"),
            ("GAME_DATA_URL", "https://data.example.test"),
            ("GAME_DATA_DIR", "/srv/data"),
        ])
        .unwrap();
        assert_eq!(config.game_data, GameDataLocation::Http("https://data.example.test".into()));
    }

    #[test]
    fn missing_database_url_is_an_error() {
        assert_matches!(load(&[]), Err(ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn bad_values_name_their_variable() {
        let base = ("DATABASE_URL", "postgres://localhost/stash");
        assert_matches!(
            load(&[base, ("REQUEST_TIMEOUT_SECS", "soon")]),
            Err(ConfigError::Invalid { var: "REQUEST_TIMEOUT_SECS", .. })
        );
        assert_matches!(
            load(&[base, ("ITEM_ERROR_POLICY", "explode")]),
            Err(ConfigError::Invalid { var: "ITEM_ERROR_POLICY", .. })
        );
        assert_matches!(
            load(&[base, ("LOG_FORMAT", "xml")]),
            Err(ConfigError::Invalid { var: "LOG_FORMAT", .. })
        );
    }
}
