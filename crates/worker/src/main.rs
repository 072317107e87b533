mod config;

use std::sync::Arc;

use anyhow::Context;
use stash_pipeline::{BuildOptions, BuildSources, BuildStatus, CatalogBuilder};
use stash_publish::{CloudflareKv, SnapshotPublisher, WebhookAlerter};
use stash_sources::{
    DirectoryGameDataSource, GameDataSource, HttpGameDataSource, HttpPresetJobTrigger,
    NoopPresetJobTrigger, PgOverrideSource, PresetJobTrigger, PresetStore,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{GameDataLocation, LogFormat, WorkerConfig};

const DEFAULT_LOG_FILTER: &str =
    "stash_worker=debug,stash_pipeline=debug,stash_sources=debug,stash_publish=debug";

fn init_tracing(format: &LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Runs one catalog build and exits; the scheduler invokes it.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = WorkerConfig::from_env().context("invalid worker configuration")?;
    init_tracing(&config.log_format);

    let game: Box<dyn GameDataSource> = match &config.game_data {
        GameDataLocation::Http(url) => Box::new(HttpGameDataSource::new(url.clone(), config.request_timeout)?),
        GameDataLocation::Directory(dir) => Box::new(DirectoryGameDataSource::new(dir.clone())),
    };
    let trigger: Box<dyn PresetJobTrigger> = match &config.presets_job_url {
        Some(url) => Box::new(HttpPresetJobTrigger::new(url.clone(), config.request_timeout)?),
        None => Box::new(NoopPresetJobTrigger),
    };

    let pool = stash_db::create_pool(&config.database_url)
        .await
        .context("failed to connect to the database")?;
    stash_db::run_migrations(&pool).await.context("failed to run migrations")?;
    tracing::info!("Database ready");

    let sources = BuildSources {
        game,
        presets: PresetStore::new(&config.presets_cache_dir, trigger),
        overrides: Box::new(PgOverrideSource::new(pool)),
    };

    let kv = CloudflareKv::new(
        config.kv_api_base.clone(),
        config.kv_account_id.clone(),
        config.kv_namespace_id.clone(),
        config.kv_api_token.clone(),
        config.request_timeout,
    )?;
    if config.kv_api_token.is_none() {
        tracing::warn!("KV_API_TOKEN not set; the snapshot will be dumped but not published");
    }
    let publisher = SnapshotPublisher::new(Arc::new(kv), config.kv_name.clone(), config.dump_dir.clone());
    let alerter = WebhookAlerter::new(config.alert_webhook_url.clone())?;

    let options = BuildOptions {
        item_link_base: config.item_link_base.clone(),
        error_policy: config.item_error_policy,
    };

    let report = CatalogBuilder::new(sources, publisher, alerter, options).run().await;
    tracing::info!(report = %serde_json::to_string(&report)?, "Build report");

    match report.status {
        BuildStatus::Published => Ok(()),
        BuildStatus::ComputedButUnpublished => {
            anyhow::bail!("snapshot computed but not published: {}", report.error.unwrap_or_default())
        }
        BuildStatus::Failed => anyhow::bail!("build failed: {}", report.error.unwrap_or_default()),
    }
}
