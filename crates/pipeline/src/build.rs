//! One full build: load every input, assemble the snapshot, publish it.
//!
//! Any load failure or per-item failure under
//! [`ItemErrorPolicy::FailBuild`](crate::context::ItemErrorPolicy) aborts the
//! build before anything is written, so the previous snapshot stays live.
//! Aborts and failed remote writes raise an operator alert.

use std::time::Instant;

use stash_core::snapshot::{CatalogSnapshot, SchemaSummary};
use stash_publish::{SnapshotPublisher, WebhookAlerter};
use stash_sources::{load_inputs, GameDataSource, OverrideSource, PresetStore};
use tracing::Instrument;
use uuid::Uuid;

use crate::assembler::assemble;
use crate::context::{BuildContext, BuildOptions};
use crate::error::BuildError;
use crate::report::{BuildReport, BuildStatus};

/// Key the schema summary is published under.
pub const SCHEMA_KEY: &str = "schema_data";

/// Where a build reads its inputs from.
pub struct BuildSources {
    pub game: Box<dyn GameDataSource>,
    pub presets: PresetStore,
    pub overrides: Box<dyn OverrideSource>,
}

pub struct CatalogBuilder {
    sources: BuildSources,
    publisher: SnapshotPublisher,
    alerter: WebhookAlerter,
    options: BuildOptions,
}

impl CatalogBuilder {
    pub fn new(
        sources: BuildSources,
        publisher: SnapshotPublisher,
        alerter: WebhookAlerter,
        options: BuildOptions,
    ) -> Self {
        Self {
            sources,
            publisher,
            alerter,
            options,
        }
    }

    /// Run one build to completion. Never panics on bad data; the outcome
    /// is always described by the returned report.
    pub async fn run(&self) -> BuildReport {
        let build_id = Uuid::now_v7();
        let span = tracing::info_span!("catalog_build", build_id = %build_id);
        async move {
            tracing::info!("Build started");
            let mut report = BuildReport::started(build_id);
            if let Err(e) = self.try_run(&mut report).await {
                report.status = BuildStatus::Failed;
                report.error = Some(e.to_string());
                tracing::error!(error = %e, "Build aborted");
                self.alert("Item catalog build failed", &e.to_string()).await;
            }
            tracing::info!(
                status = ?report.status,
                items = report.item_count,
                warnings = report.warnings,
                load_ms = report.timings.load_ms,
                assemble_ms = report.timings.assemble_ms,
                publish_ms = report.timings.publish_ms,
                "Build finished"
            );
            report
        }
        .instrument(span)
        .await
    }

    async fn try_run(&self, report: &mut BuildReport) -> Result<(), BuildError> {
        let started = Instant::now();
        let inputs = load_inputs(
            self.sources.game.as_ref(),
            &self.sources.presets,
            self.sources.overrides.as_ref(),
        )
        .await?;
        report.timings.load_ms = elapsed_ms(started);

        let started = Instant::now();
        let mut ctx = BuildContext::new(report.build_id, inputs, self.options.clone());
        let assembled = assemble(&mut ctx);
        report.warnings = ctx.warnings();
        let snapshot = assembled?;
        report.item_count = snapshot.data.len();
        report.timings.assemble_ms = elapsed_ms(started);

        let started = Instant::now();
        self.publish(&snapshot, report).await?;
        report.timings.publish_ms = elapsed_ms(started);
        Ok(())
    }

    async fn publish(&self, snapshot: &CatalogSnapshot, report: &mut BuildReport) -> Result<(), BuildError> {
        let published = self.publisher.publish(snapshot).await.map_err(BuildError::Dump)?;
        if let Some(e) = published.remote_error {
            report.status = BuildStatus::ComputedButUnpublished;
            report.error = Some(e.to_string());
            let description = format!(
                "{} could not be written ({e}); local dump at {}",
                self.publisher.key(),
                published.dump_path.display()
            );
            self.alert("Item catalog publish failed", &description).await;
            return Ok(());
        }
        report.status = BuildStatus::Published;

        let schema = SchemaSummary::from_snapshot(snapshot);
        match self.publisher.publish_value(SCHEMA_KEY, &schema).await {
            Ok(r) if r.published() => {}
            Ok(r) => {
                let reason = r.remote_error.map(|e| e.to_string()).unwrap_or_default();
                report.warnings += 1;
                self.alert("Schema summary publish failed", &reason).await;
            }
            Err(e) => {
                report.warnings += 1;
                tracing::warn!(error = %e, "Schema summary could not be dumped");
            }
        }
        Ok(())
    }

    async fn alert(&self, title: &str, description: &str) {
        if let Err(e) = self.alerter.alert(title, description).await {
            tracing::error!(error = %e, "Operator alert could not be delivered");
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
