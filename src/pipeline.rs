use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::config::NotifierConfig;
use crate::diff::diff_snapshots;
use crate::format::format_lines;
use crate::leaderboard::LeaderboardSource;
use crate::notify::{DeliveryReport, NotificationSink, deliver, paginate};
use crate::snapshot::{RankedSnapshot, build_snapshot};
use crate::store::{SnapshotStore, load_previous, save_snapshot};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOutcome {
    pub output_lines: Vec<String>,
    pub interesting_players: RankedSnapshot,
    #[serde(skip)]
    pub delivery: DeliveryReport,
}

/// One full poll: fetch, rank, persist, diff, render, notify.
///
/// A malformed leaderboard aborts before anything is written or sent.
/// Once the snapshot is persisted, notification outcomes never fail the run.
pub fn run_pipeline(
    config: &NotifierConfig,
    source: &dyn LeaderboardSource,
    store: &dyn SnapshotStore,
    sink: &dyn NotificationSink,
) -> Result<RunOutcome> {
    let previous = load_previous(store).context("load previous snapshot")?;

    let rows = source.fetch_raw().context("fetch leaderboard")?;
    let current = build_snapshot(&rows, &config.filter)?;
    info!(
        rows = rows.len(),
        survivors = current.len(),
        previous = previous.len(),
        "snapshot built"
    );

    save_snapshot(store, &current).context("persist snapshot")?;

    let deltas = diff_snapshots(&current, &previous);
    let output_lines = format_lines(&deltas, &config.glyphs);
    let pages = paginate(&output_lines, config.page_size);

    let delivery = deliver(sink, &config.message_title, &pages);
    info!(
        pages = pages.len(),
        delivered = delivery.delivered(),
        failed = delivery.failures().len(),
        "notification finished"
    );

    Ok(RunOutcome {
        output_lines,
        interesting_players: current,
        delivery,
    })
}

/// Everything a trigger needs to run the pipeline from another thread.
pub struct AppContext {
    pub config: NotifierConfig,
    pub source: Box<dyn LeaderboardSource + Send + Sync>,
    pub store: Box<dyn SnapshotStore + Send + Sync>,
    pub sink: Box<dyn NotificationSink + Send + Sync>,
}

impl AppContext {
    pub fn run(&self) -> Result<RunOutcome> {
        run_pipeline(
            &self.config,
            self.source.as_ref(),
            self.store.as_ref(),
            self.sink.as_ref(),
        )
    }
}

/// Runs the blocking pipeline off the async executor.
pub async fn run_blocking(ctx: Arc<AppContext>) -> Result<RunOutcome> {
    tokio::task::spawn_blocking(move || ctx.run())
        .await
        .context("pipeline task panicked")?
}
