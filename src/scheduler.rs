use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::pipeline::{AppContext, run_blocking};

/// Start the timer-driven trigger. Returns `None` when polling is disabled.
///
/// Runs are awaited one at a time; a failed run is logged and the next tick
/// proceeds normally.
pub fn spawn_schedule(ctx: Arc<AppContext>) -> Option<JoinHandle<()>> {
    let secs = ctx.config.poll_secs?;
    info!(every_secs = secs, "scheduled polling enabled");

    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(secs));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            info!("scheduled run starting");
            match run_blocking(ctx.clone()).await {
                Ok(outcome) => info!(
                    lines = outcome.output_lines.len(),
                    complete = outcome.delivery.is_complete(),
                    "scheduled run finished"
                ),
                Err(err) => error!(error = %format!("{err:#}"), "scheduled run failed"),
            }
        }
    }))
}
