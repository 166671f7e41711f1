//! `eetly watch`: run the background refresh loop and print each
//! published snapshot until interrupted.

use std::sync::Arc;

use chrono::Local;
use owo_colors::OwoColorize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use eetly_core::{Coordinator, CycleEvent, Snapshot};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output;

use super::ViewContext;

fn summary(generation: u64, snapshot: &Snapshot, ctx: &ViewContext) -> String {
    match ctx.format {
        OutputFormat::Table => {
            let stamp = Local::now().format("%H:%M:%S").to_string();
            let stamp = if ctx.color {
                stamp.dimmed().to_string()
            } else {
                stamp
            };
            format!(
                "{stamp} #{generation} {}: cook {}, {} eating, {} on the list",
                snapshot.info.name,
                snapshot.today.cook,
                snapshot.today.total_eaters,
                snapshot.shopping_list.count(),
            )
        }
        OutputFormat::Plain => snapshot.today.cook.to_string(),
        // One document per line so the stream stays parseable.
        OutputFormat::Json | OutputFormat::JsonCompact | OutputFormat::Yaml => {
            serde_json::to_string(snapshot)
                .unwrap_or_else(|e| format!("{{\"error\": \"serialization failed: {e}\"}}"))
        }
    }
}

pub async fn handle(
    args: WatchArgs,
    resolved: Resolved,
    ctx: &ViewContext,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut config = resolved.coordinator;
    if let Some(interval) = args.interval {
        config.refresh_interval_secs = interval;
    }
    if config.refresh_interval_secs == 0 {
        return Err(CliError::Validation {
            field: "interval".into(),
            reason: "watch needs a refresh interval above 0 seconds".into(),
        });
    }

    let coordinator = Coordinator::from_config(&config)?;
    let mut events = coordinator.events();
    coordinator.start().await;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                debug!("interrupted");
                break;
            }
            event = events.recv() => match event {
                Ok(CycleEvent::SnapshotPublished { generation, snapshot }) => {
                    print_snapshot(generation, &snapshot, ctx, global.quiet);
                }
                Ok(CycleEvent::RosterChangeRequired(diff)) => {
                    warn!(
                        added = diff.added.len(),
                        removed = diff.removed.len(),
                        "household roster changed, rebuilding"
                    );
                    coordinator.reset_roster().await;
                    if let Err(err) = coordinator.refresh().await {
                        warn!(error = %err, "refresh after roster change failed");
                    }
                }
                Ok(CycleEvent::FetchFailed { family, detail }) => {
                    eprintln!("warning: {family} query failed: {detail}");
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "missed coordinator events");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    coordinator.shutdown().await;
    Ok(())
}

fn print_snapshot(generation: u64, snapshot: &Arc<Snapshot>, ctx: &ViewContext, quiet: bool) {
    output::print_output(&summary(generation, snapshot, ctx), quiet);
}
