//! Session ticker background task

use std::{sync::Arc, time::Duration};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::state::AppState;

/// Drive the session engine at 1 Hz while the global timer runs
///
/// The interval only exists while the running flag is up: pausing disarms
/// it, resuming re-arms it. Spawned exactly once from main, so there is
/// never more than one periodic callback writing the draft.
pub async fn session_ticker_task(state: Arc<AppState>) {
    info!("Starting session ticker task");

    let mut running_rx = state.running_tx.subscribe();

    loop {
        // Wait until the global timer is running.
        while !*running_rx.borrow() {
            if running_rx.changed().await.is_err() {
                debug!("Running flag channel closed, stopping ticker");
                return;
            }
        }

        debug!("Global timer running, arming 1s interval");
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first interval tick completes immediately; consume it so the
        // first real tick lands a full second after resume.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let draft = state.tick();
                    debug!("Tick: {}s elapsed", draft.elapsed_seconds);
                }

                changed = running_rx.changed() => {
                    if changed.is_err() {
                        debug!("Running flag channel closed, stopping ticker");
                        return;
                    }
                    if !*running_rx.borrow() {
                        debug!("Global timer paused, disarming interval");
                        break;
                    }
                }
            }
        }
    }
}
