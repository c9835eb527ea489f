use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use crate::state::{SharedState, outbox::FlushReport};

const INITIAL_DELAY: Duration = Duration::from_millis(1_000);
const MAX_DELAY: Duration = Duration::from_secs(10);
const IDLE_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Replay queued completed games until they reach the store, backing off while it keeps failing.
pub async fn run(state: SharedState) {
    let mut delay = INITIAL_DELAY;

    loop {
        if state.outbox().is_empty() {
            delay = INITIAL_DELAY;
            sleep(IDLE_POLL_INTERVAL).await;
            continue;
        }

        let report = flush_once(&state).await;
        if report.remaining == 0 {
            delay = INITIAL_DELAY;
            continue;
        }

        warn!(
            remaining = report.remaining,
            retry_in_ms = delay.as_millis() as u64,
            "games still waiting for sync"
        );
        sleep(delay).await;
        delay = next_delay(delay);
    }
}

/// One pass over the outbox against the configured store.
pub async fn flush_once(state: &SharedState) -> FlushReport {
    let store = state.game_store();
    let report = state.outbox().flush(store.as_ref()).await;
    if report.drained > 0 {
        info!(drained = report.drained, remaining = report.remaining, "queued games synced");
    }
    report
}

fn next_delay(delay: Duration) -> Duration {
    (delay * 2).min(MAX_DELAY)
}
