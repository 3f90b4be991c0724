//! Tick driver for ramps on a tokio runtime.
//!
//! Runs on the calling task, so it works on a current-thread runtime and
//! needs no `Send` bounds. Ticks are strictly sequential.

use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

use super::Ramp;

/// Feed `sink` one ramp value per tick until the ramp ends or is cancelled.
///
/// Returns the number of values delivered.
pub async fn drive<F>(mut ramp: Ramp, mut sink: F) -> usize
where
    F: FnMut(f64),
{
    let mut ticker = interval(ramp.tick());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick of a tokio interval completes immediately.
    ticker.tick().await;

    let mut delivered = 0;
    loop {
        ticker.tick().await;
        let Some(value) = ramp.next() else {
            break;
        };
        sink(value);
        delivered += 1;
    }

    debug!(delivered, cancelled = ramp.cancel_handle().is_cancelled(), "ramp driver stopped");
    delivered
}
