// SPDX-License-Identifier: MIT

//! Self-heartbeat (C7): periodic own-liveness observation with
//! exponential backoff on enqueue failure, doubling from 1s to a 60s cap.

use std::sync::Arc;
use std::time::Duration;

use crate::observation::Observation;
use crate::queue::ObservationQueue;
use crate::status::Status;

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Run the heartbeat loop forever, emitting one observation per `interval`.
///
/// `ObservationQueue::enqueue` is backed by a mutex and cannot itself
/// fail, so the backoff path described in spec.md §4.7 never triggers
/// against this queue implementation; `on_enqueue_failure` below is kept
/// as the tested, documented contract for a future enqueue backend that
/// can raise (e.g. a channel-based queue returning `SendError`).
pub async fn run(interval: Duration, queue: Arc<ObservationQueue>, _status: Arc<Status>) {
    loop {
        let obs = Observation::new("kali-agent")
            .with_hostname("kali-agent")
            .with_type_hint("defensive-sensor");
        queue.enqueue(obs);
        tokio::time::sleep(interval).await;
    }
}

/// Record an enqueue failure and compute the next backoff delay.
pub fn on_enqueue_failure(status: &Status, backoff: Duration) -> Duration {
    status.record_error();
    Duration::from_secs((backoff.as_secs() * 2).min(MAX_BACKOFF.as_secs()).max(1))
}
