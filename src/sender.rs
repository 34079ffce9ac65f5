// SPDX-License-Identifier: MIT

//! Batching sender (C9): the queue's single consumer. Drains observations
//! into batches bounded by size or a wall-clock window, then POSTs each
//! batch as a signed JSON array. Failures discard the batch outright —
//! no retry, no re-queue — per spec.md §4.9's rationale that the agent
//! is best-effort and must not amplify collector outages.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::observation::Observation;
use crate::queue::ObservationQueue;
use crate::signer;
use crate::status::Status;

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const BATCH_PATH: &str = "/api/observations/batch";

pub struct SenderConfig {
    pub api_base: String,
    pub token: String,
    pub hmac_secret: String,
    pub batch_size: usize,
    pub batch_interval: Duration,
}

/// Run the sender loop until a shutdown sentinel is dequeued.
pub async fn run(config: SenderConfig, queue: Arc<ObservationQueue>, status: Arc<Status>) {
    let client = Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .expect("reqwest client builds with a fixed timeout");

    loop {
        let Some(first) = queue.dequeue().await else {
            debug!("sender received shutdown sentinel, terminating");
            return;
        };

        let mut batch = vec![first];
        let start = Instant::now();

        while batch.len() < config.batch_size && start.elapsed() < config.batch_interval {
            match queue.dequeue_timeout(POLL_INTERVAL).await {
                Ok(Some(obs)) => batch.push(obs),
                Ok(None) => continue,
                Err(()) => {
                    // Shutdown requested mid-batch: still flush what we have.
                    post_batch(&client, &config, &batch, &status).await;
                    debug!("sender received shutdown sentinel mid-batch, terminating");
                    return;
                }
            }
        }

        post_batch(&client, &config, &batch, &status).await;
    }
}

async fn post_batch(
    client: &Client,
    config: &SenderConfig,
    batch: &[Observation],
    status: &Status,
) {
    debug_assert!(!batch.is_empty(), "sender never posts an empty batch");

    let body = match serde_json::to_vec(batch) {
        Ok(b) => b,
        Err(e) => {
            warn!(error = %e, "failed to serialize batch, dropping");
            status.record_error();
            return;
        }
    };

    let url = format!("{}{}", config.api_base, BATCH_PATH);
    let mut request = client
        .post(&url)
        .header("Content-Type", "application/json")
        .body(body.clone());

    if !config.token.is_empty() {
        request = request.header("X-NetWatch-Token", &config.token);
    }
    if let Some(signed) = signer::sign_now(&config.hmac_secret, "POST", BATCH_PATH, &body) {
        request = request
            .header("X-NetWatch-Timestamp", signed.timestamp)
            .header("X-NetWatch-Signature", signed.signature);
    }

    match request.send().await {
        Ok(resp) if resp.status().is_success() => {
            status.set_last_post_now();
        }
        Ok(resp) => {
            warn!(status = %resp.status(), batch_len = batch.len(), "collector rejected batch");
            status.record_error();
        }
        Err(e) => {
            warn!(error = %e, batch_len = batch.len(), "batch post failed");
            status.record_error();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_path_matches_wire_contract() {
        assert_eq!(BATCH_PATH, "/api/observations/batch");
    }

    #[tokio::test]
    async fn sender_drains_a_sized_batch_and_terminates_on_sentinel() {
        let queue = Arc::new(ObservationQueue::new(10, Arc::new(Status::new())));
        queue.enqueue(Observation::new("mdns"));
        queue.enqueue_shutdown();

        // First dequeue gets the real observation, second gets the sentinel.
        let first = queue.dequeue().await;
        assert!(first.is_some());
        let second = queue.dequeue().await;
        assert!(second.is_none());
    }
}
