// SPDX-License-Identifier: MIT

//! Supervisor (C13): wires config, performs registration, constructs the
//! queue and status block, and launches every producer/consumer task.
//! No component is restarted on failure; the process is expected to be
//! managed externally, per spec.md §4.13 / §9.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::queue::ObservationQueue;
use crate::sender::SenderConfig;
use crate::status::Status;
use crate::{arp, dhcp, heartbeat, listener, registration, sender, status_server, update};

pub async fn run(mut config: AgentConfig, config_path: PathBuf) -> Result<(), AgentError> {
    registration::bootstrap_if_needed(&mut config, &config_path).await;

    let status = Arc::new(Status::new());
    let queue = Arc::new(ObservationQueue::new(config.queue_max, status.clone()));
    let shutdown = Arc::new(tokio::sync::Notify::new());

    let sender_config = SenderConfig {
        api_base: config.api_base.clone(),
        token: config.token.clone(),
        hmac_secret: config.hmac_secret.clone(),
        batch_size: config.batch_size,
        batch_interval: Duration::from_secs(config.batch_interval_seconds),
    };
    let sender_handle = tokio::spawn(sender::run(sender_config, queue.clone(), status.clone()));

    let status_host = config.status_host.clone();
    let status_port = config.status_port;
    let status_for_server = status.clone();
    let shutdown_for_server = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) =
            status_server::run(status_host, status_port, status_for_server, shutdown_for_server)
                .await
        {
            tracing::error!(error = %e, "status endpoint terminated");
        }
    });

    if config.enable_mdns {
        tokio::spawn(listener::run(listener::MDNS, queue.clone()));
    }
    if config.enable_llmnr {
        tokio::spawn(listener::run(listener::LLMNR, queue.clone()));
    }
    if config.enable_ssdp {
        tokio::spawn(listener::run(listener::SSDP_PASSIVE, queue.clone()));
    }
    if config.enable_arp_table {
        let interval = Duration::from_secs(config.arp_interval_seconds);
        tokio::spawn(arp::run(interval, queue.clone()));
    }
    if config.enable_dhcp_lease {
        let interval = Duration::from_secs(config.arp_interval_seconds);
        tokio::spawn(dhcp::run(config.dhcp_lease_path.clone(), interval, queue.clone()));
    }

    let update_interval = Duration::from_secs(config.update_check_interval_seconds);
    tokio::spawn(update::run(
        config.update_check_file.clone(),
        update_interval,
        status.clone(),
    ));

    let heartbeat_interval = Duration::from_secs(config.interval_seconds);
    tokio::spawn(heartbeat::run(heartbeat_interval, queue.clone(), status.clone()));

    // Producers are daemon-like per spec.md §5: they terminate with the
    // process rather than being joined. The supervisor itself blocks on
    // Ctrl-C, then drains the sender via the shutdown sentinel before
    // returning, so an in-flight POST is not killed out from under the
    // process (spec.md §5.1 / SPEC_FULL.md §5.1).
    tokio::signal::ctrl_c().await.ok();
    info!("shutdown signal received, draining sender");
    queue.enqueue_shutdown();
    shutdown.notify_waiters();

    let _ = sender_handle.await;
    Ok(())
}
