// SPDX-License-Identifier: MIT

//! Neighbor-table poller (C5): periodically shells out to an external
//! command enumerating kernel neighbor entries and emits one observation
//! per `lladdr`-bearing line. Errors are swallowed; the poller ticks
//! again on the next interval regardless.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::observation::Observation;
use crate::queue::ObservationQueue;

/// Run the poller loop forever, invoking `ip neigh` once per tick.
pub async fn run(interval: Duration, queue: Arc<ObservationQueue>) {
    loop {
        match run_ip_neigh().await {
            Ok(output) => {
                for obs in parse_neighbors(&output) {
                    queue.enqueue(obs);
                }
            }
            Err(e) => debug!(error = %e, "ip neigh invocation failed, skipping this tick"),
        }
        tokio::time::sleep(interval).await;
    }
}

async fn run_ip_neigh() -> std::io::Result<String> {
    let output = tokio::process::Command::new("ip")
        .arg("neigh")
        .output()
        .await?;
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Parse `ip neigh`-shaped text: lines containing the `lladdr` token have
/// the IP as the first whitespace token and the MAC immediately after
/// `lladdr`. Malformed lines are skipped.
pub fn parse_neighbors(text: &str) -> Vec<Observation> {
    let mut out = Vec::new();
    for line in text.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(lladdr_pos) = parts.iter().position(|&p| p == "lladdr") else {
            continue;
        };
        let Some(&ip) = parts.first() else { continue };
        let Some(&mac) = parts.get(lladdr_pos + 1) else {
            continue;
        };
        out.push(
            Observation::new("arp-table")
                .with_ip(ip)
                .with_mac(mac)
                .with_type_hint("arp-table"),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_well_formed_line() {
        let text = "192.168.1.2 dev eth0 lladdr aa:bb:cc:dd:ee:ff REACHABLE\n";
        let obs = parse_neighbors(text);
        assert_eq!(obs.len(), 1);
        assert_eq!(obs[0].source, "arp-table");
        assert_eq!(obs[0].ip_address.as_deref(), Some("192.168.1.2"));
        assert_eq!(obs[0].mac_address.as_deref(), Some("aa:bb:cc:dd:ee:ff"));
        assert_eq!(obs[0].type_hint.as_deref(), Some("arp-table"));
    }

    #[test]
    fn skips_lines_without_lladdr() {
        let text = "192.168.1.3 dev eth0  FAILED\n";
        assert!(parse_neighbors(text).is_empty());
    }

    #[test]
    fn skips_lladdr_with_nothing_after_it() {
        let text = "192.168.1.4 dev eth0 lladdr\n";
        assert!(parse_neighbors(text).is_empty());
    }

    #[test]
    fn handles_multiple_lines() {
        let text = "10.0.0.1 dev eth0 lladdr 11:22:33:44:55:66 STALE\n10.0.0.2 dev eth0 lladdr 66:55:44:33:22:11 REACHABLE\n";
        assert_eq!(parse_neighbors(text).len(), 2);
    }
}
