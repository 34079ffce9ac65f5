// SPDX-License-Identifier: MIT

//! DHCP lease poller (C6): periodically re-parses a lease file with a
//! small line-oriented grammar. Shares its interval with the ARP poller
//! by design (spec.md §4.6). Missing file or read errors are tolerated.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::observation::Observation;
use crate::queue::ObservationQueue;

/// Run the poller loop forever, re-reading `path` once per tick.
pub async fn run(path: String, interval: Duration, queue: Arc<ObservationQueue>) {
    loop {
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => {
                for obs in parse_leases(&text) {
                    queue.enqueue(obs);
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => debug!(path = %path, error = %e, "failed to read dhcp lease file"),
        }
        tokio::time::sleep(interval).await;
    }
}

/// Parse a dhcpd.leases-shaped file. A `lease <ip> {` line starts a block,
/// `hardware ethernet <mac>;` supplies the MAC, and a bare `}` closes the
/// block, emitting an observation if both fields were captured. No state
/// is retained across blocks.
pub fn parse_leases(text: &str) -> Vec<Observation> {
    let mut out = Vec::new();
    let mut current_ip: Option<String> = None;
    let mut current_mac: Option<String> = None;

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if let Some(rest) = line.strip_prefix("lease ") {
            current_ip = rest.split_whitespace().next().map(str::to_string);
        } else if line.starts_with("hardware ethernet") {
            current_mac = line
                .split_whitespace()
                .nth(2)
                .map(|m| m.trim_end_matches(';').to_string());
        } else if line == "}" {
            if let (Some(ip), Some(mac)) = (current_ip.take(), current_mac.take()) {
                out.push(
                    Observation::new("dhcp-lease")
                        .with_ip(ip)
                        .with_mac(mac)
                        .with_type_hint("dhcp-lease"),
                );
            }
            current_ip = None;
            current_mac = None;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_single_lease_block() {
        let text = "lease 192.168.1.50 {\n  starts 4 2024/01/01 00:00:00;\n  hardware ethernet aa:bb:cc:dd:ee:ff;\n}\n";
        let obs = parse_leases(text);
        assert_eq!(obs.len(), 1);
        assert_eq!(obs[0].ip_address.as_deref(), Some("192.168.1.50"));
        assert_eq!(obs[0].mac_address.as_deref(), Some("aa:bb:cc:dd:ee:ff"));
        assert_eq!(obs[0].source, "dhcp-lease");
    }

    #[test]
    fn incomplete_block_emits_nothing() {
        let text = "lease 192.168.1.60 {\n}\n";
        assert!(parse_leases(text).is_empty());
    }

    #[test]
    fn state_does_not_leak_across_blocks() {
        let text = "lease 10.0.0.1 {\n  hardware ethernet 11:11:11:11:11:11;\n}\nlease 10.0.0.2 {\n}\n";
        let obs = parse_leases(text);
        assert_eq!(obs.len(), 1);
        assert_eq!(obs[0].ip_address.as_deref(), Some("10.0.0.1"));
    }

    #[test]
    fn multiple_well_formed_blocks() {
        let text = "\
lease 10.0.0.1 {
  hardware ethernet 11:11:11:11:11:11;
}
lease 10.0.0.2 {
  hardware ethernet 22:22:22:22:22:22;
}
";
        let obs = parse_leases(text);
        assert_eq!(obs.len(), 2);
    }

    #[tokio::test]
    async fn missing_file_is_tolerated_not_errored() {
        let queue = Arc::new(ObservationQueue::new(10, Arc::new(crate::status::Status::new())));
        // One tick against a nonexistent path should simply produce nothing.
        match tokio::fs::read_to_string("/nonexistent/dhcpd.leases").await {
            Ok(_) => panic!("expected missing file"),
            Err(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
        }
        assert_eq!(queue.len(), 0);
    }
}
