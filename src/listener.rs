// SPDX-License-Identifier: MIT

//! UDP multicast listener (C4): joins a group, receives datagrams, and
//! emits an observation per datagram. Any socket/IO failure terminates
//! this listener silently — the supervisor does not restart it, per
//! spec.md §4.4 / §9.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use socket2::{Domain, Socket, Type};
use tokio::net::UdpSocket;
use tracing::{debug, warn};

use crate::observation::Observation;
use crate::parse::{dns, ssdp};
use crate::queue::ObservationQueue;

const RECV_BUF_SIZE: usize = 4096;
const BROADCAST_GROUP: &str = "255.255.255.255";

/// Static description of one of the three default multicast listeners.
pub struct ListenerSpec {
    pub name: &'static str,
    pub group: &'static str,
    pub port: u16,
}

pub const MDNS: ListenerSpec = ListenerSpec {
    name: "mdns",
    group: "224.0.0.251",
    port: 5353,
};
pub const LLMNR: ListenerSpec = ListenerSpec {
    name: "llmnr",
    group: "224.0.0.252",
    port: 5355,
};
pub const SSDP_PASSIVE: ListenerSpec = ListenerSpec {
    name: "ssdp-passive",
    group: "239.255.255.250",
    port: 1900,
};

/// Bind, join the multicast group if applicable, and receive datagrams
/// until the socket dies. Runs until cancelled or until IO fails.
pub async fn run(spec: ListenerSpec, queue: Arc<ObservationQueue>) {
    let socket = match bind(&spec) {
        Ok(s) => s,
        Err(e) => {
            warn!(listener = spec.name, error = %e, "failed to bind listener, terminating");
            return;
        }
    };

    let mut buf = [0u8; RECV_BUF_SIZE];
    loop {
        let (len, peer) = match socket.recv_from(&mut buf).await {
            Ok(v) => v,
            Err(e) => {
                warn!(listener = spec.name, error = %e, "listener IO error, terminating");
                return;
            }
        };

        let obs = build_observation(&spec, &buf[..len], peer);
        queue.enqueue(obs);
    }
}

fn bind(spec: &ListenerSpec) -> std::io::Result<UdpSocket> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, None)?;
    socket.set_reuse_address(true)?;
    let bind_addr: SocketAddr = format!("0.0.0.0:{}", spec.port).parse().unwrap();
    socket.bind(&bind_addr.into())?;
    socket.set_nonblocking(true)?;

    if spec.group != BROADCAST_GROUP {
        let group: Ipv4Addr = spec.group.parse().expect("listener group is a valid IPv4 literal");
        socket.join_multicast_v4(&group, &Ipv4Addr::UNSPECIFIED)?;
    }

    UdpSocket::from_std(socket.into())
}

fn build_observation(spec: &ListenerSpec, data: &[u8], peer: SocketAddr) -> Observation {
    let mut obs = Observation::new(spec.name)
        .with_ip(peer.ip().to_string())
        .with_type_hint(spec.name)
        .with_service_hint(format!("udp/{}", spec.port));

    if spec.name == "ssdp-passive" {
        let headers = ssdp::parse(data);
        if let Some(server) = headers.server {
            obs.vendor = Some(server);
        }
        if let Some(st) = headers.st {
            obs.service_hint = Some(st);
        }
        if let Some(usn) = headers.usn {
            obs.hostname = Some(usn);
        }
    } else if spec.name == "mdns" || spec.name == "llmnr" {
        let hint = dns::parse(data);
        if let Some(name) = hint.name {
            obs.hostname = Some(name);
        }
        if let Some(rtype) = hint.rtype {
            obs.service_hint = Some(rtype);
        }
    }

    debug!(listener = spec.name, source = %peer, "emitted observation");
    obs
}
