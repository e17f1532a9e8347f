// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::{Duration, Instant};

use reqwest::Url;
use tracing::debug;

/// Synchronous reachability check.
pub trait Connectivity {
    fn is_online(&self) -> bool;
}

/// Considers the network up when the service host accepts a TCP connection.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    host: String,
    port: u16,
    timeout: Duration,
}

impl TcpProbe {
    /// Probe for the host and port of `url`. `None` when the URL has no host.
    pub fn for_url(url: &str, timeout: Duration) -> Option<Self> {
        let parsed = Url::parse(url).ok()?;
        let host = parsed.host_str()?.to_string();
        let port = parsed.port_or_known_default()?;
        Some(TcpProbe {
            host,
            port,
            timeout,
        })
    }

    fn addrs(&self) -> Vec<SocketAddr> {
        match (self.host.as_str(), self.port).to_socket_addrs() {
            Ok(it) => it.collect(),
            Err(e) => {
                debug!(host = %self.host, error = %e, "probe could not resolve host");
                Vec::new()
            }
        }
    }
}

impl Connectivity for TcpProbe {
    fn is_online(&self) -> bool {
        let online = self
            .addrs()
            .iter()
            .any(|addr| TcpStream::connect_timeout(addr, self.timeout).is_ok());
        debug!(host = %self.host, port = self.port, online, "connectivity probe");
        online
    }
}

/// The probe the binary wires in: a real check, or a fixed answer for `--offline`.
#[derive(Debug, Clone)]
pub enum NetworkProbe {
    Tcp(TcpProbe),
    Fixed(bool),
}

impl Connectivity for NetworkProbe {
    fn is_online(&self) -> bool {
        match self {
            NetworkProbe::Tcp(p) => p.is_online(),
            NetworkProbe::Fixed(v) => *v,
        }
    }
}

impl<C: Connectivity + ?Sized> Connectivity for &C {
    fn is_online(&self) -> bool {
        (**self).is_online()
    }
}

/// Polls `probe` every `poll` until it reports online or `deadline` passes.
/// Returns whether the network came up.
pub fn wait_until_online<C: Connectivity>(probe: &C, poll: Duration, deadline: Duration) -> bool {
    let start = Instant::now();
    loop {
        if probe.is_online() {
            return true;
        }
        if start.elapsed() >= deadline {
            return false;
        }
        thread::sleep(poll);
    }
}
