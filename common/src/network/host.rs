use std::fmt;
use std::net::Ipv4Addr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HostStatus {
    Online,
    Offline,
}

impl fmt::Display for HostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostStatus::Online => f.write_str("Online"),
            HostStatus::Offline => f.write_str("Offline"),
        }
    }
}

/// Outcome of probing one address. Built once by the engine and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    address: Ipv4Addr,
    response_time: Option<Duration>,
    hostnames: Vec<String>,
}

impl ProbeResult {
    /// A host that answered the liveness probe after `response_time`.
    pub fn online(address: Ipv4Addr, response_time: Duration, hostnames: Vec<String>) -> Self {
        Self {
            address,
            response_time: Some(response_time),
            hostnames,
        }
    }

    /// A host that did not answer, or whose probe faulted.
    pub fn offline(address: Ipv4Addr) -> Self {
        Self {
            address,
            response_time: None,
            hostnames: Vec::new(),
        }
    }

    pub fn address(&self) -> Ipv4Addr {
        self.address
    }

    pub fn is_reachable(&self) -> bool {
        self.response_time.is_some()
    }

    pub fn status(&self) -> HostStatus {
        if self.is_reachable() {
            HostStatus::Online
        } else {
            HostStatus::Offline
        }
    }

    /// Present only for reachable hosts.
    pub fn response_time(&self) -> Option<Duration> {
        self.response_time
    }

    pub fn hostnames(&self) -> &[String] {
        &self.hostnames
    }

    pub fn hostname(&self) -> Option<&str> {
        self.hostnames.first().map(String::as_str)
    }
}
