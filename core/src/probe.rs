//! # Probe Capabilities
//!
//! The two I/O operations the engine performs per address, expressed as traits
//! so the engine never cares whether a probe is an ICMP echo, a `ping` child
//! process or a scripted fake in a test.

use std::net::Ipv4Addr;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// A probe that could not be carried out, as opposed to a host that did not answer.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("probe capability unavailable: {0}")]
    Unavailable(String),

    #[error("probe i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("gave up after {0:?}")]
    Timeout(Duration),

    #[error("reverse lookup failed: {0}")]
    Lookup(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    /// The host answered; `rtt` is the wall-clock time of the probe.
    Reachable { rtt: Duration },
    Unreachable,
}

/// Sends one echo-style probe and reports whether the host answered.
#[async_trait]
pub trait LivenessProbe: Send + Sync {
    /// Probes `addr` once. No retries; a lost reply is simply `Unreachable`.
    async fn probe(&self, addr: Ipv4Addr, timeout: Duration) -> Result<Liveness, ProbeError>;

    /// Checks that the capability can be invoked at all.
    ///
    /// Called once before a sweep; a failure here is the only way probing
    /// infrastructure surfaces as an error instead of offline hosts.
    async fn preflight(&self) -> Result<(), ProbeError> {
        Ok(())
    }
}

/// Resolves an address back to zero or more hostnames.
#[async_trait]
pub trait ReverseResolver: Send + Sync {
    async fn reverse_lookup(&self, addr: Ipv4Addr) -> Result<Vec<String>, ProbeError>;
}
