use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use async_trait::async_trait;
use dns_lookup::lookup_addr;

use crate::probe::{ProbeError, ReverseResolver};

/// Reverse lookups through the platform resolver (`getnameinfo`).
///
/// The call blocks, so it runs on tokio's blocking pool under a timeout. A
/// timed-out lookup keeps its blocking thread until the resolver gives up.
#[derive(Debug, Clone)]
pub struct SystemResolver {
    timeout: Duration,
}

impl SystemResolver {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ReverseResolver for SystemResolver {
    async fn reverse_lookup(&self, addr: Ipv4Addr) -> Result<Vec<String>, ProbeError> {
        let ip = IpAddr::V4(addr);
        let lookup = tokio::task::spawn_blocking(move || lookup_addr(&ip));

        let name = tokio::time::timeout(self.timeout, lookup)
            .await
            .map_err(|_| ProbeError::Timeout(self.timeout))?
            .map_err(|e| ProbeError::Lookup(e.to_string()))??;

        Ok(hostnames_from(&name, addr))
    }
}

/// getnameinfo hands back the numeric address when no PTR record exists.
fn hostnames_from(name: &str, addr: Ipv4Addr) -> Vec<String> {
    let name = name.trim_end_matches('.');
    if name.is_empty() || name == addr.to_string() {
        return Vec::new();
    }
    vec![name.to_string()]
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
