//! Scripted probe capabilities shared by the integration tests.

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use sweepr_core::probe::{Liveness, LivenessProbe, ProbeError, ReverseResolver};

/// What a scripted host does when probed.
#[derive(Debug, Clone, Copy)]
pub enum Script {
    /// Answers after the given delay.
    Answer(Duration),
    /// Never answers; the probe itself hangs until it is dropped.
    Hang,
    /// Replies that the host is unreachable.
    Silent,
}

/// A liveness probe driven by a per-address script.
///
/// Unscripted addresses are `Silent`. Counts probes and tracks the peak
/// number of probes in flight.
#[derive(Default)]
pub struct ScriptedProbe {
    script: HashMap<Ipv4Addr, Script>,
    default: Option<Script>,
    preflight_error: Option<String>,
    probes: AtomicUsize,
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl ScriptedProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, addr: Ipv4Addr, script: Script) -> Self {
        self.script.insert(addr, script);
        self
    }

    /// Script used for every address not scripted explicitly.
    pub fn otherwise(mut self, script: Script) -> Self {
        self.default = Some(script);
        self
    }

    pub fn failing_preflight(mut self, reason: &str) -> Self {
        self.preflight_error = Some(reason.to_string());
        self
    }

    pub fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl LivenessProbe for ScriptedProbe {
    async fn probe(&self, addr: Ipv4Addr, _timeout: Duration) -> Result<Liveness, ProbeError> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.active);

        let script = self
            .script
            .get(&addr)
            .copied()
            .or(self.default)
            .unwrap_or(Script::Silent);

        match script {
            Script::Answer(rtt) => {
                tokio::time::sleep(rtt).await;
                Ok(Liveness::Reachable { rtt })
            }
            Script::Hang => {
                std::future::pending::<()>().await;
                Ok(Liveness::Unreachable)
            }
            Script::Silent => {
                tokio::time::sleep(Duration::from_millis(5)).await;
                Ok(Liveness::Unreachable)
            }
        }
    }

    async fn preflight(&self) -> Result<(), ProbeError> {
        match &self.preflight_error {
            Some(reason) => Err(ProbeError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }
}

/// Reverse lookups answered from a fixed table; unknown addresses have no names.
#[derive(Default)]
pub struct TableResolver {
    names: HashMap<Ipv4Addr, Vec<String>>,
}

impl TableResolver {
    pub fn new<const N: usize>(entries: [(Ipv4Addr, &str); N]) -> Self {
        let mut names: HashMap<Ipv4Addr, Vec<String>> = HashMap::new();
        for (addr, name) in entries {
            names.entry(addr).or_default().push(name.to_string());
        }
        Self { names }
    }
}

#[async_trait]
impl ReverseResolver for TableResolver {
    async fn reverse_lookup(&self, addr: Ipv4Addr) -> Result<Vec<String>, ProbeError> {
        Ok(self.names.get(&addr).cloned().unwrap_or_default())
    }
}
