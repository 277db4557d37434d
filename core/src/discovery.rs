//! # Sweep Service
//!
//! Implements the "sweep a subnet" use case: a canonical [`Subnet`] goes in, the
//! probe results for each of its usable hosts come out.
//!
//! Validation happens in the normalizer before this service is reached; what
//! can still go wrong here is the probing capability being unusable as a whole,
//! which is reported once instead of as a subnet full of offline hosts.

use std::sync::Arc;

use anyhow::Context;
use sweepr_common::config::Config;
use sweepr_common::network::range::HostRange;
use sweepr_common::network::subnet::Subnet;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, info, info_span};

use crate::network::{ping::SystemPing, resolver::SystemResolver};
use crate::probe::{LivenessProbe, ReverseResolver};
use crate::scanner::{ProbeEngine, ResultCallback, ScanReport};

pub struct SweepService {
    engine: ProbeEngine,
    concurrency: usize,
}

impl SweepService {
    pub fn new(engine: ProbeEngine, concurrency: usize) -> Self {
        Self {
            engine,
            concurrency,
        }
    }

    /// Builds the service on top of the operating system's `ping` and resolver.
    pub fn from_config(cfg: &Config) -> Self {
        let resolver: Option<Arc<dyn ReverseResolver>> = match cfg.no_dns {
            true => None,
            false => Some(Arc::new(SystemResolver::new(cfg.lookup_timeout))),
        };
        Self::with_capabilities(Arc::new(SystemPing::new()), resolver, cfg)
    }

    pub fn with_capabilities(
        prober: Arc<dyn LivenessProbe>,
        resolver: Option<Arc<dyn ReverseResolver>>,
        cfg: &Config,
    ) -> Self {
        let mut engine = ProbeEngine::new(prober)
            .with_probe_timeout(cfg.probe_timeout)
            .with_lookup_timeout(cfg.lookup_timeout)
            .with_scan_timeout(cfg.scan_timeout);
        if let Some(resolver) = resolver {
            engine = engine.with_resolver(resolver);
        }
        Self::new(engine, cfg.concurrency)
    }

    pub fn on_result(mut self, callback: ResultCallback) -> Self {
        self.engine = self.engine.on_result(callback);
        self
    }

    /// Probes every usable host of `subnet`.
    ///
    /// A `/31` or `/32` has no usable hosts and yields an empty report without
    /// touching the network.
    pub async fn sweep(&self, subnet: &Subnet, cancel: CancellationToken) -> anyhow::Result<ScanReport> {
        let hosts = subnet.hosts();
        let span = info_span!("sweep", %subnet, hosts = hosts.len());
        self.sweep_hosts(subnet, hosts, cancel).instrument(span).await
    }

    async fn sweep_hosts(
        &self,
        subnet: &Subnet,
        hosts: HostRange,
        cancel: CancellationToken,
    ) -> anyhow::Result<ScanReport> {
        if hosts.is_empty() {
            info!("no usable hosts in {subnet}");
            return Ok(ScanReport::default());
        }

        self.engine
            .prober()
            .preflight()
            .await
            .context("liveness probing is unavailable")?;

        let report = self
            .engine
            .scan_range(hosts, self.concurrency, cancel)
            .await?;
        Ok(report)
    }
}

/// Executes a full sweep against `subnet` with the system capabilities.
pub async fn perform_sweep(
    subnet: &Subnet,
    cfg: &Config,
    cancel: CancellationToken,
    on_result: Option<ResultCallback>,
) -> anyhow::Result<ScanReport> {
    let mut service = SweepService::from_config(cfg);
    if let Some(callback) = on_result {
        service = service.on_result(callback);
    }
    service.sweep(subnet, cancel).await
}
