//! # Probe Engine
//!
//! Fans a list of addresses out over at most `limit` concurrent probe tasks and
//! fans the results back in.
//!
//! Each admitted address runs a two-stage pipeline in its own task:
//!
//! 1. one liveness probe, bounded by a timeout and never retried;
//! 2. if the host answered, one reverse-DNS lookup.
//!
//! Anything that goes wrong inside a task (a probe error, a lookup error, even a
//! panic) is folded into that address's [`ProbeResult`]. The scan call itself
//! only fails on invalid input, before any probe is sent.
//!
//! A scan can be stopped through a [`CancellationToken`] or by an overall scan
//! timeout. Stopping admits no further addresses, aborts in-flight probes and
//! returns everything that had already completed.

use std::collections::{HashMap, HashSet};
use std::future;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use sweepr_common::config::{DEFAULT_LOOKUP_TIMEOUT, DEFAULT_PROBE_TIMEOUT};
use sweepr_common::error::ScanError;
use sweepr_common::network::host::ProbeResult;
use sweepr_common::network::range::HostRange;
use tokio::sync::Semaphore;
use tokio::task::{self, JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::probe::{Liveness, LivenessProbe, ReverseResolver};

/// Slack on top of the probe timeout before the engine stops waiting on a capability.
const PROBE_GRACE: Duration = Duration::from_millis(500);

/// Called once for every result as it is aggregated.
pub type ResultCallback = Arc<dyn Fn(&ProbeResult) + Send + Sync>;

/// What a scan produced.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// One entry per completed address, in completion order.
    pub results: Vec<ProbeResult>,
    /// Whether the scan was stopped before every address completed.
    pub cancelled: bool,
    /// Addresses that were never probed or whose probe was aborted.
    pub discarded: u64,
}

#[derive(Clone)]
pub struct ProbeEngine {
    prober: Arc<dyn LivenessProbe>,
    resolver: Option<Arc<dyn ReverseResolver>>,
    probe_timeout: Duration,
    lookup_timeout: Duration,
    scan_timeout: Option<Duration>,
    on_result: Option<ResultCallback>,
}

impl ProbeEngine {
    pub fn new(prober: Arc<dyn LivenessProbe>) -> Self {
        Self {
            prober,
            resolver: None,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            scan_timeout: None,
            on_result: None,
        }
    }

    /// Without a resolver, reachable hosts are reported with no hostnames.
    pub fn with_resolver(mut self, resolver: Arc<dyn ReverseResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    pub fn with_scan_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.scan_timeout = timeout;
        self
    }

    pub fn on_result(mut self, callback: ResultCallback) -> Self {
        self.on_result = Some(callback);
        self
    }

    pub fn prober(&self) -> &Arc<dyn LivenessProbe> {
        &self.prober
    }

    /// Probes every address with at most `limit` probes in flight.
    ///
    /// Returns exactly one result per address. Result order is unspecified.
    /// The scan timeout does not apply here, only to
    /// [`scan_until`](Self::scan_until) and [`scan_range`](Self::scan_range).
    pub async fn scan<I>(&self, addresses: I, limit: usize) -> Result<Vec<ProbeResult>, ScanError>
    where
        I: IntoIterator<Item = Ipv4Addr>,
    {
        let addresses = validate(addresses, limit)?;
        let total = addresses.len() as u64;
        let report = self
            .run(addresses.into_iter(), total, limit, CancellationToken::new(), None)
            .await?;
        Ok(report.results)
    }

    /// Like [`scan`](Self::scan), but stops early once `cancel` fires or the
    /// scan timeout runs out.
    pub async fn scan_until<I>(
        &self,
        addresses: I,
        limit: usize,
        cancel: CancellationToken,
    ) -> Result<ScanReport, ScanError>
    where
        I: IntoIterator<Item = Ipv4Addr>,
    {
        let addresses = validate(addresses, limit)?;
        let total = addresses.len() as u64;
        self.run(addresses.into_iter(), total, limit, cancel, self.scan_timeout)
            .await
    }

    /// Scans a host range without materializing it.
    ///
    /// Addresses are pulled from the range only as probes are admitted, so even
    /// `0.0.0.0/0` only holds `limit` addresses in flight plus the results
    /// gathered so far.
    pub async fn scan_range(
        &self,
        range: HostRange,
        limit: usize,
        cancel: CancellationToken,
    ) -> Result<ScanReport, ScanError> {
        check_limit(limit)?;
        self.run(range.iter(), range.len(), limit, cancel, self.scan_timeout)
            .await
    }

    async fn run<Q>(
        &self,
        queue: Q,
        total: u64,
        limit: usize,
        cancel: CancellationToken,
        scan_timeout: Option<Duration>,
    ) -> Result<ScanReport, ScanError>
    where
        Q: Iterator<Item = Ipv4Addr>,
    {
        info!(total, limit, "probing addresses");

        let window = usize::try_from(total).unwrap_or(usize::MAX).min(limit);
        let semaphore = Arc::new(Semaphore::new(limit.min(Semaphore::MAX_PERMITS)));
        let mut tasks: JoinSet<ProbeResult> = JoinSet::new();
        let mut in_flight: HashMap<task::Id, Ipv4Addr> = HashMap::with_capacity(window);
        let mut results: Vec<ProbeResult> = Vec::with_capacity(window);
        let mut queue = queue.peekable();
        let mut cancelled = false;

        let deadline = async {
            match scan_timeout {
                Some(timeout) => tokio::time::sleep(timeout).await,
                None => future::pending().await,
            }
        };
        tokio::pin!(deadline);

        loop {
            let pending = queue.peek().is_some();
            if !pending && tasks.is_empty() {
                break;
            }

            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    warn!("scan cancelled, keeping completed results");
                    cancelled = true;
                    break;
                }

                _ = &mut deadline => {
                    warn!("scan timeout reached, keeping completed results");
                    cancelled = true;
                    break;
                }

                Some(joined) = tasks.join_next_with_id() => {
                    if let Some(result) = self.settle(joined, &mut in_flight) {
                        self.record(result, &mut results);
                    }
                }

                permit = semaphore.clone().acquire_owned(), if pending => {
                    let Ok(permit) = permit else {
                        return Err(ScanError::InvariantViolation("admission semaphore closed".into()));
                    };
                    let Some(addr) = queue.next() else { continue };

                    let prober = Arc::clone(&self.prober);
                    let resolver = self.resolver.clone();
                    let (probe_timeout, lookup_timeout) = (self.probe_timeout, self.lookup_timeout);

                    let handle = tasks.spawn(async move {
                        let _permit = permit;
                        probe_host(prober, resolver, addr, probe_timeout, lookup_timeout).await
                    });
                    in_flight.insert(handle.id(), addr);
                }
            }
        }

        if cancelled {
            tasks.abort_all();
            // Tasks that finished right before the abort still count.
            while let Some(joined) = tasks.join_next_with_id().await {
                if let Some(result) = self.settle(joined, &mut in_flight) {
                    self.record(result, &mut results);
                }
            }
        }

        let discarded = total.saturating_sub(results.len() as u64);
        info!(
            completed = results.len(),
            online = results.iter().filter(|r| r.is_reachable()).count(),
            discarded,
            "probing finished"
        );

        Ok(ScanReport {
            results,
            cancelled,
            discarded,
        })
    }

    /// Maps a joined task back to a result. Aborted tasks yield nothing.
    fn settle(
        &self,
        joined: Result<(task::Id, ProbeResult), JoinError>,
        in_flight: &mut HashMap<task::Id, Ipv4Addr>,
    ) -> Option<ProbeResult> {
        match joined {
            Ok((id, result)) => {
                in_flight.remove(&id);
                Some(result)
            }
            Err(err) => {
                let addr = in_flight.remove(&err.id())?;
                if err.is_cancelled() {
                    return None;
                }
                warn!(%addr, "probe task failed: {err}");
                Some(ProbeResult::offline(addr))
            }
        }
    }

    fn record(&self, result: ProbeResult, results: &mut Vec<ProbeResult>) {
        if let Some(callback) = &self.on_result {
            callback(&result);
        }
        results.push(result);
    }
}

fn check_limit(limit: usize) -> Result<(), ScanError> {
    match limit {
        0 => Err(ScanError::InvalidConcurrencyLimit(0)),
        _ => Ok(()),
    }
}

/// Rejects a zero limit and duplicate addresses before anything is sent.
fn validate<I>(addresses: I, limit: usize) -> Result<Vec<Ipv4Addr>, ScanError>
where
    I: IntoIterator<Item = Ipv4Addr>,
{
    check_limit(limit)?;

    let addresses: Vec<Ipv4Addr> = addresses.into_iter().collect();
    let mut seen = HashSet::with_capacity(addresses.len());
    for addr in &addresses {
        if !seen.insert(*addr) {
            return Err(ScanError::InvariantViolation(format!(
                "address {addr} appears more than once"
            )));
        }
    }

    Ok(addresses)
}

async fn probe_host(
    prober: Arc<dyn LivenessProbe>,
    resolver: Option<Arc<dyn ReverseResolver>>,
    addr: Ipv4Addr,
    probe_timeout: Duration,
    lookup_timeout: Duration,
) -> ProbeResult {
    let liveness = tokio::time::timeout(probe_timeout + PROBE_GRACE, prober.probe(addr, probe_timeout)).await;

    let rtt = match liveness {
        Ok(Ok(Liveness::Reachable { rtt })) => rtt,
        Ok(Ok(Liveness::Unreachable)) => {
            debug!(%addr, "no reply");
            return ProbeResult::offline(addr);
        }
        Ok(Err(err)) => {
            debug!(%addr, "probe faulted: {err}");
            return ProbeResult::offline(addr);
        }
        Err(_) => {
            debug!(%addr, "probe did not return within {:?}", probe_timeout + PROBE_GRACE);
            return ProbeResult::offline(addr);
        }
    };

    let hostnames = match resolver {
        Some(resolver) => lookup_hostnames(resolver.as_ref(), addr, lookup_timeout).await,
        None => Vec::new(),
    };

    debug!(%addr, ?rtt, ?hostnames, "host is up");
    ProbeResult::online(addr, rtt, hostnames)
}

/// Lookup failures never demote a reachable host; they just mean no names.
async fn lookup_hostnames(resolver: &dyn ReverseResolver, addr: Ipv4Addr, timeout: Duration) -> Vec<String> {
    match tokio::time::timeout(timeout, resolver.reverse_lookup(addr)).await {
        Ok(Ok(names)) => names,
        Ok(Err(err)) => {
            debug!(%addr, "reverse lookup failed: {err}");
            Vec::new()
        }
        Err(_) => {
            debug!(%addr, "reverse lookup timed out");
            Vec::new()
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
