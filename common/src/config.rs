use std::time::Duration;

use serde::Deserialize;

use crate::error::{ScanError, SubnetError};
use crate::network::subnet::{self, Subnet};

/// Probes in flight at once when the caller does not say otherwise.
pub const DEFAULT_CONCURRENCY: usize = 10;
/// How long a single liveness probe may take before the host counts as offline.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);
/// Budget for one reverse-DNS lookup.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct Config {
    pub concurrency: usize,
    pub probe_timeout: Duration,
    pub lookup_timeout: Duration,
    /// Total budget for a sweep. When it runs out, completed results are kept.
    pub scan_timeout: Option<Duration>,
    /// Disables reverse-DNS lookups for reachable hosts.
    pub no_dns: bool,
    pub quiet: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            scan_timeout: None,
            no_dns: false,
            quiet: 0,
        }
    }
}

/// A sweep request as it arrives over the wire.
///
/// Either `cidr`, or `address` with an optional `mask`. The older field names
/// `subnet` and `subnetMask` are accepted as aliases; `subnet` may itself
/// carry a `/prefix`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepRequest {
    #[serde(default)]
    pub cidr: Option<String>,
    #[serde(default, alias = "subnet")]
    pub address: Option<String>,
    #[serde(default, alias = "subnetMask")]
    pub mask: Option<String>,
    #[serde(default)]
    pub concurrency: Option<i64>,
}

impl SweepRequest {
    pub fn subnet(&self) -> Result<Subnet, SubnetError> {
        match (&self.cidr, &self.address) {
            (Some(_), Some(_)) => Err(SubnetError::ConflictingSubnetSpecification),
            (Some(cidr), None) => subnet::normalize(cidr, self.mask.as_deref()),
            (None, Some(address)) => subnet::normalize(address, self.mask.as_deref()),
            (None, None) => Err(SubnetError::MalformedAddress(String::new())),
        }
    }

    /// The requested concurrency, or `default` when none was given.
    pub fn concurrency_limit(&self, default: usize) -> Result<usize, ScanError> {
        match self.concurrency {
            None => Ok(default),
            Some(n) if n >= 1 => usize::try_from(n).map_err(|_| ScanError::InvalidConcurrencyLimit(n)),
            Some(n) => Err(ScanError::InvalidConcurrencyLimit(n)),
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
