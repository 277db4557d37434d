//! # Result Records
//!
//! The flat record shape handed across the request boundary, plus the column
//! sorting the results table offers. A [`ProbeResult`] maps 1:1 onto a
//! [`HostRecord`]; only the first reverse-DNS name survives the mapping.

use std::cmp::Ordering;
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::network::host::{HostStatus, ProbeResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostRecord {
    pub ip: Ipv4Addr,
    pub status: HostStatus,
    /// Milliseconds, rounded to two decimals.
    pub response_time: Option<f64>,
    pub hostname: Option<String>,
}

impl From<&ProbeResult> for HostRecord {
    fn from(result: &ProbeResult) -> Self {
        Self {
            ip: result.address(),
            status: result.status(),
            response_time: result
                .response_time()
                .map(|rtt| (rtt.as_secs_f64() * 100_000.0).round() / 100.0),
            hostname: result.hostname().map(str::to_string),
        }
    }
}

pub fn to_records(results: &[ProbeResult]) -> Vec<HostRecord> {
    results.iter().map(HostRecord::from).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Ip,
    Status,
    ResponseTime,
    Hostname,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ip" => Ok(SortKey::Ip),
            "status" => Ok(SortKey::Status),
            "responsetime" | "response-time" | "rtt" => Ok(SortKey::ResponseTime),
            "hostname" | "host" => Ok(SortKey::Hostname),
            _ => Err(format!(
                "unknown sort column '{s}', expected one of: ip, status, response-time, hostname"
            )),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortKey::Ip => "ip",
            SortKey::Status => "status",
            SortKey::ResponseTime => "response-time",
            SortKey::Hostname => "hostname",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Sorts records in place, stable.
///
/// Missing values (no response time, no or empty hostname) sort after present
/// ones in ascending order and before them in descending order. IP addresses
/// compare numerically.
pub fn sort_records(records: &mut [HostRecord], key: SortKey, direction: SortDirection) {
    records.sort_by(|a, b| {
        let ordering = compare(a, b, key);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

fn compare(a: &HostRecord, b: &HostRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::Ip => a.ip.cmp(&b.ip),
        SortKey::Status => a.status.to_string().cmp(&b.status.to_string()),
        SortKey::ResponseTime => missing_last(a.response_time, b.response_time, f64::total_cmp),
        SortKey::Hostname => missing_last(
            a.hostname.as_deref().filter(|h| !h.is_empty()),
            b.hostname.as_deref().filter(|h| !h.is_empty()),
            |x, y| x.cmp(y),
        ),
    }
}

fn missing_last<T>(a: Option<T>, b: Option<T>, cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => cmp(&x, &y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
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
