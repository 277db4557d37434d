//! # Validation Errors
//!
//! Every error in this module is raised synchronously, before a single probe
//! leaves the machine. Probe faults that happen during a sweep are absorbed per
//! address and never show up here.

use std::net::Ipv4Addr;

use thiserror::Error;

/// Failures while turning user input into a canonical subnet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubnetError {
    #[error("malformed IPv4 address '{0}': expected four dot-separated octets between 0 and 255")]
    MalformedAddress(String),

    #[error("invalid prefix length '{0}': expected an integer between 0 and 32")]
    InvalidPrefixLength(String),

    #[error("subnet mask {0} is not a contiguous run of leading one bits")]
    NonContiguousMask(Ipv4Addr),

    #[error("subnet given in CIDR notation and with a separate mask, supply only one")]
    ConflictingSubnetSpecification,

    #[error("no '/prefix' in the address and no subnet mask supplied")]
    MissingSubnetMask,
}

/// Failures of the scan call itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("concurrency limit must be at least 1, got {0}")]
    InvalidConcurrencyLimit(i64),

    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}
