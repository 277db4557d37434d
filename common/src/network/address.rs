//! # IPv4 Address Arithmetic
//!
//! Conversions between dotted-quad text and [`Ipv4Addr`], subnet masks and the
//! bitwise helpers that derive network and broadcast addresses.
//!
//! Text parsing is strict and done here; the bit work is left to
//! [`ipnetwork`].

use std::fmt;
use std::net::Ipv4Addr;

use ipnetwork::{Ipv4Network, ipv4_mask_to_prefix};

use crate::error::SubnetError;

/// A subnet mask: all one bits precede all zero bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubnetMask {
    prefix: u8,
    addr: Ipv4Addr,
}

impl SubnetMask {
    /// Builds the mask with `prefix` leading one bits.
    pub fn from_prefix_len(prefix: u32) -> Result<Self, SubnetError> {
        let invalid = || SubnetError::InvalidPrefixLength(prefix.to_string());
        let prefix = u8::try_from(prefix).map_err(|_| invalid())?;
        let net = Ipv4Network::new(Ipv4Addr::UNSPECIFIED, prefix).map_err(|_| invalid())?;
        Ok(Self::of(&net))
    }

    /// Accepts a dotted-quad mask, rejecting patterns such as `255.0.255.0`.
    pub fn from_addr(mask: Ipv4Addr) -> Result<Self, SubnetError> {
        let prefix = ipv4_mask_to_prefix(mask).map_err(|_| SubnetError::NonContiguousMask(mask))?;
        Ok(Self { prefix, addr: mask })
    }

    pub(crate) fn of(net: &Ipv4Network) -> Self {
        Self {
            prefix: net.prefix(),
            addr: net.mask(),
        }
    }

    pub fn prefix_len(self) -> u8 {
        self.prefix
    }

    pub fn to_addr(self) -> Ipv4Addr {
        self.addr
    }

    /// The network of this size that contains `addr`.
    pub fn apply(self, addr: Ipv4Addr) -> Result<Ipv4Network, SubnetError> {
        Ipv4Network::new(addr, self.prefix)
            .map_err(|_| SubnetError::InvalidPrefixLength(self.prefix.to_string()))
    }
}

impl fmt::Display for SubnetMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.addr)
    }
}

/// Parses exactly four dot-separated decimal octets.
///
/// Leading zeros are read as decimal (`010` is ten), signs, whitespace and
/// empty octets are rejected.
pub fn parse_address(text: &str) -> Result<Ipv4Addr, SubnetError> {
    let malformed = || SubnetError::MalformedAddress(text.to_string());

    let mut octets = [0u8; 4];
    let mut parts = text.split('.');
    for octet in octets.iter_mut() {
        let part = parts.next().ok_or_else(malformed)?;
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        *octet = part.parse::<u8>().map_err(|_| malformed())?;
    }
    if parts.next().is_some() {
        return Err(malformed());
    }

    Ok(Ipv4Addr::from(octets))
}

pub fn format_address(addr: Ipv4Addr) -> String {
    addr.to_string()
}

pub fn mask_from_prefix_len(prefix: u32) -> Result<SubnetMask, SubnetError> {
    SubnetMask::from_prefix_len(prefix)
}

pub fn prefix_len_from_mask(mask: Ipv4Addr) -> Result<u8, SubnetError> {
    SubnetMask::from_addr(mask).map(SubnetMask::prefix_len)
}

/// Parses the text after `/` in CIDR notation.
pub fn parse_prefix_len(text: &str) -> Result<u32, SubnetError> {
    let invalid = || SubnetError::InvalidPrefixLength(text.to_string());
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let prefix = text.parse::<u32>().map_err(|_| invalid())?;
    if prefix > 32 {
        return Err(invalid());
    }
    Ok(prefix)
}

pub fn network_address(addr: Ipv4Addr, mask: SubnetMask) -> Result<Ipv4Addr, SubnetError> {
    Ok(mask.apply(addr)?.network())
}

pub fn broadcast_address(addr: Ipv4Addr, mask: SubnetMask) -> Result<Ipv4Addr, SubnetError> {
    Ok(mask.apply(addr)?.broadcast())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
