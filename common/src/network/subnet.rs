//! # Subnet Normalizer
//!
//! Turns what a user typed into a canonical [`Subnet`]. Two input shapes are
//! accepted:
//!
//! * CIDR notation in a single string, e.g. `192.168.1.0/24`.
//! * A plain address plus a separate dotted-quad mask, e.g. `10.0.0.5` and
//!   `255.255.255.0`.
//!
//! Host bits in the supplied address are silently cleared: `10.0.0.5/24`
//! normalizes to `10.0.0.0/24`. This is not an error.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use ipnetwork::Ipv4Network;

use crate::error::SubnetError;
use crate::network::address::{self, SubnetMask};
use crate::network::range::HostRange;

/// A network address with every host bit cleared, together with its mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subnet {
    net: Ipv4Network,
}

impl Subnet {
    /// Builds a subnet from any address inside it.
    pub fn new(addr: Ipv4Addr, mask: SubnetMask) -> Result<Self, SubnetError> {
        let containing = mask.apply(addr)?;
        Ok(Self {
            net: mask.apply(containing.network())?,
        })
    }

    pub fn network(&self) -> Ipv4Addr {
        self.net.network()
    }

    pub fn mask(&self) -> SubnetMask {
        SubnetMask::of(&self.net)
    }

    pub fn prefix_len(&self) -> u8 {
        self.net.prefix()
    }

    pub fn broadcast(&self) -> Ipv4Addr {
        self.net.broadcast()
    }

    /// The usable hosts, `network + 1 ..= broadcast - 1`.
    ///
    /// A `/31` or `/32` yields an empty range rather than an error.
    pub fn hosts(&self) -> HostRange {
        HostRange::usable(&self.net)
    }

    pub fn first_usable(&self) -> Option<Ipv4Addr> {
        self.hosts().first()
    }

    pub fn last_usable(&self) -> Option<Ipv4Addr> {
        self.hosts().last()
    }

    /// `2^(32 - prefix) - 2`, or zero for `/31` and `/32`.
    pub fn usable_host_count(&self) -> u64 {
        self.hosts().len()
    }
}

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network(), self.prefix_len())
    }
}

impl FromStr for Subnet {
    type Err = SubnetError;

    /// Parses CIDR notation only. Use [`normalize`] for address and mask pairs.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize(s, None)
    }
}

/// Validates and canonicalizes a subnet description.
///
/// `address` either carries a `/prefix` suffix or must be accompanied by a
/// dotted-quad `mask`. An empty mask string counts as absent.
pub fn normalize(address: &str, mask: Option<&str>) -> Result<Subnet, SubnetError> {
    let mask = mask.filter(|m| !m.is_empty());

    let (addr_text, mask) = match (address.split_once('/'), mask) {
        (Some(_), Some(_)) => return Err(SubnetError::ConflictingSubnetSpecification),
        (None, None) => return Err(SubnetError::MissingSubnetMask),
        (Some((addr_text, prefix_text)), None) => {
            let prefix = address::parse_prefix_len(prefix_text)?;
            (addr_text, SubnetMask::from_prefix_len(prefix)?)
        }
        (None, Some(mask_text)) => {
            let mask = address::parse_address(mask_text)?;
            (address, SubnetMask::from_addr(mask)?)
        }
    };

    let addr = address::parse_address(addr_text)?;
    Subnet::new(addr, mask)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_cidr() {
        let subnet = normalize("192.168.1.0/30", None).unwrap();
        assert_eq!(subnet.network(), Ipv4Addr::new(192, 168, 1, 0));
        assert_eq!(subnet.prefix_len(), 30);
        assert_eq!(subnet.broadcast(), Ipv4Addr::new(192, 168, 1, 3));

        let hosts: Vec<Ipv4Addr> = subnet.hosts().into_iter().collect();
        assert_eq!(
            hosts,
            vec![Ipv4Addr::new(192, 168, 1, 1), Ipv4Addr::new(192, 168, 1, 2)]
        );
    }

    #[test]
    fn test_normalize_address_and_mask() {
        let subnet = normalize("10.0.0.5", Some("255.255.255.0")).unwrap();
        assert_eq!(subnet.network(), Ipv4Addr::new(10, 0, 0, 0));
        assert_eq!(subnet.first_usable(), Some(Ipv4Addr::new(10, 0, 0, 1)));
        assert_eq!(subnet.last_usable(), Some(Ipv4Addr::new(10, 0, 0, 254)));
        assert_eq!(subnet.to_string(), "10.0.0.0/24");
    }

    #[test]
    fn test_normalize_clears_host_bits() {
        let subnet: Subnet = "172.16.5.77/16".parse().unwrap();
        assert_eq!(subnet.network(), Ipv4Addr::new(172, 16, 0, 0));
        assert_eq!(subnet, normalize("172.16.0.0/16", None).unwrap());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for (addr, mask) in [
            ("10.0.0.5/24", None),
            ("192.168.77.200", Some("255.255.252.0")),
            ("1.2.3.4/0", None),
            ("8.8.8.8/32", None),
            ("10.9.8.7/31", None),
        ] {
            let once = normalize(addr, mask).unwrap();
            let network = once.network().to_string();
            let mask = once.mask().to_string();
            let twice = normalize(&network, Some(&mask)).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_normalize_conflicting_input() {
        assert_eq!(
            normalize("10.0.0.0/24", Some("255.255.255.0")),
            Err(SubnetError::ConflictingSubnetSpecification)
        );
    }

    #[test]
    fn test_normalize_missing_mask() {
        assert_eq!(normalize("10.0.0.0", None), Err(SubnetError::MissingSubnetMask));
        assert_eq!(normalize("10.0.0.0", Some("")), Err(SubnetError::MissingSubnetMask));
    }

    #[test]
    fn test_normalize_propagates_parse_failures() {
        assert_eq!(
            normalize("192.168.1", Some("255.255.255.0")),
            Err(SubnetError::MalformedAddress("192.168.1".to_string()))
        );
        assert_eq!(
            normalize("192.168.1/24", None),
            Err(SubnetError::MalformedAddress("192.168.1".to_string()))
        );
        assert_eq!(
            normalize("10.0.0.0/33", None),
            Err(SubnetError::InvalidPrefixLength("33".to_string()))
        );
        assert_eq!(
            normalize("10.0.0.0/", None),
            Err(SubnetError::InvalidPrefixLength(String::new()))
        );
        assert_eq!(
            normalize("10.0.0.0", Some("255.0.255.0")),
            Err(SubnetError::NonContiguousMask(Ipv4Addr::new(255, 0, 255, 0)))
        );
        // a bare prefix length is not a dotted-quad mask
        assert_eq!(
            normalize("10.0.0.0", Some("24")),
            Err(SubnetError::MalformedAddress("24".to_string()))
        );
    }

    #[test]
    fn test_usable_host_count_by_prefix() {
        for prefix in 0..=32u32 {
            let subnet = normalize(&format!("10.20.30.40/{prefix}"), None).unwrap();
            let expected = if prefix >= 31 {
                0
            } else {
                (1u64 << (32 - prefix)) - 2
            };
            assert_eq!(subnet.usable_host_count(), expected, "prefix /{prefix}");
        }
    }

    #[test]
    fn test_small_prefixes_have_no_hosts() {
        for cidr in ["10.0.0.0/31", "10.0.0.1/31", "10.0.0.7/32", "255.255.255.255/32", "0.0.0.0/32"] {
            let subnet: Subnet = cidr.parse().unwrap();
            assert!(subnet.hosts().is_empty(), "{cidr} should have no usable hosts");
            assert_eq!(subnet.first_usable(), None);
            assert_eq!(subnet.last_usable(), None);
        }
    }

    #[test]
    fn test_whole_address_space() {
        let subnet: Subnet = "123.45.67.89/0".parse().unwrap();
        assert_eq!(subnet.network(), Ipv4Addr::UNSPECIFIED);
        assert_eq!(subnet.broadcast(), Ipv4Addr::BROADCAST);
        assert_eq!(subnet.first_usable(), Some(Ipv4Addr::new(0, 0, 0, 1)));
        assert_eq!(subnet.last_usable(), Some(Ipv4Addr::new(255, 255, 255, 254)));
    }

    #[test]
    fn test_slash_30_at_top_of_space() {
        let subnet: Subnet = "255.255.255.252/30".parse().unwrap();
        let hosts: Vec<Ipv4Addr> = subnet.hosts().into_iter().collect();
        assert_eq!(
            hosts,
            vec![Ipv4Addr::new(255, 255, 255, 253), Ipv4Addr::new(255, 255, 255, 254)]
        );
    }
}
