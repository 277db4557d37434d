//! # Host Range
//!
//! The usable addresses of a subnet: everything strictly between the network
//! and the broadcast address. Ranges are `Copy` and every call to
//! [`HostRange::iter`] starts again from the first address.

use std::iter::FusedIterator;
use std::net::Ipv4Addr;

use ipnetwork::Ipv4Network;

/// A contiguous, ascending run of IPv4 addresses. May be empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HostRange {
    // half-open [start, end) so that 255.255.255.255 fits
    start: u64,
    end: u64,
}

impl HostRange {
    /// Inclusive range from `first` to `last`; empty when `first > last`.
    pub fn new(first: Ipv4Addr, last: Ipv4Addr) -> Self {
        let start = u64::from(u32::from(first));
        let end = u64::from(u32::from(last)) + 1;
        if start >= end {
            return Self::empty();
        }
        Self { start, end }
    }

    /// The addresses strictly between the network and broadcast address of
    /// `net`. Empty for `/31` and `/32`.
    pub fn usable(net: &Ipv4Network) -> Self {
        if net.prefix() > 30 {
            return Self::empty();
        }
        let start = u64::from(u32::from(net.network())) + 1;
        let end = u64::from(u32::from(net.broadcast()));
        Self { start, end }
    }

    pub fn empty() -> Self {
        Self { start: 0, end: 0 }
    }

    pub fn first(&self) -> Option<Ipv4Addr> {
        self.iter().next()
    }

    pub fn last(&self) -> Option<Ipv4Addr> {
        self.iter().next_back()
    }

    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn iter(&self) -> HostIter {
        HostIter {
            next: self.start,
            end: self.end,
        }
    }
}

impl IntoIterator for HostRange {
    type Item = Ipv4Addr;
    type IntoIter = HostIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for &HostRange {
    type Item = Ipv4Addr;
    type IntoIter = HostIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy ascending iterator over a [`HostRange`].
#[derive(Debug, Clone)]
pub struct HostIter {
    next: u64,
    end: u64,
}

impl Iterator for HostIter {
    type Item = Ipv4Addr;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let addr = Ipv4Addr::from(self.next as u32);
        self.next += 1;
        Some(addr)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end.saturating_sub(self.next);
        match usize::try_from(remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl DoubleEndedIterator for HostIter {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        self.end -= 1;
        Some(Ipv4Addr::from(self.end as u32))
    }
}

impl FusedIterator for HostIter {}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
