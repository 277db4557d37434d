//! # Sweepr Common
//!
//! Pure building blocks shared by the probe engine and the command line:
//!
//! * [`network`]: IPv4 arithmetic, subnet normalization and host range enumeration.
//! * [`error`]: the validation taxonomy raised before any probing starts.
//! * [`config`]: sweep settings and the request shape accepted at the boundary.
//! * [`report`]: boundary records and the column sorting used to present results.
//!
//! Nothing in this crate performs I/O.

pub mod config;
pub mod error;
pub mod network;
pub mod report;
