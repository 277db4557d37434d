//! # Sweepr Core
//!
//! Everything that touches the network:
//!
//! * [`probe`]: the liveness and reverse-DNS capabilities the engine drives.
//! * [`network`]: implementations of those capabilities backed by the OS.
//! * [`scanner`]: the bounded-concurrency probe engine.
//! * [`discovery`]: the sweep use case, subnet in, probe results out.

pub mod discovery;
pub mod network;
pub mod probe;
pub mod scanner;
