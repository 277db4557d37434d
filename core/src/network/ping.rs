//! Liveness probing through the operating system's `ping` binary.
//!
//! Works without raw-socket privileges because the setuid (or capability
//! enabled) `ping` does the ICMP work. One child process per address.

use std::io::ErrorKind;
use std::net::Ipv4Addr;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::trace;

use crate::probe::{Liveness, LivenessProbe, ProbeError};

const DEFAULT_PROGRAM: &str = "ping";

#[derive(Debug, Clone)]
pub struct SystemPing {
    program: String,
}

impl Default for SystemPing {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemPing {
    pub fn new() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
        }
    }

    /// Uses a different binary, e.g. an absolute path or `ping4`.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, addr: Ipv4Addr, timeout: Duration) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(count_and_timeout_args(timeout))
            .arg(addr.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl LivenessProbe for SystemPing {
    async fn probe(&self, addr: Ipv4Addr, timeout: Duration) -> Result<Liveness, ProbeError> {
        let started = Instant::now();
        let status = self
            .command(addr, timeout)
            .status()
            .await
            .map_err(|e| spawn_error(&self.program, e))?;
        let elapsed = started.elapsed();

        trace!(%addr, ?status, ?elapsed, "ping exited");
        if status.success() {
            Ok(Liveness::Reachable { rtt: elapsed })
        } else {
            Ok(Liveness::Unreachable)
        }
    }

    async fn preflight(&self) -> Result<(), ProbeError> {
        // Only spawning matters here, loopback not answering is fine.
        self.command(Ipv4Addr::LOCALHOST, Duration::from_secs(1))
            .status()
            .await
            .map(|_| ())
            .map_err(|e| spawn_error(&self.program, e))
    }
}

fn spawn_error(program: &str, err: std::io::Error) -> ProbeError {
    match err.kind() {
        ErrorKind::NotFound => ProbeError::Unavailable(format!("'{program}' was not found in PATH")),
        ErrorKind::PermissionDenied => {
            ProbeError::Unavailable(format!("not permitted to execute '{program}'"))
        }
        _ => ProbeError::Io(err),
    }
}

/// Whole seconds, rounded up, never below one.
fn timeout_secs(timeout: Duration) -> u64 {
    let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
    millis.div_ceil(1000).max(1)
}

#[cfg(target_os = "windows")]
fn count_and_timeout_args(timeout: Duration) -> Vec<String> {
    let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX).max(1);
    vec!["-n".into(), "1".into(), "-w".into(), millis.to_string()]
}

#[cfg(any(target_os = "macos", target_os = "freebsd"))]
fn count_and_timeout_args(timeout: Duration) -> Vec<String> {
    vec!["-c".into(), "1".into(), "-t".into(), timeout_secs(timeout).to_string()]
}

#[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "freebsd")))]
fn count_and_timeout_args(timeout: Duration) -> Vec<String> {
    vec!["-c".into(), "1".into(), "-W".into(), timeout_secs(timeout).to_string()]
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
