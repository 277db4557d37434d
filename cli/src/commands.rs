pub mod calc;
pub mod sweep;

use std::io::Read;

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use sweepr_common::config::SweepRequest;
use sweepr_common::report::SortKey;

#[derive(Parser)]
#[command(name = "sweepr", version)]
#[command(about = "Find the live hosts of an IPv4 subnet.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Less output (-q drops headers and the summary)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ping every usable host of a subnet and resolve the ones that answer
    #[command(alias = "s")]
    Sweep(SweepArgs),
    /// Show the network, broadcast and usable host range of a subnet
    #[command(alias = "c")]
    Calc {
        #[command(flatten)]
        subnet: SubnetArgs,
    },
}

#[derive(Args, Debug)]
pub struct SubnetArgs {
    /// CIDR such as 192.168.1.0/24, or a plain address used with --mask
    #[arg(required_unless_present = "request")]
    pub subnet: Option<String>,

    /// Dotted-quad subnet mask, e.g. 255.255.255.0
    #[arg(short, long)]
    pub mask: Option<String>,

    /// JSON request, {"cidr": ...} or {"address": ..., "mask": ...}; '-' reads stdin
    #[arg(long, conflicts_with_all = ["subnet", "mask"])]
    pub request: Option<String>,
}

impl SubnetArgs {
    pub fn to_request(&self) -> anyhow::Result<SweepRequest> {
        let Some(raw) = &self.request else {
            return Ok(SweepRequest {
                address: self.subnet.clone(),
                mask: self.mask.clone(),
                ..Default::default()
            });
        };

        let json = if raw == "-" {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading request from stdin")?;
            buf
        } else {
            raw.clone()
        };

        serde_json::from_str(&json).context("request is not a valid sweep request")
    }
}

#[derive(Args, Debug)]
pub struct SweepArgs {
    #[command(flatten)]
    pub subnet: SubnetArgs,

    /// Probes in flight at once [default: 10]
    #[arg(short, long, allow_negative_numbers = true)]
    pub concurrency: Option<i64>,

    /// Per-host ping timeout in milliseconds
    #[arg(short, long, default_value_t = 2000)]
    pub timeout: u64,

    /// Stop the whole sweep after this many seconds, keeping finished results
    #[arg(long)]
    pub scan_timeout: Option<u64>,

    /// Skip reverse-DNS lookups
    #[arg(long)]
    pub no_dns: bool,

    /// Print JSON records to stdout instead of a table
    #[arg(long)]
    pub json: bool,

    /// Only list hosts that answered
    #[arg(long)]
    pub online: bool,

    /// Column to sort by: ip, status, response-time, hostname
    #[arg(long, default_value_t = SortKey::Ip)]
    pub sort: SortKey,

    /// Sort in descending order
    #[arg(long)]
    pub desc: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
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
