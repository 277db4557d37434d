use colored::*;
use console::pad_str;
use sweepr_common::network::host::HostStatus;
use sweepr_common::report::HostRecord;

use crate::terminal::colors;

pub const IP_WIDTH: usize = 15;
pub const STATUS_WIDTH: usize = 7;
pub const RTT_WIDTH: usize = 10;

const MISSING: &str = "-";

pub fn status_cell(status: HostStatus) -> ColoredString {
    let text = pad(&status.to_string(), STATUS_WIDTH);
    match status {
        HostStatus::Online => text.color(colors::ONLINE).bold(),
        HostStatus::Offline => text.color(colors::OFFLINE),
    }
}

pub fn rtt_cell(response_time: Option<f64>) -> ColoredString {
    match response_time {
        Some(ms) => pad_right(&format!("{ms:.2} ms"), RTT_WIDTH).color(colors::ACCENT),
        None => pad_right(MISSING, RTT_WIDTH).color(colors::MISSING),
    }
}

pub fn hostname_cell(hostname: Option<&str>) -> ColoredString {
    match hostname {
        Some(name) => name.color(colors::HOSTNAME),
        None => MISSING.color(colors::MISSING),
    }
}

/// Padding happens before coloring so escape codes never count as width.
pub fn record_row(record: &HostRecord) -> String {
    let ip = pad(&record.ip.to_string(), IP_WIDTH).color(colors::IPV4_ADDR);
    format!(
        "{}  {}  {}  {}",
        ip,
        status_cell(record.status),
        rtt_cell(record.response_time),
        hostname_cell(record.hostname.as_deref())
    )
}

pub fn header_row() -> String {
    let header = format!(
        "{}  {}  {}  {}",
        pad("ADDRESS", IP_WIDTH),
        pad("STATUS", STATUS_WIDTH),
        pad_right("RTT", RTT_WIDTH),
        "HOSTNAME"
    );
    format!("{}", header.color(colors::SEPARATOR).bold())
}

fn pad(text: &str, width: usize) -> String {
    pad_str(text, width, console::Alignment::Left, None).into_owned()
}

fn pad_right(text: &str, width: usize) -> String {
    pad_str(text, width, console::Alignment::Right, None).into_owned()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
