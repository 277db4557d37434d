use colored::*;
use sweepr_common::network::address::format_address;
use sweepr_common::network::subnet::Subnet;

use crate::commands::SubnetArgs;
use crate::terminal::{colors, print};

const KEY_WIDTH: usize = 12;

pub fn calc(args: SubnetArgs, quiet: u8) -> anyhow::Result<()> {
    let subnet = args.to_request()?.subnet()?;

    print::header("subnet calculator", quiet);
    for (key, value) in describe(&subnet) {
        print::aligned_line(key, KEY_WIDTH, value);
    }
    Ok(())
}

fn describe(subnet: &Subnet) -> Vec<(&'static str, ColoredString)> {
    let none = || "none".color(colors::MISSING);
    let addr = |ip| format_address(ip).color(colors::IPV4_ADDR);

    vec![
        ("Network", addr(subnet.network())),
        ("Netmask", addr(subnet.mask().to_addr())),
        ("Prefix", format!("/{}", subnet.prefix_len()).color(colors::IPV4_PREFIX)),
        ("Broadcast", addr(subnet.broadcast())),
        ("First host", subnet.first_usable().map_or_else(none, addr)),
        ("Last host", subnet.last_usable().map_or_else(none, addr)),
        ("Usable hosts", subnet.usable_host_count().to_string().color(colors::ACCENT)),
    ]
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
