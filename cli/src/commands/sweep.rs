use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;
use sweepr_common::config::{Config, DEFAULT_CONCURRENCY};
use sweepr_common::network::host::{HostStatus, ProbeResult};
use sweepr_common::network::subnet::Subnet;
use sweepr_common::report::{self, HostRecord, SortDirection};
use sweepr_core::discovery;
use sweepr_core::scanner::ResultCallback;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::commands::SweepArgs;
use crate::mprint;
use crate::terminal::{colors, format, print, spinner};

pub async fn sweep(args: SweepArgs, quiet: u8) -> anyhow::Result<()> {
    let mut request = args.subnet.to_request()?;
    if args.concurrency.is_some() {
        request.concurrency = args.concurrency;
    }
    let subnet = request.subnet()?;
    let concurrency = request.concurrency_limit(DEFAULT_CONCURRENCY)?;

    let cfg = Config {
        concurrency,
        probe_timeout: Duration::from_millis(args.timeout),
        scan_timeout: args.scan_timeout.map(Duration::from_secs),
        no_dns: args.no_dns,
        quiet,
        ..Default::default()
    };
    debug!(?cfg, "sweep configuration");

    print::header(&format!("sweeping {subnet}"), quiet);

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    spinner::start(quiet > 0 || args.json);
    let total = usize::try_from(subnet.usable_host_count()).unwrap_or(usize::MAX);

    let start_time = Instant::now();
    let outcome = discovery::perform_sweep(&subnet, &cfg, cancel, Some(progress_callback(total))).await;
    spinner::finish();
    let report = outcome.with_context(|| format!("sweep of {subnet} failed"))?;

    if report.cancelled {
        warn!(
            "sweep stopped early, {} hosts were not probed",
            report.discarded
        );
    }

    let mut records = report::to_records(&report.results);
    if args.online {
        records.retain(|record| record.status == HostStatus::Online);
    }
    let direction = if args.desc { SortDirection::Desc } else { SortDirection::Asc };
    report::sort_records(&mut records, args.sort, direction);

    if args.json {
        let json = serde_json::to_string_pretty(&records).context("serializing sweep results")?;
        println!("{json}");
        return Ok(());
    }

    sweep_ends(&subnet, &records, start_time.elapsed(), quiet);
    Ok(())
}

fn progress_callback(total: usize) -> ResultCallback {
    let done = Arc::new(AtomicUsize::new(0));
    let online = Arc::new(AtomicUsize::new(0));
    Arc::new(move |result: &ProbeResult| {
        let done = done.fetch_add(1, Ordering::Relaxed) + 1;
        let online = match result.is_reachable() {
            true => online.fetch_add(1, Ordering::Relaxed) + 1,
            false => online.load(Ordering::Relaxed),
        };
        spinner::report_sweep_progress(done, total, online);
    })
}

fn sweep_ends(subnet: &Subnet, records: &[HostRecord], total_time: Duration, quiet: u8) {
    if records.is_empty() {
        print::header("zero hosts to show", quiet);
        if quiet == 0 {
            print::no_results();
        }
        return;
    }

    print::header("sweep results", quiet);
    if quiet < 2 {
        print::print(&format::header_row());
    }
    for record in records {
        print::print(&format::record_row(record));
    }
    print_summary(subnet, records, total_time, quiet);
}

fn print_summary(subnet: &Subnet, records: &[HostRecord], total_time: Duration, quiet: u8) {
    let online = records
        .iter()
        .filter(|record| record.status == HostStatus::Online)
        .count();
    let online: ColoredString = format!("{online} online").bold().green();
    let shown = format!("{} listed", records.len()).bold();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output = format!("Sweep of {subnet} complete: {online} of {shown} in {total_time}")
        .color(colors::TEXT_DEFAULT);

    match quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output.to_string());
        }
        1 => {
            mprint!();
            print::print(&output.to_string());
        }
        _ => {}
    }
}
