use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use sweepr_common::config::{Config, SweepRequest};
use sweepr_common::error::SubnetError;
use sweepr_common::network::host::HostStatus;
use sweepr_common::network::subnet::{self, Subnet};
use sweepr_common::report::{self, SortDirection, SortKey};
use sweepr_core::discovery::SweepService;
use sweepr_core::probe::ReverseResolver;
use sweepr_integration_tests::{Script, ScriptedProbe, TableResolver};
use tokio_util::sync::CancellationToken;

fn config(concurrency: usize) -> Config {
    Config {
        concurrency,
        probe_timeout: Duration::from_secs(1),
        lookup_timeout: Duration::from_millis(500),
        ..Default::default()
    }
}

fn service(probe: &Arc<ScriptedProbe>, resolver: Option<Arc<dyn ReverseResolver>>, cfg: &Config) -> SweepService {
    SweepService::with_capabilities(probe.clone(), resolver, cfg)
}

fn addr(last: u8) -> Ipv4Addr {
    Ipv4Addr::new(192, 168, 1, last)
}

#[tokio::test(start_paused = true)]
async fn sweep_reports_every_host_even_when_one_hangs() {
    let probe = Arc::new(
        ScriptedProbe::new()
            .with(addr(1), Script::Answer(Duration::from_millis(3)))
            .with(addr(2), Script::Hang)
            .with(addr(4), Script::Answer(Duration::from_millis(12))),
    );
    let resolver: Arc<dyn ReverseResolver> = Arc::new(TableResolver::new([(addr(1), "router.lan")]));
    let subnet: Subnet = "192.168.1.0/29".parse().unwrap();

    let report = service(&probe, Some(resolver), &config(10))
        .sweep(&subnet, CancellationToken::new())
        .await
        .unwrap();

    assert!(!report.cancelled);
    assert_eq!(report.results.len(), 6);
    assert_eq!(probe.probes(), 6);

    let mut records = report::to_records(&report.results);
    report::sort_records(&mut records, SortKey::Ip, SortDirection::Asc);

    let online: Vec<Ipv4Addr> = records
        .iter()
        .filter(|r| r.status == HostStatus::Online)
        .map(|r| r.ip)
        .collect();
    assert_eq!(online, vec![addr(1), addr(4)]);

    assert_eq!(records[0].hostname.as_deref(), Some("router.lan"));
    assert_eq!(records[0].response_time, Some(3.0));
    assert_eq!(records[1].ip, addr(2));
    assert_eq!(records[1].status, HostStatus::Offline);
    assert_eq!(records[1].response_time, None);
}

#[tokio::test]
async fn slash_30_probes_exactly_two_hosts() {
    let probe = Arc::new(ScriptedProbe::new().otherwise(Script::Answer(Duration::from_millis(1))));
    let subnet = subnet::normalize("192.168.1.0", Some("255.255.255.252")).unwrap();

    let report = service(&probe, None, &config(10))
        .sweep(&subnet, CancellationToken::new())
        .await
        .unwrap();

    let mut probed: Vec<Ipv4Addr> = report.results.iter().map(|r| r.address()).collect();
    probed.sort();
    assert_eq!(probed, vec![addr(1), addr(2)]);
    assert!(report.results.iter().all(|r| r.hostnames().is_empty()));
}

#[tokio::test]
async fn tiny_subnets_sweep_to_nothing_without_probing() {
    let probe = Arc::new(ScriptedProbe::new().failing_preflight("no ping here"));

    for cidr in ["10.0.0.0/31", "10.0.0.7/32"] {
        let subnet: Subnet = cidr.parse().unwrap();
        let report = service(&probe, None, &config(10))
            .sweep(&subnet, CancellationToken::new())
            .await
            .unwrap();
        assert!(report.results.is_empty(), "{cidr}");
        assert_eq!(report.discarded, 0);
    }
    assert_eq!(probe.probes(), 0);
}

#[tokio::test(start_paused = true)]
async fn full_slash_24_respects_the_concurrency_limit() {
    let probe = Arc::new(ScriptedProbe::new().otherwise(Script::Answer(Duration::from_millis(20))));
    let subnet: Subnet = "10.20.30.0/24".parse().unwrap();

    let report = service(&probe, None, &config(10))
        .sweep(&subnet, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.results.len(), 254);
    assert!(report.results.iter().all(|r| r.is_reachable()));
    assert_eq!(probe.peak_in_flight(), 10);
}

#[tokio::test(start_paused = true)]
async fn cancelling_keeps_completed_results() {
    let probe = Arc::new(
        ScriptedProbe::new()
            .with(addr(1), Script::Answer(Duration::from_millis(10)))
            .with(addr(2), Script::Answer(Duration::from_millis(20)))
            .otherwise(Script::Hang),
    );
    let cfg = Config {
        probe_timeout: Duration::from_secs(60),
        ..config(4)
    };
    let subnet: Subnet = "192.168.1.0/28".parse().unwrap();

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let report = service(&probe, None, &cfg).sweep(&subnet, cancel).await.unwrap();

    assert!(report.cancelled);
    let mut kept: Vec<Ipv4Addr> = report.results.iter().map(|r| r.address()).collect();
    kept.sort();
    assert_eq!(kept, vec![addr(1), addr(2)]);
    assert_eq!(report.discarded, 14 - 2);
}

#[tokio::test]
async fn whole_address_space_stops_at_once_when_cancelled() {
    let probe = Arc::new(ScriptedProbe::new().otherwise(Script::Hang));
    let subnet: Subnet = "0.0.0.0/0".parse().unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = service(&probe, None, &config(10)).sweep(&subnet, cancel).await.unwrap();

    assert!(report.cancelled);
    assert!(report.results.is_empty());
    assert_eq!(report.discarded, subnet.usable_host_count());
    assert_eq!(probe.probes(), 0);
}

#[tokio::test]
async fn unavailable_prober_fails_the_sweep() {
    let probe = Arc::new(ScriptedProbe::new().failing_preflight("ping binary missing"));
    let subnet: Subnet = "192.168.1.0/24".parse().unwrap();

    let err = service(&probe, None, &config(10))
        .sweep(&subnet, CancellationToken::new())
        .await
        .unwrap_err();

    assert!(format!("{err:#}").contains("ping binary missing"), "{err:#}");
    assert_eq!(probe.probes(), 0);
}

#[test]
fn malformed_request_is_rejected_before_probing() {
    let request = SweepRequest {
        address: Some("192.168.1".into()),
        mask: Some("255.255.255.0".into()),
        ..Default::default()
    };
    assert_eq!(
        request.subnet().unwrap_err(),
        SubnetError::MalformedAddress("192.168.1".into())
    );

    let request = SweepRequest {
        cidr: Some("192.168.1.0/24".into()),
        concurrency: Some(0),
        ..Default::default()
    };
    assert!(request.concurrency_limit(10).is_err());
}
