//! End-to-end exporter tests.
//!
//! Wires config loading, real TCP probes, the registry, and the
//! `/metrics` router together the way the daemon does.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower::ServiceExt;

use tcpcheck_api::build_router;
use tcpcheck_core::load_targets;
use tcpcheck_health::{CheckScheduler, TcpProber};
use tcpcheck_metrics::MetricsRegistry;

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

/// A port nothing is listening on.
async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

async fn scrape(registry: MetricsRegistry) -> String {
    let req = Request::builder()
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();
    let resp = build_router(registry).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn one_cycle_exports_up_and_down_targets() {
    let open = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let open_port = open.local_addr().unwrap().port();
    let dead_port = closed_port().await;

    let config = write_config(&format!(
        "targets:\n  - host: 127.0.0.1\n    port: {dead_port}\n  - host: 127.0.0.1\n    port: {open_port}\n    env: staging\n    alias: local\n"
    ));
    let targets = load_targets(config.path());
    assert_eq!(targets.len(), 2);

    let registry = MetricsRegistry::new();
    let scheduler = CheckScheduler::new(
        targets,
        TcpProber::new(Duration::from_secs(2)),
        registry.clone(),
        Duration::from_secs(30),
    );

    let report = scheduler.run_cycle().await;
    assert_eq!(report.up_count(), 1);
    assert_eq!(report.down_count(), 1);

    let body = scrape(registry).await;
    assert!(body.contains(&format!(
        "tcp_endpoint_up{{host=\"127.0.0.1\",port=\"{dead_port}\",env=\"default\",alias=\"127.0.0.1\"}} 0"
    )));
    assert!(body.contains(&format!(
        "tcp_endpoint_up{{host=\"127.0.0.1\",port=\"{open_port}\",env=\"staging\",alias=\"local\"}} 1"
    )));
}

#[tokio::test]
async fn invalid_port_target_is_down_while_siblings_stay_up() {
    let open = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let open_port = open.local_addr().unwrap().port();

    let config = write_config(&format!(
        "targets:\n  - host: 127.0.0.1\n    port: {open_port}\n  - host: 127.0.0.1\n    port: -1\n    alias: typo\n"
    ));
    let targets = load_targets(config.path());
    assert_eq!(targets.len(), 2);

    let registry = MetricsRegistry::new();
    let scheduler = CheckScheduler::new(
        targets,
        TcpProber::new(Duration::from_secs(2)),
        registry.clone(),
        Duration::from_secs(30),
    );

    let report = scheduler.run_cycle().await;
    assert_eq!(report.up_count(), 1);
    assert_eq!(report.down_count(), 1);

    let body = scrape(registry).await;
    assert!(body.contains(
        "tcp_endpoint_up{host=\"127.0.0.1\",port=\"-1\",env=\"default\",alias=\"typo\"} 0"
    ));
    assert!(body.contains(&format!(
        "tcp_endpoint_up{{host=\"127.0.0.1\",port=\"{open_port}\",env=\"default\",alias=\"127.0.0.1\"}} 1"
    )));
}

#[tokio::test]
async fn status_flips_when_endpoint_goes_away() {
    let open = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = open.local_addr().unwrap().port();

    let config = write_config(&format!("targets:\n  - host: 127.0.0.1\n    port: {port}\n"));
    let registry = MetricsRegistry::new();
    let scheduler = CheckScheduler::new(
        load_targets(config.path()),
        TcpProber::new(Duration::from_secs(2)),
        registry.clone(),
        Duration::from_secs(30),
    );

    scheduler.run_cycle().await;
    let labels = scheduler.targets()[0].labels();
    assert_eq!(registry.get(&labels).await, Some(1.0));

    drop(open);
    scheduler.run_cycle().await;
    assert_eq!(registry.get(&labels).await, Some(0.0));
    assert_eq!(registry.len().await, 1);
}

#[tokio::test]
async fn missing_config_exports_only_the_default_target_labels() {
    let dir = tempfile::tempdir().unwrap();
    let targets = load_targets(&dir.path().join("config.yml"));

    assert_eq!(targets.len(), 1);
    assert_eq!(
        targets[0].labels().values(),
        ["google.com", "443", "default", "google.com"]
    );
}

#[tokio::test]
async fn empty_scrape_still_declares_the_gauge() {
    let body = scrape(MetricsRegistry::new()).await;
    assert!(body.contains("# HELP tcp_endpoint_up"));
    assert!(body.contains("# TYPE tcp_endpoint_up gauge"));
    assert!(!body.contains("tcp_endpoint_up{"));
}

#[tokio::test]
async fn background_loop_publishes_then_stops_on_shutdown() {
    let open = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = open.local_addr().unwrap().port();

    let config = write_config(&format!("targets:\n  - host: 127.0.0.1\n    port: {port}\n"));
    let registry = MetricsRegistry::new();
    let scheduler = Arc::new(CheckScheduler::new(
        load_targets(config.path()),
        TcpProber::new(Duration::from_secs(2)),
        registry.clone(),
        Duration::from_secs(3600),
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let runner = Arc::clone(&scheduler);
    let handle = tokio::spawn(async move { runner.run(shutdown_rx).await });

    let mut published = false;
    for _ in 0..100 {
        if !registry.is_empty().await {
            published = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(published, "first cycle should run immediately");

    shutdown_tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("scheduler should stop promptly")
        .unwrap();
}
