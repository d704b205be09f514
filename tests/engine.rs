//! End-to-end tests against real HTTP backends on localhost.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::join_all;
use statusd::config::{HostConfig, StatusConfig};
use statusd::lifecycle::startup::build_cache_with;
use statusd::probe::{Coordinator, HostSpec, HttpTransport, Prober, Strategy, StrategyKind, Verdict};
use statusd::{Shutdown, StatusServer};

mod common;
use common::{start_backend, Reply};

fn transport() -> Arc<HttpTransport> {
    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap();
    Arc::new(HttpTransport::from_client(client))
}

fn prober(timeout: Duration) -> Prober {
    Prober::new(transport(), timeout)
}

#[tokio::test]
async fn test_strategies_over_http() {
    let backend = start_backend(|_, path| match path {
        "/profile" => Reply::json(200, r#"{"id":"853c","name":"jeb_"}"#),
        "/manifest" => Reply::json(200, r#"{"version":2,"files":["a","b"]}"#),
        "/page" => Reply {
            content_type: Some("text/html"),
            body: "<html></html>".into(),
            ..Reply::status(200)
        },
        "/broken" => Reply::status(500),
        _ => Reply::status(404),
    })
    .await;

    let hosts = vec![
        HostSpec::new(
            "name-ok",
            Strategy::NameMatch {
                url: backend.url("/profile"),
                expected: Some("jeb_".into()),
            },
        ),
        HostSpec::new(
            "name-case",
            Strategy::NameMatch {
                url: backend.url("/profile"),
                expected: Some("Jeb_".into()),
            },
        ),
        HostSpec::new(
            "manifest",
            Strategy::ExactJsonMatch {
                url: backend.url("/manifest"),
                reference: Some(Arc::new(serde_json::json!({"files": ["a", "b"], "version": 2}))),
            },
        ),
        HostSpec::new("html", Strategy::AnyJson { url: backend.url("/page") }),
        HostSpec::new("page-ok", Strategy::UrlOk { url: backend.url("/page") }),
        HostSpec::new("broken", Strategy::UrlOk { url: backend.url("/broken") }),
    ];

    let snapshot = Coordinator::new(hosts, prober(Duration::from_secs(2))).refresh().await;

    let verdicts: Vec<(&str, Verdict)> = snapshot
        .entries()
        .iter()
        .map(|(host, verdict)| (host.as_str(), *verdict))
        .collect();
    assert_eq!(
        verdicts,
        vec![
            ("name-ok", Verdict::Green),
            ("name-case", Verdict::Red),
            ("manifest", Verdict::Green),
            ("html", Verdict::Red),
            ("page-ok", Verdict::Green),
            ("broken", Verdict::Red),
        ]
    );
}

#[tokio::test]
async fn test_unreachable_and_slow_hosts_are_isolated() {
    let backend = start_backend(|_, path| match path {
        "/slow" => Reply::status(200).delayed(Duration::from_secs(5)),
        _ => Reply::status(200),
    })
    .await;
    let closed = common::closed_port().await;

    let timeout = Duration::from_millis(300);
    let hosts = vec![
        HostSpec::new("slow", Strategy::UrlOk { url: backend.url("/slow") }),
        HostSpec::new("closed", Strategy::UrlOk { url: format!("http://{}/", closed) }),
        HostSpec::new("fast", Strategy::UrlOk { url: backend.url("/fast") }),
    ];

    let started = Instant::now();
    let snapshot = Coordinator::new(hosts, prober(timeout)).refresh().await;

    assert_eq!(snapshot.verdict("slow"), Some(Verdict::Red));
    assert_eq!(snapshot.verdict("closed"), Some(Verdict::Red));
    assert_eq!(snapshot.verdict("fast"), Some(Verdict::Green));
    assert!(
        started.elapsed() < timeout + Duration::from_millis(500),
        "refresh took {:?}",
        started.elapsed()
    );
}

#[tokio::test]
async fn test_service_coalesces_concurrent_readers() {
    let backend = start_backend(|_, path| match path {
        "/profile" => Reply::json(200, r#"{"name":"jeb_"}"#).delayed(Duration::from_millis(150)),
        _ => Reply::status(200).delayed(Duration::from_millis(150)),
    })
    .await;

    let reference_dir = std::env::temp_dir().join(format!("statusd-engine-{}", std::process::id()));
    std::fs::create_dir_all(&reference_dir).unwrap();

    let config = StatusConfig {
        hosts: vec![
            HostConfig::with_url("health", StrategyKind::UrlOk, backend.url("/health")),
            HostConfig {
                expected_name: Some("jeb_".into()),
                ..HostConfig::with_url("profile", StrategyKind::NameMatch, backend.url("/profile"))
            },
            HostConfig {
                reference_file: Some("missing.json".into()),
                ..HostConfig::with_url("manifest", StrategyKind::ExactJsonMatch, backend.url("/manifest"))
            },
        ],
        ..Default::default()
    };
    let cache = build_cache_with(&config, Path::new(&reference_dir), transport());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = StatusServer::new(cache.clone(), &config.listener);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let url = format!("http://{}/status", addr);
    let requests = (0..20).map(|_| {
        let client = client.clone();
        let url = url.clone();
        async move { client.get(&url).send().await.unwrap().text().await.unwrap() }
    });
    let bodies = join_all(requests).await;

    let expected = r#"[{"health":"green"},{"profile":"green"},{"manifest":"red"}]"#;
    for body in &bodies {
        assert_eq!(body, expected);
    }
    // One refresh: one request per host, however many readers arrived.
    assert_eq!(backend.hits(), 3);
    assert_eq!(cache.refresh_count(), 1);

    // Still within TTL: served from cache.
    let again = client.get(&url).send().await.unwrap().text().await.unwrap();
    assert_eq!(again, expected);
    assert_eq!(backend.hits(), 3);

    shutdown.trigger();
    std::fs::remove_dir_all(reference_dir).unwrap_or_default();
}
