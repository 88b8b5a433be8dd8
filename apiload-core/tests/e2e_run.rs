use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Context as _;
use apiload_core::{HttpClient, Preflight, ProgressUpdate, RunConfig, StopReason, Timings};
use apiload_testserver::{Behavior, StatusCode, TestServer};

fn assert_consistent(outcome: &apiload_core::RunOutcome) -> anyhow::Result<()> {
    let s = &outcome.snapshot;
    anyhow::ensure!(
        s.total == s.successful + s.failed,
        "total={} successful={} failed={}",
        s.total,
        s.successful,
        s.failed
    );
    anyhow::ensure!(
        s.latencies.len() as u64 == s.total,
        "latencies={} total={}",
        s.latencies.len(),
        s.total
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn healthy_target_records_only_successes() -> anyhow::Result<()> {
    let server = TestServer::start_with(Behavior {
        latency: Duration::from_millis(10),
        fail_status: None,
    })
    .await
    .context("start test server")?;

    let cfg = RunConfig::new(server.base_url(), 1, Duration::from_secs(2))?.with_seed(Some(1));
    let outcome = apiload_core::run_load(
        &cfg,
        Arc::new(HttpClient::default()),
        None,
        std::future::pending(),
    )
    .await;

    let server_seen = server.stats().requests_total();
    let server_reads = server.stats().reads_total();
    let server_writes = server.stats().writes_total();
    let server_docs = server.stats().docs_total();
    server.shutdown().await;

    assert_consistent(&outcome)?;
    let s = &outcome.snapshot;
    anyhow::ensure!(outcome.preflight == Preflight::Ready);
    // Every request lands on exactly one handler; the probe is a docs read.
    anyhow::ensure!(
        server_reads + server_writes + server_docs == server_seen,
        "reads={server_reads} writes={server_writes} docs={server_docs} seen={server_seen}"
    );
    anyhow::ensure!(server_docs >= 1);
    anyhow::ensure!(outcome.stop_reason == StopReason::DurationElapsed);
    anyhow::ensure!(
        (4..=20).contains(&s.total),
        "expected 4..=20 requests, got {}",
        s.total
    );
    anyhow::ensure!(s.successful == s.total);
    anyhow::ensure!(s.failed == 0);
    anyhow::ensure!(outcome.workers_abandoned == 0);
    anyhow::ensure!(outcome.workers_joined == 1);
    // The probe is one extra request the server sees.
    anyhow::ensure!(server_seen == s.total + 1, "server_seen={server_seen}");

    let summary = outcome.summary(&cfg).context("summary")?;
    anyhow::ensure!(summary.success_rate_pct == 100.0);
    anyhow::ensure!(summary.throughput_rps == s.total as f64 / 2.0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unreachable_target_records_only_failures() -> anyhow::Result<()> {
    // Bind then drop to get a local port nothing listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")?.local_addr()?;

    let cfg = RunConfig::new(&format!("http://{addr}"), 2, Duration::from_secs(1))?;
    let outcome = apiload_core::run_load(
        &cfg,
        Arc::new(HttpClient::default()),
        None,
        std::future::pending(),
    )
    .await;

    assert_consistent(&outcome)?;
    let s = &outcome.snapshot;
    anyhow::ensure!(
        matches!(outcome.preflight, Preflight::Unreachable(_)),
        "preflight={:?}",
        outcome.preflight
    );
    anyhow::ensure!(s.total > 0);
    anyhow::ensure!(s.failed == s.total);
    anyhow::ensure!(s.successful == 0);

    let summary = outcome.summary(&cfg).context("summary")?;
    anyhow::ensure!(summary.success_rate_pct == 0.0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn failing_target_counts_error_statuses_as_failures() -> anyhow::Result<()> {
    let server = TestServer::start_with(Behavior {
        latency: Duration::ZERO,
        fail_status: Some(StatusCode::SERVICE_UNAVAILABLE),
    })
    .await
    .context("start test server")?;

    let cfg = RunConfig::new(server.base_url(), 2, Duration::from_secs(1))?;
    let outcome = apiload_core::run_load(
        &cfg,
        Arc::new(HttpClient::default()),
        None,
        std::future::pending(),
    )
    .await;
    server.shutdown().await;

    assert_consistent(&outcome)?;
    anyhow::ensure!(outcome.preflight == Preflight::UnexpectedStatus(503));
    anyhow::ensure!(outcome.snapshot.total > 0);
    anyhow::ensure!(outcome.snapshot.failed == outcome.snapshot.total);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn interrupt_ends_run_early_with_nominal_throughput() -> anyhow::Result<()> {
    let server = TestServer::start().await.context("start test server")?;

    let cfg = RunConfig::new(server.base_url(), 2, Duration::from_secs(300))?;
    let started = std::time::Instant::now();
    let outcome = apiload_core::run_load(
        &cfg,
        Arc::new(HttpClient::default()),
        None,
        tokio::time::sleep(Duration::from_secs(1)),
    )
    .await;
    let wall = started.elapsed();
    server.shutdown().await;

    assert_consistent(&outcome)?;
    anyhow::ensure!(outcome.stop_reason == StopReason::Interrupted);
    anyhow::ensure!(wall < Duration::from_secs(10), "run took {wall:?}");
    anyhow::ensure!(outcome.snapshot.total > 0);

    let summary = outcome.summary(&cfg).context("summary")?;
    anyhow::ensure!(summary.throughput_rps == outcome.snapshot.total as f64 / 300.0);
    anyhow::ensure!(summary.throughput_rps < 1.0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn progress_is_reported_every_interval() -> anyhow::Result<()> {
    let server = TestServer::start().await.context("start test server")?;

    let timings = Timings {
        progress_interval: Duration::from_millis(400),
        ..Timings::default()
    };
    let cfg = RunConfig::new(server.base_url(), 2, Duration::from_secs(2))?.with_timings(timings)?;

    let updates: Arc<Mutex<Vec<ProgressUpdate>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = updates.clone();
    let progress: apiload_core::ProgressFn = Arc::new(move |u| {
        if let Ok(mut v) = sink.lock() {
            v.push(u);
        }
    });

    let outcome = apiload_core::run_load(
        &cfg,
        Arc::new(HttpClient::default()),
        Some(progress),
        std::future::pending(),
    )
    .await;
    server.shutdown().await;

    let updates = updates
        .lock()
        .map_err(|_| anyhow::anyhow!("progress lock poisoned"))?
        .clone();
    anyhow::ensure!(
        (3..=5).contains(&updates.len()),
        "expected ~4 progress updates, got {}",
        updates.len()
    );
    for (i, u) in updates.iter().enumerate() {
        anyhow::ensure!(u.tick == i as u64 + 1);
        anyhow::ensure!(u.duration == Duration::from_secs(2));
        anyhow::ensure!(u.requests_successful <= u.requests_total);
        anyhow::ensure!(u.requests_total <= outcome.snapshot.total);
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn slow_target_abandons_workers_after_join_timeout() -> anyhow::Result<()> {
    let server = TestServer::start_with(Behavior {
        latency: Duration::from_secs(3),
        fail_status: None,
    })
    .await
    .context("start test server")?;

    let timings = Timings {
        probe_timeout: Duration::from_millis(200),
        join_timeout: Duration::from_millis(200),
        ..Timings::default()
    };
    let cfg = RunConfig::new(server.base_url(), 2, Duration::from_secs(1))?.with_timings(timings)?;

    let started = std::time::Instant::now();
    let outcome = apiload_core::run_load(
        &cfg,
        Arc::new(HttpClient::default()),
        None,
        std::future::pending(),
    )
    .await;
    let wall = started.elapsed();

    assert_consistent(&outcome)?;
    anyhow::ensure!(outcome.workers_abandoned == 2, "outcome={outcome:?}");
    anyhow::ensure!(outcome.snapshot.total == 0);
    anyhow::ensure!(outcome.summary(&cfg).is_none());
    anyhow::ensure!(wall < Duration::from_secs(3), "run took {wall:?}");

    drop(server);
    Ok(())
}
