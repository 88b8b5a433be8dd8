use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use apiload_http::{HttpClient, HttpRequest};
use rand::SeedableRng as _;
use rand::rngs::StdRng;
use tokio::time::MissedTickBehavior;

use super::config::RunConfig;
use super::progress::{ProgressFn, ProgressUpdate};
use super::stats::{RunStats, StatsSnapshot};
use super::stop::StopSignal;
use super::summary::Summary;
use super::traffic::{DOCS_PATH, TrafficMix};
use super::worker::{WorkerContext, run_worker};

/// Result of the liveness probe issued before a run. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preflight {
    Ready,
    UnexpectedStatus(u16),
    Unreachable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum StopReason {
    DurationElapsed,
    Interrupted,
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub preflight: Preflight,
    pub stop_reason: StopReason,
    /// Wall time from spawning the workers to the end of the join phase.
    pub elapsed: Duration,
    pub workers_joined: u64,
    /// Workers still running after the join timeout. Their later requests are not reported.
    pub workers_abandoned: u64,
    pub snapshot: StatsSnapshot,
}

impl RunOutcome {
    pub fn summary(&self, cfg: &RunConfig) -> Option<Summary> {
        Summary::from_snapshot(&self.snapshot, cfg.duration())
    }
}

/// `GET /api/docs/` with a bounded timeout.
pub async fn preflight(client: &HttpClient, base_url: &str, timeout: Duration) -> Preflight {
    let req = HttpRequest::get_owned(format!("{base_url}{DOCS_PATH}")).with_timeout(timeout);
    match client.request(req).await {
        Ok(res) if res.status == 200 => {
            tracing::info!("API is reachable, starting the run");
            Preflight::Ready
        }
        Ok(res) => {
            tracing::warn!(status = res.status, "API answered the probe with a non-200 status");
            Preflight::UnexpectedStatus(res.status)
        }
        Err(err) => {
            tracing::error!("failed to reach the API: {err}");
            tracing::warn!("continuing the run anyway");
            Preflight::Unreachable(err.to_string())
        }
    }
}

/// Drive one load run: probe, spawn workers, report progress, stop on deadline or when
/// `shutdown` resolves, then join the workers with a bounded timeout.
pub async fn run_load<S>(
    cfg: &RunConfig,
    client: Arc<HttpClient>,
    progress: Option<ProgressFn>,
    shutdown: S,
) -> RunOutcome
where
    S: Future<Output = ()>,
{
    let timings = *cfg.timings();

    tracing::info!("starting load test against {}", cfg.base_url());
    tracing::info!(
        "parameters: {} workers, duration {}s",
        cfg.workers(),
        cfg.duration().as_secs()
    );

    let preflight = preflight(&client, cfg.base_url(), timings.probe_timeout).await;

    let stats = Arc::new(RunStats::new());
    let stop = Arc::new(StopSignal::new());
    let mix = Arc::new(TrafficMix::standard());
    let base_url: Arc<str> = Arc::from(cfg.base_url());

    let mut handles = Vec::with_capacity(usize::try_from(cfg.workers()).unwrap_or(0));
    for id in 0..cfg.workers() {
        let rng = match cfg.seed() {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(id)),
            None => StdRng::from_os_rng(),
        };
        let ctx = WorkerContext {
            id,
            base_url: base_url.clone(),
            client: client.clone(),
            stats: stats.clone(),
            stop: stop.clone(),
            mix: mix.clone(),
            request_timeout: timings.request_timeout,
            think_time: (timings.think_time_min, timings.think_time_max),
            rng,
        };
        handles.push(tokio::spawn(run_worker(ctx)));
    }

    let started = Instant::now();
    let deadline = tokio::time::Instant::now() + cfg.duration();

    let mut ticker = tokio::time::interval_at(
        tokio::time::Instant::now() + timings.progress_interval,
        timings.progress_interval,
    );
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tokio::pin!(shutdown);
    let mut tick = 0u64;

    let stop_reason = loop {
        tokio::select! {
            _ = tokio::time::sleep_until(deadline) => break StopReason::DurationElapsed,
            _ = &mut shutdown => {
                tracing::warn!("interrupt received, finishing the run");
                break StopReason::Interrupted;
            }
            _ = ticker.tick() => {
                tick += 1;
                let (requests_total, requests_successful) = stats.counts();
                let update = ProgressUpdate {
                    tick,
                    elapsed: started.elapsed(),
                    duration: cfg.duration(),
                    requests_total,
                    requests_successful,
                };
                if let Some(p) = &progress {
                    (p)(update);
                }
            }
        }
    };

    stop.raise();
    tracing::info!("waiting for workers to finish");

    let mut workers_joined = 0u64;
    let mut workers_abandoned = 0u64;
    for handle in handles {
        match tokio::time::timeout(timings.join_timeout, handle).await {
            Ok(Ok(_)) => workers_joined += 1,
            Ok(Err(err)) => {
                tracing::warn!("worker task failed: {err}");
                workers_joined += 1;
            }
            // Dropping the handle detaches the task; it ends with the runtime.
            Err(_) => workers_abandoned += 1,
        }
    }
    if workers_abandoned > 0 {
        tracing::warn!(
            workers_abandoned,
            "some workers did not stop within {:?}",
            timings.join_timeout
        );
    }

    RunOutcome {
        preflight,
        stop_reason,
        elapsed: started.elapsed(),
        workers_joined,
        workers_abandoned,
        snapshot: stats.snapshot(),
    }
}
