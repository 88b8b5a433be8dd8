use std::sync::Arc;
use std::time::{Duration, Instant};

use apiload_http::HttpClient;
use rand::Rng;
use rand::rngs::StdRng;

use super::stats::{RequestOutcome, RunStats};
use super::stop::StopSignal;
use super::traffic::TrafficMix;

/// Every n-th request of a worker is logged at debug level.
const LOG_EVERY: u64 = 10;

pub(crate) struct WorkerContext {
    pub id: u64,
    pub base_url: Arc<str>,
    pub client: Arc<HttpClient>,
    pub stats: Arc<RunStats>,
    pub stop: Arc<StopSignal>,
    pub mix: Arc<TrafficMix>,
    pub request_timeout: Duration,
    pub think_time: (Duration, Duration),
    pub rng: StdRng,
}

/// Issue randomized requests until the stop signal is raised. Returns the number of
/// requests this worker issued.
///
/// Request errors never end the loop; they are recorded as failures. A raised stop signal
/// cuts the think-time pause short but never an in-flight request.
pub(crate) async fn run_worker(mut ctx: WorkerContext) -> u64 {
    tracing::debug!(worker = ctx.id, "worker started");

    let mut requests = 0u64;
    while !ctx.stop.is_raised() {
        let op = ctx.mix.pick(&mut ctx.rng);

        let started = Instant::now();
        let result = match op.request(&ctx.base_url, &mut ctx.rng, ctx.request_timeout) {
            Ok(req) => ctx.client.request(req).await,
            Err(err) => Err(err),
        };
        let elapsed = started.elapsed();

        let outcome = match &result {
            Ok(res) => RequestOutcome::completed(res.status, elapsed),
            Err(_) => RequestOutcome::transport_failure(elapsed),
        };
        ctx.stats.record(outcome);
        requests += 1;

        if requests.is_multiple_of(LOG_EVERY) {
            match &result {
                Ok(res) => tracing::debug!(
                    worker = ctx.id,
                    requests,
                    "{op}: status {} in {:.3}s",
                    res.status,
                    elapsed.as_secs_f64()
                ),
                Err(err) => tracing::debug!(
                    worker = ctx.id,
                    requests,
                    "{op}: FAILED ({}) in {:.3}s",
                    err.transport_error_kind(),
                    elapsed.as_secs_f64()
                ),
            }
        }

        let (min, max) = ctx.think_time;
        let pause = if max > min {
            ctx.rng.random_range(min..=max)
        } else {
            min
        };
        tokio::select! {
            _ = tokio::time::sleep(pause) => {}
            _ = ctx.stop.wait() => {}
        }
    }

    tracing::info!(worker = ctx.id, requests, "worker finished");
    requests
}
