mod config;
mod error;
mod payload;
mod progress;
mod runner;
mod seed;
mod stats;
mod stop;
mod summary;
mod traffic;
mod worker;

pub mod report;

pub use apiload_http::{BodyShape, HttpClient, HttpRequest, HttpResponse};
pub use config::{RunConfig, Timings};
pub use error::{Error, Result};
pub use payload::{NewCategory, NewProperty, NewUser};
pub use progress::{ProgressFn, ProgressUpdate};
pub use runner::{Preflight, RunOutcome, StopReason, preflight, run_load};
pub use seed::{SeedFailure, SeedReport, SeedTotal, seed};
pub use stats::{RequestOutcome, RunStats, StatsSnapshot};
pub use stop::StopSignal;
pub use summary::Summary;
pub use traffic::{DOCS_PATH, Operation, Resource, TrafficMix, Writable};
