use std::time::Duration;

use apiload_http::HttpRequest;
use rand::Rng;
use rand::seq::IndexedRandom as _;

use super::payload::{NewCategory, NewProperty, NewUser};

/// Documentation endpoint; doubles as the liveness probe.
pub const DOCS_PATH: &str = "/api/docs/";

/// Probability that an iteration issues a read rather than a write.
const READ_PROBABILITY: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Resource {
    Users,
    Categories,
    Properties,
    PropertyCategories,
}

impl Resource {
    pub fn path(self) -> &'static str {
        match self {
            Self::Users => "/api/users",
            Self::Categories => "/api/categories",
            Self::Properties => "/api/properties",
            Self::PropertyCategories => "/api/property_categories",
        }
    }
}

/// Collections the load mix writes to. Property/category links are only ever read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Writable {
    Users,
    Categories,
    Properties,
}

impl Writable {
    pub fn resource(self) -> Resource {
        match self {
            Self::Users => Resource::Users,
            Self::Categories => Resource::Categories,
            Self::Properties => Resource::Properties,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `GET` on a resource collection.
    List(Resource),
    /// `GET /api/docs/`.
    Docs,
    /// `POST` of a freshly generated record.
    Create(Writable),
}

impl Operation {
    pub fn is_write(self) -> bool {
        matches!(self, Self::Create(_))
    }

    pub fn method(self) -> &'static str {
        if self.is_write() { "POST" } else { "GET" }
    }

    pub fn path(self) -> &'static str {
        match self {
            Self::List(r) => r.path(),
            Self::Create(w) => w.resource().path(),
            Self::Docs => DOCS_PATH,
        }
    }

    /// Build the HTTP request for this operation, generating a payload for writes.
    pub fn request<R: Rng>(
        self,
        base_url: &str,
        rng: &mut R,
        timeout: Duration,
    ) -> apiload_http::Result<HttpRequest> {
        let url = format!("{base_url}{}", self.path());
        let req = match self {
            Self::List(_) | Self::Docs => HttpRequest::get_owned(url),
            Self::Create(Writable::Users) => HttpRequest::post_json(&url, &NewUser::random(rng))?,
            Self::Create(Writable::Categories) => {
                HttpRequest::post_json(&url, &NewCategory::random(rng))?
            }
            Self::Create(Writable::Properties) => {
                HttpRequest::post_json(&url, &NewProperty::random(rng))?
            }
        };
        Ok(req.with_timeout(timeout))
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}

/// Weighted choice between read and write operations.
#[derive(Debug, Clone)]
pub struct TrafficMix {
    reads: Vec<Operation>,
    writes: Vec<Operation>,
    read_probability: f64,
}

impl TrafficMix {
    /// Reads on every collection plus the docs page; writes of users, categories, properties.
    pub fn standard() -> Self {
        Self {
            reads: vec![
                Operation::List(Resource::Users),
                Operation::List(Resource::Categories),
                Operation::List(Resource::Properties),
                Operation::List(Resource::PropertyCategories),
                Operation::Docs,
            ],
            writes: vec![
                Operation::Create(Writable::Users),
                Operation::Create(Writable::Categories),
                Operation::Create(Writable::Properties),
            ],
            read_probability: READ_PROBABILITY,
        }
    }

    pub fn reads(&self) -> &[Operation] {
        &self.reads
    }

    pub fn writes(&self) -> &[Operation] {
        &self.writes
    }

    pub fn pick<R: Rng>(&self, rng: &mut R) -> Operation {
        let pool = if rng.random_bool(self.read_probability) {
            &self.reads
        } else {
            &self.writes
        };
        pool.choose(rng).copied().unwrap_or(Operation::Docs)
    }
}

impl Default for TrafficMix {
    fn default() -> Self {
        Self::standard()
    }
}
