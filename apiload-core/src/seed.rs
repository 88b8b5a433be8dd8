use std::time::Duration;

use apiload_http::{BodyShape, HttpClient, HttpRequest};
use serde::Serialize;

use super::payload::{NewCategory, NewProperty, NewUser};
use super::traffic::{DOCS_PATH, Resource};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedFailure {
    pub resource: Resource,
    pub label: String,
    /// `None` for transport errors.
    pub status: Option<u16>,
    pub error: Option<String>,
}

/// Record count of one collection after seeding, when the API returned a JSON array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedTotal {
    pub resource: Resource,
    pub count: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub created: Vec<(Resource, String)>,
    pub failed: Vec<SeedFailure>,
    pub totals: Vec<SeedTotal>,
}

impl SeedReport {
    pub fn all_created(&self) -> bool {
        self.failed.is_empty()
    }
}

fn users() -> Vec<NewUser> {
    [
        ("Ivan Petrenko", "ivan@example.com", "+380501234567"),
        ("Maria Kovalenko", "maria@example.com", "+380502345678"),
        ("Oleksii Shevchenko", "oleksiy@example.com", "+380503456789"),
    ]
    .into_iter()
    .map(|(name, email, phone)| NewUser {
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
    })
    .collect()
}

fn categories() -> Vec<NewCategory> {
    [
        ("Electronics", "Electronic devices and gadgets"),
        ("Furniture", "Home and office furniture"),
        ("Clothing", "Men's and women's clothing"),
    ]
    .into_iter()
    .map(|(name, description)| NewCategory {
        name: name.to_string(),
        description: description.to_string(),
    })
    .collect()
}

fn properties() -> Vec<NewProperty> {
    [
        ("iPhone 15", 45000.00, "Brand new iPhone 15", 1),
        ("MacBook Pro", 85000.00, "MacBook Pro M3", 1),
        ("Office desk", 3500.00, "Ergonomic office desk", 2),
        ("Winter jacket", 2500.00, "Warm winter jacket", 3),
    ]
    .into_iter()
    .map(|(name, price, description, owner_id)| NewProperty {
        name: name.to_string(),
        price,
        description: description.to_string(),
        owner_id,
    })
    .collect()
}

/// Populate the API with a fixed set of users, categories and properties, then count
/// what each collection holds. Individual failures are recorded, never fatal.
pub async fn seed(client: &HttpClient, base_url: &str, timeout: Duration) -> SeedReport {
    let base_url = base_url.trim_end_matches('/');
    let mut report = SeedReport::default();

    tracing::info!("seeding {base_url}");

    for u in users() {
        create(client, base_url, timeout, Resource::Users, &u.name, &u, &mut report).await;
    }
    for c in categories() {
        create(client, base_url, timeout, Resource::Categories, &c.name, &c, &mut report).await;
    }
    for p in properties() {
        create(client, base_url, timeout, Resource::Properties, &p.name, &p, &mut report).await;
    }

    tracing::info!("done, browse {base_url}{DOCS_PATH}");

    for resource in [Resource::Users, Resource::Categories, Resource::Properties] {
        let url = format!("{base_url}{}", resource.path());
        let count = match client
            .request(HttpRequest::get_owned(url).with_timeout(timeout))
            .await
        {
            Ok(res) if res.status == 200 => match res.json_shape() {
                BodyShape::List(n) => {
                    tracing::info!("{resource}: {n} records");
                    Some(n)
                }
                _ => {
                    tracing::info!("{resource}: ? records");
                    None
                }
            },
            Ok(res) => {
                tracing::warn!("{resource}: status {}", res.status);
                None
            }
            Err(err) => {
                tracing::error!("{resource}: {err}");
                None
            }
        };
        report.totals.push(SeedTotal { resource, count });
    }

    report
}

async fn create<T: Serialize>(
    client: &HttpClient,
    base_url: &str,
    timeout: Duration,
    resource: Resource,
    label: &str,
    body: &T,
    report: &mut SeedReport,
) {
    let url = format!("{base_url}{}", resource.path());
    let result = match HttpRequest::post_json(&url, body) {
        Ok(req) => client.request(req.with_timeout(timeout)).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(res) if matches!(res.status, 200 | 201) => {
            tracing::info!("{resource}: added {label}");
            report.created.push((resource, label.to_string()));
        }
        Ok(res) => {
            tracing::warn!("{resource}: could not add {label}: status {}", res.status);
            report.failed.push(SeedFailure {
                resource,
                label: label.to_string(),
                status: Some(res.status),
                error: None,
            });
        }
        Err(err) => {
            tracing::error!("{resource}: could not add {label}: {err}");
            report.failed.push(SeedFailure {
                resource,
                label: label.to_string(),
                status: None,
                error: Some(err.to_string()),
            });
        }
    }
}
