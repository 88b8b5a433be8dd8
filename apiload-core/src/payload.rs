use rand::Rng;
use rand::seq::IndexedRandom as _;
use serde::{Deserialize, Serialize};

const CATEGORY_VOCABULARY: &[&str] = &["Electronics", "Furniture", "Clothing", "Books", "Sports"];

/// Body of `POST /api/users`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    #[serde(rename = "Name")]
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Body of `POST /api/categories`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCategory {
    #[serde(rename = "CategoryName")]
    pub name: String,
    #[serde(rename = "Description")]
    pub description: String,
}

/// Body of `POST /api/properties`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProperty {
    #[serde(rename = "PropertyName")]
    pub name: String,
    #[serde(rename = "Price")]
    pub price: f64,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "OwnerID")]
    pub owner_id: u32,
}

impl NewUser {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let id: u32 = rng.random_range(1000..=9999);
        let phone: u32 = rng.random_range(100_000_000..=999_999_999);
        Self {
            name: format!("TestUser{id}"),
            email: format!("test{id}@example.com"),
            phone: format!("+380{phone}"),
        }
    }
}

impl NewCategory {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let base = CATEGORY_VOCABULARY.choose(rng).copied().unwrap_or("Misc");
        let suffix: u32 = rng.random_range(100..=999);
        let desc: u32 = rng.random_range(1..=100);
        Self {
            name: format!("{base}{suffix}"),
            description: format!("Test category description {desc}"),
        }
    }
}

impl NewProperty {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let suffix: u32 = rng.random_range(100..=999);
        let price: f64 = rng.random_range(10.0..=1000.0);
        let desc: u32 = rng.random_range(1..=100);
        Self {
            name: format!("Property{suffix}"),
            price: round_cents(price),
            description: format!("Test property description {desc}"),
            owner_id: rng.random_range(1..=10),
        }
    }
}

fn round_cents(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
