//! In-memory stand-in for the users/categories/properties API, used by integration tests
//! and for local smoke runs.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

pub use axum::http::StatusCode;

pub const PATH_USERS: &str = "/api/users";
pub const PATH_CATEGORIES: &str = "/api/categories";
pub const PATH_PROPERTIES: &str = "/api/properties";
pub const PATH_PROPERTY_CATEGORIES: &str = "/api/property_categories";
pub const PATH_DOCS: &str = "/api/docs/";

/// How the server answers every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct Behavior {
    /// Added before each response.
    pub latency: Duration,
    /// When set, every route answers with this status and an error body.
    pub fail_status: Option<StatusCode>,
}

#[derive(Debug, Clone, Default)]
pub struct TestServerStats {
    requests_total: Arc<AtomicU64>,
    reads_total: Arc<AtomicU64>,
    writes_total: Arc<AtomicU64>,
    docs_total: Arc<AtomicU64>,
}

impl TestServerStats {
    pub fn requests_total(&self) -> u64 {
        self.requests_total.load(Ordering::Relaxed)
    }

    pub fn reads_total(&self) -> u64 {
        self.reads_total.load(Ordering::Relaxed)
    }

    pub fn writes_total(&self) -> u64 {
        self.writes_total.load(Ordering::Relaxed)
    }

    pub fn docs_total(&self) -> u64 {
        self.docs_total.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Deserialize)]
struct CreateUser {
    #[serde(rename = "Name")]
    name: String,
    email: String,
    phone: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreateCategory {
    #[serde(rename = "CategoryName")]
    name: String,
    #[serde(rename = "Description")]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreateProperty {
    #[serde(rename = "PropertyName")]
    name: String,
    #[serde(rename = "Price")]
    price: f64,
    #[serde(rename = "Description")]
    description: Option<String>,
    #[serde(rename = "OwnerID")]
    owner_id: u64,
}

#[derive(Debug, Deserialize)]
struct CreatePropertyCategory {
    #[serde(rename = "PropertyID")]
    property_id: u64,
    #[serde(rename = "CategoryID")]
    category_id: u64,
}

#[derive(Debug, Serialize)]
struct ApiError {
    error: String,
}

#[derive(Debug, Default)]
struct Tables {
    users: Vec<Value>,
    categories: Vec<Value>,
    properties: Vec<Value>,
    property_categories: Vec<Value>,
}

#[derive(Debug, Clone, Copy)]
enum Table {
    Users,
    Categories,
    Properties,
    PropertyCategories,
}

impl Tables {
    fn rows(&mut self, table: Table) -> &mut Vec<Value> {
        match table {
            Table::Users => &mut self.users,
            Table::Categories => &mut self.categories,
            Table::Properties => &mut self.properties,
            Table::PropertyCategories => &mut self.property_categories,
        }
    }
}

#[derive(Debug, Clone)]
struct AppState {
    behavior: Behavior,
    stats: TestServerStats,
    tables: Arc<Mutex<Tables>>,
}

impl AppState {
    /// Count the request and apply the configured latency. Returns the forced failure, if any.
    async fn enter(&self) -> Option<Response> {
        self.stats.requests_total.fetch_add(1, Ordering::Relaxed);
        if !self.behavior.latency.is_zero() {
            tokio::time::sleep(self.behavior.latency).await;
        }
        self.behavior
            .fail_status
            .map(|status| error(status, "injected failure"))
    }

    fn list(&self, table: Table) -> Response {
        self.stats.reads_total.fetch_add(1, Ordering::Relaxed);
        let mut tables = self
            .tables
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Json(Value::Array(tables.rows(table).clone())).into_response()
    }

    fn insert(&self, table: Table, id_field: &str, mut record: Value) -> Response {
        self.stats.writes_total.fetch_add(1, Ordering::Relaxed);
        let mut tables = self
            .tables
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let rows = tables.rows(table);
        let id = rows.len() as u64 + 1;
        if let Value::Object(map) = &mut record {
            map.insert(id_field.to_string(), json!(id));
        }
        rows.push(record.clone());
        (StatusCode::CREATED, Json(record)).into_response()
    }
}

fn error(status: StatusCode, msg: &str) -> Response {
    (
        status,
        Json(ApiError {
            error: msg.to_string(),
        }),
    )
        .into_response()
}

fn parse<T: for<'de> Deserialize<'de>>(body: &[u8]) -> Result<T, Response> {
    serde_json::from_slice(body).map_err(|e| error(StatusCode::BAD_REQUEST, &e.to_string()))
}

async fn list_users(State(state): State<AppState>) -> Response {
    if let Some(res) = state.enter().await {
        return res;
    }
    state.list(Table::Users)
}

async fn create_user(State(state): State<AppState>, body: axum::body::Bytes) -> Response {
    if let Some(res) = state.enter().await {
        return res;
    }
    let u: CreateUser = match parse(&body) {
        Ok(v) => v,
        Err(res) => return res,
    };
    state.insert(
        Table::Users,
        "UserID",
        json!({ "Name": u.name, "email": u.email, "phone": u.phone }),
    )
}

async fn list_categories(State(state): State<AppState>) -> Response {
    if let Some(res) = state.enter().await {
        return res;
    }
    state.list(Table::Categories)
}

async fn create_category(State(state): State<AppState>, body: axum::body::Bytes) -> Response {
    if let Some(res) = state.enter().await {
        return res;
    }
    let c: CreateCategory = match parse(&body) {
        Ok(v) => v,
        Err(res) => return res,
    };
    state.insert(
        Table::Categories,
        "CategoryID",
        json!({ "CategoryName": c.name, "Description": c.description }),
    )
}

async fn list_properties(State(state): State<AppState>) -> Response {
    if let Some(res) = state.enter().await {
        return res;
    }
    state.list(Table::Properties)
}

async fn create_property(State(state): State<AppState>, body: axum::body::Bytes) -> Response {
    if let Some(res) = state.enter().await {
        return res;
    }
    let p: CreateProperty = match parse(&body) {
        Ok(v) => v,
        Err(res) => return res,
    };
    state.insert(
        Table::Properties,
        "PropertyID",
        json!({
            "PropertyName": p.name,
            "Price": p.price,
            "Description": p.description,
            "OwnerID": p.owner_id,
        }),
    )
}

async fn list_property_categories(State(state): State<AppState>) -> Response {
    if let Some(res) = state.enter().await {
        return res;
    }
    state.list(Table::PropertyCategories)
}

async fn create_property_category(
    State(state): State<AppState>,
    body: axum::body::Bytes,
) -> Response {
    if let Some(res) = state.enter().await {
        return res;
    }
    let pc: CreatePropertyCategory = match parse(&body) {
        Ok(v) => v,
        Err(res) => return res,
    };
    state.insert(
        Table::PropertyCategories,
        "ID",
        json!({ "PropertyID": pc.property_id, "CategoryID": pc.category_id }),
    )
}

async fn docs(State(state): State<AppState>) -> Response {
    if let Some(res) = state.enter().await {
        return res;
    }
    state.stats.docs_total.fetch_add(1, Ordering::Relaxed);
    Html(
        "<!doctype html><title>API docs</title>\
         <ul><li>/api/users</li><li>/api/categories</li>\
         <li>/api/properties</li><li>/api/property_categories</li></ul>",
    )
    .into_response()
}

pub fn router(stats: TestServerStats, behavior: Behavior) -> Router {
    let state = AppState {
        behavior,
        stats,
        tables: Arc::new(Mutex::new(Tables::default())),
    };

    Router::new()
        .route(PATH_USERS, get(list_users).post(create_user))
        .route(PATH_CATEGORIES, get(list_categories).post(create_category))
        .route(PATH_PROPERTIES, get(list_properties).post(create_property))
        .route(
            PATH_PROPERTY_CATEGORIES,
            get(list_property_categories).post(create_property_category),
        )
        .route(PATH_DOCS, get(docs))
        .with_state(state)
}

pub struct TestServer {
    base_url: String,
    stats: TestServerStats,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    pub async fn start() -> std::io::Result<Self> {
        Self::start_with(Behavior::default()).await
    }

    pub async fn start_with(behavior: Behavior) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let stats = TestServerStats::default();
        let app = router(stats.clone(), behavior);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let serve = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            let _ = serve.await;
        });

        Ok(Self {
            base_url: format!("http://{addr}"),
            stats,
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn stats(&self) -> &TestServerStats {
        &self.stats
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if self.shutdown_tx.is_some()
            && let Some(task) = self.task.take()
        {
            task.abort();
        }
    }
}
