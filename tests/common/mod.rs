//! In-process stand-in for the super-admin backend.
//!
//! Each test gets its own server on a fresh port so state never leaks between
//! tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use tenant_console::client::HttpTenantClient;

#[derive(Default)]
struct MockState {
    tenants: Vec<Value>,
    next_id: i64,
    malformed: bool,
}

type Shared = Arc<Mutex<MockState>>;

pub struct MockBackend {
    pub addr: SocketAddr,
    pub base_url: String,
    state: Shared,
    handle: tokio::task::JoinHandle<()>,
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl MockBackend {
    pub async fn spawn() -> Result<Self> {
        let state: Shared = Arc::new(Mutex::new(MockState {
            next_id: 1,
            ..Default::default()
        }));

        let app = Router::new()
            .route("/", get(service_info))
            .route("/health", get(health))
            .route("/super-admin/create-tenant", post(create_tenant))
            .route("/super-admin/tenants", get(list_tenants))
            .route("/super-admin/tenants/:id", delete(delete_tenant))
            .route("/super-admin/tenants/:id/toggle-status", patch(toggle_status))
            .layer(TraceLayer::new_for_http())
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind mock backend")?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("mock backend stopped: {e}");
            }
        });

        let backend = Self {
            addr,
            base_url: format!("http://{}", addr),
            state,
            handle,
        };
        backend.wait_ready(Duration::from_secs(5)).await?;
        Ok(backend)
    }

    /// Spawn with tenants already provisioned, one per `(name, active)` pair
    pub async fn with_tenants(tenants: &[(&str, bool)]) -> Result<Self> {
        let backend = Self::spawn().await?;
        for (name, active) in tenants {
            let id = backend.insert(name, &format!("admin@{}.com", name.to_lowercase()));
            if !active {
                backend.set_status(id, "inactive");
            }
        }
        Ok(backend)
    }

    pub fn client(&self) -> HttpTenantClient {
        HttpTenantClient::with_timeout(&self.base_url, Some(Duration::from_secs(5)))
            .expect("client for mock backend")
    }

    /// Make list responses unparseable
    pub fn set_malformed(&self, malformed: bool) {
        self.state.lock().unwrap().malformed = malformed;
    }

    pub fn tenant_count(&self) -> usize {
        self.state.lock().unwrap().tenants.len()
    }

    pub fn status_of(&self, id: i64) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .tenants
            .iter()
            .find(|t| t["id"] == id)
            .and_then(|t| t["status"].as_str().map(str::to_string))
    }

    fn insert(&self, name: &str, admin_email: &str) -> i64 {
        insert_tenant(&mut self.state.lock().unwrap(), name, None, admin_email)
    }

    fn set_status(&self, id: i64, status: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(t) = state.tenants.iter_mut().find(|t| t["id"] == id) {
            t["status"] = json!(status);
        }
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        let url = format!("{}/health", self.base_url);
        while Instant::now() < deadline {
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status().is_success() {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("mock backend did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

/// An address nothing is listening on
pub fn dead_address() -> String {
    let port = portpicker::pick_unused_port().expect("free port");
    format!("http://127.0.0.1:{}", port)
}

/// Accepts connections and never answers. Aborting the handle closes them.
pub async fn hanging_backend() -> Result<(String, tokio::task::JoinHandle<()>)> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind hanging listener")?;
    let address = format!("http://{}", listener.local_addr()?);
    let handle = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    Ok((address, handle))
}

fn insert_tenant(state: &mut MockState, name: &str, company: Option<&str>, admin_email: &str) -> i64 {
    let id = state.next_id;
    state.next_id += 1;
    let slug = name.to_lowercase().replace(' ', "_");
    state.tenants.push(json!({
        "id": id,
        "name": name,
        "company_name": company,
        "db_name": format!("tenant_{}_{}", slug, 1736200000 + id),
        "db_host": "localhost",
        "db_port": "5432",
        "db_user": "postgres",
        "admin_email": admin_email,
        "status": "active",
        "created_at": "2026-01-06T22:45:00.123456",
    }));
    id
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn service_info() -> Json<Value> {
    Json(json!({ "service": "super_admin_service" }))
}

async fn create_tenant(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let name = body["name"].as_str().unwrap_or_default().to_string();
    let company = body["company_name"].as_str().unwrap_or_default().to_string();
    let email = body["admin_email"].as_str().unwrap_or_default().to_string();

    if !email.contains('@') {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "detail": [{
                    "loc": ["body", "admin_email"],
                    "msg": "value is not a valid email address",
                    "type": "value_error"
                }]
            })),
        )
            .into_response();
    }

    let mut state = state.lock().unwrap();
    if state.tenants.iter().any(|t| t["name"] == name.as_str()) {
        return detail(StatusCode::CONFLICT, "Tenant already exists");
    }

    let id = insert_tenant(&mut state, &name, Some(&company), &email);
    let db_name = state.tenants.last().map(|t| t["db_name"].clone()).unwrap_or_default();
    Json(json!({
        "tenant_id": id,
        "tenant_db": db_name,
        "admin_email": email,
        "initial_password": format!("Xk9#mP2q{}", id),
    }))
    .into_response()
}

async fn list_tenants(State(state): State<Shared>) -> Response {
    let state = state.lock().unwrap();
    if state.malformed {
        return Json(json!([{ "id": "not-a-number" }])).into_response();
    }
    Json(Value::Array(state.tenants.clone())).into_response()
}

async fn delete_tenant(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let mut state = state.lock().unwrap();
    let Some(index) = state.tenants.iter().position(|t| t["id"] == id) else {
        return detail(StatusCode::NOT_FOUND, "Tenant not found");
    };
    let removed = state.tenants.remove(index);
    Json(json!({
        "message": format!("Tenant '{}' deleted successfully", removed["name"].as_str().unwrap_or_default()),
        "tenant_id": id,
        "db_name": removed["db_name"],
    }))
    .into_response()
}

async fn toggle_status(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let mut state = state.lock().unwrap();
    let Some(tenant) = state.tenants.iter_mut().find(|t| t["id"] == id) else {
        return detail(StatusCode::NOT_FOUND, "Tenant not found");
    };
    let next = if tenant["status"] == "active" { "inactive" } else { "active" };
    tenant["status"] = json!(next);
    Json(tenant.clone()).into_response()
}
