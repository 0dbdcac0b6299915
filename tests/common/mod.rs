//! In-process stub of the remote PQS API.
//!
//! Serves an in-memory collection store behind the same wire contract as the
//! real backend (zero-based `page`/`size` pagination, bearer-gated data
//! routes, login/registro/recuperar auth endpoints), so integration tests can
//! drive the real reqwest-backed client end to end.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

pub const TEST_PASSWORD: &str = "secreta";

#[derive(Clone, Default)]
pub struct ApiState {
    collections: Arc<Mutex<HashMap<String, Vec<Value>>>>,
    next_id: Arc<Mutex<i64>>,
}

impl ApiState {
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<Value>>> {
        self.collections.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn allocate_id(&self) -> i64 {
        let mut next = self.next_id.lock().unwrap_or_else(PoisonError::into_inner);
        *next += 1;
        *next
    }

    /// Pre-populate a collection. Rows keep the ids they carry.
    pub fn seed(&self, coleccion: &str, rows: Vec<Value>) {
        self.lock().insert(coleccion.to_string(), rows);
    }

    pub fn count(&self, coleccion: &str) -> usize {
        self.lock().get(coleccion).map(Vec::len).unwrap_or(0)
    }

    pub fn find(&self, coleccion: &str, id: i64) -> Option<Value> {
        self.lock()
            .get(coleccion)?
            .iter()
            .find(|row| row.get("id").and_then(Value::as_i64) == Some(id))
            .cloned()
    }
}

pub struct StubApi {
    pub base_url: String,
    pub state: ApiState,
}

/// Bind the stub on a free port and serve it for the lifetime of the test
/// process.
pub async fn spawn_stub_api() -> Result<StubApi> {
    // Idempotent across the tests sharing this harness
    let _ = tracing_subscriber::fmt::try_init();

    let state = ApiState::default();
    let app = router(state.clone());

    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let addr = format!("127.0.0.1:{}", port);
    let listener =
        tokio::net::TcpListener::bind(&addr).await.context("failed to bind stub api")?;
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub api server");
    });

    Ok(StubApi { base_url: format!("http://{}/api", addr), state })
}

fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/registro", post(registro))
        .route("/api/auth/recuperar", post(recuperar))
        .route("/api/:coleccion", get(list).post(create))
        .route("/api/:coleccion/:id", put(update).delete(remove))
        .with_state(state)
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let password = body.get("password").and_then(Value::as_str).unwrap_or_default();
    if password != TEST_PASSWORD {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "credenciales inválidas" })));
    }
    (
        StatusCode::OK,
        Json(json!({
            "token": "stub-token",
            "usuario": {
                "nombre": "Ana",
                "permisos": [
                    { "tabla": "estados", "accion": "leer" },
                    { "tabla": "estados", "accion": "agregar" },
                    { "tabla": "estados", "accion": "modificar" },
                    { "tabla": "estados", "accion": "eliminar" }
                ]
            }
        })),
    )
}

async fn registro(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body.get("correo").and_then(Value::as_str).unwrap_or_default().is_empty() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "correo requerido" })));
    }
    (StatusCode::CREATED, Json(json!({ "status": 201 })))
}

async fn recuperar(Json(_body): Json<Value>) -> Json<Value> {
    Json(json!({ "status": 200 }))
}

#[derive(Debug, Deserialize)]
struct PageParams {
    #[serde(default)]
    page: usize,
    #[serde(default = "default_size")]
    size: usize,
}

fn default_size() -> usize {
    10
}

fn bearer_present(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("Bearer "))
        .unwrap_or(false)
}

async fn list(
    Path(coleccion): Path<String>,
    Query(params): Query<PageParams>,
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    if !bearer_present(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "token requerido" })));
    }

    let store = state.lock();
    let rows = store.get(&coleccion).cloned().unwrap_or_default();
    let start = params.page * params.size;
    let end = (start + params.size).min(rows.len());
    let slice: Vec<Value> = if start < rows.len() { rows[start..end].to_vec() } else { vec![] };

    (
        StatusCode::OK,
        Json(json!({
            "data": slice,
            "total_count": rows.len(),
            "items_per_page": params.size,
        })),
    )
}

async fn create(
    Path(coleccion): Path<String>,
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !bearer_present(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "token requerido" })));
    }

    let mut row = match body {
        Value::Object(map) => map,
        _ => return (StatusCode::BAD_REQUEST, Json(json!({ "error": "objeto esperado" }))),
    };
    row.insert("id".to_string(), json!(state.allocate_id()));
    row.entry("eliminado".to_string()).or_insert(json!(false));

    state.lock().entry(coleccion).or_default().push(Value::Object(row));
    (StatusCode::CREATED, Json(json!({ "status": 201 })))
}

async fn update(
    Path((coleccion, id)): Path<(String, i64)>,
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !bearer_present(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "token requerido" })));
    }

    let mut store = state.lock();
    let rows = store.entry(coleccion).or_default();
    let Some(row) = rows
        .iter_mut()
        .find(|row| row.get("id").and_then(Value::as_i64) == Some(id))
    else {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "no encontrado" })));
    };

    if let Value::Object(changes) = body {
        if let Value::Object(target) = row {
            for (key, value) in changes {
                if key != "id" {
                    target.insert(key, value);
                }
            }
        }
    }
    (StatusCode::OK, Json(json!({ "status": 200 })))
}

async fn remove(
    Path((coleccion, id)): Path<(String, i64)>,
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    if !bearer_present(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "token requerido" })));
    }

    let mut store = state.lock();
    let rows = store.entry(coleccion).or_default();
    let before = rows.len();
    rows.retain(|row| row.get("id").and_then(Value::as_i64) != Some(id));
    if rows.len() == before {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "no encontrado" })));
    }
    (StatusCode::OK, Json(json!({ "status": 200 })))
}
