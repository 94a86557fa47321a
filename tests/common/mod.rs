//! Shared test fixture: an in-process stand-in for the Biblioteca REST
//! backend, plus helpers to wire an [`AppState`] against it.
//!
//! The stub keeps its documents in memory behind a mutex and exposes the
//! toggles the tests need: wrapped vs bare list responses, shape-broken
//! list responses, and injected failures on the loan/return mutations.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Path as UrlPath, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Map, Value};

use biblioteca_client::config::{ApiConfig, AppConfig, LoggingConfig, StorageConfig};
use biblioteca_client::AppState;

/// A loopback port with nothing listening: connections are refused, which is
/// the transport-failure class the offline paths key on.
pub const DEAD_URL: &str = "http://127.0.0.1:9";

pub fn app_state(base_url: &str, data_dir: &Path) -> AppState {
    let config = AppConfig {
        api: ApiConfig {
            base_url: base_url.to_string(),
            timeout_seconds: 5,
            user_agent: "biblioteca-client-tests".to_string(),
        },
        storage: StorageConfig {
            data_dir: data_dir.display().to_string(),
        },
        logging: LoggingConfig::default(),
    };
    AppState::from_config(config).expect("failed to build app state")
}

pub fn offline_state(data_dir: &Path) -> AppState {
    app_state(DEAD_URL, data_dir)
}

#[derive(Default)]
struct StubInner {
    users: Vec<Value>,
    passwords: HashMap<String, String>,
    authors: Vec<Value>,
    books: Vec<Value>,
    loans: HashMap<String, Value>,
    returns: HashMap<String, Value>,
    next_id: u64,
    wrap_lists: bool,
    break_lists: bool,
    fail_loan_updates: bool,
    fail_return_deletes: bool,
}

#[derive(Clone, Default)]
pub struct StubApi {
    inner: Arc<Mutex<StubInner>>,
}

impl StubApi {
    /// Start the stub on an ephemeral loopback port and return its handle.
    pub async fn spawn() -> (Self, String) {
        let stub = StubApi::default();
        let app = router(stub.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind stub listener");
        let addr = listener.local_addr().expect("stub listener has no address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub server died");
        });
        (stub, format!("http://{}", addr))
    }

    fn lock(&self) -> MutexGuard<'_, StubInner> {
        self.inner.lock().expect("stub state poisoned")
    }

    pub fn seed_user(&self, doc: Value, password: &str) {
        let mut inner = self.lock();
        let email = doc["correo"].as_str().expect("seed user needs correo").to_string();
        inner.passwords.insert(email, password.to_string());
        inner.users.push(doc);
    }

    pub fn seed_author(&self, doc: Value) {
        self.lock().authors.push(doc);
    }

    pub fn seed_book(&self, doc: Value) {
        self.lock().books.push(doc);
    }

    pub fn wrap_lists(&self, on: bool) {
        self.lock().wrap_lists = on;
    }

    pub fn break_lists(&self, on: bool) {
        self.lock().break_lists = on;
    }

    pub fn fail_loan_updates(&self, on: bool) {
        self.lock().fail_loan_updates = on;
    }

    pub fn fail_return_deletes(&self, on: bool) {
        self.lock().fail_return_deletes = on;
    }

    pub fn loan_doc(&self, id: &str) -> Option<Value> {
        self.lock().loans.get(id).cloned()
    }

    pub fn return_count(&self) -> usize {
        self.lock().returns.len()
    }

    pub fn user_doc(&self, id: &str) -> Option<Value> {
        self.lock().users.iter().find(|u| u["_id"] == id).cloned()
    }
}

fn router(stub: StubApi) -> Router {
    Router::new()
        .route("/usuarios/login", post(login))
        .route("/usuarios", get(list_users).post(create_user))
        .route("/usuarios/:id", get(get_user).put(update_user))
        .route("/autores", get(list_authors))
        .route("/autores/:id", get(get_author))
        .route("/libros", get(list_books))
        .route("/libros/disponibles", get(list_available_books))
        .route("/libros/:id", get(get_book))
        .route("/prestamos", get(list_loans).post(create_loan))
        .route(
            "/prestamos/:id",
            get(get_loan).put(update_loan).delete(delete_loan),
        )
        .route("/devoluciones", get(list_returns).post(create_return))
        .route(
            "/devoluciones/:id",
            get(get_return).put(update_return).delete(delete_return),
        )
        .route("/reportes/estadisticas-generales", get(report_statistics))
        .route("/reportes/:collection/pdf", get(report_pdf))
        .with_state(stub)
}

fn next_id(inner: &mut StubInner, prefix: &str) -> String {
    inner.next_id += 1;
    format!("{}-{}", prefix, inner.next_id)
}

fn list_response(inner: &StubInner, field: &str, items: Vec<Value>) -> Response {
    if inner.break_lists {
        return Json(json!({ "unrelated": true })).into_response();
    }
    if inner.wrap_lists {
        let mut map = Map::new();
        map.insert("total".to_string(), Value::from(items.len()));
        map.insert(field.to_string(), Value::Array(items));
        Json(Value::Object(map)).into_response()
    } else {
        Json(Value::Array(items)).into_response()
    }
}

fn not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "message": message }))).into_response()
}

fn server_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": "Error interno del servidor" })),
    )
        .into_response()
}

fn merge(doc: &mut Value, patch: &Value) {
    if let (Some(doc), Some(patch)) = (doc.as_object_mut(), patch.as_object()) {
        for (key, value) in patch {
            doc.insert(key.clone(), value.clone());
        }
    }
}

async fn login(State(stub): State<StubApi>, Json(body): Json<Value>) -> Response {
    let inner = stub.lock();
    let email = body["correo"].as_str().unwrap_or_default();
    let password = body["contrasena"].as_str().unwrap_or_default();
    let known = inner.passwords.get(email).map(String::as_str) == Some(password);
    match inner.users.iter().find(|u| u["correo"] == email) {
        Some(user) if known => Json(json!({ "usuario": user })).into_response(),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Credenciales inválidas" })),
        )
            .into_response(),
    }
}

async fn list_users(State(stub): State<StubApi>) -> Response {
    let inner = stub.lock();
    let items = inner.users.clone();
    list_response(&inner, "usuarios", items)
}

async fn create_user(State(stub): State<StubApi>, Json(mut body): Json<Value>) -> Response {
    let mut inner = stub.lock();
    let id = next_id(&mut inner, "user");
    body["_id"] = Value::from(id);
    if let Some(obj) = body.as_object_mut() {
        obj.remove("contrasena");
    }
    inner.users.push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn get_user(State(stub): State<StubApi>, UrlPath(id): UrlPath<String>) -> Response {
    let inner = stub.lock();
    match inner.users.iter().find(|u| u["_id"] == id.as_str()) {
        Some(user) => Json(user.clone()).into_response(),
        None => not_found("Usuario no encontrado"),
    }
}

async fn update_user(
    State(stub): State<StubApi>,
    UrlPath(id): UrlPath<String>,
    Json(patch): Json<Value>,
) -> Response {
    let mut inner = stub.lock();
    match inner.users.iter_mut().find(|u| u["_id"] == id.as_str()) {
        Some(user) => {
            merge(user, &patch);
            Json(user.clone()).into_response()
        }
        None => not_found("Usuario no encontrado"),
    }
}

async fn list_authors(State(stub): State<StubApi>) -> Response {
    let inner = stub.lock();
    let items = inner.authors.clone();
    list_response(&inner, "autores", items)
}

async fn get_author(State(stub): State<StubApi>, UrlPath(id): UrlPath<String>) -> Response {
    let inner = stub.lock();
    match inner.authors.iter().find(|a| a["_id"] == id.as_str()) {
        Some(author) => Json(author.clone()).into_response(),
        None => not_found("Autor no encontrado"),
    }
}

async fn list_books(State(stub): State<StubApi>) -> Response {
    let inner = stub.lock();
    let items = inner.books.clone();
    list_response(&inner, "libros", items)
}

async fn list_available_books(State(stub): State<StubApi>) -> Response {
    let inner = stub.lock();
    let items = inner
        .books
        .iter()
        .filter(|b| b["existencias"].as_i64().unwrap_or(0) > 0)
        .cloned()
        .collect();
    list_response(&inner, "libros", items)
}

async fn get_book(State(stub): State<StubApi>, UrlPath(id): UrlPath<String>) -> Response {
    let inner = stub.lock();
    match inner.books.iter().find(|b| b["_id"] == id.as_str()) {
        Some(book) => Json(book.clone()).into_response(),
        None => not_found("Libro no encontrado"),
    }
}

async fn list_loans(State(stub): State<StubApi>) -> Response {
    let inner = stub.lock();
    let items = inner.loans.values().cloned().collect();
    list_response(&inner, "prestamos", items)
}

async fn create_loan(State(stub): State<StubApi>, Json(mut body): Json<Value>) -> Response {
    let mut inner = stub.lock();
    let id = next_id(&mut inner, "loan");
    body["_id"] = Value::from(id.clone());
    inner.loans.insert(id, body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn get_loan(State(stub): State<StubApi>, UrlPath(id): UrlPath<String>) -> Response {
    let inner = stub.lock();
    match inner.loans.get(&id) {
        Some(loan) => Json(loan.clone()).into_response(),
        None => not_found("Préstamo no encontrado"),
    }
}

async fn update_loan(
    State(stub): State<StubApi>,
    UrlPath(id): UrlPath<String>,
    Json(patch): Json<Value>,
) -> Response {
    let mut inner = stub.lock();
    if inner.fail_loan_updates {
        return server_error();
    }
    match inner.loans.get_mut(&id) {
        Some(loan) => {
            merge(loan, &patch);
            Json(loan.clone()).into_response()
        }
        None => not_found("Préstamo no encontrado"),
    }
}

async fn delete_loan(State(stub): State<StubApi>, UrlPath(id): UrlPath<String>) -> Response {
    let mut inner = stub.lock();
    match inner.loans.remove(&id) {
        Some(_) => Json(json!({ "message": "Préstamo eliminado" })).into_response(),
        None => not_found("Préstamo no encontrado"),
    }
}

async fn list_returns(State(stub): State<StubApi>) -> Response {
    let inner = stub.lock();
    let items = inner.returns.values().cloned().collect();
    list_response(&inner, "devoluciones", items)
}

async fn create_return(State(stub): State<StubApi>, Json(mut body): Json<Value>) -> Response {
    let mut inner = stub.lock();
    let id = next_id(&mut inner, "return");
    body["_id"] = Value::from(id.clone());
    inner.returns.insert(id, body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn get_return(State(stub): State<StubApi>, UrlPath(id): UrlPath<String>) -> Response {
    let inner = stub.lock();
    match inner.returns.get(&id) {
        Some(record) => Json(record.clone()).into_response(),
        None => not_found("Devolución no encontrada"),
    }
}

async fn update_return(
    State(stub): State<StubApi>,
    UrlPath(id): UrlPath<String>,
    Json(patch): Json<Value>,
) -> Response {
    let mut inner = stub.lock();
    match inner.returns.get_mut(&id) {
        Some(record) => {
            merge(record, &patch);
            Json(record.clone()).into_response()
        }
        None => not_found("Devolución no encontrada"),
    }
}

async fn delete_return(State(stub): State<StubApi>, UrlPath(id): UrlPath<String>) -> Response {
    let mut inner = stub.lock();
    if inner.fail_return_deletes {
        return server_error();
    }
    match inner.returns.remove(&id) {
        Some(_) => Json(json!({ "message": "Devolución eliminada" })).into_response(),
        None => not_found("Devolución no encontrada"),
    }
}

async fn report_statistics(State(stub): State<StubApi>) -> Response {
    let inner = stub.lock();
    let active = inner
        .loans
        .values()
        .filter(|l| l["estado"] == "activo")
        .count();
    Json(json!({
        "totalLibros": inner.books.len(),
        "totalUsuarios": inner.users.len(),
        "prestamosActivos": active,
    }))
    .into_response()
}

async fn report_pdf(UrlPath(collection): UrlPath<String>) -> Response {
    format!("%PDF-1.4 reporte {}", collection).into_bytes().into_response()
}
