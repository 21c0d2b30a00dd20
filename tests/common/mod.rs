#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use http_body_util::BodyExt;
use rolegate::context::RequestContext;
use rolegate::handler::{Handlers, Operation};
use rolegate::modules::Directory;
use rolegate::router::init_router;
use rolegate::routes::RouteTable;
use rolegate::state::AppState;
use rolegate_auth::create_access_token;
use rolegate_config::{JwtConfig, SeedConfig};
use rolegate_core::{AppError, Permission};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin-password";

pub fn jwt_config() -> JwtConfig {
    JwtConfig::with_secret("integration-test-secret")
}

pub fn token(permissions: &[Permission]) -> String {
    create_access_token(
        Uuid::new_v4(),
        "caller@example.com",
        permissions.iter().map(|p| p.as_str().to_string()).collect(),
        &jwt_config(),
    )
    .unwrap()
}

/// Records every dispatch and answers 200 with the operation name.
#[derive(Default)]
pub struct SpyHandlers {
    calls: Mutex<Vec<(Operation, RequestContext)>>,
}

impl SpyHandlers {
    pub fn calls(&self) -> Vec<(Operation, RequestContext)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn operations(&self) -> Vec<Operation> {
        self.calls().into_iter().map(|(op, _)| op).collect()
    }
}

#[async_trait]
impl Handlers for SpyHandlers {
    async fn handle(&self, operation: Operation, ctx: RequestContext) -> Result<Response, AppError> {
        self.calls.lock().unwrap().push((operation, ctx));
        Ok(Json(json!({ "operation": operation.name() })).into_response())
    }
}

pub fn spy_state() -> (AppState, Arc<SpyHandlers>) {
    let spy = Arc::new(SpyHandlers::default());
    let state = AppState::new(jwt_config(), spy.clone());
    (state, spy)
}

pub fn app_with(state: AppState) -> Router {
    init_router(state, &RouteTable::standard().unwrap()).unwrap()
}

pub fn spy_app() -> (Router, Arc<SpyHandlers>) {
    let (state, spy) = spy_state();
    (app_with(state), spy)
}

pub async fn directory_app() -> Router {
    let directory = Directory::new(jwt_config()).with_hash_cost(4);
    directory
        .seed_admin(&SeedConfig {
            admin_email: ADMIN_EMAIL.to_string(),
            admin_password: ADMIN_PASSWORD.to_string(),
        })
        .await
        .unwrap();

    app_with(AppState::new(jwt_config(), Arc::new(directory)))
}

/// Substitutes a fresh UUID for every `{id}` placeholder.
pub fn concrete_path(path: &str) -> String {
    path.replace("{id}", &Uuid::new_v4().to_string())
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            panic!(
                "Response is not JSON. Status: {}, Body: {:?}",
                status,
                String::from_utf8_lossy(&bytes)
            )
        })
    };

    (status, body)
}

pub async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);

    body["access_token"]
        .as_str()
        .unwrap_or_else(|| panic!("No access_token in response: {}", body))
        .to_string()
}
