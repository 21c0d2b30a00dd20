mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{Method, StatusCode};
use common::{app_with, concrete_path, send, spy_app, spy_state, token};
use rolegate::handler::Operation;
use rolegate::middleware::auth::{AuthorizationGate, Decision};
use rolegate::middleware::guard::GuardStep;
use rolegate::routes::RouteTable;
use rolegate_auth::Principal;
use rolegate_core::Permission;
use serde_json::json;
use uuid::Uuid;

fn body_for(method: &Method) -> Option<serde_json::Value> {
    if *method == Method::GET || *method == Method::DELETE {
        None
    } else {
        Some(json!({}))
    }
}

// ============ Authorization ============

#[tokio::test]
async fn test_missing_token_never_reaches_handler() {
    let (app, spy) = spy_app();
    let table = RouteTable::standard().unwrap();

    for route in table
        .routes()
        .iter()
        .filter(|route| !route.required_permissions().is_empty())
    {
        let (status, body) = send(
            &app,
            route.method.as_str(),
            &concrete_path(route.path),
            None,
            body_for(&route.method),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", route);
        assert_eq!(body["kind"], "unauthenticated", "{}", route);
    }

    assert!(spy.calls().is_empty());
}

#[tokio::test]
async fn test_missing_permission_never_reaches_handler() {
    let (app, spy) = spy_app();
    let table = RouteTable::standard().unwrap();
    let no_permissions = token(&[]);

    for route in table.routes() {
        let Some(GuardStep::Authorize(permission)) = route.guards.first().copied() else {
            continue;
        };

        let (status, body) = send(
            &app,
            route.method.as_str(),
            &concrete_path(route.path),
            Some(&no_permissions),
            body_for(&route.method),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN, "{}", route);
        assert_eq!(body["kind"], "unauthorized");
        assert_eq!(
            body["error"],
            format!("Access denied. Missing required permission: {}", permission)
        );
    }

    assert!(spy.calls().is_empty());
}

#[tokio::test]
async fn test_other_permissions_do_not_satisfy_guard() {
    let (app, spy) = spy_app();
    let everything_but = token(&[
        Permission::ViewUsers,
        Permission::ViewUserById,
        Permission::CreateUser,
        Permission::UpdateUser,
    ]);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/users/{}", Uuid::new_v4()),
        Some(&everything_but),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(spy.calls().is_empty());
}

#[tokio::test]
async fn test_malformed_tokens_are_unauthenticated() {
    let (app, spy) = spy_app();

    for bad in ["not-a-jwt", "", "a.b.c"] {
        let (status, body) = send(&app, "GET", "/users", Some(bad), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["kind"], "unauthenticated");
    }

    let wrong_secret = rolegate_auth::create_access_token(
        Uuid::new_v4(),
        "caller@example.com",
        vec!["VIEW_USERS".to_string()],
        &rolegate_config::JwtConfig::with_secret("some-other-secret"),
    )
    .unwrap();
    let (status, _) = send(&app, "GET", "/users", Some(&wrong_secret), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert!(spy.calls().is_empty());
}

#[tokio::test]
async fn test_principal_is_visible_to_handler() {
    let (app, spy) = spy_app();

    let (status, body) = send(
        &app,
        "GET",
        "/users",
        Some(&token(&[Permission::ViewUsers])),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["operation"], "list_users");

    let calls = spy.calls();
    let principal = calls[0].1.principal.as_ref().unwrap();
    assert_eq!(principal.email, "caller@example.com");
    assert!(principal.has_permission(Permission::ViewUsers));
}

struct DenyAll;

#[async_trait]
impl AuthorizationGate for DenyAll {
    async fn check(&self, _principal: &Principal, _permission: Permission) -> Decision {
        Decision::Deny
    }
}

#[tokio::test]
async fn test_custom_gate_decides() {
    let (state, spy) = spy_state();
    let app = app_with(state.with_gate(Arc::new(DenyAll)));

    let (status, body) = send(
        &app,
        "GET",
        "/roles",
        Some(&token(&Permission::ALL)),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "unauthorized");
    assert!(spy.calls().is_empty());
}

// ============ Schema validation ============

#[tokio::test]
async fn test_missing_required_field_is_named() {
    let (app, spy) = spy_app();

    let (status, body) = send(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({ "email": "new@example.com", "last_name": "Doe" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "schema_validation_failed");
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|violation| violation["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["first_name", "password"]);
    assert_eq!(body["details"][0]["constraint"], "required");
    assert!(body["error"].as_str().unwrap().contains("first_name is required"));

    assert!(spy.calls().is_empty());
}

#[tokio::test]
async fn test_every_body_schema_rejects_empty_body() {
    let (app, spy) = spy_app();
    let all = token(&Permission::ALL);

    for (method, path, field) in [
        ("POST", "/auth/register", "first_name"),
        ("POST", "/auth/login", "email"),
        ("POST", "/auth/forget-password", "email"),
        ("POST", "/users", "first_name"),
    ] {
        let (status, body) = send(&app, method, path, Some(&all), Some(json!({}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{} {}", method, path);
        assert_eq!(body["details"][0]["field"], field, "{} {}", method, path);
    }

    assert!(spy.calls().is_empty());
}

#[tokio::test]
async fn test_invalid_path_id_is_rejected() {
    let (app, spy) = spy_app();
    let all = token(&Permission::ALL);

    for (method, path) in [
        ("GET", "/users/not-a-uuid"),
        ("DELETE", "/users/not-a-uuid"),
        ("GET", "/roles/42"),
        ("DELETE", "/roles/42"),
    ] {
        let (status, body) = send(&app, method, path, Some(&all), None).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{} {}", method, path);
        assert_eq!(body["kind"], "schema_validation_failed");
        assert_eq!(body["details"][0]["field"], "id");
        assert_eq!(body["details"][0]["constraint"], "format");
    }

    assert!(spy.calls().is_empty());
}

#[tokio::test]
async fn test_format_only_failures_are_unprocessable() {
    let (app, spy) = spy_app();

    let (status, body) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": "not-an-email", "password": "x" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "email");
    assert!(spy.calls().is_empty());
}

#[tokio::test]
async fn test_wrong_field_type_is_bad_request() {
    let (app, _) = spy_app();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/users/{}", Uuid::new_v4()),
        Some(&token(&[Permission::UpdateUser])),
        Some(json!({ "first_name": 7, "role_ids": ["nope"] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|violation| violation["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["first_name", "role_ids[0]"]);
}

#[tokio::test]
async fn test_unparseable_body_is_rejected() {
    let (app, spy) = spy_app();

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(spy.calls().is_empty());
}

async fn send_text(app: axum::Router, method: &str, uri: &str, token: &str) -> StatusCode {
    let request = axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "text/plain")
        .body(axum::body::Body::from("hello"))
        .unwrap();
    tower::ServiceExt::oneshot(app, request)
        .await
        .unwrap()
        .status()
}

#[tokio::test]
async fn test_route_without_schema_ignores_non_json_body() {
    let (app, spy) = spy_app();

    let status = send_text(app, "GET", "/users", &token(&[Permission::ViewUsers])).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(spy.operations(), vec![Operation::ListUsers]);
    assert_eq!(spy.calls()[0].1.input.body.as_ref(), b"hello");
}

#[tokio::test]
async fn test_params_schema_ignores_non_json_body() {
    let (app, spy) = spy_app();
    let id = Uuid::new_v4();

    let status = send_text(
        app,
        "DELETE",
        &format!("/users/{}", id),
        &token(&[Permission::DeleteUser]),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(spy.operations(), vec![Operation::DeleteUser]);
    assert_eq!(spy.calls()[0].1.input.params["id"], id.to_string());
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let (state, spy) = spy_state();
    let app = app_with(state.with_body_limit(64));

    let (status, body) = send(
        &app,
        "POST",
        "/auth/forget-password",
        None,
        Some(json!({ "email": format!("{}@example.com", "a".repeat(200)) })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "body");
    assert!(spy.calls().is_empty());
}

#[tokio::test]
async fn test_validated_body_reaches_handler_intact() {
    let (app, spy) = spy_app();

    let (status, _) = send(
        &app,
        "POST",
        "/users",
        Some(&token(&[Permission::CreateUser])),
        Some(json!({
            "first_name": "Jane",
            "last_name": "Doe",
            "email": "jane@example.com",
            "password": "password123",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let calls = spy.calls();
    assert_eq!(calls[0].0, Operation::CreateUser);
    assert_eq!(calls[0].1.input.json().unwrap()["email"], "jane@example.com");
}

#[tokio::test]
async fn test_path_params_reach_handler() {
    let (app, spy) = spy_app();
    let id = Uuid::new_v4();

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/roles/{}", id),
        Some(&token(&[Permission::UpdateRole])),
        Some(json!({ "name": "Auditor" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let calls = spy.calls();
    assert_eq!(calls[0].1.input.params["id"], id.to_string());
}

// ============ Ordering ============

#[tokio::test]
async fn test_authorization_is_reported_before_schema() {
    let (app, spy) = spy_app();

    let (status, body) = send(&app, "POST", "/users", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["kind"], "unauthenticated");

    let (status, body) = send(
        &app,
        "PUT",
        "/users/not-a-uuid",
        Some(&token(&[Permission::ViewUsers])),
        Some(json!({ "email": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "unauthorized");
    assert!(body.get("details").is_none());

    assert!(spy.calls().is_empty());
}

// ============ Dispatch ============

#[tokio::test]
async fn test_read_only_dispatch_is_repeatable() {
    let (app, spy) = spy_app();
    let viewer = token(&[Permission::ViewUsers]);

    let first = send(&app, "GET", "/users", Some(&viewer), None).await;
    let second = send(&app, "GET", "/users", Some(&viewer), None).await;

    assert_eq!(first, second);
    assert_eq!(first.0, StatusCode::OK);
    assert_eq!(spy.operations(), vec![Operation::ListUsers, Operation::ListUsers]);
}

#[tokio::test]
async fn test_unknown_path_is_route_not_found() {
    let (app, spy) = spy_app();

    let (status, body) = send(&app, "GET", "/unknown", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "route_not_found");
    assert_eq!(body["error"], "No route for GET /unknown");
    assert!(spy.calls().is_empty());
}

#[tokio::test]
async fn test_unregistered_verb_is_route_not_found() {
    let (app, spy) = spy_app();
    let all = token(&Permission::ALL);

    for (method, path) in [
        ("PATCH", "/users".to_string()),
        ("DELETE", "/users".to_string()),
        ("POST", format!("/roles/{}", Uuid::new_v4())),
    ] {
        let (status, body) = send(&app, method, &path, Some(&all), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{} {}", method, path);
        assert_eq!(body["kind"], "route_not_found");
    }

    assert!(spy.calls().is_empty());
}

#[tokio::test]
async fn test_every_route_dispatches_its_operation() {
    let (app, spy) = spy_app();
    let table = RouteTable::standard().unwrap();
    let all = token(&Permission::ALL);

    let valid_body = json!({
        "first_name": "Jane",
        "last_name": "Doe",
        "email": "jane@example.com",
        "password": "password123",
    });

    for route in table.routes() {
        let body = match route.method {
            Method::GET | Method::DELETE => None,
            _ => Some(valid_body.clone()),
        };
        let (status, response) = send(
            &app,
            route.method.as_str(),
            &concrete_path(route.path),
            Some(&all),
            body,
        )
        .await;

        assert_eq!(status, StatusCode::OK, "{}: {}", route, response);
        assert_eq!(response["operation"], route.operation.name());
    }

    assert_eq!(spy.calls().len(), table.routes().len());
}

// ============ Unguarded routes ============

#[tokio::test]
async fn test_create_role_needs_no_permission() {
    let (app, spy) = spy_app();

    let (status, body) = send(
        &app,
        "POST",
        "/roles",
        Some(&token(&[])),
        Some(json!({ "name": "Auditor" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["operation"], "create_role");
    assert_eq!(spy.operations(), vec![Operation::CreateRole]);
}

#[tokio::test]
async fn test_unguarded_route_ignores_bad_token() {
    let (app, spy) = spy_app();

    let (status, _) = send(&app, "GET", "/permissions", Some("garbage"), None).await;

    assert_eq!(status, StatusCode::OK);
    let calls = spy.calls();
    assert_eq!(calls[0].0, Operation::ListPermissions);
    assert!(calls[0].1.principal.is_none());
}
