mod common;

use axum::http::StatusCode;
use cip_portal::Env;
use common::*;

// --- /api/values/admin ---

#[tokio::test]
async fn admin_endpoint_welcomes_admin_role() {
    let response = send(
        app(Env::Production),
        get_with_bearer("/api/values/admin", &token("alice", &["Admin"])),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Welcome back!! Admin");
}

#[tokio::test]
async fn admin_endpoint_forbids_user_role() {
    let response = send(
        app(Env::Production),
        get_with_bearer("/api/values/admin", &token("bob", &["User"])),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_ne!(body_text(response).await, "Welcome back!! Admin");
}

// --- /api/values/user ---

#[tokio::test]
async fn user_endpoint_welcomes_user_role() {
    let response = send(
        app(Env::Production),
        get_with_bearer("/api/values/user", &token("bob", &["User"])),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Welcome back!! User");
}

#[tokio::test]
async fn user_endpoint_forbids_admin_role() {
    let response = send(
        app(Env::Production),
        get_with_bearer("/api/values/user", &token("alice", &["Admin"])),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// --- /api/values/all ---

#[tokio::test]
async fn all_endpoint_accepts_any_authenticated_identity() {
    for roles in [&["Admin"][..], &["User"][..], &[][..]] {
        let response = send(
            app(Env::Production),
            get_with_bearer("/api/values/all", &token("carol", roles)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK, "roles {roles:?}");
        assert_eq!(body_text(response).await, "Hello Authenticated User");
    }
}

#[tokio::test]
async fn all_endpoint_denies_missing_credential() {
    let response = send(app(Env::Production), get("/api/values/all")).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "missing bearer credential");
}

// --- Credential failures short-circuit every gated endpoint ---

#[tokio::test]
async fn gated_endpoints_deny_without_credential() {
    for uri in ["/api/values/admin", "/api/values/user", "/api/values/all"] {
        let response = send(app(Env::Production), get(uri)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn expired_token_is_unauthorized() {
    let response = send(
        app(Env::Production),
        get_with_bearer("/api/values/admin", &expired_token("alice", &["Admin"])),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "bearer credential has expired");
}

#[tokio::test]
async fn token_signed_with_another_secret_is_unauthorized() {
    let claims = cip_portal::auth::verify_token(TEST_JWT_SECRET, &token("alice", &["Admin"]))
        .unwrap();
    let forged = token_with_claims(&claims, "some-other-secret");

    let response = send(
        app(Env::Production),
        get_with_bearer("/api/values/admin", &forged),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_authorization_header_is_unauthorized() {
    let request = axum::http::Request::builder()
        .uri("/api/values/all")
        .header("authorization", "Basic dXNlcjpwYXNz")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = send(app(Env::Production), request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn role_names_are_case_sensitive() {
    let response = send(
        app(Env::Production),
        get_with_bearer("/api/values/admin", &token("eve", &["admin"])),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// --- Local development bypass ---

#[tokio::test]
async fn local_bypass_headers_resolve_identity() {
    let request = axum::http::Request::builder()
        .uri("/api/values/admin")
        .header("x-user-id", "dev")
        .header("x-user-role", "User, Admin")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = send(app(Env::Local), request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Welcome back!! Admin");
}

#[tokio::test]
async fn local_bypass_is_ignored_in_production() {
    let request = axum::http::Request::builder()
        .uri("/api/values/all")
        .header("x-user-id", "dev")
        .header("x-user-role", "Admin")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = send(app(Env::Production), request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
