#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use cip_portal::{
    AppConfig, AppState, Env, create_router,
    auth::{Claims, RoleClaim},
    models::User,
    repository::Repository,
};
use jsonwebtoken::{EncodingKey, Header, encode};
use std::{
    sync::{Arc, Mutex},
    time::SystemTime,
};
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "test-secret-value-1234567890";

// --- In-memory repository standing in for Postgres ---

#[derive(Default)]
pub struct MockRepo {
    users: Mutex<Vec<User>>,
}

impl MockRepo {
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: Mutex::new(users),
        }
    }

    pub fn stored(&self) -> Vec<User> {
        self.users.lock().unwrap().clone()
    }
}

#[async_trait]
impl Repository for MockRepo {
    async fn create_user(&self, user: User) -> Result<User, sqlx::Error> {
        let mut users = self.users.lock().unwrap();
        // Mirror what storage does: assign the key and keep only persisted fields.
        let stored = User {
            id: users.len() as i32 + 1,
            name: user.name,
            last_name: user.last_name,
            phone_number: user.phone_number,
            email_address: user.email_address,
            user_type: user.user_type,
            password: user.password,
            ..User::default()
        };
        users.push(stored.clone());
        Ok(stored)
    }

    async fn get_user(&self, id: i32) -> Result<Option<User>, sqlx::Error> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, sqlx::Error> {
        Ok(self.stored())
    }
}

// --- State / router helpers ---

pub fn config(env: Env) -> AppConfig {
    let mut config = AppConfig::default();
    config.env = env;
    config.jwt_secret = TEST_JWT_SECRET.to_string();
    config
}

pub fn app_state(env: Env, repo: Arc<MockRepo>) -> AppState {
    AppState::new(repo, config(env))
}

pub fn app(env: Env) -> Router {
    create_router(app_state(env, Arc::new(MockRepo::default())))
}

pub fn app_with_repo(env: Env, repo: Arc<MockRepo>) -> Router {
    create_router(app_state(env, repo))
}

// --- Tokens ---

fn now() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

pub fn token_with_claims(claims: &Claims, secret: &str) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

/// Valid for an hour, signed with the test secret.
pub fn token(subject: &str, roles: &[&str]) -> String {
    let now = now();
    let claims = Claims {
        sub: subject.to_string(),
        iat: now as usize,
        exp: (now + 3600) as usize,
        role: RoleClaim::Many(roles.iter().map(|r| r.to_string()).collect()),
    };
    token_with_claims(&claims, TEST_JWT_SECRET)
}

pub fn expired_token(subject: &str, roles: &[&str]) -> String {
    let now = now();
    let claims = Claims {
        sub: subject.to_string(),
        iat: (now - 7200) as usize,
        exp: (now - 3600) as usize,
        role: RoleClaim::Many(roles.iter().map(|r| r.to_string()).collect()),
    };
    token_with_claims(&claims, TEST_JWT_SECRET)
}

// --- Request helpers ---

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn get_with_bearer(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}
