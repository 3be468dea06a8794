use crate::{AppState, handlers};
use axum::{Router, routing::post};

/// Development Router Module
///
/// Never mounted in `Env::Production` (see `create_router`).
pub fn dev_routes() -> Router<AppState> {
    Router::new()
        // POST /dev/token
        // Mints a bearer token signed with the local secret.
        .route("/dev/token", post(handlers::issue_dev_token))
}
