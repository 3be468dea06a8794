use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints that need no credential.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers. Returns "ok".
        .route("/health", get(|| async { "ok" }))
        // GET /api/routes
        // The client-side route table, so the client router can be configured from the server.
        .route("/api/routes", get(handlers::list_routes))
        // GET /api/routes/resolve?path=...
        // Resolves one path to its page, 404 when unregistered.
        .route("/api/routes/resolve", get(handlers::resolve_route))
        // POST /api/users
        // Registers a user record. Transient fields never reach storage.
        .route("/api/users", post(handlers::create_user))
}
