use crate::{
    AppState,
    gate::{self, Gate, USER_DIRECTORY_RULE, USER_LOOKUP_RULE},
    handlers,
};
use axum::{Router, middleware, routing::get};

/// Users Router Module
///
/// Read access to stored user records. Registration is public and lives in
/// `public_routes`; the GET on the same path is merged in here under its own gate.
pub fn user_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        // GET /api/users
        // Full directory, administrators only.
        .route(
            USER_DIRECTORY_RULE.route,
            get(handlers::list_users).route_layer(middleware::from_fn_with_state(
                Gate::new(state, USER_DIRECTORY_RULE),
                gate::enforce,
            )),
        )
        // GET /api/users/{id}
        // Any authenticated caller. The handler reads the resolved identity from the extensions.
        .route(
            USER_LOOKUP_RULE.route,
            get(handlers::get_user).route_layer(middleware::from_fn_with_state(
                Gate::new(state, USER_LOOKUP_RULE),
                gate::enforce,
            )),
        )
}
