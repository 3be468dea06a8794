use crate::{
    AppState,
    gate::{self, ADMIN_RULE, ALL_RULE, Gate, USER_RULE},
    handlers,
};
use axum::{Router, middleware, routing::get};

/// Values Router Module
///
/// The three gated endpoints nested under `/api/values`. Each route carries its
/// own `gate::enforce` layer, so the rule is checked before the handler body
/// runs and a denial never reaches it.
pub fn values_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        // GET /api/values/admin: role "Admin"
        .route(
            ADMIN_RULE.route,
            get(handlers::admin_endpoint).route_layer(middleware::from_fn_with_state(
                Gate::new(state, ADMIN_RULE),
                gate::enforce,
            )),
        )
        // GET /api/values/user: role "User"
        .route(
            USER_RULE.route,
            get(handlers::user_endpoint).route_layer(middleware::from_fn_with_state(
                Gate::new(state, USER_RULE),
                gate::enforce,
            )),
        )
        // GET /api/values/all: any authenticated identity
        .route(
            ALL_RULE.route,
            get(handlers::all_endpoint).route_layer(middleware::from_fn_with_state(
                Gate::new(state, ALL_RULE),
                gate::enforce,
            )),
        )
}
