use std::sync::Arc;

use axum::{Router, extract::FromRef, http::HeaderName};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod route_table;
pub mod schema;

// Routers grouped by access requirement (public, values, users, dev).
pub mod routes;
use routes::{dev, public, users, values};

// --- Public Re-exports ---

pub use config::{AppConfig, Env};
pub use gate::{AuthorizationChecker, CheckerState, RoleChecker};
pub use repository::{PostgresRepository, RepositoryState};
pub use route_table::RouteTable;

/// ApiDoc
///
/// OpenAPI document aggregated from the `#[utoipa::path]` handlers and the
/// `ToSchema` models. Served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::admin_endpoint, handlers::user_endpoint, handlers::all_endpoint,
        handlers::list_routes, handlers::resolve_route,
        handlers::create_user, handlers::get_user, handlers::list_users,
        handlers::issue_dev_token
    ),
    components(
        schemas(
            models::User, models::DevTokenRequest, models::DevTokenResponse,
            route_table::RouteEntry, route_table::Page, error::ErrorResponse,
        )
    ),
    modifiers(&BearerSecurity),
    tags(
        (name = "cip-portal", description = "Route table, user records and role-gated endpoints")
    )
)]
struct ApiDoc;

/// Registers the `bearer` scheme referenced by the gated paths.
struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// AppState
///
/// Everything a request may need, shared read-only across all requests.
#[derive(Clone)]
pub struct AppState {
    /// Persistence for user records.
    pub repo: RepositoryState,
    /// The client route table, built once at startup.
    pub routes: Arc<RouteTable>,
    /// Evaluates authorization rules against resolved identities.
    pub checker: CheckerState,
    /// The loaded, immutable configuration.
    pub config: AppConfig,
}

impl AppState {
    /// State with the application's route table and the role checker.
    pub fn new(repo: RepositoryState, config: AppConfig) -> Self {
        Self {
            repo,
            routes: Arc::new(RouteTable::app()),
            checker: Arc::new(RoleChecker),
            config,
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles every route, the per-route authorization layers and the global
/// observability stack, then binds the shared state.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let mut base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .nest("/api/values", values::values_routes(&state))
        .merge(users::user_routes(&state));

    if state.config.env == Env::Local {
        base_router = base_router.merge(dev::dev_routes());
    }

    base_router
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for one request, tagged with its `x-request-id` so every log line of
/// the request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
