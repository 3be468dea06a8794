use crate::{
    AppState,
    auth::{self, Identity},
    error::{ApiError, ErrorResponse},
    models::{DevTokenRequest, DevTokenResponse, ResolveQuery, User},
    route_table::RouteEntry,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

/// Token lifetime handed out by `/dev/token` when the caller does not ask for one.
const DEV_TOKEN_TTL_SECONDS: i64 = 3600;

// --- Authorization Gate (/api/values) ---

/// admin_endpoint
///
/// [Role: Admin] The gate layer has already verified the role; reaching the
/// body means the caller is authorized.
#[utoipa::path(
    get,
    path = "/api/values/admin",
    responses(
        (status = 200, description = "Authorized", body = String, content_type = "text/plain"),
        (status = 401, description = "Missing or invalid credential", body = ErrorResponse),
        (status = 403, description = "Role 'Admin' required", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn admin_endpoint() -> &'static str {
    "Welcome back!! Admin"
}

/// user_endpoint
///
/// [Role: User]
#[utoipa::path(
    get,
    path = "/api/values/user",
    responses(
        (status = 200, description = "Authorized", body = String, content_type = "text/plain"),
        (status = 401, description = "Missing or invalid credential", body = ErrorResponse),
        (status = 403, description = "Role 'User' required", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn user_endpoint() -> &'static str {
    "Welcome back!! User"
}

/// all_endpoint
///
/// [Authenticated] Any verified identity, whatever its roles.
#[utoipa::path(
    get,
    path = "/api/values/all",
    responses(
        (status = 200, description = "Authorized", body = String, content_type = "text/plain"),
        (status = 401, description = "Missing or invalid credential", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn all_endpoint() -> &'static str {
    "Hello Authenticated User"
}

// --- Route Table (/api/routes) ---

/// list_routes
///
/// [Public Route] The client router's table, in declaration order.
#[utoipa::path(
    get,
    path = "/api/routes",
    responses((status = 200, description = "Route table", body = [RouteEntry]))
)]
pub async fn list_routes(State(state): State<AppState>) -> Json<Vec<RouteEntry>> {
    Json(state.routes.entries().to_vec())
}

/// resolve_route
///
/// [Public Route] Resolves a client path to its page. The empty path and `/`
/// resolve to the landing page; anything unregistered is a 404.
#[utoipa::path(
    get,
    path = "/api/routes/resolve",
    params(ResolveQuery),
    responses(
        (status = 200, description = "Matched", body = RouteEntry),
        (status = 404, description = "No route registered for path", body = ErrorResponse)
    )
)]
pub async fn resolve_route(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> Result<Json<RouteEntry>, ApiError> {
    match state.routes.resolve(&query.path) {
        Some(entry) => {
            tracing::debug!(path = %query.path, component = entry.component.component(), "route resolved");
            Ok(Json(entry.clone()))
        }
        None => Err(ApiError::not_found(format!(
            "no route registered for {:?}",
            query.path
        ))),
    }
}

// --- User Records (/api/users) ---

/// create_user
///
/// [Public Route] Persists a new user record. Any `id` in the body is ignored
/// (storage assigns it) and transient fields are dropped by the repository.
/// The response never echoes credentials.
///
/// `password` is written to the `Password` column exactly as received. Callers
/// must hash it before posting; redacting the response does not protect the
/// stored value.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = User,
    responses(
        (status = 201, description = "Created", body = User),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<User>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = state.repo.create_user(User { id: 0, ..payload }).await?;
    tracing::info!(user_id = user.id, "user created");
    Ok((StatusCode::CREATED, Json(user.redacted())))
}

/// get_user
///
/// [Authenticated Route] Fetches one user record by id.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "Found", body = User),
        (status = 401, description = "Missing or invalid credential", body = ErrorResponse),
        (status = 404, description = "Not Found", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn get_user(
    Extension(identity): Extension<Identity>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<User>, ApiError> {
    tracing::debug!(subject = %identity.subject, user_id = id, "user lookup");
    state
        .repo
        .get_user(id)
        .await?
        .map(|user| Json(user.redacted()))
        .ok_or_else(|| ApiError::not_found("User not found"))
}

/// list_users
///
/// [Role: Admin] Every stored user record, ordered by id.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All users", body = [User]),
        (status = 401, description = "Missing or invalid credential", body = ErrorResponse),
        (status = 403, description = "Role 'Admin' required", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.repo.list_users().await?;
    Ok(Json(users.into_iter().map(User::redacted).collect()))
}

// --- Development ---

/// issue_dev_token
///
/// [Local Only] Mints a bearer token signed with the configured secret so the
/// gated endpoints can be exercised without an identity provider. The route
/// is not mounted outside `Env::Local`.
#[utoipa::path(
    post,
    path = "/dev/token",
    request_body = DevTokenRequest,
    responses((status = 200, description = "Token issued", body = DevTokenResponse))
)]
pub async fn issue_dev_token(
    State(state): State<AppState>,
    Json(payload): Json<DevTokenRequest>,
) -> Result<Json<DevTokenResponse>, ApiError> {
    if payload.subject.trim().is_empty() {
        return Err(ApiError::bad_request("subject must not be empty"));
    }

    let ttl = payload.ttl_seconds.unwrap_or(DEV_TOKEN_TTL_SECONDS);
    let lifetime = chrono::Duration::try_seconds(ttl)
        .filter(|lifetime| *lifetime > chrono::Duration::zero())
        .ok_or_else(|| ApiError::bad_request("ttl_seconds must be a positive number of seconds"))?;

    let access_token = auth::issue_token(
        &state.config.jwt_secret,
        &payload.subject,
        &payload.roles,
        lifetime,
    )
    .map_err(|e| {
        tracing::error!(error = ?e, "failed to sign dev token");
        ApiError::internal_server_error("Failed to issue token")
    })?;

    Ok(Json(DevTokenResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: ttl,
    }))
}
