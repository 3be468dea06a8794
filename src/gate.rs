use std::sync::Arc;

use axum::{
    extract::{FromRef, Request, State},
    middleware::Next,
    response::Response,
};

use crate::{AppState, auth::Identity, config::AppConfig, error::ApiError};

/// Requirement
///
/// What a caller must hold for an endpoint to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Any resolved identity, regardless of role.
    Authenticated,
    /// The identity must carry exactly this role name.
    Role(&'static str),
}

/// AuthorizationRule
///
/// Static declaration binding an endpoint route (relative to the router it is
/// mounted on) to its requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorizationRule {
    pub route: &'static str,
    pub requirement: Requirement,
}

pub const ADMIN_RULE: AuthorizationRule = AuthorizationRule {
    route: "/admin",
    requirement: Requirement::Role("Admin"),
};

pub const USER_RULE: AuthorizationRule = AuthorizationRule {
    route: "/user",
    requirement: Requirement::Role("User"),
};

pub const ALL_RULE: AuthorizationRule = AuthorizationRule {
    route: "/all",
    requirement: Requirement::Authenticated,
};

/// Rules for the `/api/values` endpoints.
pub const VALUES_RULES: [AuthorizationRule; 3] = [ADMIN_RULE, USER_RULE, ALL_RULE];

/// Listing every stored user is reserved to administrators.
pub const USER_DIRECTORY_RULE: AuthorizationRule = AuthorizationRule {
    route: "/api/users",
    requirement: Requirement::Role("Admin"),
};

/// Reading a single user only needs a valid credential.
pub const USER_LOOKUP_RULE: AuthorizationRule = AuthorizationRule {
    route: "/api/users/{id}",
    requirement: Requirement::Authenticated,
};

/// AuthorizationChecker
///
/// Decides whether an already-verified identity satisfies a requirement. It
/// never sees credentials; those are verified by the `Identity` extractor.
pub trait AuthorizationChecker: Send + Sync {
    fn permits(&self, identity: &Identity, requirement: &Requirement) -> bool;
}

/// Shared handle to the checker, held in `AppState`.
pub type CheckerState = Arc<dyn AuthorizationChecker>;

/// RoleChecker
///
/// Role names compare exactly (case-sensitive).
#[derive(Debug, Default, Clone, Copy)]
pub struct RoleChecker;

impl AuthorizationChecker for RoleChecker {
    fn permits(&self, identity: &Identity, requirement: &Requirement) -> bool {
        match requirement {
            Requirement::Authenticated => true,
            Requirement::Role(role) => identity.has_role(role),
        }
    }
}

/// Gate
///
/// Middleware state for one gated route: the rule to enforce, the checker that
/// evaluates it, and the configuration the `Identity` extractor needs.
#[derive(Clone)]
pub struct Gate {
    pub rule: AuthorizationRule,
    pub checker: CheckerState,
    pub config: AppConfig,
}

impl Gate {
    pub fn new(state: &AppState, rule: AuthorizationRule) -> Self {
        Self {
            rule,
            checker: state.checker.clone(),
            config: state.config.clone(),
        }
    }
}

impl FromRef<Gate> for AppConfig {
    fn from_ref(gate: &Gate) -> AppConfig {
        gate.config.clone()
    }
}

/// enforce
///
/// Route-layer middleware. Resolving `Identity` happens first, so a missing or
/// invalid credential is rejected with 401 before anything else runs. An
/// identity that fails the rule gets 403. On success the identity is attached
/// to the request extensions and the endpoint runs.
pub async fn enforce(
    State(gate): State<Gate>,
    identity: Identity,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !gate.checker.permits(&identity, &gate.rule.requirement) {
        tracing::debug!(
            subject = %identity.subject,
            route = gate.rule.route,
            requirement = ?gate.rule.requirement,
            "authorization denied"
        );
        return Err(ApiError::forbidden("Access denied"));
    }

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
