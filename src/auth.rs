use std::collections::BTreeSet;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    config::{AppConfig, Env},
    error::ApiError,
};

/// Development-only header naming the caller (Env::Local).
pub const DEV_USER_HEADER: &str = "x-user-id";
/// Development-only header listing the caller's roles, comma separated (Env::Local).
pub const DEV_ROLE_HEADER: &str = "x-user-role";

/// RoleClaim
///
/// Identity providers emit the `role` claim either as a single string or as
/// an array when the subject holds several roles. Both shapes are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleClaim {
    One(String),
    Many(Vec<String>),
}

impl Default for RoleClaim {
    fn default() -> Self {
        RoleClaim::Many(Vec::new())
    }
}

impl RoleClaim {
    pub fn into_roles(self) -> Vec<String> {
        match self {
            RoleClaim::One(role) => vec![role],
            RoleClaim::Many(roles) => roles,
        }
    }
}

/// Claims
///
/// Payload expected inside a bearer token. Signed with the shared secret and
/// checked on every gated request.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): opaque identifier of the caller, as issued by the identity provider.
    pub sub: String,
    /// Expiration Time (exp): tokens past this timestamp are rejected.
    pub exp: usize,
    /// Issued At (iat).
    pub iat: usize,
    /// Roles granted to the subject. Absent means "authenticated, no roles".
    #[serde(default)]
    pub role: RoleClaim,
}

/// Identity
///
/// The resolved caller of a request: the verdict of the credential check. The
/// authorization gate decides on this alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
    pub roles: BTreeSet<String>,
}

impl Identity {
    pub fn new<I, R>(subject: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        Self {
            subject: subject.into(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

/// AuthError
///
/// Why no identity could be resolved. Every variant answers 401.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing bearer credential")]
    MissingCredential,
    #[error("bearer credential has expired")]
    Expired,
    #[error("invalid bearer credential")]
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

/// Identity Extractor
///
/// Makes `Identity` usable as a handler or middleware argument. Resolution order:
/// 1. Local bypass: in `Env::Local` only, `x-user-id` (plus optional `x-user-role`)
///    stands in for a token.
/// 2. Bearer token: the `Authorization: Bearer <jwt>` header is decoded and its
///    signature and expiry verified with the configured secret.
///
/// Rejection: `AuthError` (401).
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);

        if config.env == Env::Local {
            if let Some(identity) = local_bypass(parts) {
                tracing::debug!(subject = %identity.subject, "identity resolved via local bypass");
                return Ok(identity);
            }
        }

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(AuthError::MissingCredential)?;

        let claims = verify_token(&config.jwt_secret, token)?;

        Ok(Identity::new(claims.sub, claims.role.into_roles()))
    }
}

fn local_bypass(parts: &Parts) -> Option<Identity> {
    let subject = parts.headers.get(DEV_USER_HEADER)?.to_str().ok()?;
    if subject.is_empty() {
        return None;
    }

    let roles = parts
        .headers
        .get(DEV_ROLE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|role| !role.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    Some(Identity::new(subject, roles))
}

/// verify_token
///
/// Decodes an HS256 token and enforces its expiry.
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, AuthError> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::default();
    validation.validate_exp = true;
    // Expiry is exact: tokens are not honoured past `exp`.
    validation.leeway = 0;

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::Expired,
            _ => AuthError::InvalidToken,
        })
}

/// issue_token
///
/// Mints a token in the shape `verify_token` accepts. Real credentials come
/// from the external identity provider; this backs tests and the local-only
/// `/dev/token` endpoint.
pub fn issue_token(
    secret: &str,
    subject: &str,
    roles: &[String],
    ttl: Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let expires = now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC);
    let claims = Claims {
        sub: subject.to_string(),
        iat: now.timestamp().max(0) as usize,
        exp: expires.timestamp().max(0) as usize,
        role: RoleClaim::Many(roles.to_vec()),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}
