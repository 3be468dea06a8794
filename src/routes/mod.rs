//! Router Module Index
//!
//! Splits the HTTP surface by access requirement. Gated routers attach the
//! `gate::enforce` layer per route, so every protected endpoint names its
//! `AuthorizationRule` right where it is registered.

/// Routes open to anonymous callers: health, the client route table and
/// user registration.
pub mod public;

/// The `/api/values` endpoints, each guarded by one rule from `gate::VALUES_RULES`.
pub mod values;

/// User record reads, guarded by credential and role.
pub mod users;

/// Local-only development helpers. Mounted only in `Env::Local`.
pub mod dev;
