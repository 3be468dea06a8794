use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Row, postgres::PgRow};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::schema;

/// Placeholder image reference carried until a real one is attached.
pub const USER_IMAGE_PLACEHOLDER: &str = " ";

// --- Persisted Entity ---

/// User
///
/// The user record stored in the `"user"` table. The first seven fields are
/// persisted under their exact legacy column names; the remaining five are
/// transient and only carry request-scoped data between layers. Which is which
/// is declared once in `schema::USER_FIELDS`; both the write path and the
/// `FromRow` read path go through it.
///
/// JSON uses camelCase names (`lastName`, `userImage`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct User {
    // Primary key, assigned by storage on insert. 0 until persisted.
    pub id: i32,
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub email_address: Option<String>,
    pub user_type: Option<String>,
    pub password: Option<String>,

    // Transient
    pub confirm_password: Option<String>,
    pub uid: Option<String>,
    pub message: Option<String>,
    pub user_image: Option<String>,
    pub user_full_name: Option<String>,
}

impl Default for User {
    fn default() -> Self {
        Self {
            id: 0,
            name: None,
            last_name: None,
            phone_number: None,
            email_address: None,
            user_type: None,
            password: None,
            confirm_password: None,
            uid: None,
            message: None,
            user_image: Some(USER_IMAGE_PLACEHOLDER.to_string()),
            user_full_name: None,
        }
    }
}

impl<'r> FromRow<'r, PgRow> for User {
    /// Reads persisted columns by their descriptor names. Transient fields are
    /// never stored, so they take their defaults (`user_image` = `" "`).
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let text = |field: &'static str| -> Result<Option<String>, sqlx::Error> {
            let descriptor = schema::field(field)
                .ok_or_else(|| sqlx::Error::ColumnNotFound(field.to_string()))?;
            row.try_get(descriptor.column)
        };

        Ok(Self {
            id: row.try_get(schema::primary_key().column)?,
            name: text("name")?,
            last_name: text("last_name")?,
            phone_number: text("phone_number")?,
            email_address: text("email_address")?,
            user_type: text("user_type")?,
            password: text("password")?,
            ..Self::default()
        })
    }
}

/// ColumnValue
///
/// A single field value as handed to the mapping layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColumnValue {
    Int(i32),
    Text(Option<String>),
}

impl User {
    /// column_value
    ///
    /// Reads a field by its Rust name. Returns `None` for names the record does
    /// not declare.
    pub fn column_value(&self, field: &str) -> Option<ColumnValue> {
        let text = |value: &Option<String>| Some(ColumnValue::Text(value.clone()));
        match field {
            "id" => Some(ColumnValue::Int(self.id)),
            "name" => text(&self.name),
            "last_name" => text(&self.last_name),
            "phone_number" => text(&self.phone_number),
            "email_address" => text(&self.email_address),
            "user_type" => text(&self.user_type),
            "password" => text(&self.password),
            "confirm_password" => text(&self.confirm_password),
            "uid" => text(&self.uid),
            "message" => text(&self.message),
            "user_image" => text(&self.user_image),
            "user_full_name" => text(&self.user_full_name),
            _ => None,
        }
    }

    /// Copy safe to hand back to clients: credential fields are cleared.
    pub fn redacted(mut self) -> Self {
        self.password = None;
        self.confirm_password = None;
        self
    }
}

// --- Request / Response Payloads ---

/// ResolveQuery
///
/// Query string for `GET /api/routes/resolve`.
#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
pub struct ResolveQuery {
    /// Client-side path to resolve. Missing means the landing path.
    #[serde(default)]
    pub path: String,
}

/// DevTokenRequest
///
/// Input payload for the local-only token endpoint (POST /dev/token).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct DevTokenRequest {
    pub subject: String,
    #[serde(default)]
    pub roles: Vec<String>,
    /// Lifetime in seconds. Defaults to one hour.
    #[serde(default)]
    pub ttl_seconds: Option<i64>,
}

/// DevTokenResponse
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct DevTokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}
