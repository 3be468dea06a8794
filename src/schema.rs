//! Explicit mapping metadata for the `User` record.
//!
//! Each field of [`User`] is described once here: the column it maps to, its
//! SQL type, whether it is persisted and whether it is the primary key. The
//! repository and the persistence serializer only ever consult this table, so
//! a field marked transient cannot reach storage.

use serde_json::{Map, Value};

use crate::models::User;

/// Table the user record is stored in. Quoted because `user` is reserved in Postgres.
pub const USER_TABLE: &str = r#""user""#;

/// FieldDescriptor
///
/// Mapping metadata for one field of the user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Rust field name on `User`.
    pub field: &'static str,
    /// Storage column name, preserved exactly.
    pub column: &'static str,
    pub sql_type: &'static str,
    pub persisted: bool,
    pub primary_key: bool,
}

impl FieldDescriptor {
    const fn key(field: &'static str, column: &'static str, sql_type: &'static str) -> Self {
        Self {
            field,
            column,
            sql_type,
            persisted: true,
            primary_key: true,
        }
    }

    const fn column(field: &'static str, column: &'static str) -> Self {
        Self {
            field,
            column,
            sql_type: "TEXT",
            persisted: true,
            primary_key: false,
        }
    }

    const fn transient(field: &'static str, column: &'static str) -> Self {
        Self {
            field,
            column,
            sql_type: "TEXT",
            persisted: false,
            primary_key: false,
        }
    }

    /// Column name quoted for use in SQL.
    pub fn quoted_column(&self) -> String {
        format!("\"{}\"", self.column)
    }
}

/// The full user schema, in declaration order.
pub static USER_FIELDS: [FieldDescriptor; 12] = [
    FieldDescriptor::key("id", "id", "INTEGER"),
    FieldDescriptor::column("name", "name"),
    FieldDescriptor::column("last_name", "LastName"),
    FieldDescriptor::column("phone_number", "PhoneNumber"),
    FieldDescriptor::column("email_address", "EmailAddress"),
    FieldDescriptor::column("user_type", "UserType"),
    FieldDescriptor::column("password", "Password"),
    FieldDescriptor::transient("confirm_password", "ConfirmPassword"),
    FieldDescriptor::transient("uid", "Uid"),
    FieldDescriptor::transient("message", "Message"),
    FieldDescriptor::transient("user_image", "UserImage"),
    FieldDescriptor::transient("user_full_name", "UserFullName"),
];

pub fn field(name: &str) -> Option<&'static FieldDescriptor> {
    USER_FIELDS.iter().find(|descriptor| descriptor.field == name)
}

pub fn primary_key() -> &'static FieldDescriptor {
    // USER_FIELDS declares the key first.
    &USER_FIELDS[0]
}

pub fn persisted_fields() -> impl Iterator<Item = &'static FieldDescriptor> {
    USER_FIELDS.iter().filter(|descriptor| descriptor.persisted)
}

/// Fields written on insert: persisted, minus the storage-assigned key.
pub fn insertable_fields() -> impl Iterator<Item = &'static FieldDescriptor> {
    persisted_fields().filter(|descriptor| !descriptor.primary_key)
}

/// Comma separated, quoted list of every persisted column. Used for SELECT/RETURNING.
pub fn persisted_column_list() -> String {
    persisted_fields()
        .map(FieldDescriptor::quoted_column)
        .collect::<Vec<_>>()
        .join(", ")
}

/// to_persisted_map
///
/// Serializes `user` the way it is written to storage: keyed by column name,
/// persisted fields only.
pub fn to_persisted_map(user: &User) -> Map<String, Value> {
    persisted_fields()
        .filter_map(|descriptor| {
            let value = user.column_value(descriptor.field)?;
            let value = serde_json::to_value(value).ok()?;
            Some((descriptor.column.to_string(), value))
        })
        .collect()
}

/// create_table_sql
///
/// DDL for the user table. The key becomes an identity column; transient
/// fields get no column.
pub fn create_table_sql() -> String {
    let columns = persisted_fields()
        .map(|descriptor| {
            if descriptor.primary_key {
                format!(
                    "{} {} GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY",
                    descriptor.quoted_column(),
                    descriptor.sql_type
                )
            } else {
                format!("{} {}", descriptor.quoted_column(), descriptor.sql_type)
            }
        })
        .collect::<Vec<_>>()
        .join(", ");

    format!("CREATE TABLE IF NOT EXISTS {USER_TABLE} ({columns})")
}
