use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    models::{ColumnValue, User},
    schema::{self, USER_TABLE},
};

/// Repository Trait
///
/// Persistence contract for user records. Handlers only see this trait, so the
/// Postgres implementation can be swapped for a mock in tests.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Inserts the persisted fields of `user` (never its id or transient
    /// fields) and returns the stored row with its assigned id.
    async fn create_user(&self, user: User) -> Result<User, sqlx::Error>;
    async fn get_user(&self, id: i32) -> Result<Option<User>, sqlx::Error>;
    async fn list_users(&self) -> Result<Vec<User>, sqlx::Error>;
}

/// RepositoryState
///
/// The shared handle to the persistence layer held in the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// insert_user_query
///
/// Builds the INSERT for `user` from the schema descriptor: one bound value per
/// insertable column, every persisted column returned.
pub fn insert_user_query(user: &User) -> QueryBuilder<'static, Postgres> {
    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!("INSERT INTO {USER_TABLE} ("));

    let mut columns = builder.separated(", ");
    for descriptor in schema::insertable_fields() {
        columns.push(descriptor.quoted_column());
    }

    builder.push(") VALUES (");
    let mut values = builder.separated(", ");
    for descriptor in schema::insertable_fields() {
        match user.column_value(descriptor.field) {
            Some(ColumnValue::Int(value)) => values.push_bind(value),
            Some(ColumnValue::Text(value)) => values.push_bind(value),
            None => values.push("NULL"),
        };
    }

    builder.push(format!(") RETURNING {}", schema::persisted_column_list()));
    builder
}

/// PostgresRepository
///
/// The `Repository` implementation backed by PostgreSQL.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// ensure_schema
    ///
    /// Creates the user table if it is missing. Only run in `Env::Local`;
    /// production schemas are managed outside the service.
    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(&schema::create_table_sql())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn create_user(&self, user: User) -> Result<User, sqlx::Error> {
        let mut builder = insert_user_query(&user);
        builder
            .build_query_as::<User>()
            .fetch_one(&self.pool)
            .await
    }

    async fn get_user(&self, id: i32) -> Result<Option<User>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM {USER_TABLE} WHERE {} = $1",
            schema::persisted_column_list(),
            schema::primary_key().quoted_column()
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn list_users(&self) -> Result<Vec<User>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM {USER_TABLE} ORDER BY {}",
            schema::persisted_column_list(),
            schema::primary_key().quoted_column()
        );

        sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await
    }
}
