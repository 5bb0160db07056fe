//! SQLite user repository implementation.

use postboard_core::repository::user::{NewUser, UserRepository};
use postboard_types::error::RepositoryError;
use postboard_types::user::{Role, User, UserId};
use sqlx::Row;

use super::pool::{format_datetime, parse_datetime, query_error, DatabasePool};

/// SQLite-backed implementation of `UserRepository`.
#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain User.
pub(crate) struct UserRow {
    id: i64,
    username: String,
    email: String,
    roles: String,
    created_at: String,
}

impl UserRow {
    pub(crate) fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            roles: row.try_get("roles")?,
            created_at: row.try_get("created_at")?,
        })
    }

    pub(crate) fn into_user(self) -> Result<User, RepositoryError> {
        let roles: Vec<Role> = serde_json::from_str(&self.roles)
            .map_err(|e| RepositoryError::Query(format!("invalid roles JSON: {e}")))?;

        Ok(User {
            id: UserId(self.id),
            username: self.username,
            email: self.email,
            roles,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

const USER_COLUMNS: &str = "id, username, email, roles, created_at";

impl SqliteUserRepository {
    async fn fetch_one_where(
        &self,
        clause: &str,
        value: impl AsRef<str>,
    ) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {clause} = ?");
        let row = sqlx::query(&sql)
            .bind(value.as_ref())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => Ok(Some(UserRow::from_row(&row).map_err(query_error)?.into_user()?)),
            None => Ok(None),
        }
    }
}

impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let roles_json =
            serde_json::to_string(&user.roles).map_err(|e| RepositoryError::Query(e.to_string()))?;

        let result = sqlx::query(
            "INSERT INTO users (username, email, roles, token_hash, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&roles_json)
        .bind(&user.token_hash)
        .bind(format_datetime(&user.created_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(done) => Ok(User {
                id: UserId(done.last_insert_rowid()),
                username: user.username.clone(),
                email: user.email.clone(),
                roles: user.roles.clone(),
                created_at: user.created_at,
            }),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => Err(
                RepositoryError::Conflict(format!("username '{}' already exists", user.username)),
            ),
            Err(e) => Err(query_error(e)),
        }
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id.0)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => Ok(Some(UserRow::from_row(&row).map_err(query_error)?.into_user()?)),
            None => Ok(None),
        }
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        self.fetch_one_where("username", username).await
    }

    async fn get_by_token_hash(&self, token_hash: &str) -> Result<Option<User>, RepositoryError> {
        self.fetch_one_where("token_hash", token_hash).await
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id ASC"))
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;

        let mut users = Vec::with_capacity(rows.len());
        for row in &rows {
            users.push(UserRow::from_row(row).map_err(query_error)?.into_user()?);
        }
        Ok(users)
    }
}
