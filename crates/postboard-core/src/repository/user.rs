//! User repository trait definition.

use chrono::{DateTime, Utc};

use postboard_types::error::RepositoryError;
use postboard_types::user::{Role, User, UserId};

/// A validated user ready for insertion.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub roles: Vec<Role>,
    /// Hash of the user's API token; the plaintext is never stored.
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
}

pub trait UserRepository: Send + Sync {
    /// Insert a user. Fails with `Conflict` on a duplicate username.
    fn create(
        &self,
        user: &NewUser,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: UserId,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    fn get_by_username(
        &self,
        username: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    fn get_by_token_hash(
        &self,
        token_hash: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    fn list(&self) -> impl std::future::Future<Output = Result<Vec<User>, RepositoryError>> + Send;
}
