//! User accounts and token authentication.

use chrono::Utc;

use postboard_types::error::{RepositoryError, UserError};
use postboard_types::user::{CreateUserRequest, Role, User, UserId};

use crate::repository::user::{NewUser, UserRepository};
use crate::service::hash::TokenIssuer;

/// A freshly created user and the only copy of their plaintext token.
#[derive(Debug, Clone)]
pub struct IssuedUser {
    pub user: User,
    pub token: String,
}

pub struct UserService<U: UserRepository, T: TokenIssuer> {
    users: U,
    tokens: T,
}

impl<U: UserRepository, T: TokenIssuer> UserService<U, T> {
    pub fn new(users: U, tokens: T) -> Self {
        Self { users, tokens }
    }

    /// Register a user. Users with no explicit role become members.
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<IssuedUser, UserError> {
        let username = request.username.trim().to_string();
        if username.is_empty() {
            return Err(UserError::InvalidInput("username cannot be empty".to_string()));
        }
        if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(UserError::InvalidInput(format!(
                "username '{username}' may only contain letters, digits, '-' and '_'"
            )));
        }

        let email = request.email.trim().to_string();
        if !email.contains('@') {
            return Err(UserError::InvalidInput(format!("'{email}' is not an email address")));
        }

        let mut roles: Vec<Role> = Vec::with_capacity(request.roles.len());
        for role in request.roles {
            if !roles.contains(&role) {
                roles.push(role);
            }
        }
        if roles.is_empty() {
            roles.push(Role::Member);
        }

        let token = self.tokens.issue();
        let new_user = NewUser {
            username: username.clone(),
            email,
            roles,
            token_hash: self.tokens.hash(&token),
            created_at: Utc::now(),
        };

        let user = self.users.create(&new_user).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => UserError::UsernameConflict(username),
            other => UserError::Storage(other),
        })?;

        tracing::info!(user_id = %user.id, username = %user.username, "user created");
        Ok(IssuedUser { user, token })
    }

    /// Resolve a plaintext token to its user. Unknown tokens yield `None`.
    pub async fn authenticate(&self, token: &str) -> Result<Option<User>, UserError> {
        let token = token.trim();
        if token.is_empty() {
            return Ok(None);
        }
        Ok(self.users.get_by_token_hash(&self.tokens.hash(token)).await?)
    }

    pub async fn get_user(&self, id: UserId) -> Result<User, UserError> {
        self.users.get_by_id(id).await?.ok_or(UserError::NotFound)
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<User, UserError> {
        self.users
            .get_by_username(username)
            .await?
            .ok_or(UserError::NotFound)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, UserError> {
        Ok(self.users.list().await?)
    }
}
