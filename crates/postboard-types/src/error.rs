use thiserror::Error;

/// Failures raised by the access policy. Propagated unmodified by services.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("resource not found")]
    NotFound,

    /// The store failed while checking ownership. Carried as-is.
    #[error(transparent)]
    Lookup(#[from] RepositoryError),
}

/// Errors related to post operations.
#[derive(Debug, Error)]
pub enum PostError {
    #[error("post not found")]
    NotFound,

    #[error("invalid post input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

/// Errors related to contact requests.
#[derive(Debug, Error)]
pub enum ContactError {
    #[error("contact not found")]
    NotFound,

    #[error("invalid contact input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

/// Errors related to user accounts.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("user not found")]
    NotFound,

    #[error("username '{0}' already exists")]
    UsernameConflict(String),

    #[error("invalid user input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

/// Errors from repository operations (used by trait definitions in postboard-core).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_error_wraps_auth_error() {
        let err: PostError = AuthError::Unauthenticated.into();
        assert!(matches!(err, PostError::Auth(AuthError::Unauthenticated)));
        assert_eq!(err.to_string(), "authentication required");
    }

    #[test]
    fn test_store_failure_propagates_unmodified() {
        let err: PostError = RepositoryError::Connection.into();
        assert!(matches!(err, PostError::Storage(RepositoryError::Connection)));
        assert_eq!(err.to_string(), "database connection error");
    }

    #[test]
    fn test_auth_lookup_keeps_store_error() {
        let err: AuthError = RepositoryError::Connection.into();
        assert_eq!(err, AuthError::Lookup(RepositoryError::Connection));
        assert_eq!(err.to_string(), "database connection error");

        let err: PostError = err.into();
        assert!(matches!(err, PostError::Auth(AuthError::Lookup(RepositoryError::Connection))));
    }

    #[test]
    fn test_user_error_display() {
        let err = UserError::UsernameConflict("ada".to_string());
        assert_eq!(err.to_string(), "username 'ada' already exists");
    }

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }
}
