//! Capability checks for mutations.
//!
//! Services never inspect the caller themselves; they ask an `AccessPolicy`
//! and propagate its error unchanged when a check fails.

use postboard_types::error::AuthError;
use postboard_types::post::PostId;
use postboard_types::user::{Caller, Role, UserId};

use crate::repository::post::PostRepository;

pub trait AccessPolicy: Send + Sync {
    /// Pass iff the caller is signed in. Returns the caller's id.
    fn require_authenticated(&self, caller: &Caller) -> Result<UserId, AuthError>;

    /// Pass iff the caller may modify the post `id`.
    fn require_resource_owner(
        &self,
        caller: &Caller,
        id: PostId,
    ) -> impl std::future::Future<Output = Result<UserId, AuthError>> + Send;

    /// Pass iff the caller holds `role`.
    fn require_role(&self, caller: &Caller, role: Role) -> Result<UserId, AuthError> {
        let id = self.require_authenticated(caller)?;
        if caller.has_role(role) {
            Ok(id)
        } else {
            Err(AuthError::Forbidden(format!("requires the '{role}' role")))
        }
    }
}

/// Owner-or-admin policy backed by the post store.
pub struct OwnershipPolicy<R: PostRepository> {
    posts: R,
}

impl<R: PostRepository> OwnershipPolicy<R> {
    pub fn new(posts: R) -> Self {
        Self { posts }
    }
}

impl<R: PostRepository> AccessPolicy for OwnershipPolicy<R> {
    fn require_authenticated(&self, caller: &Caller) -> Result<UserId, AuthError> {
        caller.user_id().ok_or(AuthError::Unauthenticated)
    }

    async fn require_resource_owner(&self, caller: &Caller, id: PostId) -> Result<UserId, AuthError> {
        let user_id = self.require_authenticated(caller)?;

        let post = self.posts.find_unique(id).await?.ok_or(AuthError::NotFound)?;

        if post.author_id == user_id || caller.has_role(Role::Admin) {
            Ok(user_id)
        } else {
            tracing::debug!(post_id = %id, user_id = %user_id, "ownership check failed");
            Err(AuthError::Forbidden("you do not own this post".to_string()))
        }
    }
}
