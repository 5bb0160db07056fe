//! Contact request repository trait definition.

use chrono::{DateTime, Utc};

use postboard_types::contact::Contact;
use postboard_types::error::RepositoryError;

/// A validated contact request ready for insertion.
#[derive(Debug, Clone)]
pub struct NewContact {
    pub name: String,
    pub phone: String,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub trait ContactRepository: Send + Sync {
    fn create(
        &self,
        contact: &NewContact,
    ) -> impl std::future::Future<Output = Result<Contact, RepositoryError>> + Send;

    /// All contact requests, newest first.
    fn list(&self) -> impl std::future::Future<Output = Result<Vec<Contact>, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: i64,
    ) -> impl std::future::Future<Output = Result<Option<Contact>, RepositoryError>> + Send;

    /// Fails with `NotFound` when no such contact exists.
    fn delete(&self, id: i64) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
