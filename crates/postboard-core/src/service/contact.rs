//! Contact requests: anyone may leave one, only admins read or remove them.

use chrono::Utc;

use postboard_types::contact::{Contact, CreateContactInput};
use postboard_types::error::{ContactError, RepositoryError};
use postboard_types::user::{Caller, Role};

use crate::auth::AccessPolicy;
use crate::repository::contact::{ContactRepository, NewContact};

pub struct ContactService<C: ContactRepository, A: AccessPolicy> {
    contacts: C,
    policy: A,
}

impl<C: ContactRepository, A: AccessPolicy> ContactService<C, A> {
    pub fn new(contacts: C, policy: A) -> Self {
        Self { contacts, policy }
    }

    pub async fn submit_contact(&self, input: CreateContactInput) -> Result<Contact, ContactError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(ContactError::InvalidInput("name cannot be empty".to_string()));
        }

        let phone = input.phone.trim();
        let digits = phone.chars().filter(char::is_ascii_digit).count();
        if digits < 5
            || !phone
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')' | '.'))
        {
            return Err(ContactError::InvalidInput(format!(
                "'{phone}' is not a phone number"
            )));
        }

        let contact = NewContact {
            name: name.to_string(),
            phone: phone.to_string(),
            message: input
                .message
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty()),
            created_at: Utc::now(),
        };

        let contact = self.contacts.create(&contact).await?;
        tracing::info!(contact_id = contact.id, "contact request received");
        Ok(contact)
    }

    pub async fn list_contacts(&self, caller: &Caller) -> Result<Vec<Contact>, ContactError> {
        self.policy.require_role(caller, Role::Admin)?;
        Ok(self.contacts.list().await?)
    }

    pub async fn get_contact(&self, caller: &Caller, id: i64) -> Result<Contact, ContactError> {
        self.policy.require_role(caller, Role::Admin)?;
        self.contacts.get_by_id(id).await?.ok_or(ContactError::NotFound)
    }

    pub async fn delete_contact(&self, caller: &Caller, id: i64) -> Result<(), ContactError> {
        self.policy.require_role(caller, Role::Admin)?;
        self.contacts.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound => ContactError::NotFound,
            other => ContactError::Storage(other),
        })
    }
}
