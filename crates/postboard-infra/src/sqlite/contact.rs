//! SQLite contact request repository implementation.

use postboard_core::repository::contact::{ContactRepository, NewContact};
use postboard_types::contact::Contact;
use postboard_types::error::RepositoryError;
use sqlx::Row;

use super::pool::{format_datetime, parse_datetime, query_error, DatabasePool};

/// SQLite-backed implementation of `ContactRepository`.
#[derive(Clone)]
pub struct SqliteContactRepository {
    pool: DatabasePool,
}

impl SqliteContactRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn contact_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Contact, RepositoryError> {
    let created_at: String = row.try_get("created_at").map_err(query_error)?;
    Ok(Contact {
        id: row.try_get("id").map_err(query_error)?,
        name: row.try_get("name").map_err(query_error)?,
        phone: row.try_get("phone").map_err(query_error)?,
        message: row.try_get("message").map_err(query_error)?,
        created_at: parse_datetime(&created_at)?,
    })
}

impl ContactRepository for SqliteContactRepository {
    async fn create(&self, contact: &NewContact) -> Result<Contact, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO contacts (name, phone, message, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&contact.name)
        .bind(&contact.phone)
        .bind(&contact.message)
        .bind(format_datetime(&contact.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(Contact {
            id: result.last_insert_rowid(),
            name: contact.name.clone(),
            phone: contact.phone.clone(),
            message: contact.message.clone(),
            created_at: contact.created_at,
        })
    }

    async fn list(&self) -> Result<Vec<Contact>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, name, phone, message, created_at FROM contacts ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.iter().map(contact_from_row).collect()
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Contact>, RepositoryError> {
        let row = sqlx::query("SELECT id, name, phone, message, created_at FROM contacts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        row.as_ref().map(contact_from_row).transpose()
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = ?")
            .bind(id)
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::test_db;
    use chrono::{Duration, Utc};

    fn new_contact(name: &str, minutes_ago: i64) -> NewContact {
        NewContact {
            name: name.to_string(),
            phone: "+1 555 0100".to_string(),
            message: Some(format!("hello from {name}")),
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[tokio::test]
    async fn test_create_list_newest_first() {
        let db = test_db().await;
        let repo = SqliteContactRepository::new(db.pool.clone());

        repo.create(&new_contact("old", 10)).await.unwrap();
        let newer = repo.create(&new_contact("new", 1)).await.unwrap();
        let mut silent = new_contact("silent", 20);
        silent.message = None;
        repo.create(&silent).await.unwrap();

        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["new", "old", "silent"]);

        let fetched = repo.get_by_id(newer.id).await.unwrap().unwrap();
        assert_eq!(fetched.message.as_deref(), Some("hello from new"));
    }

    #[tokio::test]
    async fn test_delete() {
        let db = test_db().await;
        let repo = SqliteContactRepository::new(db.pool.clone());

        let contact = repo.create(&new_contact("bye", 0)).await.unwrap();
        repo.delete(contact.id).await.unwrap();
        assert!(repo.get_by_id(contact.id).await.unwrap().is_none());

        let err = repo.delete(contact.id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }
}
