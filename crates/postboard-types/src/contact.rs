//! Contact requests left for the site admins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Public contact form submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateContactInput {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub message: Option<String>,
}
