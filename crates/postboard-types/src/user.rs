use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Unique identifier for a user (database row id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// Roles a user can hold.
///
/// - Admin: reads contact requests and passes every ownership check
/// - Member: writes posts, comments and votes of their own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Member,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Member => write!(f, "member"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "member" => Ok(Role::Member),
            other => Err(format!("invalid role: '{other}'")),
        }
    }
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    /// Unique, used in profile URLs.
    pub username: String,
    pub email: String,
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Request to register a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub roles: Vec<Role>,
}

/// Identity of whoever is making a request.
///
/// Passed explicitly into every mutating service call instead of being read
/// from ambient request state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    User { id: UserId, roles: Vec<Role> },
}

impl Caller {
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Caller::Anonymous => None,
            Caller::User { id, .. } => Some(*id),
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        match self {
            Caller::Anonymous => false,
            Caller::User { roles, .. } => roles.contains(&role),
        }
    }
}

impl From<&User> for Caller {
    fn from(user: &User) -> Self {
        Caller::User {
            id: user.id,
            roles: user.roles.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("member".parse::<Role>().unwrap(), Role::Member);
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn test_caller_identity() {
        let anon = Caller::Anonymous;
        assert!(anon.user_id().is_none());
        assert!(!anon.has_role(Role::Admin));

        let admin = Caller::User {
            id: UserId(3),
            roles: vec![Role::Admin],
        };
        assert_eq!(admin.user_id(), Some(UserId(3)));
        assert!(admin.has_role(Role::Admin));
        assert!(!admin.has_role(Role::Member));
    }

    #[test]
    fn test_caller_from_user() {
        let user = User {
            id: UserId(9),
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            roles: vec![Role::Member],
            created_at: Utc::now(),
        };
        let caller = Caller::from(&user);
        assert_eq!(caller.user_id(), Some(UserId(9)));
        assert!(caller.has_role(Role::Member));
    }
}
