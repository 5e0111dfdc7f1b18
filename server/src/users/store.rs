use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error type for user store operations
#[derive(Debug, Error)]
pub enum UserError {
    /// Input rejected before reaching the store
    #[error("{0}")]
    Validation(String),
    /// No user with this id
    #[error("User not found: {0}")]
    NotFound(Uuid),
    /// A user with this email already exists
    #[error("User already exists: {0}")]
    Conflict(String),
    /// Error occurred during a store operation
    #[error("Storage error: {0}")]
    Storage(String),
}

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub picture: Option<String>,
    /// Subject identifier from the sign-in provider
    pub google_sub: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when registering a user
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub google_sub: Option<String>,
}

impl User {
    /// Build a user with a fresh id and creation time
    pub fn from_new(new_user: NewUser) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: new_user.name,
            email: new_user.email,
            picture: new_user.picture,
            google_sub: new_user.google_sub,
            created_at: Utc::now(),
        }
    }
}

/// Trait defining the interface for user stores
#[async_trait]
pub trait UserStore: Send + Sync + Debug {
    /// Persist a new user. Fails with `Conflict` when the email is taken.
    async fn create_user(&self, new_user: NewUser) -> Result<User, UserError>;

    /// Get a user by ID
    async fn get_user(&self, id: Uuid) -> Result<User, UserError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;
}

/// Type alias for Arc-wrapped UserStore trait objects
pub type UserStoreRef = Arc<dyn UserStore>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_new_assigns_identity() {
        let new_user = NewUser {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            picture: None,
            google_sub: Some("1234".to_string()),
        };

        let first = User::from_new(new_user.clone());
        let second = User::from_new(new_user);

        assert_ne!(first.id, second.id);
        assert_eq!(first.email, "ana@example.com");
        assert_eq!(first.google_sub.as_deref(), Some("1234"));
    }

    #[test]
    fn test_new_user_optional_fields() {
        let new_user: NewUser =
            serde_json::from_str(r#"{"name": "Ana", "email": "ana@example.com"}"#).unwrap();
        assert!(new_user.picture.is_none());
        assert!(new_user.google_sub.is_none());
    }
}
