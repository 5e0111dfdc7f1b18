use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::users::store::{NewUser, User, UserError, UserStore};

/// In-memory implementation of UserStore
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    /// Thread-safe storage of users
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserStore {
    /// Create a new InMemoryUserStore
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User, UserError> {
        let mut users = self.users.write().map_err(|e| {
            UserError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        if users.values().any(|user| user.email == new_user.email) {
            return Err(UserError::Conflict(new_user.email));
        }

        let user = User::from_new(new_user);
        users.insert(user.id, user.clone());
        debug!("Created user: {}", user.id);

        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> Result<User, UserError> {
        let users = self.users.read().map_err(|e| {
            UserError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        users.get(&id).cloned().ok_or(UserError::NotFound(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let users = self.users.read().map_err(|e| {
            UserError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(users.values().find(|user| user.email == email).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::test;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Test User".to_string(),
            email: email.to_string(),
            picture: Some("https://example.com/avatar.png".to_string()),
            google_sub: None,
        }
    }

    #[test]
    async fn test_create_and_get_user() {
        let store = InMemoryUserStore::new();

        let user = store.create_user(new_user("a@example.com")).await.unwrap();
        assert_eq!(user.email, "a@example.com");

        let retrieved = store.get_user(user.id).await.unwrap();
        assert_eq!(retrieved, user);
    }

    #[test]
    async fn test_duplicate_email() {
        let store = InMemoryUserStore::new();
        store.create_user(new_user("a@example.com")).await.unwrap();

        let result = store.create_user(new_user("a@example.com")).await;
        assert!(matches!(result, Err(UserError::Conflict(_))));
    }

    #[test]
    async fn test_missing_user() {
        let store = InMemoryUserStore::new();
        let id = Uuid::new_v4();

        let result = store.get_user(id).await;
        assert!(matches!(result, Err(UserError::NotFound(missing)) if missing == id));
    }

    #[test]
    async fn test_find_by_email() {
        let store = InMemoryUserStore::new();
        let user = store.create_user(new_user("b@example.com")).await.unwrap();

        let found = store.find_by_email("b@example.com").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));
        assert!(store.find_by_email("c@example.com").await.unwrap().is_none());
    }
}
