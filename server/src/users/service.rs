use tracing::info;
use uuid::Uuid;

use crate::users::store::{NewUser, User, UserError, UserStoreRef};

/// Registration and lookup of users
#[derive(Debug, Clone)]
pub struct UserService {
    store: UserStoreRef,
}

impl UserService {
    pub fn new(store: UserStoreRef) -> Self {
        Self { store }
    }

    /// Validate and persist a new user.
    ///
    /// Fields are trimmed, the email is lowercased, empty optional fields
    /// are dropped. A taken email fails with `Conflict` before any insert.
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, UserError> {
        let new_user = normalize(new_user);

        if new_user.name.is_empty() {
            return Err(UserError::Validation("name is required".to_string()));
        }
        if !is_plausible_email(&new_user.email) {
            return Err(UserError::Validation(format!(
                "invalid email address: {:?}",
                new_user.email
            )));
        }

        if self.store.find_by_email(&new_user.email).await?.is_some() {
            return Err(UserError::Conflict(new_user.email));
        }

        let user = self.store.create_user(new_user).await?;
        info!(user_id = %user.id, "Created user");
        Ok(user)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User, UserError> {
        self.store.get_user(id).await
    }
}

fn normalize(new_user: NewUser) -> NewUser {
    let non_empty = |value: Option<String>| {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    NewUser {
        name: new_user.name.trim().to_string(),
        email: new_user.email.trim().to_lowercase(),
        picture: non_empty(new_user.picture),
        google_sub: non_empty(new_user.google_sub),
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}
