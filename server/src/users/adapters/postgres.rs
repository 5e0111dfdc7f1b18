use std::fmt;

use async_trait::async_trait;
use tokio_postgres::error::SqlState;
use tokio_postgres::{Client, NoTls, Row};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::users::store::{NewUser, User, UserError, UserStore};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id          UUID PRIMARY KEY,
    name        TEXT NOT NULL,
    email       TEXT NOT NULL UNIQUE,
    picture     TEXT,
    google_sub  TEXT,
    created_at  TIMESTAMPTZ NOT NULL
)";

const USER_COLUMNS: &str = "id, name, email, picture, google_sub, created_at";

/// Postgres implementation of UserStore
pub struct PostgresUserStore {
    client: Client,
}

impl fmt::Debug for PostgresUserStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresUserStore").finish_non_exhaustive()
    }
}

impl PostgresUserStore {
    /// Connect to `url` and drive the connection on a background task
    pub async fn connect(url: &str) -> Result<Self, UserError> {
        let (client, connection) = tokio_postgres::connect(url, NoTls)
            .await
            .map_err(storage_error)?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!(error = %e, "Postgres connection closed with error");
            }
        });

        info!("Connected to Postgres");
        Ok(Self { client })
    }

    /// Create the users table if it does not exist yet
    pub async fn ensure_schema(&self) -> Result<(), UserError> {
        self.client
            .batch_execute(SCHEMA)
            .await
            .map_err(storage_error)
    }
}

fn storage_error(e: tokio_postgres::Error) -> UserError {
    UserError::Storage(e.to_string())
}

fn user_from_row(row: &Row) -> Result<User, UserError> {
    Ok(User {
        id: row.try_get("id").map_err(storage_error)?,
        name: row.try_get("name").map_err(storage_error)?,
        email: row.try_get("email").map_err(storage_error)?,
        picture: row.try_get("picture").map_err(storage_error)?,
        google_sub: row.try_get("google_sub").map_err(storage_error)?,
        created_at: row.try_get("created_at").map_err(storage_error)?,
    })
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User, UserError> {
        let user = User::from_new(new_user);

        let result = self
            .client
            .execute(
                "INSERT INTO users (id, name, email, picture, google_sub, created_at) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
                &[
                    &user.id,
                    &user.name,
                    &user.email,
                    &user.picture,
                    &user.google_sub,
                    &user.created_at,
                ],
            )
            .await;

        match result {
            Ok(_) => {
                debug!("Inserted user: {}", user.id);
                Ok(user)
            }
            Err(e) if e.code() == Some(&SqlState::UNIQUE_VIOLATION) => {
                Err(UserError::Conflict(user.email))
            }
            Err(e) => Err(storage_error(e)),
        }
    }

    async fn get_user(&self, id: Uuid) -> Result<User, UserError> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let row = self
            .client
            .query_opt(query.as_str(), &[&id])
            .await
            .map_err(storage_error)?
            .ok_or(UserError::NotFound(id))?;

        user_from_row(&row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let query = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        self.client
            .query_opt(query.as_str(), &[&email])
            .await
            .map_err(storage_error)?
            .as_ref()
            .map(user_from_row)
            .transpose()
    }
}
