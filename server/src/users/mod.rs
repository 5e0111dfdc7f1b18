//! User management
//!
//! Users are registered through [`UserService`], which validates input and
//! delegates persistence to a [`UserStore`]. Two backends are provided:
//! an in-memory store and a Postgres store.

pub mod adapters;
pub mod service;
pub mod store;

pub use adapters::{InMemoryUserStore, PostgresUserStore};
pub use service::UserService;
pub use store::{NewUser, User, UserError, UserStore, UserStoreRef};
