use async_trait::async_trait;

use crate::dtos::user::{NewUser, Page};
use crate::error::AppError;
use crate::models::user::User;

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryUserStore;
pub use postgres::PgUserStore;

/// Sample rows inserted at startup, once per distinct name pair.
pub const SEED_USERS: [(&str, &str); 3] = [
    ("John", "Doe"),
    ("Jane", "Smith"),
    ("Bob", "Johnson"),
];

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert_user(&self, user: &NewUser) -> Result<User, AppError>;

    /// Fails with `AppError::NotFound` when no row has this id.
    async fn get_user(&self, id: i64) -> Result<User, AppError>;

    /// Rows ordered by id ascending.
    async fn list_users(&self, page: Page) -> Result<Vec<User>, AppError>;

    /// Inserts [`SEED_USERS`] that are not already present. Returns how many
    /// rows were added.
    async fn seed(&self) -> Result<u64, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}
