use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{UserStore, SEED_USERS};
use crate::dtos::user::{NewUser, Page};
use crate::error::AppError;
use crate::models::user::User;

/// Store kept in process memory. Ids are assigned sequentially from 1 and
/// rows stay in id order.
#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<Vec<User>>>,
    offline: Arc<AtomicBool>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every call fail as if the database were unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    fn check_online(&self) -> Result<(), AppError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::db(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    fn push(users: &mut Vec<User>, first_name: &str, last_name: &str) -> User {
        let id = users.last().map_or(1, |u| u.id + 1);
        let now = Utc::now();
        let user = User {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        user
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert_user(&self, user: &NewUser) -> Result<User, AppError> {
        self.check_online()?;
        let mut users = self.users.write().await;
        Ok(Self::push(&mut users, &user.first_name, &user.last_name))
    }

    async fn get_user(&self, id: i64) -> Result<User, AppError> {
        self.check_online()?;
        let users = self.users.read().await;
        users
            .binary_search_by_key(&id, |u| u.id)
            .map(|idx| users[idx].clone())
            .map_err(|_| AppError::not_found("User not found"))
    }

    async fn list_users(&self, page: Page) -> Result<Vec<User>, AppError> {
        self.check_online()?;
        let users = self.users.read().await;
        let offset = usize::try_from(page.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit).unwrap_or(0);
        Ok(users.iter().skip(offset).take(limit).cloned().collect())
    }

    async fn seed(&self) -> Result<u64, AppError> {
        self.check_online()?;
        let mut users = self.users.write().await;
        let mut inserted = 0;
        for (first_name, last_name) in SEED_USERS {
            let exists = users
                .iter()
                .any(|u| u.first_name == first_name && u.last_name == last_name);
            if !exists {
                Self::push(&mut users, first_name, last_name);
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check_online()
    }
}
