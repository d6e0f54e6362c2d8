use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use super::{UserStore, SEED_USERS};
use crate::dtos::user::{NewUser, Page};
use crate::error::AppError;
use crate::models::user::User;

/// Advisory lock key held while seeding.
const SEED_LOCK_KEY: i64 = 0x7573_6572_7365_6564;

#[derive(Clone)]
pub struct PgUserStore {
    db_pool: PgPool,
}

impl PgUserStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    #[instrument(skip(self, user))]
    async fn insert_user(&self, user: &NewUser) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (first_name, last_name)
             VALUES ($1, $2)
             RETURNING id, first_name, last_name, created_at, updated_at",
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(user)
    }

    #[instrument(skip(self))]
    async fn get_user(&self, id: i64) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            "SELECT id, first_name, last_name, created_at, updated_at
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))
    }

    #[instrument(skip(self))]
    async fn list_users(&self, page: Page) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, first_name, last_name, created_at, updated_at
             FROM users ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(users)
    }

    #[instrument(skip(self))]
    async fn seed(&self) -> Result<u64, AppError> {
        let mut tx = self.db_pool.begin().await?;

        // Replicas starting together queue here; the lock is released on
        // commit or rollback.
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(SEED_LOCK_KEY)
            .execute(&mut *tx)
            .await?;

        let mut inserted = 0;
        for (first_name, last_name) in SEED_USERS {
            let result = sqlx::query(
                "INSERT INTO users (first_name, last_name)
                 SELECT $1::VARCHAR, $2::VARCHAR
                 WHERE NOT EXISTS (
                     SELECT 1 FROM users WHERE first_name = $1 AND last_name = $2
                 )",
            )
            .bind(first_name)
            .bind(last_name)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.db_pool).await?;
        Ok(())
    }
}
