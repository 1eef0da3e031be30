//! Users repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::User};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Case-insensitive lookup by email
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Insert the user and assign its new id
    async fn create(&self, user: &mut User) -> AppResult<bool>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    pool: Pool<Postgres>,
}

impl PgUserRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, role, crea_date FROM users WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create(&self, user: &mut User) -> AppResult<bool> {
        let id: Option<i32> = sqlx::query_scalar(
            r#"
            INSERT INTO users (email, password_hash, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (LOWER(email)) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .fetch_optional(&self.pool)
        .await?;

        Ok(match id {
            Some(id) => {
                user.id = id;
                true
            }
            None => false,
        })
    }
}
