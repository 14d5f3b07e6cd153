use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::{Email, Id};
use crate::users::{model::User, repo_types::UserRow};

/// Persistence port for users. `Ok(None)` means "not found".
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn save(&self, user: &User) -> anyhow::Result<()>;
    async fn find_by_id(&self, id: Id) -> anyhow::Result<Option<User>>;
    async fn find_by_email(&self, email: &Email) -> anyhow::Result<Option<User>>;
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;
    async fn update(&self, user: &User) -> anyhow::Result<()>;
    /// Owned calendars, color settings and entries go with the user.
    async fn delete(&self, id: Id) -> anyhow::Result<()>;
    async fn exists_by_email(&self, email: &Email) -> anyhow::Result<bool>;
    async fn exists_by_username(&self, username: &str) -> anyhow::Result<bool>;
}

const USER_COLUMNS: &str =
    "id, email, username, password_hash, first_name, last_name, timezone, created_at, updated_at";

#[derive(Clone)]
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn save(&self, user: &User) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, username, password_hash, first_name, last_name,
                               timezone, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.email().as_str())
        .bind(user.username())
        .bind(user.password_hash())
        .bind(user.first_name())
        .bind(user.last_name())
        .bind(user.timezone())
        .bind(user.created_at())
        .bind(user.updated_at())
        .execute(&self.db)
        .await
        .context("insert user")?;
        Ok(())
    }

    async fn find_by_id(&self, id: Id) -> anyhow::Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.db)
        .await
        .context("find user by id")?;
        Ok(row.map(User::from))
    }

    async fn find_by_email(&self, email: &Email) -> anyhow::Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1)"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.db)
        .await
        .context("find user by email")?;
        Ok(row.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.db)
        .await
        .context("find user by username")?;
        Ok(row.map(User::from))
    }

    async fn update(&self, user: &User) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE users
               SET email = $2, username = $3, password_hash = $4, first_name = $5,
                   last_name = $6, timezone = $7, updated_at = $8
             WHERE id = $1
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.email().as_str())
        .bind(user.username())
        .bind(user.password_hash())
        .bind(user.first_name())
        .bind(user.last_name())
        .bind(user.timezone())
        .bind(user.updated_at())
        .execute(&self.db)
        .await
        .context("update user")?;
        Ok(())
    }

    async fn delete(&self, id: Id) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.db)
            .await
            .context("delete user")?;
        Ok(())
    }

    async fn exists_by_email(&self, email: &Email) -> anyhow::Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM users WHERE lower(email) = lower($1))",
        )
        .bind(email.as_str())
        .fetch_one(&self.db)
        .await
        .context("user exists by email")?;
        Ok(exists)
    }

    async fn exists_by_username(&self, username: &str) -> anyhow::Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.db)
                .await
                .context("user exists by username")?;
        Ok(exists)
    }
}
