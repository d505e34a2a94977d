use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    accounts::repo_types::{Account, NewAccount},
    store::StoreResult,
};

/// Persistence for accounts. Email is stored lower-cased under a unique index.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>>;
    /// Matches either the email or the slug, case-insensitively; an email match wins.
    async fn find_by_slug_or_email(&self, identifier: &str) -> StoreResult<Option<Account>>;
    async fn create(&self, new: NewAccount) -> StoreResult<Account>;
    async fn save(&self, account: &Account) -> StoreResult<Account>;
    async fn delete(&self, id: Uuid) -> StoreResult<()>;
    async fn list(&self) -> StoreResult<Vec<Account>>;
}

#[derive(Clone)]
pub struct PgAccountStore {
    db: PgPool,
}

impl PgAccountStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, slug, name, email, password_hash, tags, created_at
            FROM users
            WHERE email = lower($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(account)
    }

    async fn find_by_slug_or_email(&self, identifier: &str) -> StoreResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, slug, name, email, password_hash, tags, created_at
            FROM users
            WHERE email = lower($1) OR slug = lower($1)
            ORDER BY (email = lower($1)) DESC
            LIMIT 1
            "#,
        )
        .bind(identifier)
        .fetch_optional(&self.db)
        .await?;
        Ok(account)
    }

    async fn create(&self, new: NewAccount) -> StoreResult<Account> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO users (slug, name, email, password_hash, tags)
            VALUES ($1, $2, lower($3), $4, $5)
            RETURNING id, slug, name, email, password_hash, tags, created_at
            "#,
        )
        .bind(&new.slug)
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(&new.tags)
        .fetch_one(&self.db)
        .await?;
        Ok(account)
    }

    async fn save(&self, account: &Account) -> StoreResult<Account> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            UPDATE users
            SET name = $2, tags = $3
            WHERE id = $1
            RETURNING id, slug, name, email, password_hash, tags, created_at
            "#,
        )
        .bind(account.id)
        .bind(&account.name)
        .bind(&account.tags)
        .fetch_one(&self.db)
        .await?;
        Ok(account)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    async fn list(&self) -> StoreResult<Vec<Account>> {
        let rows = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, slug, name, email, password_hash, tags, created_at
            FROM users
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}
