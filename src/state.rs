use std::sync::Arc;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    accounts::repo::{AccountStore, PgAccountStore},
    auth::jwt::TokenService,
    clock::{Clock, SystemClock},
    config::AppConfig,
    posts::repo::{PgPostStore, PostStore},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub accounts: Arc<dyn AccountStore>,
    pub posts: Arc<dyn PostStore>,
    pub tokens: Arc<TokenService>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
        PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")
    }

    pub fn with_pool(config: Arc<AppConfig>, db: PgPool) -> Self {
        Self::from_parts(
            config,
            Arc::new(PgAccountStore::new(db.clone())),
            Arc::new(PgPostStore::new(db)),
            Arc::new(SystemClock),
        )
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        accounts: Arc<dyn AccountStore>,
        posts: Arc<dyn PostStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let tokens = Arc::new(TokenService::new(&config.jwt, clock.clone()));
        Self {
            config,
            accounts,
            posts,
            tokens,
            clock,
        }
    }
}
