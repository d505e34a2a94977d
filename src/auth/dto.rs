use serde::{Deserialize, Serialize};

use crate::{
    accounts::{dto::PublicAccount, repo_types::Account},
    auth::claims::TokenPair,
};

/// Request body for account registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Request body for login. `identifier` is an email or an account slug.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "email", alias = "username")]
    pub identifier: String,
    pub password: String,
}

/// Request body for token refresh.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Response returned after register, login or refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub user: PublicAccount,
}

impl AuthResponse {
    pub fn new(pair: TokenPair, account: Account) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: "bearer",
            user: account.into(),
        }
    }
}
