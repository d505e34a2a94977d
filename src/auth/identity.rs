use std::sync::Arc;

use axum::extract::FromRef;
use lazy_static::lazy_static;
use thiserror::Error;
use tracing::{error, warn};

use crate::{
    accounts::{repo::AccountStore, repo_types::Account},
    auth::{
        claims::{TokenKind, TokenPair},
        jwt::{TokenError, TokenService},
        password::{hash_password, verify_password, PasswordError},
    },
    state::AppState,
    store::StoreError,
};

lazy_static! {
    // Verified against when the identifier matches nobody, so both login
    // failure paths pay for one Argon2 run.
    static ref DUMMY_DIGEST: Option<String> = hash_password("tagpress-no-such-account").ok();
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("unauthenticated")]
    Unauthenticated,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("stored credential is corrupt")]
    CorruptCredential(#[source] PasswordError),
    #[error("token signing failed")]
    Token(#[source] TokenError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Maps bearer tokens and login credentials to stored accounts.
#[derive(Clone)]
pub struct IdentityResolver {
    accounts: Arc<dyn AccountStore>,
    tokens: Arc<TokenService>,
}

impl FromRef<AppState> for IdentityResolver {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.accounts.clone(), state.tokens.clone())
    }
}

impl IdentityResolver {
    pub fn new(accounts: Arc<dyn AccountStore>, tokens: Arc<TokenService>) -> Self {
        Self { accounts, tokens }
    }

    /// Token check, then email claim, then store lookup; stops at the first failure.
    pub async fn resolve_from_token(&self, access_token: &str) -> Result<Account, IdentityError> {
        let claims = self
            .tokens
            .verify(TokenKind::Access, access_token)
            .map_err(|e| {
                warn!(reason = ?e.reason(), "access token rejected");
                IdentityError::Unauthenticated
            })?;

        let email = claims.email.filter(|e| !e.is_empty()).ok_or_else(|| {
            warn!("access token carries no email claim");
            IdentityError::Unauthenticated
        })?;

        match self.accounts.find_by_email(&email).await? {
            Some(account) => Ok(account),
            None => {
                warn!("access token subject has no account");
                Err(IdentityError::Unauthenticated)
            }
        }
    }

    /// `identifier` is an email or a slug. Unknown identifier and wrong
    /// password both yield `InvalidCredentials`.
    pub async fn resolve_from_credentials(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<Account, IdentityError> {
        let identifier = identifier.trim().to_lowercase();

        let Some(account) = self.accounts.find_by_slug_or_email(&identifier).await? else {
            if let Some(digest) = DUMMY_DIGEST.as_deref() {
                let _ = verify_password(password, digest);
            }
            warn!("login unknown identifier");
            return Err(IdentityError::InvalidCredentials);
        };

        match verify_password(password, &account.password_hash) {
            Ok(true) => Ok(account),
            Ok(false) => {
                warn!(account_id = %account.id, "login invalid password");
                Err(IdentityError::InvalidCredentials)
            }
            Err(e) => {
                error!(account_id = %account.id, error = %e, "stored password digest is malformed");
                Err(IdentityError::CorruptCredential(e))
            }
        }
    }

    /// Exchanges a refresh token for a new pair, provided its subject still exists.
    pub async fn refresh(&self, refresh_token: &str) -> Result<(Account, TokenPair), IdentityError> {
        let (claims, pair) = self.tokens.refresh(refresh_token).map_err(|e| match e {
            TokenError::Invalid(reason) => {
                warn!(?reason, "refresh token rejected");
                IdentityError::Unauthenticated
            }
            e @ TokenError::Encode(_) => IdentityError::Token(e),
        })?;

        let email = claims.email.unwrap_or_default();
        match self.accounts.find_by_email(&email).await? {
            Some(account) => Ok((account, pair)),
            None => {
                warn!("refresh token subject has no account");
                Err(IdentityError::Unauthenticated)
            }
        }
    }
}
