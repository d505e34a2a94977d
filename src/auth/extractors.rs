use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::warn;

use crate::{
    accounts::repo_types::Account,
    auth::identity::IdentityResolver,
    error::AppError,
};

/// Account behind a valid `Authorization: Bearer <access token>` header.
pub struct CurrentAccount(pub Account);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentAccount
where
    S: Send + Sync,
    IdentityResolver: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                warn!("missing Authorization header");
                AppError::Unauthenticated
            })?;

        // Expect "Bearer <token>"
        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .ok_or_else(|| {
                warn!("invalid auth scheme");
                AppError::Unauthenticated
            })?;

        let resolver = IdentityResolver::from_ref(state);
        let account = resolver.resolve_from_token(token.trim()).await?;
        Ok(CurrentAccount(account))
    }
}
