use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    accounts::{
        dto::{PublicAccount, UpdateAccountRequest},
        services::updated_tags,
    },
    auth::extractors::CurrentAccount,
    error::AppError,
    state::AppState,
};

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me).patch(update_me).delete(delete_me))
}

pub fn account_routes() -> Router<AppState> {
    Router::new().route("/users", get(list_accounts))
}

#[instrument(skip_all)]
pub async fn get_me(CurrentAccount(account): CurrentAccount) -> Json<PublicAccount> {
    Json(account.into())
}

#[instrument(skip_all)]
pub async fn update_me(
    State(state): State<AppState>,
    CurrentAccount(mut account): CurrentAccount,
    Json(payload): Json<UpdateAccountRequest>,
) -> Result<Json<PublicAccount>, AppError> {
    if let Some(name) = &payload.name {
        let name = name.trim();
        if name.is_empty() {
            warn!("empty name in profile update");
            return Err(AppError::BadRequest("Name must not be empty".into()));
        }
        account.name = name.to_string();
    }
    if let Some(tags) = updated_tags(&account.tags, &payload) {
        account.tags = tags;
    }

    let saved = state.accounts.save(&account).await?;
    info!(account_id = %saved.id, tags = saved.tags.len(), "account updated");
    Ok(Json(saved.into()))
}

#[instrument(skip_all)]
pub async fn delete_me(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Json<PublicAccount>, AppError> {
    state.accounts.delete(account.id).await?;
    info!(account_id = %account.id, slug = %account.slug, "account deleted");
    Ok(Json(account.into()))
}

#[instrument(skip(state))]
pub async fn list_accounts(
    State(state): State<AppState>,
) -> Result<Json<Vec<PublicAccount>>, AppError> {
    let accounts = state.accounts.list().await?;
    Ok(Json(accounts.into_iter().map(PublicAccount::from).collect()))
}
