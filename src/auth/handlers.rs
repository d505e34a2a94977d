use axum::{
    extract::{FromRef, State},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    accounts::{
        repo_types::NewAccount,
        services::{is_valid_email, normalize_tags},
    },
    auth::{
        dto::{AuthResponse, LoginRequest, RefreshRequest, RegisterRequest},
        identity::IdentityResolver,
        password::hash_password,
    },
    error::AppError,
    slug::generate_slug,
    state::AppState,
    store::StoreError,
};

const MIN_PASSWORD_LEN: usize = 8;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.email = payload.email.trim().to_lowercase();
    let name = payload.name.trim().to_string();

    if name.is_empty() {
        warn!("missing name");
        return Err(AppError::BadRequest("Name is required".into()));
    }

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(AppError::BadRequest("Invalid email".into()));
    }

    if payload.password.len() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(AppError::BadRequest("Password too short".into()));
    }

    // Ensure email is not taken
    if state.accounts.find_by_email(&payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let password_hash = hash_password(&payload.password)?;

    let account = state
        .accounts
        .create(NewAccount {
            slug: generate_slug(&name),
            name,
            email: payload.email.clone(),
            password_hash,
            tags: normalize_tags(payload.tags),
        })
        .await
        .map_err(|e| match e {
            StoreError::Conflict => {
                warn!(email = %payload.email, "account insert hit unique index");
                AppError::Conflict("Email already registered".into())
            }
            other => other.into(),
        })?;

    let pair = state.tokens.issue_pair(&account.email)?;

    info!(account_id = %account.id, slug = %account.slug, "account registered");
    Ok(Json(AuthResponse::new(pair, account)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let resolver = IdentityResolver::from_ref(&state);
    let account = resolver
        .resolve_from_credentials(&payload.identifier, &payload.password)
        .await?;

    let pair = state.tokens.issue_pair(&account.email)?;

    info!(account_id = %account.id, "account logged in");
    Ok(Json(AuthResponse::new(pair, account)))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let resolver = IdentityResolver::from_ref(&state);
    let (account, pair) = resolver.refresh(&payload.refresh_token).await?;

    info!(account_id = %account.id, "tokens refreshed");
    Ok(Json(AuthResponse::new(pair, account)))
}
