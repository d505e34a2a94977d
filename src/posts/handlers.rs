use std::collections::HashSet;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderName, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::{debug, info, instrument, warn};

use crate::{
    accounts::{repo_types::Account, services::normalize_tags},
    auth::extractors::CurrentAccount,
    error::AppError,
    posts::{
        dto::{CreatePostRequest, ListQuery, Pagination, UpdatePostRequest},
        ranking::personalize,
        repo_types::{NewPost, Post},
    },
    slug::generate_slug,
    state::AppState,
    store::StoreError,
};

const SLUG_ATTEMPTS: usize = 3;

pub fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/personalized", get(list_personalized))
        .route(
            "/posts/:slug",
            get(get_post).patch(update_post).delete(delete_post),
        )
}

#[instrument(skip(state))]
pub async fn list_posts(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<Post>>, AppError> {
    let (limit, offset) = q.pagination().bounds()?;
    let posts = state.posts.list(q.search(), limit, offset).await?;
    Ok(Json(posts))
}

#[instrument(skip_all)]
pub async fn list_personalized(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<Post>>, AppError> {
    let (limit, offset) = p.bounds()?;
    let viewer_tags: HashSet<String> = account.tags.iter().cloned().collect();

    let posts = state.posts.list_all().await?;
    let total = posts.len();
    let ranked = personalize(&viewer_tags, posts);

    debug!(account_id = %account.id, tags = viewer_tags.len(), total, "ranked posts");
    Ok(Json(
        ranked
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect(),
    ))
}

#[instrument(skip_all)]
pub async fn create_post(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Json(payload): Json<CreatePostRequest>,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<Post>), AppError> {
    let title = payload.title.trim().to_string();
    if title.is_empty() {
        warn!(account_id = %account.id, "post without title");
        return Err(AppError::BadRequest("Title is required".into()));
    }
    let tags = normalize_tags(payload.tags);

    let mut attempt = 0;
    let post = loop {
        attempt += 1;
        let new = NewPost {
            slug: generate_slug(&title),
            title: title.clone(),
            content: payload.content.clone(),
            author_id: account.id,
            tags: tags.clone(),
            last_modified: state.clock.now(),
        };
        match state.posts.create(new).await {
            Ok(post) => break post,
            Err(StoreError::Conflict) if attempt < SLUG_ATTEMPTS => {
                warn!(attempt, "post slug collision, retrying");
            }
            Err(e) => return Err(e.into()),
        }
    };

    info!(account_id = %account.id, slug = %post.slug, "post created");
    let location = format!("/api/v1/posts/{}", post.slug);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(post)))
}

#[instrument(skip(state))]
pub async fn get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Post>, AppError> {
    state
        .posts
        .find_by_slug(&slug)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Post not found".into()))
}

async fn owned_post(state: &AppState, slug: &str, account: &Account) -> Result<Post, AppError> {
    match state.posts.find_by_slug(slug).await? {
        Some(post) if post.author.id == account.id => Ok(post),
        _ => {
            warn!(account_id = %account.id, %slug, "post missing or owned by someone else");
            Err(AppError::NotFound("Post not found or not owned by you".into()))
        }
    }
}

#[instrument(skip(state, account, payload))]
pub async fn update_post(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(slug): Path<String>,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<Json<Post>, AppError> {
    let mut post = owned_post(&state, &slug, &account).await?;

    if let Some(title) = payload.title {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::BadRequest("Title must not be empty".into()));
        }
        post.title = title.to_string();
    }
    if let Some(content) = payload.content {
        post.content = content;
    }
    if let Some(tags) = payload.tags {
        post.tags = normalize_tags(tags);
    }
    post.last_modified = state.clock.now();

    let saved = state.posts.save(&post).await?;
    info!(account_id = %account.id, slug = %saved.slug, "post updated");
    Ok(Json(saved))
}

#[instrument(skip(state, account))]
pub async fn delete_post(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(slug): Path<String>,
) -> Result<Json<Post>, AppError> {
    let post = owned_post(&state, &slug, &account).await?;
    state.posts.delete(post.id).await?;
    info!(account_id = %account.id, slug = %post.slug, "post deleted");
    Ok(Json(post))
}
