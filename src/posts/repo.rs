use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    posts::repo_types::{NewPost, Post, PostRow},
    store::StoreResult,
};

#[async_trait]
pub trait PostStore: Send + Sync {
    /// Most recent first; `query` is a case-insensitive full-text match over
    /// title, content, tags and author slug.
    async fn list(&self, query: Option<&str>, limit: i64, offset: i64) -> StoreResult<Vec<Post>>;
    async fn list_all(&self) -> StoreResult<Vec<Post>>;
    async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<Post>>;
    async fn create(&self, new: NewPost) -> StoreResult<Post>;
    async fn save(&self, post: &Post) -> StoreResult<Post>;
    async fn delete(&self, id: Uuid) -> StoreResult<()>;
}

#[derive(Clone)]
pub struct PgPostStore {
    db: PgPool,
}

impl PgPostStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn list(&self, query: Option<&str>, limit: i64, offset: i64) -> StoreResult<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT p.id, p.slug, p.title, p.content, p.author_id,
                   u.slug AS author_slug, u.name AS author_name,
                   p.tags, p.last_modified
            FROM posts p
            JOIN users u ON u.id = p.author_id
            WHERE $1::text IS NULL
               OR to_tsvector('simple',
                      p.title || ' ' || p.content || ' ' ||
                      array_to_string(p.tags, ' ') || ' ' || u.slug)
                  @@ plainto_tsquery('simple', $1)
            ORDER BY p.last_modified DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(query)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn list_all(&self) -> StoreResult<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT p.id, p.slug, p.title, p.content, p.author_id,
                   u.slug AS author_slug, u.name AS author_name,
                   p.tags, p.last_modified
            FROM posts p
            JOIN users u ON u.id = p.author_id
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<Post>> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT p.id, p.slug, p.title, p.content, p.author_id,
                   u.slug AS author_slug, u.name AS author_name,
                   p.tags, p.last_modified
            FROM posts p
            JOIN users u ON u.id = p.author_id
            WHERE p.slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(Post::from))
    }

    async fn create(&self, new: NewPost) -> StoreResult<Post> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            WITH p AS (
                INSERT INTO posts (slug, title, content, author_id, tags, last_modified)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
            )
            SELECT p.id, p.slug, p.title, p.content, p.author_id,
                   u.slug AS author_slug, u.name AS author_name,
                   p.tags, p.last_modified
            FROM p
            JOIN users u ON u.id = p.author_id
            "#,
        )
        .bind(&new.slug)
        .bind(&new.title)
        .bind(&new.content)
        .bind(new.author_id)
        .bind(&new.tags)
        .bind(new.last_modified)
        .fetch_one(&self.db)
        .await?;
        Ok(row.into())
    }

    async fn save(&self, post: &Post) -> StoreResult<Post> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            WITH p AS (
                UPDATE posts
                SET title = $2, content = $3, tags = $4, last_modified = $5
                WHERE id = $1
                RETURNING *
            )
            SELECT p.id, p.slug, p.title, p.content, p.author_id,
                   u.slug AS author_slug, u.name AS author_name,
                   p.tags, p.last_modified
            FROM p
            JOIN users u ON u.id = p.author_id
            "#,
        )
        .bind(post.id)
        .bind(&post.title)
        .bind(&post.content)
        .bind(&post.tags)
        .bind(post.last_modified)
        .fetch_one(&self.db)
        .await?;
        Ok(row.into())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}
