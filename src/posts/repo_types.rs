use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Author {
    #[serde(skip_serializing)]
    pub id: Uuid,
    pub slug: String,
    pub name: String,
}

/// A user-authored, tagged post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub author: Author,
    pub tags: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub last_modified: OffsetDateTime,
}

/// Flat row as returned by the posts ⋈ users queries.
#[derive(Debug, FromRow)]
pub struct PostRow {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
    pub author_slug: String,
    pub author_name: String,
    pub tags: Vec<String>,
    pub last_modified: OffsetDateTime,
}

impl From<PostRow> for Post {
    fn from(r: PostRow) -> Self {
        Self {
            id: r.id,
            slug: r.slug,
            title: r.title,
            content: r.content,
            author: Author {
                id: r.author_id,
                slug: r.author_slug,
                name: r.author_name,
            },
            tags: r.tags,
            last_modified: r.last_modified,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub slug: String,
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
    pub tags: Vec<String>,
    pub last_modified: OffsetDateTime,
}
