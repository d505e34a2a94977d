use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Account record in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub email: String, // always lower-cased
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 PHC string, never the raw password
    pub tags: Vec<String>,
    pub created_at: OffsetDateTime,
}

/// Fields supplied when registering.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub slug: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub tags: Vec<String>,
}
