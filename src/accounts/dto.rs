use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::accounts::repo_types::Account;

/// Public part of the account returned to clients.
#[derive(Debug, Serialize)]
pub struct PublicAccount {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub email: String,
    pub tags: Vec<String>,
}

impl From<Account> for PublicAccount {
    fn from(a: Account) -> Self {
        Self {
            id: a.id,
            slug: a.slug,
            name: a.name,
            email: a.email,
            tags: a.tags,
        }
    }
}

/// Request body for `PATCH /me`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAccountRequest {
    pub name: Option<String>,
    pub tags: Option<Vec<String>>,
    pub tags_add: Option<Vec<String>>,
    pub tags_remove: Option<Vec<String>>,
}
