use serde::Deserialize;

use crate::error::AppError;

const MAX_PAGE_SIZE: i64 = 100;

fn default_page_size() -> i64 {
    10
}
fn default_page_index() -> i64 {
    1
}

/// 1-based page selection.
#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    #[serde(default = "default_page_index")]
    pub page_index: i64,
}

impl Pagination {
    /// `(limit, offset)` for the store.
    pub fn bounds(&self) -> Result<(i64, i64), AppError> {
        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(AppError::BadRequest(format!(
                "page_size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }
        if self.page_index < 1 {
            return Err(AppError::BadRequest("page_index must be at least 1".into()));
        }
        let offset = (self.page_index - 1)
            .checked_mul(self.page_size)
            .ok_or_else(|| AppError::BadRequest("page_index is out of range".into()))?;
        Ok((self.page_size, offset))
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    #[serde(default = "default_page_index")]
    pub page_index: i64,
    pub query: Option<String>,
}

impl ListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page_size: self.page_size,
            page_index: self.page_index,
        }
    }

    /// Search text, or `None` when absent or blank.
    pub fn search(&self) -> Option<&str> {
        self.query.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}
