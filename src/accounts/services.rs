use lazy_static::lazy_static;
use regex::Regex;

use crate::accounts::dto::UpdateAccountRequest;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Trims tags, drops empties and repeats. Order and case are kept.
pub(crate) fn normalize_tags<I>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

/// New tag list for a profile update, or `None` when the request leaves tags alone.
/// `tags` replaces, else `tags_add` appends, else `tags_remove` removes.
pub(crate) fn updated_tags(current: &[String], req: &UpdateAccountRequest) -> Option<Vec<String>> {
    if let Some(tags) = &req.tags {
        return Some(normalize_tags(tags.iter().cloned()));
    }
    if let Some(add) = &req.tags_add {
        return Some(normalize_tags(current.iter().chain(add.iter()).cloned()));
    }
    if let Some(remove) = &req.tags_remove {
        let remove = normalize_tags(remove.iter().cloned());
        return Some(
            current
                .iter()
                .filter(|t| !remove.contains(*t))
                .cloned()
                .collect(),
        );
    }
    None
}
