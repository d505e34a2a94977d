use std::collections::HashSet;

use crate::posts::repo_types::Post;

/// Number of distinct post tags the viewer follows. Exact, case-sensitive match.
pub fn tag_overlap(viewer_tags: &HashSet<String>, post: &Post) -> usize {
    post.tags
        .iter()
        .map(String::as_str)
        .collect::<HashSet<&str>>()
        .into_iter()
        .filter(|tag| viewer_tags.contains(*tag))
        .count()
}

/// Orders posts by tag overlap with the viewer (descending), then by
/// `last_modified` (newest first). Full ties keep their input order.
pub fn personalize(viewer_tags: &HashSet<String>, posts: Vec<Post>) -> Vec<Post> {
    let mut scored: Vec<(usize, Post)> = posts
        .into_iter()
        .map(|post| (tag_overlap(viewer_tags, &post), post))
        .collect();

    // sort_by is stable
    scored.sort_by(|(score_a, a), (score_b, b)| {
        score_b
            .cmp(score_a)
            .then_with(|| b.last_modified.cmp(&a.last_modified))
    });

    scored.into_iter().map(|(_, post)| post).collect()
}
