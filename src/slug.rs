use lazy_static::lazy_static;
use rand::RngCore;
use regex::Regex;

const MAX_BASE_LEN: usize = 20;

/// Lower-cased, `-`-separated ASCII form of `text`, at most 20 characters.
pub fn slugify(text: &str) -> String {
    lazy_static! {
        static ref NON_ALNUM_RE: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
    }
    let lowered = text.to_lowercase();
    let dashed = NON_ALNUM_RE.replace_all(&lowered, "-");
    let trimmed = dashed.trim_matches('-');
    let truncated: String = trimmed.chars().take(MAX_BASE_LEN).collect();
    truncated.trim_end_matches('-').to_string()
}

/// `slugify(text)` plus a random 6-hex-digit suffix, e.g. `ada-lovelace-3fa9c1`.
pub fn generate_slug(text: &str) -> String {
    let mut suffix = [0u8; 3];
    rand::thread_rng().fill_bytes(&mut suffix);
    let suffix: String = suffix.iter().map(|b| format!("{:02x}", b)).collect();

    let base = slugify(text);
    if base.is_empty() {
        suffix
    } else {
        format!("{}-{}", base, suffix)
    }
}
