// src/utils/slug.rs

use std::sync::LazyLock;

use regex::Regex;

use crate::error::AppError;

/// Maximum stored slug length (matches the column CHECK).
pub const MAX_SLUG_LEN: usize = 255;

static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("static regex"));

static VALID_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:[-_][a-z0-9]+)*$").expect("static regex"));

/// Derives a URL-safe slug from a title or name.
///
/// Lowercases, collapses every run of non-alphanumeric characters into a
/// single `-` and trims dashes from both ends. Non-ASCII letters are dropped.
pub fn slugify(input: &str) -> String {
    let lowered = input.to_lowercase();
    let dashed = NON_SLUG_CHARS.replace_all(&lowered, "-");
    let trimmed = dashed.trim_matches('-');

    let mut slug: String = trimmed.chars().take(MAX_SLUG_LEN).collect();
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Returns the explicit slug when given (validated), else one derived from `source`.
pub fn resolve_slug(explicit: Option<&str>, source: &str) -> Result<String, AppError> {
    let slug = match explicit {
        Some(s) => {
            let s = s.trim();
            if !is_valid_slug(s) {
                return Err(AppError::BadRequest(format!("Invalid slug '{}'", s)));
            }
            s.to_string()
        }
        None => slugify(source),
    };

    if slug.is_empty() {
        return Err(AppError::BadRequest(
            "Cannot derive a slug; please provide one explicitly".to_string(),
        ));
    }
    Ok(slug)
}

pub fn is_valid_slug(s: &str) -> bool {
    s.len() <= MAX_SLUG_LEN && VALID_SLUG.is_match(s)
}
