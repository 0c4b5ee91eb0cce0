// src/handlers/mod.rs

pub mod admin;
pub mod auth;
pub mod comment;
pub mod like;
pub mod moderation;
pub mod post;
pub mod profile;
pub mod taxonomy;

use crate::error::AppError;

/// Trims `value` and rejects it when nothing is left.
pub(crate) fn required_text(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(format!("{} must not be blank", field)));
    }
    Ok(trimmed.to_string())
}
