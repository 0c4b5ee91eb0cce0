// src/models/mod.rs

pub mod blocked_user;
pub mod category;
pub mod comment;
pub mod complaint;
pub mod like;
pub mod post;
pub mod tag;
pub mod user;
