//! Shared domain models

pub mod hunt;

pub use hunt::{Hunt, SeasonWindow, TagStatus};
