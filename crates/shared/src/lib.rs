//! Shared types, errors, and configuration for Kassa.
//!
//! This crate has no web or database dependencies and is used by every other
//! crate in the workspace.

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
