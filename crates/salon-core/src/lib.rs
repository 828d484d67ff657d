//! Core types shared across the salon workspace: configuration, the
//! API-facing error envelope, and the submission domain models.

pub mod config;
pub mod error;
pub mod models;

pub use config::{Config, MediaConfig};
pub use error::AppError;
