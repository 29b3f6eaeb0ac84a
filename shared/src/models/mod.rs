//! Data models
//!
//! Shared between the HTTP client and the session layer.
//! Field names follow the backend JSON exactly (snake_case).

pub mod admin;
pub mod catalog;
pub mod generation;
pub mod selection;
pub mod swatch;

// Re-exports
pub use admin::*;
pub use catalog::*;
pub use generation::*;
pub use selection::*;
pub use swatch::*;
