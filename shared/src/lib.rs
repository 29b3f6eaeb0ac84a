//! Shared types for the virtual stylist workspace
//!
//! Wire models exchanged with the stylist backend: the public catalog,
//! generation jobs, swatch uploads and the admin records. No I/O lives here.

pub mod models;

// Re-exports
pub use models::*;
pub use serde::{Deserialize, Serialize};
