//! Stylist Client - HTTP client for the virtual stylist backend
//!
//! Provides the public catalog / generation / swatch calls behind the
//! [`StylistApi`] trait and the admin CRUD surface via [`AdminClient`].

pub mod admin;
pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod swatch;

pub use admin::{AdminClient, BulkOutcome};
pub use api::{StylistApi, StylistClient};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use swatch::SwatchFile;

// Re-export shared types for convenience
pub use shared::models::{
    Catalog, Color, Cut, Family, FamilyStatus, GenerationJob, GenerationRequest, ImageResult,
    JobStatus, Quality, Selection, SwatchUploadResponse,
};
