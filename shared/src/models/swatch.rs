//! Swatch Upload Model

use serde::{Deserialize, Serialize};

/// `POST /upload-swatch` response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwatchUploadResponse {
    /// Public URL to pass as `swatch_url` on `POST /generate`
    pub swatch_url: String,
    pub filename: String,
    pub size_bytes: u64,
}
