//! Session error taxonomy
//!
//! Every failure is caught at the session boundary and turned into a
//! message the user sees next to the control that triggered it.

use std::time::Duration;

use shared::models::JobStatus;
use stylist_client::ClientError;
use thiserror::Error;

pub const MSG_BACKEND_NOT_CONFIGURED: &str =
    "The backend is not configured. Set STYLIST_API_BASE and try again.";
pub const MSG_CATALOG_LOAD: &str = "Could not load the catalog.";
pub const MSG_SWATCH_UPLOAD: &str =
    "Could not upload your fabric image. It will not be used for generation.";
pub const MSG_GENERATION: &str = "We could not generate the images. Try another combination.";
pub const MSG_JOB_FAILED: &str = "Image generation failed. Please try again.";
pub const MSG_TIMEOUT: &str = "Generation is taking too long. Please try again in a moment.";

/// Session error type
#[derive(Debug, Error)]
pub enum SessionError {
    /// (a) catalog fetch failed
    #[error("Catalog load failed: {0}")]
    CatalogLoad(#[source] ClientError),

    /// (b) swatch upload failed
    #[error("Swatch upload failed: {0}")]
    SwatchUpload(#[source] ClientError),

    /// (c) submission or polling failed at the transport/API level
    #[error("Generation request failed: {0}")]
    Transport(#[source] ClientError),

    /// (e) the backend reported the job as failed
    #[error("Generation job failed: {}", .0.as_deref().unwrap_or("no detail"))]
    JobFailed(Option<String>),

    /// (d) the client gave up waiting
    #[error("Generation timed out after {waited:?} (last status: {last_status})")]
    TimedOut {
        waited: Duration,
        last_status: JobStatus,
    },
}

impl SessionError {
    /// Message suitable for inline display
    pub fn user_message(&self) -> String {
        match self {
            SessionError::CatalogLoad(e) | SessionError::SwatchUpload(e) | SessionError::Transport(e)
                if matches!(e, ClientError::NotConfigured) =>
            {
                MSG_BACKEND_NOT_CONFIGURED.to_string()
            }
            SessionError::CatalogLoad(_) => MSG_CATALOG_LOAD.to_string(),
            SessionError::SwatchUpload(ClientError::InvalidSwatch(reason)) => {
                format!("{MSG_SWATCH_UPLOAD} ({reason})")
            }
            SessionError::SwatchUpload(_) => MSG_SWATCH_UPLOAD.to_string(),
            SessionError::Transport(_) => MSG_GENERATION.to_string(),
            SessionError::JobFailed(Some(detail)) => detail.clone(),
            SessionError::JobFailed(None) => MSG_JOB_FAILED.to_string(),
            SessionError::TimedOut { .. } => MSG_TIMEOUT.to_string(),
        }
    }
}
