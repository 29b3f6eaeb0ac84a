// stylist-client/src/api.rs
// Public backend API: catalog, generation jobs, swatch upload

use async_trait::async_trait;
use shared::models::{Catalog, GenerationJob, GenerationRequest, SwatchUploadResponse};

use crate::{ClientConfig, ClientError, ClientResult, HttpClient, SwatchFile};

/// Backend operations the session layer depends on.
///
/// Implemented over HTTP by [`StylistClient`]; tests substitute in-memory fakes.
#[async_trait]
pub trait StylistApi: Send + Sync {
    /// `GET /catalog`
    async fn get_catalog(&self) -> ClientResult<Catalog>;

    /// `POST /generate`
    async fn create_generation(&self, request: &GenerationRequest) -> ClientResult<GenerationJob>;

    /// `GET /jobs/{request_id}`
    async fn get_job(&self, request_id: &str) -> ClientResult<GenerationJob>;

    /// `POST /upload-swatch` (multipart field `file`)
    async fn upload_swatch(&self, file: &SwatchFile) -> ClientResult<SwatchUploadResponse>;
}

/// HTTP implementation of [`StylistApi`]
#[derive(Debug, Clone)]
pub struct StylistClient {
    http: HttpClient,
}

impl StylistClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.http.is_configured()
    }
}

fn job_path(request_id: &str) -> ClientResult<String> {
    let id = request_id.trim();
    if id.is_empty() || id.contains(['/', '?', '#']) {
        return Err(ClientError::Validation(format!(
            "invalid request id '{request_id}'"
        )));
    }
    Ok(format!("/jobs/{id}"))
}

#[async_trait]
impl StylistApi for StylistClient {
    async fn get_catalog(&self) -> ClientResult<Catalog> {
        self.http.get("/catalog").await
    }

    async fn create_generation(&self, request: &GenerationRequest) -> ClientResult<GenerationJob> {
        let job: GenerationJob = self.http.post("/generate", request).await?;
        tracing::info!(
            request_id = %job.request_id,
            status = %job.status,
            family_id = %request.family_id,
            color_id = %request.color_id,
            "Generation job created"
        );
        Ok(job)
    }

    async fn get_job(&self, request_id: &str) -> ClientResult<GenerationJob> {
        self.http.get(&job_path(request_id)?).await
    }

    async fn upload_swatch(&self, file: &SwatchFile) -> ClientResult<SwatchUploadResponse> {
        file.validate()?;
        let uploaded: SwatchUploadResponse = self
            .http
            .post_multipart("/upload-swatch", file.to_form()?)
            .await?;
        tracing::info!(
            filename = %uploaded.filename,
            size_bytes = uploaded.size_bytes,
            "Swatch uploaded"
        );
        Ok(uploaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_path_rejects_path_injection() {
        assert_eq!(job_path("abc-123").unwrap(), "/jobs/abc-123");
        assert!(job_path("").is_err());
        assert!(job_path("../admin").is_err());
        assert!(job_path("a?b").is_err());
    }
}
