//! Generation Job Model

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Garment silhouette variant requested for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cut {
    Recto,
    Cruzado,
}

impl Cut {
    /// Cuts requested when the caller does not specify any
    pub const DEFAULT: [Cut; 2] = [Cut::Recto, Cut::Cruzado];

    pub fn as_str(&self) -> &'static str {
        match self {
            Cut::Recto => "recto",
            Cut::Cruzado => "cruzado",
        }
    }
}

impl std::fmt::Display for Cut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Render quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    Preview,
    #[default]
    Final,
}

impl std::str::FromStr for Quality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "preview" => Ok(Quality::Preview),
            "final" => Ok(Quality::Final),
            other => Err(format!("unknown quality '{other}', expected preview|final")),
        }
    }
}

/// `POST /generate` request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub family_id: String,
    pub color_id: String,
    pub cuts: Vec<Cut>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<Quality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swatch_url: Option<String>,
}

impl GenerationRequest {
    pub fn new(family_id: impl Into<String>, color_id: impl Into<String>) -> Self {
        Self {
            family_id: family_id.into(),
            color_id: color_id.into(),
            cuts: Cut::DEFAULT.to_vec(),
            seed: None,
            quality: None,
            swatch_url: None,
        }
    }
}

/// Lifecycle status reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Completed or failed; no further polling needed
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn default_watermark() -> bool {
    true
}

/// One rendered image of a completed job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageResult {
    pub cut: Cut,
    pub url: String,
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_watermark")]
    pub watermark: bool,
    #[serde(default)]
    pub meta: HashMap<String, Value>,
}

/// `POST /generate` and `GET /jobs/{request_id}` response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationJob {
    pub request_id: String,
    pub status: JobStatus,
    #[serde(default)]
    pub images: Vec<ImageResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub meta: HashMap<String, Value>,
    /// Some deployments report the failure reason at the top level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerationJob {
    /// Images, but only once the job completed. Anything the backend sends
    /// alongside a non-terminal status is ignored.
    pub fn completed_images(&self) -> Vec<ImageResult> {
        if self.status == JobStatus::Completed {
            self.images.clone()
        } else {
            Vec::new()
        }
    }

    /// Failure reason reported by the backend (`meta.error` or `error`)
    pub fn error_detail(&self) -> Option<String> {
        self.error
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .or_else(|| match self.meta.get("error") {
                Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
                Some(Value::Null) | None => None,
                Some(Value::String(_)) => None,
                Some(other) => Some(other.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_omits_unset_optionals() {
        let req = GenerationRequest::new("navy", "navy-001");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "family_id": "navy",
                "color_id": "navy-001",
                "cuts": ["recto", "cruzado"],
            })
        );
    }

    #[test]
    fn images_hidden_until_completed() {
        let mut job: GenerationJob = serde_json::from_value(serde_json::json!({
            "request_id": "job-1",
            "status": "processing",
            "images": [{"cut": "recto", "url": "https://cdn/x.png", "width": 1024, "height": 1024}]
        }))
        .unwrap();
        assert!(job.completed_images().is_empty());
        job.status = JobStatus::Completed;
        assert_eq!(job.completed_images().len(), 1);
        assert!(job.completed_images()[0].watermark);
    }

    #[test]
    fn error_detail_reads_meta_then_top_level() {
        let job: GenerationJob = serde_json::from_value(serde_json::json!({
            "request_id": "job-2",
            "status": "failed",
            "meta": {"error": "GPU out of memory"}
        }))
        .unwrap();
        assert_eq!(job.error_detail().as_deref(), Some("GPU out of memory"));

        let job: GenerationJob = serde_json::from_value(serde_json::json!({
            "request_id": "job-3",
            "status": "failed",
            "error": "bad swatch"
        }))
        .unwrap();
        assert_eq!(job.error_detail().as_deref(), Some("bad swatch"));

        let job: GenerationJob = serde_json::from_value(serde_json::json!({
            "request_id": "job-4",
            "status": "failed",
            "meta": {"error": "  "}
        }))
        .unwrap();
        assert_eq!(job.error_detail(), None);
    }

    #[test]
    fn terminal_statuses() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }
}
