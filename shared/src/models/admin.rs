//! Admin Models
//!
//! Records served under `/admin`. Unlike the public catalog these carry
//! numeric primary keys and timestamps.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::catalog::FamilyStatus;
use super::generation::JobStatus;

/// Largest page the admin API accepts
pub const MAX_PAGE_SIZE: u32 = 200;
/// Page size used when the caller gives none
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// `#RRGGBB`
fn validate_hex(value: &str) -> Result<(), ValidationError> {
    let ok = value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit());
    if ok {
        Ok(())
    } else {
        Err(ValidationError::new("hex_color"))
    }
}

/// Timestamps come back naive (no offset) from some backends; treat those as UTC.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => parse(&raw).map(Some).map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }

    fn parse(raw: &str) -> Result<DateTime<Utc>, String> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|e| format!("invalid timestamp '{raw}': {e}"))
    }
}

// ============================================================================
// Colors
// ============================================================================

/// Color row as returned by the admin API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorRead {
    pub id: i64,
    pub color_id: String,
    pub name: String,
    pub hex_value: String,
    #[serde(default)]
    pub swatch_code: Option<String>,
    #[serde(default)]
    pub swatch_url: Option<String>,
    #[serde(default)]
    pub status: FamilyStatus,
    pub fabric_family_id: i64,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub updated_at: DateTime<Utc>,
}

/// Create color payload (nested inside [`FabricCreate`])
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ColorCreate {
    #[validate(length(min = 1, message = "color_id must not be empty"))]
    pub color_id: String,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(custom(function = "validate_hex", message = "hex_value must look like #RRGGBB"))]
    pub hex_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swatch_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swatch_url: Option<String>,
    #[serde(default)]
    pub status: FamilyStatus,
}

/// Partial color update; unset fields are left untouched server-side
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ColorUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub color_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_hex"))]
    pub hex_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swatch_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swatch_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<FamilyStatus>,
    /// Moves the color to another family (numeric id)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fabric_family_id: Option<i64>,
}

/// Status toggle body for `PATCH /admin/colors/{id}/status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: FamilyStatus,
}

/// Body for `POST /admin/colors/{id}/move`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveColor {
    pub fabric_family_id: i64,
}

// ============================================================================
// Fabrics (families)
// ============================================================================

/// Fabric family row with its colors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FabricRead {
    pub id: i64,
    pub family_id: String,
    pub display_name: String,
    #[serde(default)]
    pub status: FamilyStatus,
    #[serde(default)]
    pub colors: Vec<ColorRead>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub updated_at: DateTime<Utc>,
}

/// Create fabric payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct FabricCreate {
    #[validate(length(min = 1, message = "family_id must not be empty"))]
    pub family_id: String,
    #[validate(length(min = 1, message = "display_name must not be empty"))]
    pub display_name: String,
    #[serde(default)]
    pub status: FamilyStatus,
    #[serde(default)]
    #[validate(nested)]
    pub colors: Vec<ColorCreate>,
}

/// Partial fabric update. `colors`, when present, replaces all colors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct FabricUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub family_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<FamilyStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub colors: Option<Vec<ColorCreate>>,
}

// ============================================================================
// Generation jobs
// ============================================================================

/// Generation job row as seen by the admin console
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationJobRead {
    pub id: i64,
    pub job_id: String,
    pub status: JobStatus,
    pub family_id: String,
    pub color_id: String,
    #[serde(default)]
    pub cuts: Vec<String>,
    #[serde(default)]
    pub seed: Option<i64>,
    #[serde(default)]
    pub result_urls: Option<Vec<String>>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub updated_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyCount {
    pub family_id: String,
    pub count: u64,
}

/// `GET /admin/generations/stats`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub total_generations: u64,
    #[serde(default)]
    pub by_status: HashMap<String, u64>,
    #[serde(default)]
    pub by_family: Vec<FamilyCount>,
    #[serde(default)]
    pub last_24_hours: u64,
}

// ============================================================================
// List queries
// ============================================================================

fn clamp_limit(limit: Option<u32>) -> u32 {
    limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

/// Query string for `GET /admin/fabrics`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FabricQuery {
    /// Matches family_id or display_name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_filter: Option<FamilyStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

impl FabricQuery {
    /// Same query with `limit` forced into the accepted range
    pub fn normalized(mut self) -> Self {
        self.limit = Some(clamp_limit(self.limit));
        self
    }
}

/// Query string for `GET /admin/colors`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorQuery {
    /// Matches color_id, name or swatch_code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_filter: Option<FamilyStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

impl ColorQuery {
    pub fn normalized(mut self) -> Self {
        self.limit = Some(clamp_limit(self.limit));
        self
    }
}

/// Query string for `GET /admin/generations`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_filter: Option<JobStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

impl GenerationQuery {
    pub fn normalized(mut self) -> Self {
        self.limit = Some(clamp_limit(self.limit));
        self
    }
}
