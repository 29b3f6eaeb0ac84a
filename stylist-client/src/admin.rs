//! Admin console client
//!
//! CRUD for fabric families and colors, bulk status toggles and the
//! generation history, all under the `/admin` prefix.

use serde::Serialize;
use shared::models::{
    ColorQuery, ColorRead, ColorUpdate, FabricCreate, FabricQuery, FabricRead, FabricUpdate,
    FamilyStatus, GenerationJobRead, GenerationQuery, GenerationStats, MoveColor, StatusUpdate,
};
use validator::Validate;

use crate::{ClientConfig, ClientResult, HttpClient};

/// Result of a bulk status toggle. Failed ids are reported, never retried.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BulkOutcome {
    pub updated: Vec<ColorRead>,
    pub failed: Vec<(i64, String)>,
}

impl BulkOutcome {
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Admin API client
#[derive(Debug, Clone)]
pub struct AdminClient {
    http: HttpClient,
}

impl AdminClient {
    /// Build from configuration; the admin token (if any) is attached to every call
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let http = HttpClient::new(config)?.with_token(config.admin_token.clone());
        Ok(Self { http })
    }

    // ========== Fabrics ==========

    pub async fn list_fabrics(&self, query: FabricQuery) -> ClientResult<Vec<FabricRead>> {
        self.http
            .get_query("/admin/fabrics", &query.normalized())
            .await
    }

    pub async fn create_fabric(&self, payload: &FabricCreate) -> ClientResult<FabricRead> {
        payload.validate()?;
        let fabric: FabricRead = self.http.post("/admin/fabrics", payload).await?;
        tracing::info!(id = fabric.id, family_id = %fabric.family_id, "Fabric created");
        Ok(fabric)
    }

    pub async fn update_fabric(&self, id: i64, payload: &FabricUpdate) -> ClientResult<FabricRead> {
        payload.validate()?;
        self.http
            .patch(&format!("/admin/fabrics/{id}"), payload)
            .await
    }

    pub async fn deactivate_fabric(&self, id: i64) -> ClientResult<FabricRead> {
        self.http
            .post_empty(&format!("/admin/fabrics/{id}/deactivate"))
            .await
    }

    pub async fn delete_fabric(&self, id: i64) -> ClientResult<()> {
        self.http.delete(&format!("/admin/fabrics/{id}")).await?;
        tracing::info!(id, "Fabric deleted");
        Ok(())
    }

    // ========== Colors ==========

    pub async fn list_colors(&self, query: ColorQuery) -> ClientResult<Vec<ColorRead>> {
        self.http
            .get_query("/admin/colors", &query.normalized())
            .await
    }

    pub async fn get_color(&self, id: i64) -> ClientResult<ColorRead> {
        self.http.get(&format!("/admin/colors/{id}")).await
    }

    pub async fn update_color(&self, id: i64, payload: &ColorUpdate) -> ClientResult<ColorRead> {
        payload.validate()?;
        self.http
            .patch(&format!("/admin/colors/{id}"), payload)
            .await
    }

    pub async fn set_color_status(&self, id: i64, status: FamilyStatus) -> ClientResult<ColorRead> {
        self.http
            .patch(&format!("/admin/colors/{id}/status"), &StatusUpdate { status })
            .await
    }

    pub async fn move_color(&self, id: i64, fabric_family_id: i64) -> ClientResult<ColorRead> {
        self.http
            .post(
                &format!("/admin/colors/{id}/move"),
                &MoveColor { fabric_family_id },
            )
            .await
    }

    pub async fn delete_color(&self, id: i64) -> ClientResult<()> {
        self.http.delete(&format!("/admin/colors/{id}")).await?;
        tracing::info!(id, "Color deleted");
        Ok(())
    }

    /// Toggle many colors one after another.
    ///
    /// A failure on one id does not stop the rest.
    pub async fn bulk_set_color_status(&self, ids: &[i64], status: FamilyStatus) -> BulkOutcome {
        let mut outcome = BulkOutcome::default();
        for &id in ids {
            match self.set_color_status(id, status).await {
                Ok(color) => outcome.updated.push(color),
                Err(e) => {
                    tracing::warn!(id, error = %e, "Bulk status update failed");
                    outcome.failed.push((id, e.to_string()));
                }
            }
        }
        tracing::info!(
            updated = outcome.updated.len(),
            failed = outcome.failed.len(),
            %status,
            "Bulk status update finished"
        );
        outcome
    }

    // ========== Generations ==========

    pub async fn list_generations(
        &self,
        query: GenerationQuery,
    ) -> ClientResult<Vec<GenerationJobRead>> {
        self.http
            .get_query("/admin/generations", &query.normalized())
            .await
    }

    /// Completed jobs for one fabric color, newest first
    pub async fn generations_by_fabric(
        &self,
        family_id: &str,
        color_id: &str,
        limit: Option<u32>,
    ) -> ClientResult<Vec<GenerationJobRead>> {
        #[derive(Serialize)]
        struct Limit {
            limit: u32,
        }
        self.http
            .get_query(
                &format!("/admin/generations/by-fabric/{family_id}/{color_id}"),
                &Limit {
                    limit: limit.unwrap_or(20).clamp(1, 100),
                },
            )
            .await
    }

    pub async fn generation_stats(&self) -> ClientResult<GenerationStats> {
        self.http.get("/admin/generations/stats").await
    }

    pub async fn get_generation(&self, job_id: &str) -> ClientResult<GenerationJobRead> {
        self.http
            .get(&format!("/admin/generations/{job_id}"))
            .await
    }

    pub async fn delete_generation(&self, job_id: &str) -> ClientResult<()> {
        self.http
            .delete(&format!("/admin/generations/{job_id}"))
            .await
    }
}
