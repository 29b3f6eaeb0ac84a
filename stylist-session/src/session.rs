//! Owned session store
//!
//! One `StylistSession` per user session. It is the only writer of catalog,
//! selection, swatch and generation state; everything goes through the
//! methods below. Dropping it (or calling [`StylistSession::shutdown`])
//! stops in-flight work from touching state.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use shared::models::{Catalog, Color, Family, ImageResult, Selection};
use stylist_client::{StylistApi, SwatchFile};
use tokio_util::sync::CancellationToken;

use crate::catalog::CatalogState;
use crate::generation::{GenerateOutcome, GenerationOrchestrator, GenerationView, PollConfig};
use crate::search::{SearchHistory, SearchOutcome, search_color};
use crate::swatch::{CustomSwatchView, SwatchCoordinator};

/// Result of [`StylistSession::load_catalog`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadOutcome {
    Loaded { families: usize },
    Failed { message: String },
    /// Already loaded (or loading), or the session is shut down
    Skipped,
}

/// Everything a front end needs to render one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub selection: Selection,
    pub catalog_loading: bool,
    pub catalog_error: Option<String>,
    pub swatch: Option<CustomSwatchView>,
    pub generation: GenerationView,
    pub selected_image: Option<ImageResult>,
    pub recent_searches: Vec<String>,
}

pub struct StylistSession {
    api: Arc<dyn StylistApi>,
    catalog: Mutex<CatalogState>,
    swatch: SwatchCoordinator,
    generation: GenerationOrchestrator,
    history: Mutex<SearchHistory>,
    selected_image: Mutex<Option<ImageResult>>,
    shutdown: CancellationToken,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl StylistSession {
    pub fn new(api: Arc<dyn StylistApi>, poll: PollConfig) -> Self {
        let shutdown = CancellationToken::new();
        Self {
            swatch: SwatchCoordinator::new(Arc::clone(&api)),
            generation: GenerationOrchestrator::with_cancellation(
                Arc::clone(&api),
                poll,
                shutdown.clone(),
            ),
            api,
            catalog: Mutex::new(CatalogState::new()),
            history: Mutex::new(SearchHistory::default()),
            selected_image: Mutex::new(None),
            shutdown,
        }
    }

    // ========== Catalog ==========

    /// Fetch the catalog. Only the first call goes to the network.
    pub async fn load_catalog(&self) -> LoadOutcome {
        if self.shutdown.is_cancelled() || !lock(&self.catalog).begin_load() {
            return LoadOutcome::Skipped;
        }

        tracing::debug!("Loading catalog");
        let result = tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => return LoadOutcome::Skipped,
            result = self.api.get_catalog() => result,
        };
        if self.shutdown.is_cancelled() {
            return LoadOutcome::Skipped;
        }

        let mut state = lock(&self.catalog);
        match state.finish_load(result) {
            Ok(()) => LoadOutcome::Loaded {
                families: state.catalog().families.len(),
            },
            Err(err) => LoadOutcome::Failed {
                message: err.user_message(),
            },
        }
    }

    pub fn catalog(&self) -> Catalog {
        lock(&self.catalog).catalog().clone()
    }

    pub fn selection(&self) -> Selection {
        lock(&self.catalog).selection().clone()
    }

    pub fn catalog_error(&self) -> Option<String> {
        lock(&self.catalog).error().map(str::to_string)
    }

    pub fn current_family(&self) -> Option<Family> {
        lock(&self.catalog).current_family().cloned()
    }

    pub fn current_color(&self) -> Option<Color> {
        lock(&self.catalog).current_color().cloned()
    }

    pub fn select_family(&self, family_id: &str) {
        lock(&self.catalog).select_family(family_id);
    }

    /// Pick a catalog color. A custom swatch and a catalog color are mutually
    /// exclusive, so an accepted color discards the custom swatch.
    pub fn select_color(&self, color_id: &str) -> bool {
        let accepted = lock(&self.catalog).select_color(color_id);
        if accepted {
            self.swatch.discard();
        }
        accepted
    }

    // ========== Custom swatch ==========

    /// Show the file right away and upload it in the background
    pub fn choose_swatch_file(&self, file: SwatchFile) -> Option<CustomSwatchView> {
        if self.shutdown.is_cancelled() {
            return None;
        }
        self.swatch.select_file(file)
    }

    pub fn discard_swatch(&self) {
        self.swatch.discard();
    }

    pub async fn wait_for_swatch_upload(&self) {
        self.swatch.wait_for_upload().await;
    }

    pub fn swatch(&self) -> Option<CustomSwatchView> {
        self.swatch.snapshot()
    }

    pub fn swatch_coordinator(&self) -> &SwatchCoordinator {
        &self.swatch
    }

    /// Swatch reference sent with the next request: the uploaded custom
    /// swatch, else the selected catalog color's image, else nothing.
    pub fn effective_swatch_url(&self) -> Option<String> {
        self.swatch
            .remote_url()
            .or_else(|| self.current_color().and_then(|c| c.swatch_url))
    }

    // ========== Generation ==========

    pub async fn generate(&self) -> GenerateOutcome {
        let selection = self.selection();
        if selection.is_complete() && !self.generation.is_generating() {
            *lock(&self.selected_image) = None;
        }
        let swatch_url = self.effective_swatch_url();
        self.generation.generate(&selection, swatch_url).await
    }

    pub fn is_generating(&self) -> bool {
        self.generation.is_generating()
    }

    pub fn images(&self) -> Vec<ImageResult> {
        self.generation.images()
    }

    pub fn generation(&self) -> GenerationView {
        self.generation.view()
    }

    /// The single error line shown on the page; generation errors win
    pub fn error_message(&self) -> Option<String> {
        self.generation.error().or_else(|| self.catalog_error())
    }

    // ========== Search ==========

    /// Look a color id up and select it when found elsewhere in the catalog
    pub fn search_and_apply(&self, query: &str) -> SearchOutcome {
        let outcome = {
            let mut state = lock(&self.catalog);
            let outcome = search_color(state.catalog(), state.selection(), query);
            if let SearchOutcome::Found { selection } = &outcome {
                state.select_family(&selection.family_id);
                state.select_color(&selection.color_id);
            }
            outcome
        };

        if let SearchOutcome::Found { selection } = &outcome {
            tracing::info!(
                family_id = %selection.family_id,
                color_id = %selection.color_id,
                "Search applied selection"
            );
            self.swatch.discard();
            lock(&self.history).record(query);
        }
        outcome
    }

    pub fn recent_searches(&self) -> Vec<String> {
        lock(&self.history).recent()
    }

    // ========== Gallery ==========

    /// Focus one of the current images. `None` if there is no such image.
    pub fn open_image(&self, index: usize) -> Option<ImageResult> {
        let image = self.generation.images().into_iter().nth(index)?;
        *lock(&self.selected_image) = Some(image.clone());
        Some(image)
    }

    pub fn close_image(&self) {
        *lock(&self.selected_image) = None;
    }

    pub fn selected_image(&self) -> Option<ImageResult> {
        lock(&self.selected_image).clone()
    }

    // ========== Lifecycle ==========

    pub fn view(&self) -> SessionView {
        let (selection, catalog_loading, catalog_error) = {
            let state = lock(&self.catalog);
            (
                state.selection().clone(),
                state.is_loading(),
                state.error().map(str::to_string),
            )
        };
        SessionView {
            selection,
            catalog_loading,
            catalog_error,
            swatch: self.swatch.snapshot(),
            generation: self.generation.view(),
            selected_image: self.selected_image(),
            recent_searches: self.recent_searches(),
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Tear down: stop polling, release the preview, ignore late results
    pub fn shutdown(&self) {
        if self.shutdown.is_cancelled() {
            return;
        }
        tracing::debug!("Stylist session shutting down");
        self.shutdown.cancel();
        self.swatch.shutdown();
    }
}

impl Drop for StylistSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
