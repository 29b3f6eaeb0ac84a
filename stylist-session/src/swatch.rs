//! Swatch upload coordinator
//!
//! Owns the custom swatch: a local preview reference created the moment a
//! file is chosen, and the remote URL once the upload succeeds.
//!
//! Every new file (or discard) bumps a version counter. An upload that
//! finishes after its version was superseded is dropped, so it can neither
//! resurrect a released preview nor override a newer choice.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use stylist_client::{ClientResult, StylistApi, SwatchFile, SwatchUploadResponse};
use tokio::task::JoinHandle;

use crate::error::SessionError;
use crate::preview::{PreviewHandle, PreviewRegistry};

/// What the UI renders for the custom swatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomSwatchView {
    pub preview_ref: String,
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub remote_url: Option<String>,
    pub uploading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct SwatchInner {
    version: u64,
    torn_down: bool,
    preview: Option<PreviewHandle>,
    file_name: String,
    width: u32,
    height: u32,
    remote_url: Option<String>,
    uploading: bool,
    error: Option<String>,
    upload_task: Option<JoinHandle<()>>,
}

impl SwatchInner {
    /// Release the preview and forget everything; in-flight uploads go stale
    fn clear(&mut self) {
        self.version += 1;
        if let Some(mut preview) = self.preview.take() {
            preview.release();
        }
        self.file_name.clear();
        self.width = 0;
        self.height = 0;
        self.remote_url = None;
        self.uploading = false;
        self.error = None;
    }
}

/// Coordinates preview lifetime and the upload of a user-chosen swatch
pub struct SwatchCoordinator {
    api: Arc<dyn StylistApi>,
    registry: PreviewRegistry,
    inner: Arc<Mutex<SwatchInner>>,
}

fn lock(inner: &Mutex<SwatchInner>) -> MutexGuard<'_, SwatchInner> {
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl SwatchCoordinator {
    pub fn new(api: Arc<dyn StylistApi>) -> Self {
        Self::with_registry(api, PreviewRegistry::new())
    }

    pub fn with_registry(api: Arc<dyn StylistApi>, registry: PreviewRegistry) -> Self {
        Self {
            api,
            registry,
            inner: Arc::new(Mutex::new(SwatchInner::default())),
        }
    }

    pub fn registry(&self) -> &PreviewRegistry {
        &self.registry
    }

    /// Take a new file: the preview is available on return, the upload
    /// continues in the background. Must be called inside a Tokio runtime.
    ///
    /// Returns `None` after [`shutdown`](Self::shutdown).
    pub fn select_file(&self, file: SwatchFile) -> Option<CustomSwatchView> {
        let (width, height) = file.dimensions();
        let mut inner = lock(&self.inner);
        if inner.torn_down {
            return None;
        }

        // the previous preview goes before the next one is minted
        inner.clear();
        let preview = self.registry.acquire(&file.file_name);
        let version = inner.version;
        inner.preview = Some(preview);
        inner.file_name = file.file_name.clone();
        inner.width = width;
        inner.height = height;
        inner.uploading = true;

        tracing::debug!(version, file_name = %file.file_name, width, height, "Swatch selected");

        let api = Arc::clone(&self.api);
        let shared = Arc::clone(&self.inner);
        inner.upload_task = Some(tokio::spawn(async move {
            let result = api.upload_swatch(&file).await;
            apply_upload(&shared, version, result);
        }));

        view(&inner)
    }

    /// Wait for the current upload (if any) to settle
    pub async fn wait_for_upload(&self) {
        let task = lock(&self.inner).upload_task.take();
        if let Some(task) = task
            && let Err(e) = task.await
        {
            tracing::warn!(error = %e, "Swatch upload task aborted");
        }
    }

    /// Drop the custom swatch entirely. Safe to call repeatedly.
    pub fn discard(&self) {
        let mut inner = lock(&self.inner);
        if inner.preview.is_some() || inner.remote_url.is_some() || inner.error.is_some() {
            tracing::debug!("Custom swatch discarded");
        }
        inner.clear();
    }

    /// Release everything and ignore any result still in flight
    pub fn shutdown(&self) {
        let mut inner = lock(&self.inner);
        inner.clear();
        inner.torn_down = true;
    }

    /// Remote reference generation should use, once uploaded
    pub fn remote_url(&self) -> Option<String> {
        lock(&self.inner).remote_url.clone()
    }

    pub fn snapshot(&self) -> Option<CustomSwatchView> {
        view(&lock(&self.inner))
    }
}

impl Drop for SwatchCoordinator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn view(inner: &SwatchInner) -> Option<CustomSwatchView> {
    let preview_ref = inner.preview.as_ref()?.reference()?.to_string();
    Some(CustomSwatchView {
        preview_ref,
        file_name: inner.file_name.clone(),
        width: inner.width,
        height: inner.height,
        remote_url: inner.remote_url.clone(),
        uploading: inner.uploading,
        error: inner.error.clone(),
    })
}

fn apply_upload(
    inner: &Mutex<SwatchInner>,
    version: u64,
    result: ClientResult<SwatchUploadResponse>,
) {
    let mut inner = lock(inner);
    if inner.torn_down || inner.version != version {
        tracing::debug!(
            version,
            current = inner.version,
            ok = result.is_ok(),
            "Dropping stale swatch upload result"
        );
        return;
    }

    inner.uploading = false;
    match result {
        Ok(uploaded) => {
            tracing::info!(version, swatch_url = %uploaded.swatch_url, "Custom swatch ready");
            inner.remote_url = Some(uploaded.swatch_url);
            inner.error = None;
        }
        Err(e) => {
            let err = SessionError::SwatchUpload(e);
            tracing::warn!(version, error = %err, "Custom swatch upload failed");
            inner.remote_url = None;
            inner.error = Some(err.user_message());
        }
    }
}
