//! Generation job orchestrator
//!
//! `idle -> submitting -> polling -> completed | failed | timed_out`
//!
//! One driving loop per request: submit, then query the job status at a fixed
//! interval until it is terminal or the wall-clock ceiling passes. Only one
//! request may be in flight per orchestrator; a second `generate` while busy
//! is refused. Teardown cancels the loop and no state is touched afterwards.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use shared::models::{Cut, GenerationRequest, ImageResult, JobStatus, Quality, Selection};
use stylist_client::StylistApi;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::SessionError;

/// Polling parameters and request defaults
#[derive(Debug, Clone, PartialEq)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_wait: Duration,
    pub cuts: Vec<Cut>,
    pub quality: Option<Quality>,
    pub seed: Option<i64>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(2_000),
            max_wait: Duration::from_millis(300_000),
            cuts: Cut::DEFAULT.to_vec(),
            quality: None,
            seed: None,
        }
    }
}

pub const ENV_POLL_INTERVAL_MS: &str = "STYLIST_POLL_INTERVAL_MS";
pub const ENV_POLL_MAX_WAIT_MS: &str = "STYLIST_POLL_MAX_WAIT_MS";

impl PollConfig {
    /// Defaults overridden by `STYLIST_POLL_INTERVAL_MS` / `STYLIST_POLL_MAX_WAIT_MS`
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    /// Zero or unparsable values keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let millis = |name: &str| {
            lookup(name)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
        };

        let mut config = Self::default();
        if let Some(interval) = millis(ENV_POLL_INTERVAL_MS) {
            config.interval = interval;
        }
        if let Some(max_wait) = millis(ENV_POLL_MAX_WAIT_MS) {
            config.max_wait = max_wait;
        }
        config
    }
}

/// Where the orchestrator currently is
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum GenerationPhase {
    #[default]
    Idle,
    Submitting,
    Polling {
        request_id: String,
        last_status: JobStatus,
    },
    Completed {
        request_id: String,
    },
    Failed {
        message: String,
    },
    TimedOut {
        request_id: String,
        last_status: JobStatus,
    },
}

/// Result of one `generate` call
#[derive(Debug, Clone, PartialEq)]
pub enum GenerateOutcome {
    /// Family or color missing; nothing was sent
    Skipped,
    /// Another request is still running
    AlreadyRunning,
    Completed(Vec<ImageResult>),
    Failed(String),
    TimedOut(String),
    /// The owner was torn down mid-flight
    Cancelled,
}

/// Snapshot for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationView {
    pub phase: GenerationPhase,
    pub is_generating: bool,
    pub images: Vec<ImageResult>,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct GenerationState {
    phase: GenerationPhase,
    images: Vec<ImageResult>,
    error: Option<String>,
}

/// Resets the busy flag however the driving loop exits
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Submits generation jobs and polls them to completion
pub struct GenerationOrchestrator {
    api: Arc<dyn StylistApi>,
    config: PollConfig,
    busy: AtomicBool,
    state: Mutex<GenerationState>,
    cancel: CancellationToken,
}

impl GenerationOrchestrator {
    pub fn new(api: Arc<dyn StylistApi>, config: PollConfig) -> Self {
        Self::with_cancellation(api, config, CancellationToken::new())
    }

    /// Tie the orchestrator's lifetime to an owner's token
    pub fn with_cancellation(
        api: Arc<dyn StylistApi>,
        config: PollConfig,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            api,
            config,
            busy: AtomicBool::new(false),
            state: Mutex::new(GenerationState::default()),
            cancel,
        }
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, GenerationState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Apply a state change unless the owner is gone
    fn update(&self, f: impl FnOnce(&mut GenerationState)) {
        if self.cancel.is_cancelled() {
            return;
        }
        f(&mut self.lock());
    }

    /// True while submitting or polling
    pub fn is_generating(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn phase(&self) -> GenerationPhase {
        self.lock().phase.clone()
    }

    pub fn images(&self) -> Vec<ImageResult> {
        self.lock().images.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn view(&self) -> GenerationView {
        let state = self.lock();
        GenerationView {
            phase: state.phase.clone(),
            is_generating: self.is_generating(),
            images: state.images.clone(),
            error: state.error.clone(),
        }
    }

    /// Stop the driving loop; later results are ignored
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Run one generation request for `selection`.
    ///
    /// No-op without a complete selection. Previously shown images are cleared
    /// as soon as the request is submitted.
    pub async fn generate(
        &self,
        selection: &Selection,
        swatch_url: Option<String>,
    ) -> GenerateOutcome {
        if !selection.is_complete() {
            tracing::debug!("Generate ignored: incomplete selection");
            return GenerateOutcome::Skipped;
        }
        if self.cancel.is_cancelled() {
            return GenerateOutcome::Cancelled;
        }
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("Generate ignored: request already running");
            return GenerateOutcome::AlreadyRunning;
        }
        let _busy = BusyGuard(&self.busy);

        let request = GenerationRequest {
            family_id: selection.family_id.clone(),
            color_id: selection.color_id.clone(),
            cuts: self.config.cuts.clone(),
            seed: self.config.seed,
            quality: self.config.quality,
            swatch_url,
        };

        self.update(|s| {
            s.phase = GenerationPhase::Submitting;
            s.images.clear();
            s.error = None;
        });

        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                tracing::debug!("Generation cancelled by owner teardown");
                return GenerateOutcome::Cancelled;
            }
            result = self.drive(&request) => result,
        };

        match result {
            Ok((request_id, images)) => {
                tracing::info!(%request_id, images = images.len(), "Generation completed");
                self.update(|s| {
                    s.phase = GenerationPhase::Completed { request_id };
                    s.images = images.clone();
                    s.error = None;
                });
                GenerateOutcome::Completed(images)
            }
            Err(err) => {
                let message = err.user_message();
                tracing::warn!(error = %err, "Generation did not complete");
                let timed_out = matches!(err, SessionError::TimedOut { .. });
                self.update(|s| {
                    s.phase = match err {
                        SessionError::TimedOut { last_status, .. } => GenerationPhase::TimedOut {
                            request_id: match &s.phase {
                                GenerationPhase::Polling { request_id, .. } => request_id.clone(),
                                _ => String::new(),
                            },
                            last_status,
                        },
                        _ => GenerationPhase::Failed {
                            message: message.clone(),
                        },
                    };
                    s.images.clear();
                    s.error = Some(message.clone());
                });
                if timed_out {
                    GenerateOutcome::TimedOut(message)
                } else {
                    GenerateOutcome::Failed(message)
                }
            }
        }
    }

    /// Submit and poll. Returns the request id with the final images.
    async fn drive(
        &self,
        request: &GenerationRequest,
    ) -> Result<(String, Vec<ImageResult>), SessionError> {
        let job = self
            .api
            .create_generation(request)
            .await
            .map_err(SessionError::Transport)?;
        let request_id = job.request_id.clone();
        let deadline = Instant::now() + self.config.max_wait;

        match job.status {
            JobStatus::Completed => return Ok((request_id, job.completed_images())),
            JobStatus::Failed => return Err(SessionError::JobFailed(job.error_detail())),
            status => self.enter_polling(&request_id, status),
        }

        let mut last_status = job.status;
        let polled = tokio::time::timeout_at(deadline, async {
            loop {
                tokio::time::sleep(self.config.interval).await;
                let job = match self.api.get_job(&request_id).await {
                    Ok(job) => job,
                    Err(e) => return Err(SessionError::Transport(e)),
                };
                last_status = job.status;
                tracing::debug!(request_id = %request_id, status = %job.status, "Polled job");
                match job.status {
                    JobStatus::Completed => return Ok(job.completed_images()),
                    JobStatus::Failed => return Err(SessionError::JobFailed(job.error_detail())),
                    status => self.enter_polling(&request_id, status),
                }
            }
        })
        .await;

        match polled {
            Ok(images) => images.map(|images| (request_id, images)),
            Err(_) => Err(SessionError::TimedOut {
                waited: self.config.max_wait,
                last_status,
            }),
        }
    }

    fn enter_polling(&self, request_id: &str, status: JobStatus) {
        self.update(|s| {
            s.phase = GenerationPhase::Polling {
                request_id: request_id.to_string(),
                last_status: status,
            };
        });
    }
}
