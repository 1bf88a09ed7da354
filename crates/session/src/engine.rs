//! Workflow operations and the background generation task.
//!
//! [`GenerationEngine`] is the boundary API the HTTP layer calls: register
//! a capture, select a style, start/poll/cancel a job, fetch results,
//! reset. Starting a job spawns [`run_generation`] on the runtime and
//! returns immediately; the task and the request side communicate only
//! through the session entry in the store.

use std::sync::Arc;

use uuid::Uuid;

use booth_core::capture::CapturedImage;
use booth_core::error::CoreError;
use booth_core::job::{progress_percent, JobSnapshot, JobStatus, RESULT_IMAGE_COUNT};
use booth_core::prompt::{compose_instruction, normalize_refinements};
use booth_core::style::StickerStyle;
use booth_provider::TransformProvider;

use crate::state::{JobRecord, SessionState};
use crate::store::SessionStore;

/// Orchestrates the capture → style → generate → print workflow over the
/// injected store and transform provider.
#[derive(Clone)]
pub struct GenerationEngine {
    store: Arc<SessionStore>,
    provider: Arc<dyn TransformProvider>,
}

impl GenerationEngine {
    pub fn new(store: Arc<SessionStore>, provider: Arc<dyn TransformProvider>) -> Self {
        Self { store, provider }
    }

    /// The underlying store, for the sweep loop and health reporting.
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Issue a fresh opaque session token and create its backing entry.
    pub async fn issue_token(&self) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.store.get_or_create(&token).await;
        token
    }

    /// Store a validated capture, discarding any previous workflow state
    /// that depended on the old photo.
    pub async fn register_capture(&self, token: &str, captured: CapturedImage) {
        let session = self.store.get_or_create(token).await;
        let mut state = session.lock().await;
        state.captured = Some(captured);
        state.results = None;
        state.approved = false;
        state.touch();
    }

    /// The captured photo, or `NotReady` when the camera step has not run.
    pub async fn captured_image(&self, token: &str) -> Result<CapturedImage, CoreError> {
        let session = self.store.get_or_create(token).await;
        let mut state = session.lock().await;
        state.touch();
        state
            .captured
            .clone()
            .ok_or_else(|| CoreError::NotReady("No captured image for this session".into()))
    }

    /// Select a style; the base prompt is derived here and never set
    /// independently. Requires a capture.
    pub async fn select_style(&self, token: &str, style: StickerStyle) -> Result<(), CoreError> {
        let session = self.store.get_or_create(token).await;
        let mut state = session.lock().await;
        if state.captured.is_none() {
            return Err(CoreError::MissingInput(
                "Capture a photo before selecting a style".into(),
            ));
        }
        state.style = Some(style);
        state.base_prompt = Some(style.base_prompt().to_string());
        state.touch();
        Ok(())
    }

    /// Currently selected style, if any.
    pub async fn selected_style(&self, token: &str) -> Option<StickerStyle> {
        let session = self.store.get_or_create(token).await;
        let mut state = session.lock().await;
        state.touch();
        state.style
    }

    /// Start the four-image generation job.
    ///
    /// Validates prerequisites without mutating on failure, rejects a start
    /// while another job is active, marks the job `Queued`, and spawns the
    /// background task. Returns as soon as the task is scheduled; the
    /// caller is never blocked on a transform call.
    pub async fn start_job(&self, token: &str, prompts: Vec<String>) -> Result<(), CoreError> {
        let session = self.store.get_or_create(token).await;

        let (job_id, captured, style, base_prompt, refinements) = {
            let mut state = session.lock().await;
            state.touch();

            if state.job.as_ref().is_some_and(|j| j.status.is_active()) {
                return Err(CoreError::Conflict(
                    "A generation job is already running for this session".into(),
                ));
            }

            let captured = state
                .captured
                .clone()
                .ok_or_else(|| CoreError::MissingInput("No captured image".into()))?;
            let style = state
                .style
                .ok_or_else(|| CoreError::MissingInput("No style selected".into()))?;
            let base_prompt = state
                .base_prompt
                .clone()
                .ok_or_else(|| CoreError::MissingInput("No base prompt".into()))?;

            // Prerequisites hold; from here on we mutate.
            let refinements = normalize_refinements(prompts);
            let job_id = Uuid::new_v4();
            state.refinements = refinements.clone();
            state.results = None;
            state.approved = false;
            state.job = Some(JobRecord::queued(job_id));

            (job_id, captured, style, base_prompt, refinements)
        };

        tracing::info!(session = %token, %job_id, "Generation job accepted");

        tokio::spawn(run_generation(
            Arc::clone(&self.store),
            Arc::clone(&self.provider),
            token.to_string(),
            job_id,
            captured,
            style,
            base_prompt,
            refinements,
        ));

        Ok(())
    }

    /// Pure read of the job state; `Idle` when no job has ever run.
    pub async fn poll_status(&self, token: &str) -> JobSnapshot {
        let session = self.store.get_or_create(token).await;
        let mut state = session.lock().await;
        state.touch();
        state.poll()
    }

    /// Mark the session's job `Canceled`.
    ///
    /// Unconditional and idempotent: with no job a canceled record is
    /// created, an active job is flipped (the task observes the flag
    /// before its next transform call), and a job already in a terminal
    /// state is left untouched.
    pub async fn cancel_job(&self, token: &str) {
        let session = self.store.get_or_create(token).await;
        let mut state = session.lock().await;
        state.touch();
        match &mut state.job {
            Some(job) if !job.status.is_terminal() => {
                job.status = JobStatus::Canceled;
                tracing::info!(session = %token, job_id = %job.id, "Job cancel requested");
            }
            Some(_) => {}
            None => state.job = Some(JobRecord::canceled(Uuid::new_v4())),
        }
    }

    /// The four approved result images; `NotReady` until the job has
    /// published them.
    pub async fn fetch_results(&self, token: &str) -> Result<Vec<Vec<u8>>, CoreError> {
        let session = self.store.get_or_create(token).await;
        let mut state = session.lock().await;
        state.touch();
        match &state.results {
            Some(images) if state.approved && images.len() == RESULT_IMAGE_COUNT => {
                Ok(images.clone())
            }
            _ => Err(CoreError::NotReady("No approved images".into())),
        }
    }

    /// Discard all session state immediately. A running task notices the
    /// missing session and stops at its next checkpoint.
    pub async fn reset(&self, token: &str) {
        if self.store.remove(token).await {
            tracing::info!(session = %token, "Session reset");
        }
    }

    /// Called after a successful print: hard-delete the session so photo
    /// data is reclaimed eagerly rather than waiting for the TTL sweep.
    pub async fn complete_print(&self, token: &str) {
        if self.store.remove(token).await {
            tracing::info!(session = %token, "Session retired after print");
        }
    }
}

// ---------------------------------------------------------------------------
// Background task
// ---------------------------------------------------------------------------

/// Run the sequential four-image generation for one job.
///
/// The task owns no session reference: before every mutation it re-resolves
/// the token and checks that the stored record is still *this* job and not
/// canceled. A missing session, a superseding job, or a cancel flag all
/// quietly end the task. Failures terminate the job as `Failed` with the
/// provider's message; nothing here can escape as a process fault.
#[allow(clippy::too_many_arguments)]
async fn run_generation(
    store: Arc<SessionStore>,
    provider: Arc<dyn TransformProvider>,
    token: String,
    job_id: Uuid,
    captured: CapturedImage,
    style: StickerStyle,
    base_prompt: String,
    refinements: [String; RESULT_IMAGE_COUNT],
) {
    if !update_current(&store, &token, job_id, |job| {
        job.status = JobStatus::Running;
    })
    .await
    {
        return;
    }

    let mut images: Vec<Vec<u8>> = Vec::with_capacity(RESULT_IMAGE_COUNT);

    for step in 0..RESULT_IMAGE_COUNT {
        // Cancellation is observed here, between transform calls. An
        // in-flight call is never interrupted; worst-case cancel latency
        // is one call's duration.
        if !job_is_current(&store, &token, job_id).await {
            tracing::info!(session = %token, %job_id, step, "Generation stopped before step");
            return;
        }

        let instruction = compose_instruction(style, &base_prompt, &refinements[step]);

        match provider
            .transform(&captured.bytes, &captured.mime, &instruction)
            .await
        {
            Ok(bytes) => {
                images.push(bytes);
                let progress = progress_percent(step + 1, RESULT_IMAGE_COUNT);
                if !update_current(&store, &token, job_id, |job| {
                    job.progress = progress;
                    job.step = step + 1;
                })
                .await
                {
                    return;
                }
                tracing::debug!(session = %token, %job_id, step, progress, "Step completed");
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!(session = %token, %job_id, step, error = %message, "Step failed");
                update_current(&store, &token, job_id, |job| {
                    job.status = JobStatus::Failed;
                    job.error = Some(message);
                })
                .await;
                return;
            }
        }
    }

    // Publish all four images and the terminal status in one lock window so
    // a poller can never observe `Done` without results (or vice versa).
    let published = with_session(&store, &token, |state| {
        let current = matches!(&state.job, Some(job) if job.id == job_id && job.status != JobStatus::Canceled);
        if !current {
            return false;
        }
        state.results = Some(images);
        state.approved = true;
        if let Some(job) = &mut state.job {
            job.status = JobStatus::Done;
            job.progress = 100;
        }
        state.touch();
        true
    })
    .await
    .unwrap_or(false);

    if published {
        tracing::info!(session = %token, %job_id, "Generation complete");
    }
}

/// Run `f` under the session lock, if the session still exists.
async fn with_session<T>(
    store: &SessionStore,
    token: &str,
    f: impl FnOnce(&mut SessionState) -> T,
) -> Option<T> {
    let session = store.get(token).await?;
    let mut state = session.lock().await;
    Some(f(&mut state))
}

/// Whether the stored job record is still this task's job and not canceled.
async fn job_is_current(store: &SessionStore, token: &str, job_id: Uuid) -> bool {
    with_session(store, token, |state| {
        matches!(&state.job, Some(job) if job.id == job_id && job.status != JobStatus::Canceled)
    })
    .await
    .unwrap_or(false)
}

/// Apply `f` to the job record if it is still current. Returns whether the
/// update was applied; `false` means the task should stop.
async fn update_current(
    store: &SessionStore,
    token: &str,
    job_id: Uuid,
    f: impl FnOnce(&mut JobRecord),
) -> bool {
    with_session(store, token, |state| {
        match &mut state.job {
            Some(job) if job.id == job_id && job.status != JobStatus::Canceled => {
                f(job);
                state.touch();
                true
            }
            _ => false,
        }
    })
    .await
    .unwrap_or(false)
}
