//! Per-session workflow state.

use std::time::{Duration, Instant};

use uuid::Uuid;

use booth_core::capture::CapturedImage;
use booth_core::job::{JobSnapshot, JobStatus, RESULT_IMAGE_COUNT};
use booth_core::style::StickerStyle;

/// One generation attempt. Owned by its session; the background task only
/// ever refers to it by `(session token, job id)`.
#[derive(Debug, Clone)]
pub struct JobRecord {
    /// Identity of this attempt. A stale task whose id no longer matches
    /// the record must not mutate anything.
    pub id: Uuid,
    /// Never `Idle`; that value is reported by polling only.
    pub status: JobStatus,
    pub progress: u8,
    pub error: Option<String>,
    /// Number of completed steps (0..=4).
    pub step: usize,
}

impl JobRecord {
    /// Fresh record in the `Queued` state.
    pub fn queued(id: Uuid) -> Self {
        Self {
            id,
            status: JobStatus::Queued,
            progress: 0,
            error: None,
            step: 0,
        }
    }

    /// Record representing an unconditional cancel when no job exists.
    pub fn canceled(id: Uuid) -> Self {
        Self {
            status: JobStatus::Canceled,
            ..Self::queued(id)
        }
    }

    pub fn snapshot(&self) -> JobSnapshot {
        JobSnapshot {
            status: self.status,
            progress: self.progress,
            error: self.error.clone(),
        }
    }
}

/// All state for one browser session.
#[derive(Debug)]
pub struct SessionState {
    /// Raw captured photo; set once, immutable until reset.
    pub captured: Option<CapturedImage>,
    pub style: Option<StickerStyle>,
    /// Derived from the style at selection time, never independently set.
    pub base_prompt: Option<String>,
    /// Per-image refinement text, normalized to exactly four entries.
    pub refinements: [String; RESULT_IMAGE_COUNT],
    pub job: Option<JobRecord>,
    /// Present only once a job has completed all four images.
    pub results: Option<Vec<Vec<u8>>>,
    /// Whether `results` are cleared for printing.
    pub approved: bool,
    pub last_activity: Instant,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            captured: None,
            style: None,
            base_prompt: None,
            refinements: Default::default(),
            job: None,
            results: None,
            approved: false,
            last_activity: Instant::now(),
        }
    }

    /// Refresh the idle-expiry clock.
    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    /// Current job view; `Idle` when no job has run.
    pub fn poll(&self) -> JobSnapshot {
        self.job
            .as_ref()
            .map(JobRecord::snapshot)
            .unwrap_or_else(JobSnapshot::idle)
    }

    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.last_activity) > ttl
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
