//! Generation job status and progress model.
//!
//! A job produces exactly [`RESULT_IMAGE_COUNT`] images, sequentially. The
//! status enum is shared between the session engine (which never stores
//! `Idle`) and the polling API (which reports `Idle` when no job exists for
//! the session).

use serde::{Deserialize, Serialize};

/// Number of images produced by one generation job.
pub const RESULT_IMAGE_COUNT: usize = 4;

/// Lifecycle state of a generation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// No job has run for this session. Reported by polling only; a stored
    /// job record always starts at `Queued`.
    Idle,
    Queued,
    Running,
    Done,
    Canceled,
    Failed,
}

impl JobStatus {
    /// A job that has been accepted but not yet reached a terminal state.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Queued | Self::Running)
    }

    /// Terminal states are sticky until a new job replaces the record.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Canceled | Self::Failed)
    }
}

/// Immutable point-in-time view of a job, published as a whole on every
/// update so a poller never observes a torn write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub status: JobStatus,
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobSnapshot {
    /// Snapshot reported when the session has no job record.
    pub fn idle() -> Self {
        Self {
            status: JobStatus::Idle,
            progress: 0,
            error: None,
        }
    }
}

/// Progress after `completed` of `total` steps, rounded to a whole percent.
pub fn progress_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (completed as f64 / total as f64) * 100.0;
    pct.round().clamp(0.0, 100.0) as u8
}
