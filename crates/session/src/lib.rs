//! Session-scoped asynchronous job management.
//!
//! This crate owns the booth's only interesting state: per-browser
//! [`state::SessionState`] entries held in a lock-protected
//! [`store::SessionStore`], the background generation task driven by
//! [`engine::GenerationEngine`], and the idle-expiry [`sweep`] loop.
//!
//! Concurrency model: the store's `RwLock` guards the token map; each
//! session sits behind its own `Mutex`, which is the single
//! synchronization point between the job task, poll/cancel requests, and
//! the sweep. No lock is ever held across a transform-provider call. The
//! job task never keeps a reference to its session; it re-resolves the
//! token (and its own job id) before every mutation, so eviction, reset,
//! or a superseding job simply turn the task into a no-op.

pub mod engine;
pub mod state;
pub mod store;
pub mod sweep;

pub use engine::GenerationEngine;
pub use store::SessionStore;
