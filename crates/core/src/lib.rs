//! Domain logic for the sticker booth backend.
//!
//! Pure types and functions with no I/O: the shared error type, the sticker
//! style catalog with base prompts, transform-instruction composition,
//! capture payload (data URL) parsing, and the job status/progress model.
//! Everything here is used by both the session engine and the API layer.

pub mod capture;
pub mod error;
pub mod job;
pub mod prompt;
pub mod style;
