//! Request handlers for the booth workflow.
//!
//! Each submodule covers one stage: session issuance/reset, photo capture,
//! style selection, the generation job (start/status/cancel/results), and
//! printing. Handlers delegate to [`booth_session::GenerationEngine`] and
//! map errors via [`crate::error::AppError`].

pub mod capture;
pub mod generation;
pub mod printer;
pub mod session;
pub mod style;
