use std::sync::Arc;

use booth_session::GenerationEngine;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Workflow engine over the session store and transform provider.
    pub engine: GenerationEngine,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
