//! Sticker booth API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! session-token extraction) so integration tests and the binary
//! entrypoint can both access them.

pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod routes;
pub mod session_token;
pub mod state;
