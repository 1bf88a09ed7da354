pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /session              issue token (POST)
/// /capture              submit photo (POST), review photo (GET)
/// /style                select style (POST), catalog + selection (GET)
/// /generation/start     start four-image job (POST)
/// /generation/status    poll job snapshot (GET)
/// /generation/cancel    request cancellation (POST)
/// /results              approved images for the print page (GET)
/// /printer              CUPS status (GET)
/// /print                pipe sheet to lp (POST)
/// /reset                discard session state (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/session", post(handlers::session::create_session))
        .route(
            "/capture",
            post(handlers::capture::submit_capture).get(handlers::capture::get_capture),
        )
        .route(
            "/style",
            post(handlers::style::select_style).get(handlers::style::get_styles),
        )
        .route(
            "/generation/start",
            post(handlers::generation::start_generation),
        )
        .route(
            "/generation/status",
            get(handlers::generation::generation_status),
        )
        .route(
            "/generation/cancel",
            post(handlers::generation::cancel_generation),
        )
        .route("/results", get(handlers::generation::fetch_results))
        .route("/printer", get(handlers::printer::printer_info))
        .route("/print", post(handlers::printer::print_direct))
        .route("/reset", post(handlers::session::reset_session))
}
