//! HTTP router and handlers.

use crate::app::AppState;
use axum::{Router, routing::get};

pub mod logs;
pub mod ui;

/// Assemble the HTTP router with all routes.
pub fn build_router(state: AppState) -> Router {
  Router::new()
    .route("/", get(ui::ui_index))
    .route(
      "/api/logs",
      get(logs::list_logs)
        .post(logs::create_log)
        .put(logs::update_log)
        .delete(logs::delete_log),
    )
    .with_state(state)
}
