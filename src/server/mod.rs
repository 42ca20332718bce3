//! HTTP surface: a single `POST /webhook` route fed by the issue tracker.

pub mod webhook;

use axum::Router;
use axum::routing::post;

use crate::context::AppContext;

pub use webhook::webhook_handler;

pub fn build_router(ctx: AppContext) -> Router {
    Router::new()
        .route("/webhook", post(webhook_handler))
        .with_state(ctx)
}
