use crate::state::AppState;
use axum::{routing::post, Router};

pub mod post;

pub fn system_routes() -> Router<AppState> {
    Router::new().route("/old-tickets-check", post(post::run_old_tickets_check))
}
