use crate::state::AppState;
use axum::{routing::post, Router};

pub mod post;

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(post::login))
}
