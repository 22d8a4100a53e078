use crate::state::AppState;
use axum::{routing::get, Router};

pub mod get;
pub mod put;

pub fn settings_routes() -> Router<AppState> {
    Router::new().route("/", get(get::get_settings).put(put::update_settings))
}
