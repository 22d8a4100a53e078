use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

pub mod get;
pub mod post;

const MAX_UPLOAD_BODY_BYTES: usize = 64 * 1024 * 1024;

/// Customer-facing endpoints: the intake form and the ticket snapshot a
/// customer reaches through the link in their notification mail. No
/// authentication header is involved; submissions run under the dedicated
/// anonymous intake identity.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/tickets", post(post::create_public_ticket))
        .route("/tickets/{id}", get(get::get_public_ticket))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY_BYTES))
}
