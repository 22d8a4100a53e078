use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, put},
    Router,
};

pub mod attachments;
pub mod delete;
pub mod get;
pub mod post;
pub mod put;

/// Allow multipart bodies large enough for a handful of 10 MiB files.
const MAX_UPLOAD_BODY_BYTES: usize = 64 * 1024 * 1024;

pub fn tickets_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get::list_tickets).post(post::create_ticket))
        .route(
            "/{id}",
            get(get::get_ticket)
                .put(put::update_ticket)
                .delete(delete::delete_ticket),
        )
        .route("/{id}/status", put(put::update_ticket_status))
        .route(
            "/{id}/attachments",
            get(attachments::list_attachments).post(attachments::upload_attachments),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY_BYTES))
}
