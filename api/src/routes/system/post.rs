use crate::response::ApiResponse;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use services::ticket;

#[derive(Debug, Serialize, Default)]
pub struct OldTicketsCheckResponse {
    /// Whether a digest mail actually went out.
    pub sent: bool,
}

/// POST /system/old-tickets-check
///
/// Triggers the old-tickets digest on demand. `sent` is `false` when the
/// digest is disabled, unconfigured, found no matching tickets, or failed
/// at the gateway — the operation itself never errors for those reasons.
pub async fn run_old_tickets_check(State(app_state): State<AppState>) -> impl IntoResponse {
    let sent = ticket::run_old_tickets_check(app_state.db(), app_state.mailer()).await;

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            OldTicketsCheckResponse { sent },
            if sent {
                "Old tickets digest sent"
            } else {
                "No digest was sent"
            },
        )),
    )
}
