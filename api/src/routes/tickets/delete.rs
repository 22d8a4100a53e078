use crate::auth::guards::Empty;
use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::error_status;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use services::ticket;

/// DELETE /tickets/{id}
///
/// Removes a ticket together with its attachment rows and stored files.
/// Restricted to admins.
///
/// ### Responses
/// - `200 OK`
/// - `403 Forbidden` (non-admin token)
/// - `404 Not Found`
pub async fn delete_ticket(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> impl IntoResponse {
    if !claims.admin {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::<Empty>::error("Admin access required")),
        );
    }

    match ticket::delete_ticket(app_state.db(), id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success(Empty, "Ticket deleted successfully")),
        ),
        Err(err) => (
            error_status(&err),
            Json(ApiResponse::<Empty>::error(match err {
                services::ServiceError::NotFound => "Ticket not found".to_string(),
                _ => "Could not delete the ticket".to_string(),
            })),
        ),
    }
}
