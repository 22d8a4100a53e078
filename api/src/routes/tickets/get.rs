use crate::response::ApiResponse;
use crate::routes::common::{error_status, TicketResponse};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use db::models::tickets::TicketStatus;
use serde::Deserialize;
use services::ticket;

#[derive(Debug, Deserialize)]
pub struct ListTicketsQuery {
    pub status: Option<String>,
}

/// GET /tickets?status=in_progress
///
/// Lists tickets newest-first, optionally narrowed to one status.
pub async fn list_tickets(
    State(app_state): State<AppState>,
    Query(query): Query<ListTicketsQuery>,
) -> impl IntoResponse {
    let status = match query.status.as_deref() {
        Some(raw) => match raw.trim().parse::<TicketStatus>() {
            Ok(status) => Some(status),
            Err(_) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::<Vec<TicketResponse>>::error(format!(
                        "Invalid status '{raw}'"
                    ))),
                );
            }
        },
        None => None,
    };

    match ticket::list_tickets(app_state.db(), status).await {
        Ok(tickets) => {
            let data: Vec<TicketResponse> = tickets.into_iter().map(TicketResponse::from).collect();
            (
                StatusCode::OK,
                Json(ApiResponse::success(data, "Tickets retrieved successfully")),
            )
        }
        Err(err) => {
            tracing::error!("listing tickets failed: {err}");
            (
                error_status(&err),
                Json(ApiResponse::<Vec<TicketResponse>>::error(
                    "Could not retrieve tickets",
                )),
            )
        }
    }
}

/// GET /tickets/{id}
///
/// Full ticket detail including attachments, as shown on the staff detail
/// and print views.
pub async fn get_ticket(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match ticket::get_ticket_with_attachments(app_state.db(), id).await {
        Ok((ticket, attachments)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                TicketResponse::with_attachments(ticket, attachments),
                "Ticket retrieved successfully",
            )),
        ),
        Err(err) => (
            error_status(&err),
            Json(ApiResponse::<TicketResponse>::error(match err {
                services::ServiceError::NotFound => "Ticket not found".to_string(),
                _ => "Could not retrieve ticket".to_string(),
            })),
        ),
    }
}
