use crate::response::ApiResponse;
use crate::routes::common::{error_status, AttachmentResponse};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use services::ticket;

/// Customer-facing snapshot of a ticket. Internal fields (creator, staff
/// email, device password) are not part of this shape.
#[derive(Debug, Serialize, Default)]
pub struct PublicTicketResponse {
    pub id: i64,
    pub ticket_number: String,
    pub status: String,
    pub customer_name: String,
    pub device_type: String,
    pub description: String,
    pub price: Option<f64>,
    pub assigned_to: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub attachments: Vec<AttachmentResponse>,
}

/// GET /public/tickets/{id}
///
/// The view a customer reaches through the deep link in their notification
/// mail.
pub async fn get_public_ticket(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match ticket::get_ticket_with_attachments(app_state.db(), id).await {
        Ok((ticket, attachments)) => {
            let response = PublicTicketResponse {
                id: ticket.id,
                ticket_number: ticket.ticket_number,
                status: ticket.status.to_string(),
                customer_name: ticket.customer_name,
                device_type: ticket.device_type,
                description: ticket.description,
                price: ticket.price,
                assigned_to: ticket.assigned_to,
                created_at: ticket.created_at.to_rfc3339(),
                updated_at: ticket.updated_at.to_rfc3339(),
                attachments: attachments
                    .into_iter()
                    .map(AttachmentResponse::from)
                    .collect(),
            };
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    response,
                    "Ticket retrieved successfully",
                )),
            )
        }
        Err(err) => (
            error_status(&err),
            Json(ApiResponse::<PublicTicketResponse>::error(match err {
                services::ServiceError::NotFound => "Ticket not found".to_string(),
                _ => "Could not retrieve ticket".to_string(),
            })),
        ),
    }
}
