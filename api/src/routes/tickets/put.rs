use crate::response::ApiResponse;
use crate::routes::common::{error_status, TicketResponse};
use crate::routes::tickets::post::parse_enum;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use db::models::tickets::{TicketChanges, TicketPriority, TicketStatus};
use serde::Deserialize;
use services::ticket;

/// Partial update body. Fields that are absent stay untouched.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct UpdateTicketRequest {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<Option<String>>,
    pub device_type: Option<String>,
    pub description: Option<String>,
    pub price: Option<Option<f64>>,
    pub purchase_date: Option<Option<String>>,
    pub order_id: Option<Option<String>>,
    pub password: Option<Option<String>>,
    pub assigned_to: Option<Option<String>>,
    pub assigned_to_email: Option<Option<String>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// PUT /tickets/{id}
///
/// Applies a partial update to a ticket. When the update includes a status
/// change, the status-change notification fires with the previous status.
///
/// ### Responses
/// - `200 OK` with the updated ticket
/// - `400 Bad Request` (unknown status/priority value)
/// - `404 Not Found`
pub async fn update_ticket(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTicketRequest>,
) -> impl IntoResponse {
    let status = match parse_enum::<TicketStatus>(req.status.as_deref(), "status") {
        Ok(status) => status,
        Err(message) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<TicketResponse>::error(message)),
            );
        }
    };
    let priority = match parse_enum::<TicketPriority>(req.priority.as_deref(), "priority") {
        Ok(priority) => priority,
        Err(message) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<TicketResponse>::error(message)),
            );
        }
    };

    let changes = TicketChanges {
        status,
        priority,
        customer_name: req.customer_name,
        customer_email: req.customer_email,
        customer_phone: req.customer_phone,
        device_type: req.device_type,
        description: req.description,
        price: req.price,
        purchase_date: req.purchase_date,
        order_id: req.order_id,
        password: req.password,
        assigned_to: req.assigned_to,
        assigned_to_email: req.assigned_to_email,
    };

    match ticket::update_ticket(app_state.db(), app_state.mailer(), id, changes).await {
        Ok(updated) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                TicketResponse::from(updated),
                "Ticket updated successfully",
            )),
        ),
        Err(err) => (
            error_status(&err),
            Json(ApiResponse::<TicketResponse>::error(match err {
                services::ServiceError::NotFound => "Ticket not found".to_string(),
                services::ServiceError::Validation(message) => message,
                _ => "Could not update the ticket".to_string(),
            })),
        ),
    }
}

/// PUT /tickets/{id}/status
///
/// Moves a ticket to a new status. Any status may follow any other; there
/// is no transition graph.
///
/// ### Request Body
/// ```json
/// { "status": "ready_for_pickup" }
/// ```
pub async fn update_ticket_status(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateStatusRequest>,
) -> impl IntoResponse {
    let new_status = match req.status.trim().parse::<TicketStatus>() {
        Ok(status) => status,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<TicketResponse>::error(format!(
                    "Invalid status '{}'",
                    req.status
                ))),
            );
        }
    };

    match ticket::update_status(app_state.db(), app_state.mailer(), id, new_status).await {
        Ok(updated) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                TicketResponse::from(updated),
                "Ticket status updated successfully",
            )),
        ),
        Err(err) => (
            error_status(&err),
            Json(ApiResponse::<TicketResponse>::error(match err {
                services::ServiceError::NotFound => "Ticket not found".to_string(),
                _ => "Could not update the ticket status".to_string(),
            })),
        ),
    }
}
