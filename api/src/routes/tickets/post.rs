use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{error_status, TicketResponse};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use db::models::tickets::{TicketPriority, TicketStatus};
use serde::Deserialize;
use services::ticket::{self, TicketDraft};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTicketRequest {
    #[validate(length(min = 1, message = "Customer name is required"))]
    pub customer_name: String,

    #[validate(email(message = "Invalid customer email"))]
    pub customer_email: String,

    pub customer_phone: Option<String>,

    #[validate(length(min = 1, message = "Device type is required"))]
    pub device_type: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    pub status: Option<String>,
    pub priority: Option<String>,
    pub price: Option<f64>,
    pub purchase_date: Option<String>,
    pub order_id: Option<String>,
    pub password: Option<String>,
    pub assigned_to: Option<String>,
    pub assigned_to_email: Option<String>,
}

/// POST /tickets
///
/// Creates a ticket on behalf of the authenticated staff member. The order
/// number is assigned server-side; the new-ticket notification fires as a
/// best-effort side effect.
///
/// ### Request Body
/// ```json
/// {
///   "customer_name": "Ada Lovelace",
///   "customer_email": "ada@example.com",
///   "device_type": "Laptop",
///   "description": "Does not boot",
///   "priority": "high"
/// }
/// ```
///
/// ### Responses
/// - `201 Created` with the full ticket in `data`
/// - `400 Bad Request` (validation failure, unknown status/priority)
/// - `500 Internal Server Error`
pub async fn create_ticket(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<CreateTicketRequest>,
) -> impl IntoResponse {
    if let Err(validation_errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<TicketResponse>::error(
                validation_errors.to_string(),
            )),
        );
    }

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

    let draft = TicketDraft {
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
        ..Default::default()
    };

    match ticket::create_ticket(
        app_state.db(),
        app_state.mailer(),
        Some(claims.sub),
        draft,
        vec![],
    )
    .await
    {
        Ok(created) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                TicketResponse::from(created),
                "Ticket created successfully",
            )),
        ),
        Err(err) => {
            tracing::error!("ticket creation failed: {err}");
            (
                error_status(&err),
                Json(ApiResponse::<TicketResponse>::error(match err {
                    services::ServiceError::Validation(message) => message,
                    _ => "Could not create the ticket".to_string(),
                })),
            )
        }
    }
}

/// Parses an optional enum-valued request field, reporting the offending
/// value on failure.
pub(super) fn parse_enum<T: std::str::FromStr>(
    raw: Option<&str>,
    field: &str,
) -> Result<Option<T>, String> {
    match raw {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| format!("Invalid {field} '{value}'")),
    }
}
