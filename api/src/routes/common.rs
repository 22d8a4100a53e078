//! Response shapes and helpers shared by the ticket route groups.

use axum::http::StatusCode;
use db::models::ticket_attachments::Model as AttachmentModel;
use db::models::tickets::Model as TicketModel;
use serde::{Deserialize, Serialize};
use services::ServiceError;

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct AttachmentResponse {
    pub id: i64,
    pub ticket_id: i64,
    pub file_url: String,
    pub file_type: String,
    pub uploaded_at: String,
}

impl From<AttachmentModel> for AttachmentResponse {
    fn from(attachment: AttachmentModel) -> Self {
        Self {
            id: attachment.id,
            ticket_id: attachment.ticket_id,
            file_url: attachment.file_url,
            file_type: attachment.file_type.to_string(),
            uploaded_at: attachment.uploaded_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct TicketResponse {
    pub id: i64,
    pub ticket_number: String,
    pub status: String,
    pub priority: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub device_type: String,
    pub description: String,
    pub price: Option<f64>,
    pub purchase_date: Option<String>,
    pub order_id: Option<String>,
    pub password: Option<String>,
    pub assigned_to: Option<String>,
    pub assigned_to_email: Option<String>,
    pub user_id: i64,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<AttachmentResponse>>,
}

impl From<TicketModel> for TicketResponse {
    fn from(ticket: TicketModel) -> Self {
        Self {
            id: ticket.id,
            ticket_number: ticket.ticket_number,
            status: ticket.status.to_string(),
            priority: ticket.priority.to_string(),
            customer_name: ticket.customer_name,
            customer_email: ticket.customer_email,
            customer_phone: ticket.customer_phone,
            device_type: ticket.device_type,
            description: ticket.description,
            price: ticket.price,
            purchase_date: ticket.purchase_date,
            order_id: ticket.order_id,
            password: ticket.password,
            assigned_to: ticket.assigned_to,
            assigned_to_email: ticket.assigned_to_email,
            user_id: ticket.user_id,
            created_at: ticket.created_at.to_rfc3339(),
            updated_at: ticket.updated_at.to_rfc3339(),
            attachments: None,
        }
    }
}

impl TicketResponse {
    pub fn with_attachments(ticket: TicketModel, attachments: Vec<AttachmentModel>) -> Self {
        let mut response = Self::from(ticket);
        response.attachments = Some(
            attachments
                .into_iter()
                .map(AttachmentResponse::from)
                .collect(),
        );
        response
    }
}

/// Maps a service failure onto the HTTP status it should surface as.
/// Gateway failures never reach this point from create/update paths; the
/// mapping exists for completeness.
pub fn error_status(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::NotFound => StatusCode::NOT_FOUND,
        ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        ServiceError::AuthRequired => StatusCode::UNAUTHORIZED,
        ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        ServiceError::Gateway(_) => StatusCode::BAD_GATEWAY,
    }
}
