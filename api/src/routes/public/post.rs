use crate::response::ApiResponse;
use crate::routes::common::{error_status, TicketResponse};
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use common::config;
use db::models::user::Model as UserModel;
use services::storage::UploadFile;
use services::ticket::{self, TicketDraft};

/// POST /public/tickets
///
/// Customer intake form. Accepts a multipart body whose text parts are the
/// ticket fields and whose file parts (field name `attachments`) are the
/// customer's photos or videos. Priority and status are always `low` and
/// `intake` for public submissions, whatever the form claims.
///
/// ### Multipart fields
/// - `customer_name` (required)
/// - `customer_email` (required)
/// - `customer_phone`
/// - `device_type` (required)
/// - `description` (required)
/// - `purchase_date`, `order_id`, `password`
/// - `attachments` (repeatable file part)
///
/// ### Responses
/// - `201 Created` with the created ticket; attachment or notification
///   failures do not turn a created ticket into an error
/// - `400 Bad Request` (missing required field)
pub async fn create_public_ticket(
    State(app_state): State<AppState>,
    multipart: Multipart,
) -> impl IntoResponse {
    let (draft, files) = match read_intake_form(multipart).await {
        Ok(parsed) => parsed,
        Err(message) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<TicketResponse>::error(message)),
            );
        }
    };

    // Public submissions run under the dedicated anonymous intake account.
    let identity = match UserModel::find_by_username(app_state.db(), &config::intake_username())
        .await
    {
        Ok(user) => user.map(|u| u.id),
        Err(err) => {
            tracing::error!("intake identity lookup failed: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<TicketResponse>::error(
                    "Could not create the ticket",
                )),
            );
        }
    };

    match ticket::create_ticket(app_state.db(), app_state.mailer(), identity, draft, files).await {
        Ok(created) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                TicketResponse::from(created),
                "Ticket created successfully",
            )),
        ),
        Err(err) => {
            tracing::error!("public ticket creation failed: {err}");
            (
                error_status(&err),
                Json(ApiResponse::<TicketResponse>::error(match err {
                    services::ServiceError::Validation(message) => message,
                    services::ServiceError::AuthRequired => {
                        "Public intake is not available".to_string()
                    }
                    _ => "Could not create the ticket".to_string(),
                })),
            )
        }
    }
}

async fn read_intake_form(
    mut multipart: Multipart,
) -> Result<(TicketDraft, Vec<UploadFile>), String> {
    let mut draft = TicketDraft::default();
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| format!("Malformed multipart body: {err}"))?
    {
        let name = field.name().unwrap_or_default().to_owned();

        if let Some(filename) = field.file_name().map(str::to_owned) {
            let content_type = field.content_type().map(str::to_owned);
            let bytes = field
                .bytes()
                .await
                .map_err(|err| format!("Failed to read upload {filename}: {err}"))?;
            files.push(UploadFile {
                filename,
                content_type,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|err| format!("Failed to read field {name}: {err}"))?;
        let value = value.trim().to_owned();
        let optional = (!value.is_empty()).then(|| value.clone());

        match name.as_str() {
            "customer_name" => draft.customer_name = value,
            "customer_email" => draft.customer_email = value,
            "customer_phone" => draft.customer_phone = optional,
            "device_type" => draft.device_type = value,
            "description" => draft.description = value,
            "purchase_date" => draft.purchase_date = optional,
            "order_id" => draft.order_id = optional,
            "password" => draft.password = optional,
            _ => {}
        }
    }

    Ok((draft, files))
}
