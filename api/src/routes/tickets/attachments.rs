use crate::response::ApiResponse;
use crate::routes::common::{error_status, AttachmentResponse};
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use db::models::ticket_attachments::Model as AttachmentModel;
use services::storage::UploadFile;
use services::ticket;

/// GET /tickets/{id}/attachments
pub async fn list_attachments(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match AttachmentModel::find_by_ticket(app_state.db(), id).await {
        Ok(attachments) => {
            let data: Vec<AttachmentResponse> = attachments
                .into_iter()
                .map(AttachmentResponse::from)
                .collect();
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    data,
                    "Attachments retrieved successfully",
                )),
            )
        }
        Err(err) => {
            tracing::error!("listing attachments failed: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Vec<AttachmentResponse>>::error(
                    "Could not retrieve attachments",
                )),
            )
        }
    }
}

/// POST /tickets/{id}/attachments
///
/// Multipart upload of additional media for an existing ticket. Uploads are
/// processed one file at a time; the first rejected or failed file stops
/// the rest, and everything stored up to that point stays.
///
/// ### Responses
/// - `200 OK` with the ticket's full attachment list
/// - `404 Not Found`
pub async fn upload_attachments(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> impl IntoResponse {
    let files = match read_files(multipart).await {
        Ok(files) => files,
        Err(message) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<Vec<AttachmentResponse>>::error(message)),
            );
        }
    };

    match ticket::add_attachments(app_state.db(), id, files).await {
        Ok(attachments) => {
            let data: Vec<AttachmentResponse> = attachments
                .into_iter()
                .map(AttachmentResponse::from)
                .collect();
            (
                StatusCode::OK,
                Json(ApiResponse::success(data, "Attachments uploaded")),
            )
        }
        Err(err) => (
            error_status(&err),
            Json(ApiResponse::<Vec<AttachmentResponse>>::error(match err {
                services::ServiceError::NotFound => "Ticket not found".to_string(),
                _ => "Could not upload attachments".to_string(),
            })),
        ),
    }
}

/// Drains all file parts from a multipart body.
pub(crate) async fn read_files(mut multipart: Multipart) -> Result<Vec<UploadFile>, String> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| format!("Malformed multipart body: {err}"))?
    {
        let Some(filename) = field.file_name().map(str::to_owned) else {
            continue;
        };
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
    }

    Ok(files)
}
