//! Ticket lifecycle orchestration.
//!
//! Creation and status updates are the primary operations; attachment
//! persistence and notifications ride along as best-effort side effects
//! whose failure never rolls the primary operation back.

use crate::email::Mailer;
use crate::error::ServiceError;
use crate::notifications;
use crate::storage::{self, UploadFile};
use chrono::Utc;
use common::paths;
use db::models::ticket_attachments::Model as AttachmentModel;
use db::models::tickets::{
    Model as TicketModel, NewTicket, TicketChanges, TicketPriority, TicketStatus,
};
use sea_orm::DbConn;

/// Intake data for a new ticket, before number assignment.
#[derive(Debug, Clone, Default)]
pub struct TicketDraft {
    pub ticket_number: Option<String>,
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
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
}

fn validate_draft(draft: &TicketDraft) -> Result<(), ServiceError> {
    for (field, value) in [
        ("customer_name", &draft.customer_name),
        ("customer_email", &draft.customer_email),
        ("device_type", &draft.device_type),
        ("description", &draft.description),
    ] {
        if value.trim().is_empty() {
            return Err(ServiceError::Validation(format!(
                "Missing required field: {field}"
            )));
        }
    }
    Ok(())
}

/// Creates a ticket for the given caller identity.
///
/// The ticket insert is the primary operation. Attachment uploads run
/// afterwards, one file at a time; the first failure aborts the remaining
/// uploads but leaves the ticket in place. The new-ticket notification is
/// equally best-effort. The created ticket is returned regardless of how
/// the side effects fared.
pub async fn create_ticket(
    db: &DbConn,
    mailer: &dyn Mailer,
    identity: Option<i64>,
    draft: TicketDraft,
    files: Vec<UploadFile>,
) -> Result<TicketModel, ServiceError> {
    let user_id = identity.ok_or(ServiceError::AuthRequired)?;
    validate_draft(&draft)?;

    let ticket = TicketModel::create(
        db,
        NewTicket {
            ticket_number: draft.ticket_number,
            status: draft.status,
            priority: draft.priority,
            customer_name: draft.customer_name,
            customer_email: draft.customer_email,
            customer_phone: draft.customer_phone,
            device_type: draft.device_type,
            description: draft.description,
            price: draft.price,
            purchase_date: draft.purchase_date,
            order_id: draft.order_id,
            password: draft.password,
            assigned_to: draft.assigned_to,
            assigned_to_email: draft.assigned_to_email,
            user_id,
        },
    )
    .await
    .map_err(ServiceError::from)?;

    store_files(db, ticket.id, &files).await;

    if !notifications::send_new_ticket_notification(db, mailer, &ticket).await {
        tracing::debug!(ticket = %ticket.ticket_number, "new ticket notification not sent");
    }

    Ok(ticket)
}

/// Persists uploads sequentially; the first failing file stops the rest.
async fn store_files(db: &DbConn, ticket_id: i64, files: &[UploadFile]) {
    for file in files {
        let stored = match storage::store_attachment(ticket_id, file) {
            Ok(stored) => stored,
            Err(err) => {
                tracing::warn!(ticket_id, file = %file.filename, "upload aborted: {err}");
                break;
            }
        };

        if let Err(err) =
            AttachmentModel::create(db, ticket_id, &stored.file_url, stored.kind).await
        {
            tracing::warn!(ticket_id, file = %file.filename, "attachment row failed: {err}");
            break;
        }
    }
}

/// Uploads additional files to an existing ticket (staff detail view).
/// Same best-effort semantics as during creation.
pub async fn add_attachments(
    db: &DbConn,
    id: i64,
    files: Vec<UploadFile>,
) -> Result<Vec<AttachmentModel>, ServiceError> {
    TicketModel::get_by_id(db, id)
        .await
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    store_files(db, id, &files).await;
    AttachmentModel::find_by_ticket(db, id)
        .await
        .map_err(ServiceError::from)
}

pub async fn get_ticket(db: &DbConn, id: i64) -> Result<TicketModel, ServiceError> {
    TicketModel::get_by_id(db, id)
        .await
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)
}

pub async fn get_ticket_with_attachments(
    db: &DbConn,
    id: i64,
) -> Result<(TicketModel, Vec<AttachmentModel>), ServiceError> {
    let ticket = get_ticket(db, id).await?;
    let attachments = AttachmentModel::find_by_ticket(db, id)
        .await
        .map_err(ServiceError::from)?;
    Ok((ticket, attachments))
}

pub async fn list_tickets(
    db: &DbConn,
    status: Option<TicketStatus>,
) -> Result<Vec<TicketModel>, ServiceError> {
    TicketModel::find_all(db, status)
        .await
        .map_err(ServiceError::from)
}

/// Applies a partial update. When the update changes the status, the
/// status-change notification fires with the status captured before the
/// write; its outcome does not affect the result.
pub async fn update_ticket(
    db: &DbConn,
    mailer: &dyn Mailer,
    id: i64,
    changes: TicketChanges,
) -> Result<TicketModel, ServiceError> {
    let current = get_ticket(db, id).await?;
    let old_status = current.status;

    let updated = TicketModel::update_fields(db, id, changes)
        .await
        .map_err(ServiceError::from)?;

    if updated.status != old_status
        && !notifications::send_status_change_notification(db, mailer, &updated, old_status).await
    {
        tracing::debug!(ticket = %updated.ticket_number, "status change notification not sent");
    }

    Ok(updated)
}

pub async fn update_status(
    db: &DbConn,
    mailer: &dyn Mailer,
    id: i64,
    new_status: TicketStatus,
) -> Result<TicketModel, ServiceError> {
    update_ticket(
        db,
        mailer,
        id,
        TicketChanges {
            status: Some(new_status),
            ..Default::default()
        },
    )
    .await
}

/// Deletes a ticket, its attachment rows (explicit cascade) and its stored
/// files. File removal is best-effort.
pub async fn delete_ticket(db: &DbConn, id: i64) -> Result<(), ServiceError> {
    TicketModel::delete(db, id).await.map_err(ServiceError::from)?;

    if let Err(err) = std::fs::remove_dir_all(paths::attachment_dir(id)) {
        if err.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(ticket_id = id, "failed to remove stored attachments: {err}");
        }
    }
    Ok(())
}

/// On-demand digest trigger; returns whether a digest was actually sent.
pub async fn run_old_tickets_check(db: &DbConn, mailer: &dyn Mailer) -> bool {
    notifications::send_old_tickets_notification(db, mailer, Utc::now()).await
}
