//! Ticket lifecycle notifications.
//!
//! All three notification kinds are best-effort: a disabled toggle, a
//! missing admin address, or a gateway failure yields `false` and a log
//! line, never an error. Callers inspect the boolean when they care whether
//! a message actually went out.

use crate::email::Mailer;
use crate::settings::NotificationSettings;
use chrono::{DateTime, Duration, Utc};
use common::config;
use db::models::tickets::{Model as Ticket, TicketStatus};
use sea_orm::DbConn;

/// Staff-facing deep link to a ticket detail view.
fn ticket_link(ticket_id: i64) -> String {
    format!("{}/tickets/{}", config::frontend_url(), ticket_id)
}

/// Customer-facing deep link to the public ticket view.
fn public_ticket_link(ticket_id: i64) -> String {
    format!("{}/public/tickets/{}", config::frontend_url(), ticket_id)
}

async fn load_settings(db: &DbConn) -> Option<NotificationSettings> {
    match NotificationSettings::load(db).await {
        Ok(settings) => Some(settings),
        Err(err) => {
            tracing::error!("Failed to load notification settings: {err}");
            None
        }
    }
}

async fn dispatch(mailer: &dyn Mailer, to: &str, subject: &str, body: &str) -> bool {
    match mailer.send(to, subject, body).await {
        Ok(()) => {
            tracing::info!(to, subject, "notification sent");
            true
        }
        Err(err) => {
            tracing::warn!(to, subject, "notification failed: {err}");
            false
        }
    }
}

/// Notifies the admin address about a newly created ticket.
///
/// Returns `false` without touching the gateway when the `email_new_ticket`
/// toggle is not the literal `"true"` or no admin address is configured.
pub async fn send_new_ticket_notification(
    db: &DbConn,
    mailer: &dyn Mailer,
    ticket: &Ticket,
) -> bool {
    let Some(settings) = load_settings(db).await else {
        return false;
    };
    if !settings.new_ticket_enabled {
        tracing::debug!("new ticket notifications are disabled");
        return false;
    }
    let Some(admin_email) = settings.admin_email else {
        tracing::debug!("admin email not configured");
        return false;
    };

    let subject = format!("New repair ticket: {}", ticket.ticket_number);
    let body = format!(
        "<h2>New Repair Ticket Created</h2>\
         <p><strong>Ticket number:</strong> {}</p>\
         <p><strong>Customer:</strong> {}</p>\
         <p><strong>Email:</strong> {}</p>\
         <p><strong>Device:</strong> {}</p>\
         <p><strong>Description:</strong> {}</p>\
         <p><strong>Status:</strong> {}</p>\
         <p><strong>Priority:</strong> {}</p>\
         <p>View the ticket: <a href=\"{}\">{}</a></p>",
        ticket.ticket_number,
        ticket.customer_name,
        ticket.customer_email,
        ticket.device_type,
        ticket.description,
        ticket.status.label(),
        ticket.priority,
        ticket_link(ticket.id),
        ticket_link(ticket.id),
    );

    dispatch(mailer, &admin_email, &subject, &body).await
}

/// Notifies the admin and the customer that a ticket changed status.
///
/// The two sends are independent; the overall result is `true` if at least
/// one of them succeeded.
pub async fn send_status_change_notification(
    db: &DbConn,
    mailer: &dyn Mailer,
    ticket: &Ticket,
    old_status: TicketStatus,
) -> bool {
    let Some(settings) = load_settings(db).await else {
        return false;
    };
    if !settings.status_change_enabled {
        tracing::debug!("status change notifications are disabled");
        return false;
    }
    let Some(admin_email) = settings.admin_email else {
        tracing::debug!("admin email not configured");
        return false;
    };

    let admin_subject = format!("Ticket status updated: {}", ticket.ticket_number);
    let admin_body = format!(
        "<h2>Repair Ticket Status Updated</h2>\
         <p><strong>Ticket number:</strong> {}</p>\
         <p><strong>Customer:</strong> {}</p>\
         <p><strong>Status changed:</strong> {} &rarr; {}</p>\
         <p><strong>Device:</strong> {}</p>\
         <p>View the ticket: <a href=\"{}\">{}</a></p>",
        ticket.ticket_number,
        ticket.customer_name,
        old_status.label(),
        ticket.status.label(),
        ticket.device_type,
        ticket_link(ticket.id),
        ticket_link(ticket.id),
    );
    let admin_sent = dispatch(mailer, &admin_email, &admin_subject, &admin_body).await;

    let customer_subject = format!(
        "Your repair ticket status was updated: {}",
        ticket.ticket_number
    );
    let customer_body = format!(
        "<h2>Your Repair Ticket Status Was Updated</h2>\
         <p>Dear {},</p>\
         <p>The status of your repair ticket has been updated:</p>\
         <p><strong>Ticket number:</strong> {}</p>\
         <p><strong>New status:</strong> {}</p>\
         <p><strong>Device:</strong> {}</p>\
         <p>You can view your ticket here: <a href=\"{}\">{}</a></p>\
         <p>Thank you for choosing our service.</p>",
        ticket.customer_name,
        ticket.ticket_number,
        ticket.status.label(),
        ticket.device_type,
        public_ticket_link(ticket.id),
        public_ticket_link(ticket.id),
    );
    let customer_sent = dispatch(
        mailer,
        &ticket.customer_email,
        &customer_subject,
        &customer_body,
    )
    .await;

    admin_sent || customer_sent
}

/// Sends the admin one digest listing open tickets older than the
/// configured threshold. Returns `false` when disabled, unconfigured,
/// or when no ticket matches.
pub async fn send_old_tickets_notification(
    db: &DbConn,
    mailer: &dyn Mailer,
    now: DateTime<Utc>,
) -> bool {
    let Some(settings) = load_settings(db).await else {
        return false;
    };
    if !settings.old_tickets_enabled {
        tracing::debug!("old ticket notifications are disabled");
        return false;
    }
    let Some(admin_email) = settings.admin_email else {
        tracing::debug!("admin email not configured");
        return false;
    };

    let days = settings.old_ticket_days;
    let cutoff = now - Duration::days(days);
    let stale = match Ticket::find_older_than(db, cutoff).await {
        Ok(tickets) => tickets,
        Err(err) => {
            tracing::error!("Failed to query old tickets: {err}");
            return false;
        }
    };
    if stale.is_empty() {
        tracing::debug!("no tickets older than {days} days");
        return false;
    }

    let subject = format!("{} tickets waiting for more than {} days", stale.len(), days);

    let cell = "padding: 8px; border: 1px solid #ddd;";
    let header_cell = "padding: 8px; border: 1px solid #ddd; background-color: #f2f2f2;";
    let mut rows = String::new();
    for ticket in &stale {
        rows.push_str(&format!(
            "<tr>\
             <td style=\"{cell}\">{}</td>\
             <td style=\"{cell}\">{}</td>\
             <td style=\"{cell}\">{}</td>\
             <td style=\"{cell}\">{}</td>\
             <td style=\"{cell}\"><a href=\"{}\">View</a></td>\
             </tr>",
            ticket.ticket_number,
            ticket.customer_name,
            ticket.status.label(),
            ticket.created_at.format("%Y-%m-%d"),
            ticket_link(ticket.id),
        ));
    }

    let body = format!(
        "<h2>Tickets Waiting for More Than {days} Days</h2>\
         <p>The following tickets have been open for more than {days} days:</p>\
         <table style=\"border-collapse: collapse; width: 100%;\">\
         <thead><tr>\
         <th style=\"{header_cell}\">Ticket number</th>\
         <th style=\"{header_cell}\">Customer</th>\
         <th style=\"{header_cell}\">Status</th>\
         <th style=\"{header_cell}\">Created</th>\
         <th style=\"{header_cell}\">Action</th>\
         </tr></thead>\
         <tbody>{rows}</tbody>\
         </table>"
    );

    dispatch(mailer, &admin_email, &subject, &body).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{set, SettingKey};
    use crate::test_utils::RecordingMailer;
    use db::models::tickets::{Model as TicketModel, NewTicket};
    use db::models::user;
    use db::test_utils::setup_test_db;
    use sea_orm::ActiveValue::Set;
    use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel};

    const ADMIN: &str = "admin@shop.example";

    async fn seed_ticket(db: &DbConn) -> TicketModel {
        use std::sync::atomic::{AtomicUsize, Ordering};
        static SEED_COUNTER: AtomicUsize = AtomicUsize::new(0);
        let n = SEED_COUNTER.fetch_add(1, Ordering::Relaxed);
        let username = format!("staff{n}");
        let email = format!("staff{n}@example.com");
        let user = user::Model::create(db, &username, &email, "hash", false)
            .await
            .unwrap();
        TicketModel::create(
            db,
            NewTicket {
                customer_name: "Ada Lovelace".to_string(),
                customer_email: "ada@example.com".to_string(),
                device_type: "Laptop".to_string(),
                description: "Does not boot".to_string(),
                user_id: user.id,
                ..Default::default()
            },
        )
        .await
        .unwrap()
    }

    async fn enable(db: &DbConn, key: SettingKey) {
        set(db, key, "true").await.unwrap();
        set(db, SettingKey::AdminEmail, ADMIN).await.unwrap();
    }

    #[tokio::test]
    async fn disabled_new_ticket_toggle_sends_nothing() {
        let db = setup_test_db().await;
        let mailer = RecordingMailer::new();
        let ticket = seed_ticket(&db).await;

        let sent = send_new_ticket_notification(&db, &mailer, &ticket).await;

        assert!(!sent);
        assert_eq!(mailer.sent_count(), 0);
    }

    #[tokio::test]
    async fn missing_admin_address_sends_nothing() {
        let db = setup_test_db().await;
        let mailer = RecordingMailer::new();
        let ticket = seed_ticket(&db).await;

        set(&db, SettingKey::NotifyNewTicket, "true").await.unwrap();
        let sent = send_new_ticket_notification(&db, &mailer, &ticket).await;

        assert!(!sent);
        assert_eq!(mailer.sent_count(), 0);
    }

    #[tokio::test]
    async fn new_ticket_goes_to_admin_only() {
        let db = setup_test_db().await;
        let mailer = RecordingMailer::new();
        let ticket = seed_ticket(&db).await;

        enable(&db, SettingKey::NotifyNewTicket).await;
        let sent = send_new_ticket_notification(&db, &mailer, &ticket).await;

        assert!(sent);
        let sent_mail = mailer.sent();
        assert_eq!(sent_mail.len(), 1);
        assert_eq!(sent_mail[0].to, ADMIN);
        assert!(sent_mail[0].subject.contains(&ticket.ticket_number));
        assert!(sent_mail[0].html_body.contains("Ada Lovelace"));
    }

    #[tokio::test]
    async fn status_change_goes_to_admin_and_customer() {
        let db = setup_test_db().await;
        let mailer = RecordingMailer::new();
        let ticket = seed_ticket(&db).await;

        enable(&db, SettingKey::NotifyStatusChange).await;
        let sent =
            send_status_change_notification(&db, &mailer, &ticket, TicketStatus::Intake).await;

        assert!(sent);
        let recipients: Vec<String> = mailer.sent().into_iter().map(|m| m.to).collect();
        assert_eq!(recipients, vec![ADMIN.to_string(), "ada@example.com".to_string()]);
    }

    #[tokio::test]
    async fn status_change_is_sent_if_only_customer_send_succeeds() {
        let db = setup_test_db().await;
        let mailer = RecordingMailer::new();
        mailer.fail_for(ADMIN);
        let ticket = seed_ticket(&db).await;

        enable(&db, SettingKey::NotifyStatusChange).await;
        let sent =
            send_status_change_notification(&db, &mailer, &ticket, TicketStatus::Intake).await;

        assert!(sent, "customer success alone must count as sent");
        let sent_mail = mailer.sent();
        assert_eq!(sent_mail.len(), 1);
        assert_eq!(sent_mail[0].to, "ada@example.com");
    }

    #[tokio::test]
    async fn status_change_fails_when_both_sends_fail() {
        let db = setup_test_db().await;
        let mailer = RecordingMailer::new();
        mailer.fail_for(ADMIN);
        mailer.fail_for("ada@example.com");
        let ticket = seed_ticket(&db).await;

        enable(&db, SettingKey::NotifyStatusChange).await;
        let sent =
            send_status_change_notification(&db, &mailer, &ticket, TicketStatus::Intake).await;

        assert!(!sent);
    }

    #[tokio::test]
    async fn digest_lists_only_stale_open_tickets() {
        let db = setup_test_db().await;
        let mailer = RecordingMailer::new();

        let stale_open = seed_ticket(&db).await;
        let stale_closed = seed_ticket(&db).await;
        let recent = seed_ticket(&db).await;

        let ten_days_ago = Utc::now() - Duration::days(10);
        for (id, status) in [
            (stale_open.id, TicketStatus::Intake),
            (stale_closed.id, TicketStatus::Closed),
        ] {
            let mut active = db::models::Ticket::find_by_id(id)
                .one(&db)
                .await
                .unwrap()
                .unwrap()
                .into_active_model();
            active.created_at = Set(ten_days_ago);
            active.status = Set(status);
            active.update(&db).await.unwrap();
        }

        enable(&db, SettingKey::NotifyOldTickets).await;
        let sent = send_old_tickets_notification(&db, &mailer, Utc::now()).await;

        assert!(sent);
        let sent_mail = mailer.sent();
        assert_eq!(sent_mail.len(), 1);
        assert_eq!(sent_mail[0].to, ADMIN);
        assert!(sent_mail[0].html_body.contains(&stale_open.ticket_number));
        assert!(!sent_mail[0].html_body.contains(&stale_closed.ticket_number));
        assert!(!sent_mail[0].html_body.contains(&recent.ticket_number));
    }

    #[tokio::test]
    async fn empty_digest_is_not_sent() {
        let db = setup_test_db().await;
        let mailer = RecordingMailer::new();
        seed_ticket(&db).await;

        enable(&db, SettingKey::NotifyOldTickets).await;
        let sent = send_old_tickets_notification(&db, &mailer, Utc::now()).await;

        assert!(!sent);
        assert_eq!(mailer.sent_count(), 0);
    }
}
