//! Typed facade over the raw `settings` rows.
//!
//! Every value is stored as a string; this module is the single place where
//! the known keys are enumerated and their values parsed. Booleans are
//! enabled only by the literal string `"true"`; the digest threshold falls
//! back to [`DEFAULT_OLD_TICKET_DAYS`] when absent or non-numeric.

use db::models::settings::Model as SettingModel;
use sea_orm::{DbConn, DbErr};

pub const DEFAULT_OLD_TICKET_DAYS: i64 = 7;

/// The closed set of configuration keys this application reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    AdminEmail,
    NotifyNewTicket,
    NotifyStatusChange,
    NotifyOldTickets,
    OldTicketDays,
    LogoUrl,
    TermsAndConditions,
}

impl SettingKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SettingKey::AdminEmail => "email_admin_address",
            SettingKey::NotifyNewTicket => "email_new_ticket",
            SettingKey::NotifyStatusChange => "email_status_change",
            SettingKey::NotifyOldTickets => "email_admin_old_tickets",
            SettingKey::OldTicketDays => "email_admin_old_tickets_days",
            SettingKey::LogoUrl => "logo_url",
            SettingKey::TermsAndConditions => "terms_and_conditions",
        }
    }
}

pub async fn get(db: &DbConn, key: SettingKey) -> Result<Option<String>, DbErr> {
    SettingModel::get(db, key.as_str()).await
}

pub async fn set(db: &DbConn, key: SettingKey, value: &str) -> Result<(), DbErr> {
    SettingModel::set(db, key.as_str(), value).await
}

fn flag_enabled(value: Option<String>) -> bool {
    value.as_deref() == Some("true")
}

/// Notification policy, loaded and parsed in one pass.
#[derive(Debug, Clone, Default)]
pub struct NotificationSettings {
    pub admin_email: Option<String>,
    pub new_ticket_enabled: bool,
    pub status_change_enabled: bool,
    pub old_tickets_enabled: bool,
    pub old_ticket_days: i64,
}

impl NotificationSettings {
    pub async fn load(db: &DbConn) -> Result<Self, DbErr> {
        let admin_email = get(db, SettingKey::AdminEmail)
            .await?
            .filter(|addr| !addr.trim().is_empty());

        let old_ticket_days = get(db, SettingKey::OldTicketDays)
            .await?
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .unwrap_or(DEFAULT_OLD_TICKET_DAYS);

        Ok(Self {
            admin_email,
            new_ticket_enabled: flag_enabled(get(db, SettingKey::NotifyNewTicket).await?),
            status_change_enabled: flag_enabled(get(db, SettingKey::NotifyStatusChange).await?),
            old_tickets_enabled: flag_enabled(get(db, SettingKey::NotifyOldTickets).await?),
            old_ticket_days,
        })
    }
}

/// Branding values shown by the settings panel and the public form.
#[derive(Debug, Clone, Default)]
pub struct Branding {
    pub logo_url: Option<String>,
    pub terms_and_conditions: Option<String>,
}

impl Branding {
    pub async fn load(db: &DbConn) -> Result<Self, DbErr> {
        Ok(Self {
            logo_url: get(db, SettingKey::LogoUrl).await?,
            terms_and_conditions: get(db, SettingKey::TermsAndConditions).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use db::test_utils::setup_test_db;

    #[tokio::test]
    async fn defaults_when_nothing_is_configured() {
        let db = setup_test_db().await;

        let settings = NotificationSettings::load(&db).await.unwrap();
        assert_eq!(settings.admin_email, None);
        assert!(!settings.new_ticket_enabled);
        assert!(!settings.status_change_enabled);
        assert!(!settings.old_tickets_enabled);
        assert_eq!(settings.old_ticket_days, DEFAULT_OLD_TICKET_DAYS);
    }

    #[tokio::test]
    async fn only_the_literal_true_enables_a_toggle() {
        let db = setup_test_db().await;

        set(&db, SettingKey::NotifyNewTicket, "TRUE").await.unwrap();
        set(&db, SettingKey::NotifyStatusChange, "1").await.unwrap();
        set(&db, SettingKey::NotifyOldTickets, "true").await.unwrap();

        let settings = NotificationSettings::load(&db).await.unwrap();
        assert!(!settings.new_ticket_enabled);
        assert!(!settings.status_change_enabled);
        assert!(settings.old_tickets_enabled);
    }

    #[tokio::test]
    async fn non_numeric_threshold_falls_back_to_default() {
        let db = setup_test_db().await;

        set(&db, SettingKey::OldTicketDays, "a week").await.unwrap();
        let settings = NotificationSettings::load(&db).await.unwrap();
        assert_eq!(settings.old_ticket_days, DEFAULT_OLD_TICKET_DAYS);

        set(&db, SettingKey::OldTicketDays, "14").await.unwrap();
        let settings = NotificationSettings::load(&db).await.unwrap();
        assert_eq!(settings.old_ticket_days, 14);
    }

    #[tokio::test]
    async fn blank_admin_address_counts_as_absent() {
        let db = setup_test_db().await;

        set(&db, SettingKey::AdminEmail, "   ").await.unwrap();
        let settings = NotificationSettings::load(&db).await.unwrap();
        assert_eq!(settings.admin_email, None);
    }
}
