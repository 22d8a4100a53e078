use crate::response::ApiResponse;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use services::settings::{Branding, NotificationSettings};

/// The settings panel payload: notification policy plus branding.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct SettingsResponse {
    pub email_admin_address: Option<String>,
    pub email_new_ticket: bool,
    pub email_status_change: bool,
    pub email_admin_old_tickets: bool,
    pub email_admin_old_tickets_days: i64,
    pub logo_url: Option<String>,
    pub terms_and_conditions: Option<String>,
}

/// GET /settings
///
/// Returns the notification policy and branding values, parsed from the
/// underlying key/value rows.
pub async fn get_settings(State(app_state): State<AppState>) -> impl IntoResponse {
    let db = app_state.db();

    let notifications = match NotificationSettings::load(db).await {
        Ok(settings) => settings,
        Err(err) => {
            tracing::error!("loading settings failed: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<SettingsResponse>::error(
                    "Could not load settings",
                )),
            );
        }
    };
    let branding = match Branding::load(db).await {
        Ok(branding) => branding,
        Err(err) => {
            tracing::error!("loading branding failed: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<SettingsResponse>::error(
                    "Could not load settings",
                )),
            );
        }
    };

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            SettingsResponse {
                email_admin_address: notifications.admin_email,
                email_new_ticket: notifications.new_ticket_enabled,
                email_status_change: notifications.status_change_enabled,
                email_admin_old_tickets: notifications.old_tickets_enabled,
                email_admin_old_tickets_days: notifications.old_ticket_days,
                logo_url: branding.logo_url,
                terms_and_conditions: branding.terms_and_conditions,
            },
            "Settings retrieved successfully",
        )),
    )
}
