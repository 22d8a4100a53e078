use crate::auth::guards::Empty;
use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use serde::Deserialize;
use services::settings::{set, SettingKey};
use validator::Validate;

/// Partial settings update; only the provided fields are written.
#[derive(Debug, Deserialize, Validate, Default)]
#[serde(default)]
pub struct UpdateSettingsRequest {
    #[validate(email(message = "Invalid admin email address"))]
    pub email_admin_address: Option<String>,
    pub email_new_ticket: Option<bool>,
    pub email_status_change: Option<bool>,
    pub email_admin_old_tickets: Option<bool>,
    pub email_admin_old_tickets_days: Option<i64>,
    pub logo_url: Option<String>,
    pub terms_and_conditions: Option<String>,
}

/// PUT /settings
///
/// Writes the provided settings values. Each write is an atomic upsert on
/// its key. Restricted to admins.
///
/// ### Request Body
/// ```json
/// {
///   "email_admin_address": "owner@shop.example",
///   "email_new_ticket": true,
///   "email_admin_old_tickets_days": 14
/// }
/// ```
pub async fn update_settings(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<UpdateSettingsRequest>,
) -> impl IntoResponse {
    if !claims.admin {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::<Empty>::error("Admin access required")),
        );
    }

    if let Err(validation_errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Empty>::error(validation_errors.to_string())),
        );
    }

    let db = app_state.db();
    let mut writes: Vec<(SettingKey, String)> = Vec::new();

    if let Some(address) = req.email_admin_address {
        writes.push((SettingKey::AdminEmail, address));
    }
    if let Some(enabled) = req.email_new_ticket {
        writes.push((SettingKey::NotifyNewTicket, enabled.to_string()));
    }
    if let Some(enabled) = req.email_status_change {
        writes.push((SettingKey::NotifyStatusChange, enabled.to_string()));
    }
    if let Some(enabled) = req.email_admin_old_tickets {
        writes.push((SettingKey::NotifyOldTickets, enabled.to_string()));
    }
    if let Some(days) = req.email_admin_old_tickets_days {
        writes.push((SettingKey::OldTicketDays, days.to_string()));
    }
    if let Some(logo_url) = req.logo_url {
        writes.push((SettingKey::LogoUrl, logo_url));
    }
    if let Some(terms) = req.terms_and_conditions {
        writes.push((SettingKey::TermsAndConditions, terms));
    }

    for (key, value) in writes {
        if let Err(err) = set(db, key, &value).await {
            tracing::error!("writing setting {} failed: {err}", key.as_str());
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error(format!(
                    "Could not save setting {}",
                    key.as_str()
                ))),
            );
        }
    }

    (
        StatusCode::OK,
        Json(ApiResponse::success(Empty, "Settings saved successfully")),
    )
}
