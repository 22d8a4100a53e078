//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → liveness check (public)
//! - `/auth` → staff login (public)
//! - `/public` → customer intake form and customer ticket view (public)
//! - `/tickets` → staff ticket management (authenticated)
//! - `/settings` → settings panel (authenticated; writes are admin-only)
//! - `/system` → operational triggers such as the old-tickets digest (admin)

use crate::auth::guards::{allow_admin, allow_authenticated};
use crate::state::AppState;
use axum::{middleware::from_fn, Router};

pub mod auth;
pub mod common;
pub mod health;
pub mod public;
pub mod settings;
pub mod system;
pub mod tickets;

/// Builds the complete application router for all HTTP endpoints.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health::health_routes())
        .nest("/auth", auth::auth_routes())
        .nest("/public", public::public_routes())
        .nest(
            "/tickets",
            tickets::tickets_routes().route_layer(from_fn(allow_authenticated)),
        )
        .nest(
            "/settings",
            settings::settings_routes().route_layer(from_fn(allow_authenticated)),
        )
        .nest(
            "/system",
            system::system_routes().route_layer(from_fn(allow_admin)),
        )
        .with_state(app_state)
}
