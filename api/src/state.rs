//! Application state container shared across Axum route handlers.

use sea_orm::DatabaseConnection;
use services::email::Mailer;
use std::sync::Arc;

/// Central application state shared across the server.
///
/// Holds the SeaORM connection and the outbound mail gateway. Handlers
/// receive it through Axum's `State<T>` extractor.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, mailer: Arc<dyn Mailer>) -> Self {
        Self { db, mailer }
    }

    /// Returns a shared reference to the internal `DatabaseConnection`.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Returns a cloned copy of the database connection for spawned tasks.
    pub fn db_clone(&self) -> DatabaseConnection {
        self.db.clone()
    }

    /// Returns the mail gateway as a trait object reference.
    pub fn mailer(&self) -> &dyn Mailer {
        self.mailer.as_ref()
    }
}
