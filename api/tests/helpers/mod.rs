use api::auth::generate_jwt;
use api::routes::routes;
use api::state::AppState;
use axum::Router;
use common::config::AppConfig;
use db::models::user::Model as UserModel;
use db::test_utils::setup_test_db;
use services::test_utils::RecordingMailer;
use services::user::UserService;
use std::sync::Arc;
use tempfile::TempDir;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub mailer: Arc<RecordingMailer>,
    // Held so the storage root outlives the test.
    pub _storage: TempDir,
}

/// Builds a full application router over a fresh in-memory database, a
/// recording mail gateway, and a temporary storage root.
pub async fn make_test_app() -> TestApp {
    let storage = TempDir::new().expect("Failed to create storage dir");

    AppConfig::set_jwt_secret("test-secret");
    AppConfig::set_storage_root(storage.path().to_string_lossy().to_string());
    AppConfig::set_frontend_url("http://frontend.test");
    AppConfig::set_public_file_base_url("http://files.test");
    AppConfig::set_intake_username("public-intake");

    let db = setup_test_db().await;
    let mailer = Arc::new(RecordingMailer::new());
    let state = AppState::new(db, mailer.clone());

    let router = Router::new().nest("/api", routes(state.clone()));

    TestApp {
        router,
        state,
        mailer,
        _storage: storage,
    }
}

pub struct TestUsers {
    pub admin: UserModel,
    pub admin_token: String,
    pub staff: UserModel,
    pub staff_token: String,
}

/// Seeds an admin, a regular staff member, and the anonymous intake
/// account, returning ready-to-use bearer tokens for the first two.
pub async fn seed_users(state: &AppState) -> TestUsers {
    let db = state.db();

    let admin = UserModel::create(
        db,
        "admin",
        "admin@shop.example",
        &UserService::hash_password("adminpass"),
        true,
    )
    .await
    .expect("Failed to seed admin");

    let staff = UserModel::create(
        db,
        "tech",
        "tech@shop.example",
        &UserService::hash_password("techpass"),
        false,
    )
    .await
    .expect("Failed to seed staff");

    UserModel::create(
        db,
        "public-intake",
        "intake@shop.example",
        &UserService::hash_password("unused"),
        false,
    )
    .await
    .expect("Failed to seed intake user");

    let (admin_token, _) = generate_jwt(admin.id, admin.admin);
    let (staff_token, _) = generate_jwt(staff.id, staff.admin);

    TestUsers {
        admin,
        admin_token,
        staff,
        staff_token,
    }
}

pub async fn get_json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Builds a multipart body out of `(name, value)` text fields and
/// `(name, filename, content_type, bytes)` file parts.
pub fn multipart_body(
    boundary: &str,
    fields: &[(&str, &str)],
    files: &[(&str, &str, &str, Vec<u8>)],
) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }

    for (name, filename, content_type, bytes) in files {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}
