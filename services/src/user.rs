use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use db::models::user::Model as UserModel;
use rand::rngs::OsRng;
use sea_orm::{DbConn, DbErr};

pub struct UserService;

impl UserService {
    pub fn hash_password(password: &str) -> String {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .expect("Failed to hash password")
            .to_string()
    }

    pub fn verify_password(user: &UserModel, password: &str) -> bool {
        let parsed = match PasswordHash::new(&user.password_hash) {
            Ok(parsed) => parsed,
            Err(_) => return false,
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    /// Checks credentials; wrong email or password both come back as `None`.
    pub async fn authenticate(
        db: &DbConn,
        email: &str,
        password: &str,
    ) -> Result<Option<UserModel>, DbErr> {
        let Some(user) = UserModel::find_by_email(db, email).await? else {
            return Ok(None);
        };

        if Self::verify_password(&user, password) {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }
}
