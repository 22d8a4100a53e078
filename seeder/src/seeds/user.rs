use crate::seed::Seeder;
use common::config;
use db::models::user::Model as UserModel;
use sea_orm::{DatabaseConnection, DbErr};
use services::user::UserService;
use std::future::Future;
use std::pin::Pin;

pub struct UserSeeder;

impl Seeder for UserSeeder {
    fn seed<'a>(
        &'a self,
        db: &'a DatabaseConnection,
    ) -> Pin<Box<dyn Future<Output = Result<(), DbErr>> + Send + 'a>> {
        Box::pin(async move {
            // Admin account for the staff panel.
            if UserModel::find_by_username(db, "admin").await?.is_none() {
                UserModel::create(
                    db,
                    "admin",
                    "admin@shop.example",
                    &UserService::hash_password("admin"),
                    true,
                )
                .await?;
            }

            // Regular technician account.
            if UserModel::find_by_username(db, "tech").await?.is_none() {
                UserModel::create(
                    db,
                    "tech",
                    "tech@shop.example",
                    &UserService::hash_password("tech"),
                    false,
                )
                .await?;
            }

            // Anonymous identity the public intake form submits under.
            let intake = config::intake_username();
            if UserModel::find_by_username(db, &intake).await?.is_none() {
                UserModel::create(
                    db,
                    &intake,
                    "intake@shop.example",
                    &UserService::hash_password("unused"),
                    false,
                )
                .await?;
            }

            Ok(())
        })
    }
}
