use crate::seed::Seeder;
use db::models::settings::Model as SettingModel;
use sea_orm::{DatabaseConnection, DbErr};
use services::settings::SettingKey;
use std::future::Future;
use std::pin::Pin;

pub struct SettingsSeeder;

impl Seeder for SettingsSeeder {
    fn seed<'a>(
        &'a self,
        db: &'a DatabaseConnection,
    ) -> Pin<Box<dyn Future<Output = Result<(), DbErr>> + Send + 'a>> {
        Box::pin(async move {
            let defaults = [
                (SettingKey::NotifyNewTicket, "true"),
                (SettingKey::NotifyStatusChange, "true"),
                (SettingKey::NotifyOldTickets, "false"),
                (SettingKey::OldTicketDays, "7"),
            ];

            for (key, value) in defaults {
                // Only fill in gaps so re-seeding never clobbers the panel.
                if SettingModel::get(db, key.as_str()).await?.is_none() {
                    SettingModel::set(db, key.as_str(), value).await?;
                }
            }

            Ok(())
        })
    }
}
