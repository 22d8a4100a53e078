use crate::seed::Seeder;
use db::models::tickets::{Model as TicketModel, NewTicket, TicketPriority, TicketStatus};
use db::models::user::Model as UserModel;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use sea_orm::{DatabaseConnection, DbErr};
use std::future::Future;
use std::pin::Pin;

pub struct TicketSeeder;

impl Seeder for TicketSeeder {
    fn seed<'a>(
        &'a self,
        db: &'a DatabaseConnection,
    ) -> Pin<Box<dyn Future<Output = Result<(), DbErr>> + Send + 'a>> {
        Box::pin(async move {
            // StdRng rather than thread_rng so the future stays Send.
            let mut rng = StdRng::from_entropy();

            let statuses = [
                TicketStatus::Intake,
                TicketStatus::Assignment,
                TicketStatus::InProgress,
                TicketStatus::PartsOrdered,
                TicketStatus::ReadyForPickup,
                TicketStatus::QuoteSent,
                TicketStatus::Closed,
            ];
            let priorities = [
                TicketPriority::Low,
                TicketPriority::Medium,
                TicketPriority::High,
            ];
            let customers = [
                ("Ada Lovelace", "ada@example.com"),
                ("Grace Hopper", "grace@example.com"),
                ("Alan Turing", "alan@example.com"),
                ("Hedy Lamarr", "hedy@example.com"),
            ];
            let devices = ["Laptop", "Phone", "Tablet", "Desktop", "Console"];
            let descriptions = [
                "Does not power on.",
                "Cracked screen after a fall.",
                "Battery drains within an hour.",
                "Random shutdowns under load.",
                "Liquid damage, keyboard unresponsive.",
            ];

            let owner = UserModel::find_by_username(db, "admin")
                .await?
                .ok_or_else(|| DbErr::Custom("Seed users before tickets".to_string()))?;

            for _ in 0..20 {
                let (name, email) = customers.choose(&mut rng).unwrap();

                TicketModel::create(
                    db,
                    NewTicket {
                        status: Some(*statuses.choose(&mut rng).unwrap()),
                        priority: Some(*priorities.choose(&mut rng).unwrap()),
                        customer_name: name.to_string(),
                        customer_email: email.to_string(),
                        device_type: devices.choose(&mut rng).unwrap().to_string(),
                        description: descriptions.choose(&mut rng).unwrap().to_string(),
                        user_id: owner.id,
                        ..Default::default()
                    },
                )
                .await?;
            }

            Ok(())
        })
    }
}
