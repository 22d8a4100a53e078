use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202601050002_create_tickets"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("tickets"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    // Unique index backs the regenerate-and-retry number assignment.
                    .col(
                        ColumnDef::new(Alias::new("ticket_number"))
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("status"))
                            .enumeration(
                                Alias::new("ticket_status"),
                                vec![
                                    Alias::new("intake"),
                                    Alias::new("assignment"),
                                    Alias::new("in_progress"),
                                    Alias::new("parts_ordered"),
                                    Alias::new("ready_for_pickup"),
                                    Alias::new("closed"),
                                    Alias::new("quote_sent"),
                                    Alias::new("quote_accepted"),
                                    Alias::new("rejected"),
                                ],
                            )
                            .not_null()
                            .default("intake"),
                    )
                    .col(
                        ColumnDef::new(Alias::new("priority"))
                            .enumeration(
                                Alias::new("ticket_priority"),
                                vec![
                                    Alias::new("low"),
                                    Alias::new("medium"),
                                    Alias::new("high"),
                                ],
                            )
                            .not_null()
                            .default("low"),
                    )
                    .col(
                        ColumnDef::new(Alias::new("customer_name"))
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("customer_email"))
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Alias::new("customer_phone")).string())
                    .col(ColumnDef::new(Alias::new("device_type")).string().not_null())
                    .col(ColumnDef::new(Alias::new("description")).text().not_null())
                    .col(ColumnDef::new(Alias::new("price")).double())
                    .col(ColumnDef::new(Alias::new("purchase_date")).string())
                    .col(ColumnDef::new(Alias::new("order_id")).string())
                    .col(ColumnDef::new(Alias::new("password")).string())
                    .col(ColumnDef::new(Alias::new("assigned_to")).string())
                    .col(ColumnDef::new(Alias::new("assigned_to_email")).string())
                    .col(
                        ColumnDef::new(Alias::new("user_id"))
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("created_at"))
                            .timestamp()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .col(
                        ColumnDef::new(Alias::new("updated_at"))
                            .timestamp()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("tickets"), Alias::new("user_id"))
                            .to(Alias::new("users"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("tickets")).to_owned())
            .await
    }
}
