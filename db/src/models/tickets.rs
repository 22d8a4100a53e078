use chrono::{DateTime, Datelike, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, QueryFilter, QueryOrder, SqlErr};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Prefix for all repair-order numbers: `FM-YYYY-MM-NNNN`.
pub const TICKET_NUMBER_PREFIX: &str = "FM";

/// Upper bound on regenerate attempts when two creations race for the same
/// sequence number. Each retry re-reads the latest number, so the loop only
/// repeats while other writers keep winning the unique index.
const MAX_NUMBER_ATTEMPTS: usize = 8;

/// Represents a repair-order record in the `tickets` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "tickets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Unique, immutable order number of the form `FM-YYYY-MM-NNNN`.
    pub ticket_number: String,

    pub status: TicketStatus,
    pub priority: TicketPriority,

    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,

    pub device_type: String,
    pub description: String,

    /// Quoted or final repair price, if any.
    pub price: Option<f64>,
    pub purchase_date: Option<String>,
    pub order_id: Option<String>,

    /// Device password noted by the customer; stored as entered.
    pub password: Option<String>,

    pub assigned_to: Option<String>,
    pub assigned_to_email: Option<String>,

    /// Creator identity (staff account or the anonymous intake account).
    pub user_id: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Closed set of lifecycle labels. There is no transition graph: any status
/// may follow any other.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "ticket_status")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TicketStatus {
    #[sea_orm(string_value = "intake")]
    Intake,

    #[sea_orm(string_value = "assignment")]
    Assignment,

    #[sea_orm(string_value = "in_progress")]
    InProgress,

    #[sea_orm(string_value = "parts_ordered")]
    PartsOrdered,

    #[sea_orm(string_value = "ready_for_pickup")]
    ReadyForPickup,

    #[sea_orm(string_value = "closed")]
    Closed,

    #[sea_orm(string_value = "quote_sent")]
    QuoteSent,

    #[sea_orm(string_value = "quote_accepted")]
    QuoteAccepted,

    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl TicketStatus {
    /// Human-readable label used in outbound mail.
    pub fn label(&self) -> &'static str {
        match self {
            TicketStatus::Intake => "Ticket received",
            TicketStatus::Assignment => "Assigning technician",
            TicketStatus::InProgress => "In progress",
            TicketStatus::PartsOrdered => "Parts ordered",
            TicketStatus::ReadyForPickup => "Ready for pickup",
            TicketStatus::Closed => "Closed",
            TicketStatus::QuoteSent => "Quote sent",
            TicketStatus::QuoteAccepted => "Quote accepted",
            TicketStatus::Rejected => "Rejected",
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "ticket_priority")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TicketPriority {
    #[sea_orm(string_value = "low")]
    Low,

    #[sea_orm(string_value = "medium")]
    Medium,

    #[sea_orm(string_value = "high")]
    High,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::ticket_attachments::Entity")]
    TicketAttachments,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::ticket_attachments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TicketAttachments.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Field set accepted by [`Model::create`]. Absent `ticket_number` means
/// "assign the next number in this month's bucket".
#[derive(Debug, Clone, Default)]
pub struct NewTicket {
    pub ticket_number: Option<String>,
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub device_type: String,
    pub description: String,
    pub price: Option<f64>,
    pub purchase_date: Option<String>,
    pub order_id: Option<String>,
    pub password: Option<String>,
    pub assigned_to: Option<String>,
    pub assigned_to_email: Option<String>,
    pub user_id: i64,
}

/// Partial update applied by [`Model::update_fields`]. `None` leaves the
/// column untouched; `updated_at` is always refreshed.
#[derive(Debug, Clone, Default)]
pub struct TicketChanges {
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<Option<String>>,
    pub device_type: Option<String>,
    pub description: Option<String>,
    pub price: Option<Option<f64>>,
    pub purchase_date: Option<Option<String>>,
    pub order_id: Option<Option<String>>,
    pub password: Option<Option<String>>,
    pub assigned_to: Option<Option<String>>,
    pub assigned_to_email: Option<Option<String>>,
}

impl Model {
    /// Derives the next order number for the year-month bucket of `now`.
    ///
    /// Reads the highest existing number with the bucket prefix and adds one;
    /// an empty bucket starts at 1. The read is not isolated from concurrent
    /// writers — [`Model::create`] closes that race by retrying on the unique
    /// index when an insert loses.
    pub async fn generate_ticket_number(
        db: &DbConn,
        now: DateTime<Utc>,
    ) -> Result<String, DbErr> {
        let year = now.year();
        let month = now.month();
        let prefix = format!("{TICKET_NUMBER_PREFIX}-{year}-{month:02}-");

        let latest = Entity::find()
            .filter(Column::TicketNumber.like(format!("{prefix}%")))
            .order_by_desc(Column::TicketNumber)
            .one(db)
            .await?;

        let sequence = latest
            .and_then(|t| {
                t.ticket_number
                    .rsplit('-')
                    .next()
                    .and_then(|s| s.parse::<u32>().ok())
            })
            .map(|n| n + 1)
            .unwrap_or(1);

        Ok(format!("{prefix}{sequence:04}"))
    }

    /// Inserts a new ticket, assigning an order number when none is given.
    ///
    /// Number assignment regenerates and retries (bounded) when the insert
    /// hits the `ticket_number` unique index, so concurrent creations in the
    /// same month never produce duplicates. An explicitly supplied number is
    /// never regenerated; a conflict on it is returned to the caller.
    pub async fn create(db: &DbConn, params: NewTicket) -> Result<Model, DbErr> {
        for attempt in 1..=MAX_NUMBER_ATTEMPTS {
            let ticket_number = match &params.ticket_number {
                Some(explicit) => explicit.clone(),
                None => Self::generate_ticket_number(db, Utc::now()).await?,
            };

            let now = Utc::now();
            let active_model = ActiveModel {
                ticket_number: Set(ticket_number),
                status: Set(params.status.unwrap_or(TicketStatus::Intake)),
                priority: Set(params.priority.unwrap_or(TicketPriority::Low)),
                customer_name: Set(params.customer_name.clone()),
                customer_email: Set(params.customer_email.clone()),
                customer_phone: Set(params.customer_phone.clone()),
                device_type: Set(params.device_type.clone()),
                description: Set(params.description.clone()),
                price: Set(params.price),
                purchase_date: Set(params.purchase_date.clone()),
                order_id: Set(params.order_id.clone()),
                password: Set(params.password.clone()),
                assigned_to: Set(params.assigned_to.clone()),
                assigned_to_email: Set(params.assigned_to_email.clone()),
                user_id: Set(params.user_id),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };

            match active_model.insert(db).await {
                Ok(model) => return Ok(model),
                Err(err)
                    if params.ticket_number.is_none()
                        && attempt < MAX_NUMBER_ATTEMPTS
                        && is_unique_violation(&err) =>
                {
                    tracing::debug!(
                        attempt,
                        "ticket number collided with a concurrent insert, regenerating"
                    );
                    continue;
                }
                Err(err) => return Err(err),
            }
        }

        Err(DbErr::Custom(
            "Exhausted ticket number attempts".to_string(),
        ))
    }

    pub async fn get_by_id(db: &DbConn, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    /// Lists tickets, newest first, optionally narrowed to one status.
    pub async fn find_all(
        db: &DbConn,
        status: Option<TicketStatus>,
    ) -> Result<Vec<Model>, DbErr> {
        let mut query = Entity::find();
        if let Some(status) = status {
            query = query.filter(Column::Status.eq(status));
        }
        query.order_by_desc(Column::CreatedAt).all(db).await
    }

    /// Open tickets created before `cutoff` — the digest query. Closed
    /// tickets are excluded regardless of age.
    pub async fn find_older_than(
        db: &DbConn,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::CreatedAt.lt(cutoff))
            .filter(Column::Status.ne(TicketStatus::Closed))
            .order_by_desc(Column::CreatedAt)
            .all(db)
            .await
    }

    /// Applies a partial update and refreshes `updated_at`.
    pub async fn update_fields(
        db: &DbConn,
        id: i64,
        changes: TicketChanges,
    ) -> Result<Model, DbErr> {
        let model = Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("Ticket {id} not found")))?;

        let mut active: ActiveModel = model.into();

        if let Some(status) = changes.status {
            active.status = Set(status);
        }
        if let Some(priority) = changes.priority {
            active.priority = Set(priority);
        }
        if let Some(customer_name) = changes.customer_name {
            active.customer_name = Set(customer_name);
        }
        if let Some(customer_email) = changes.customer_email {
            active.customer_email = Set(customer_email);
        }
        if let Some(customer_phone) = changes.customer_phone {
            active.customer_phone = Set(customer_phone);
        }
        if let Some(device_type) = changes.device_type {
            active.device_type = Set(device_type);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(price) = changes.price {
            active.price = Set(price);
        }
        if let Some(purchase_date) = changes.purchase_date {
            active.purchase_date = Set(purchase_date);
        }
        if let Some(order_id) = changes.order_id {
            active.order_id = Set(order_id);
        }
        if let Some(password) = changes.password {
            active.password = Set(password);
        }
        if let Some(assigned_to) = changes.assigned_to {
            active.assigned_to = Set(assigned_to);
        }
        if let Some(assigned_to_email) = changes.assigned_to_email {
            active.assigned_to_email = Set(assigned_to_email);
        }

        active.updated_at = Set(Utc::now());
        active.update(db).await
    }

    /// Deletes a ticket and, explicitly, its attachments. The schema also
    /// cascades on the foreign key; doing it here as well keeps the invariant
    /// independent of backend pragma state.
    pub async fn delete(db: &DbConn, id: i64) -> Result<(), DbErr> {
        super::ticket_attachments::Entity::delete_many()
            .filter(super::ticket_attachments::Column::TicketId.eq(id))
            .exec(db)
            .await?;

        let result = Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(DbErr::RecordNotFound(format!("Ticket {id} not found")));
        }
        Ok(())
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user;
    use crate::test_utils::setup_test_db;
    use chrono::TimeZone;

    async fn seed_user(db: &DbConn) -> user::Model {
        user::Model::create(db, "staff", "staff@example.com", "hash", false)
            .await
            .expect("Failed to seed user")
    }

    fn draft(user_id: i64) -> NewTicket {
        NewTicket {
            customer_name: "Ada Lovelace".to_string(),
            customer_email: "ada@example.com".to_string(),
            device_type: "Laptop".to_string(),
            description: "Does not boot".to_string(),
            user_id,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn first_number_in_empty_bucket_is_one() {
        let db = setup_test_db().await;
        let now = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();

        let number = Model::generate_ticket_number(&db, now).await.unwrap();
        assert_eq!(number, "FM-2025-01-0001");
    }

    #[tokio::test]
    async fn number_continues_from_latest_in_bucket() {
        let db = setup_test_db().await;
        let user = seed_user(&db).await;

        let mut params = draft(user.id);
        params.ticket_number = Some("FM-2025-01-0005".to_string());
        Model::create(&db, params).await.unwrap();

        let now = Utc.with_ymd_and_hms(2025, 1, 20, 8, 30, 0).unwrap();
        let number = Model::generate_ticket_number(&db, now).await.unwrap();
        assert_eq!(number, "FM-2025-01-0006");
    }

    #[tokio::test]
    async fn buckets_reset_per_month() {
        let db = setup_test_db().await;
        let user = seed_user(&db).await;

        let mut params = draft(user.id);
        params.ticket_number = Some("FM-2025-01-0042".to_string());
        Model::create(&db, params).await.unwrap();

        let february = Utc.with_ymd_and_hms(2025, 2, 1, 9, 0, 0).unwrap();
        let number = Model::generate_ticket_number(&db, february).await.unwrap();
        assert_eq!(number, "FM-2025-02-0001");
    }

    #[tokio::test]
    async fn create_assigns_sequential_numbers() {
        let db = setup_test_db().await;
        let user = seed_user(&db).await;

        let first = Model::create(&db, draft(user.id)).await.unwrap();
        let second = Model::create(&db, draft(user.id)).await.unwrap();

        let first_seq: u32 = first
            .ticket_number
            .rsplit('-')
            .next()
            .unwrap()
            .parse()
            .unwrap();
        let second_seq: u32 = second
            .ticket_number
            .rsplit('-')
            .next()
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(second_seq, first_seq + 1);
    }

    #[tokio::test]
    async fn concurrent_creates_never_duplicate_numbers() {
        let db = setup_test_db().await;
        let user = seed_user(&db).await;

        let (a, b, c, d) = tokio::join!(
            Model::create(&db, draft(user.id)),
            Model::create(&db, draft(user.id)),
            Model::create(&db, draft(user.id)),
            Model::create(&db, draft(user.id)),
        );

        let numbers: Vec<String> = [a, b, c, d]
            .into_iter()
            .map(|r| r.unwrap().ticket_number)
            .collect();
        let unique: std::collections::HashSet<_> = numbers.iter().cloned().collect();
        assert_eq!(unique.len(), numbers.len(), "duplicate numbers: {numbers:?}");
    }

    #[tokio::test]
    async fn explicit_duplicate_number_is_rejected() {
        let db = setup_test_db().await;
        let user = seed_user(&db).await;

        let mut params = draft(user.id);
        params.ticket_number = Some("FM-2025-03-0001".to_string());
        Model::create(&db, params.clone()).await.unwrap();

        let err = Model::create(&db, params).await.unwrap_err();
        assert!(is_unique_violation(&err));
    }

    #[tokio::test]
    async fn update_refreshes_updated_at() {
        let db = setup_test_db().await;
        let user = seed_user(&db).await;
        let ticket = Model::create(&db, draft(user.id)).await.unwrap();

        let updated = Model::update_fields(
            &db,
            ticket.id,
            TicketChanges {
                status: Some(TicketStatus::InProgress),
                price: Some(Some(120.0)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.status, TicketStatus::InProgress);
        assert_eq!(updated.price, Some(120.0));
        assert_eq!(updated.created_at, ticket.created_at);
        assert!(updated.updated_at >= ticket.updated_at);
    }

    #[tokio::test]
    async fn delete_missing_ticket_is_not_found() {
        let db = setup_test_db().await;

        let err = Model::delete(&db, 9999).await.unwrap_err();
        assert!(matches!(err, DbErr::RecordNotFound(_)));
    }

    #[tokio::test]
    async fn old_ticket_query_excludes_closed_and_recent() {
        let db = setup_test_db().await;
        let user = seed_user(&db).await;

        let old_open = Model::create(&db, draft(user.id)).await.unwrap();
        let old_closed = Model::create(&db, draft(user.id)).await.unwrap();
        let recent = Model::create(&db, draft(user.id)).await.unwrap();

        // Backdate two tickets ten days, close one of them.
        let ten_days_ago = Utc::now() - chrono::Duration::days(10);
        for (id, status) in [
            (old_open.id, TicketStatus::Intake),
            (old_closed.id, TicketStatus::Closed),
        ] {
            let mut active: ActiveModel = Entity::find_by_id(id)
                .one(&db)
                .await
                .unwrap()
                .unwrap()
                .into();
            active.created_at = Set(ten_days_ago);
            active.status = Set(status);
            active.update(&db).await.unwrap();
        }

        let cutoff = Utc::now() - chrono::Duration::days(7);
        let stale = Model::find_older_than(&db, cutoff).await.unwrap();

        let ids: Vec<i64> = stale.iter().map(|t| t.id).collect();
        assert!(ids.contains(&old_open.id));
        assert!(!ids.contains(&old_closed.id));
        assert!(!ids.contains(&recent.id));
    }
}
