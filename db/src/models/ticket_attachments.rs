use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Extensions recorded as images; everything else is stored as video.
const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// A file attached to a ticket at intake. Attachment rows are written once
/// and never updated; they disappear only when their ticket is deleted.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "ticket_attachments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub ticket_id: i64,

    /// Publicly resolvable URL of the stored file.
    pub file_url: String,

    pub file_type: AttachmentKind,

    pub uploaded_at: DateTime<Utc>,
}

/// Media kind derived from the filename extension, not file content.
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
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attachment_kind")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AttachmentKind {
    #[sea_orm(string_value = "image")]
    Image,

    #[sea_orm(string_value = "video")]
    Video,
}

impl AttachmentKind {
    /// Classifies a filename by its extension: the image set maps to
    /// `Image`, anything else (including no extension) to `Video`.
    pub fn from_filename(filename: &str) -> Self {
        let ext = filename.rsplit('.').next().unwrap_or_default();
        if IMAGE_EXTENSIONS
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext))
        {
            AttachmentKind::Image
        } else {
            AttachmentKind::Video
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tickets::Entity",
        from = "Column::TicketId",
        to = "super::tickets::Column::Id"
    )]
    Ticket,
}

impl Related<super::tickets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ticket.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DbConn,
        ticket_id: i64,
        file_url: &str,
        file_type: AttachmentKind,
    ) -> Result<Model, DbErr> {
        let active_model = ActiveModel {
            ticket_id: Set(ticket_id),
            file_url: Set(file_url.to_owned()),
            file_type: Set(file_type),
            uploaded_at: Set(Utc::now()),
            ..Default::default()
        };

        active_model.insert(db).await
    }

    pub async fn find_by_ticket(db: &DbConn, ticket_id: i64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::TicketId.eq(ticket_id))
            .order_by_asc(Column::UploadedAt)
            .all(db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tickets::{self, NewTicket};
    use crate::models::user;
    use crate::test_utils::setup_test_db;

    async fn seed_ticket(db: &DbConn) -> tickets::Model {
        let user = user::Model::create(db, "staff", "staff@example.com", "hash", false)
            .await
            .unwrap();
        tickets::Model::create(
            db,
            NewTicket {
                customer_name: "Grace Hopper".to_string(),
                customer_email: "grace@example.com".to_string(),
                device_type: "Phone".to_string(),
                description: "Cracked screen".to_string(),
                user_id: user.id,
                ..Default::default()
            },
        )
        .await
        .unwrap()
    }

    #[test]
    fn kind_follows_extension_set() {
        assert_eq!(
            AttachmentKind::from_filename("photo.JPG"),
            AttachmentKind::Image
        );
        assert_eq!(
            AttachmentKind::from_filename("broken.webp"),
            AttachmentKind::Image
        );
        assert_eq!(
            AttachmentKind::from_filename("clip.mp4"),
            AttachmentKind::Video
        );
        assert_eq!(
            AttachmentKind::from_filename("noextension"),
            AttachmentKind::Video
        );
    }

    #[tokio::test]
    async fn attachments_are_scoped_to_their_ticket() {
        let db = setup_test_db().await;
        let ticket = seed_ticket(&db).await;

        Model::create(&db, ticket.id, "http://files/1.png", AttachmentKind::Image)
            .await
            .unwrap();
        Model::create(&db, ticket.id, "http://files/2.mp4", AttachmentKind::Video)
            .await
            .unwrap();

        let rows = Model::find_by_ticket(&db, ticket.id).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|a| a.ticket_id == ticket.id));
    }

    #[tokio::test]
    async fn deleting_ticket_cascades_to_attachments() {
        let db = setup_test_db().await;
        let ticket = seed_ticket(&db).await;

        Model::create(&db, ticket.id, "http://files/1.png", AttachmentKind::Image)
            .await
            .unwrap();
        Model::create(&db, ticket.id, "http://files/2.png", AttachmentKind::Image)
            .await
            .unwrap();

        tickets::Model::delete(&db, ticket.id).await.unwrap();

        let rows = Model::find_by_ticket(&db, ticket.id).await.unwrap();
        assert!(rows.is_empty());
    }
}
