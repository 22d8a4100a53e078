use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::OnConflict;
use sea_orm::QueryFilter;
use serde::Serialize;

/// A single named configuration value stored out-of-band from ticket data.
/// All values are strings; callers parse at their own boundary.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "settings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(unique)]
    pub key: String,

    pub value: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        panic!("No RelationDef implemented")
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Looks up a setting. A missing row is `None`, never an error.
    pub async fn get(db: &DbConn, key: &str) -> Result<Option<String>, DbErr> {
        Ok(Entity::find()
            .filter(Column::Key.eq(key))
            .one(db)
            .await?
            .map(|row| row.value))
    }

    /// Writes a setting as a single atomic upsert keyed on `key`, so
    /// concurrent writers can never race into duplicate rows.
    pub async fn set(db: &DbConn, key: &str, value: &str) -> Result<(), DbErr> {
        let active_model = ActiveModel {
            key: Set(key.to_owned()),
            value: Set(value.to_owned()),
            ..Default::default()
        };

        Entity::insert(active_model)
            .on_conflict(
                OnConflict::column(Column::Key)
                    .update_column(Column::Value)
                    .to_owned(),
            )
            .exec(db)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;
    use sea_orm::EntityTrait;

    #[tokio::test]
    async fn missing_key_is_none() {
        let db = setup_test_db().await;

        let value = Model::get(&db, "email_admin_address").await.unwrap();
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn set_then_get_returns_written_value() {
        let db = setup_test_db().await;

        Model::set(&db, "email_new_ticket", "true").await.unwrap();
        let value = Model::get(&db, "email_new_ticket").await.unwrap();
        assert_eq!(value.as_deref(), Some("true"));
    }

    #[tokio::test]
    async fn set_twice_updates_in_place() {
        let db = setup_test_db().await;

        Model::set(&db, "logo_url", "http://a.example/logo.png")
            .await
            .unwrap();
        Model::set(&db, "logo_url", "http://b.example/logo.png")
            .await
            .unwrap();

        let value = Model::get(&db, "logo_url").await.unwrap();
        assert_eq!(value.as_deref(), Some("http://b.example/logo.png"));

        let rows = Entity::find().all(&db).await.unwrap();
        assert_eq!(rows.len(), 1, "upsert must not create a second row");
    }
}
