//! Chat message entity.

use sea_orm::entity::prelude::*;

use crate::domain::Message;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub text: String,
    pub from_ai: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Message {
    fn from(model: Model) -> Self {
        Message {
            id: model.id,
            owner_id: model.owner_id,
            text: model.text,
            from_ai: model.from_ai,
            created_at: model.created_at,
        }
    }
}
