//! Feedback entity.

use sea_orm::entity::prelude::*;

use crate::domain::Feedback;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "feedback")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub target_id: Uuid,
    pub gig_id: Uuid,
    pub message: String,
    pub star_rating: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Feedback {
    fn from(model: Model) -> Self {
        Feedback {
            id: model.id,
            owner_id: model.owner_id,
            target_id: model.target_id,
            gig_id: model.gig_id,
            message: model.message,
            star_rating: model.star_rating,
            created_at: model.created_at,
        }
    }
}
