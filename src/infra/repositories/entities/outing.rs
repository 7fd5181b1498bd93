//! Calendar dates. The table is called `dates`.

use sea_orm::entity::prelude::*;

use super::parse_column;
use crate::domain::Outing;
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "dates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub dater_id: Uuid,
    pub scheduled_at: DateTimeUtc,
    pub location: String,
    pub description: String,
    pub status: String,
    pub budget_cents: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Outing {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Outing {
            status: parse_column(&model.status, "dates.status")?,
            id: model.id,
            dater_id: model.dater_id,
            scheduled_at: model.scheduled_at,
            location: model.location,
            description: model.description,
            budget_cents: model.budget_cents,
        })
    }
}
