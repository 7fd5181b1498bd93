//! Gig entity. Each gig owns exactly one quest.

use sea_orm::entity::prelude::*;

use super::{parse_column, quest};
use crate::domain::{Gig, Quest};
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "gigs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub status: String,
    pub dater_id: Uuid,
    pub cupid_id: Option<Uuid>,
    #[sea_orm(unique)]
    pub quest_id: Uuid,
    pub requested_at: DateTimeUtc,
    pub claimed_at: Option<DateTimeUtc>,
    pub completed_at: Option<DateTimeUtc>,
    pub accept_count: i32,
    pub drop_count: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::quest::Entity",
        from = "Column::QuestId",
        to = "super::quest::Column::Id",
        on_delete = "Cascade"
    )]
    Quest,
}

impl Related<super::quest::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quest.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Join a gig row with its quest row.
pub fn into_domain(model: Model, quest: Option<quest::Model>) -> AppResult<Gig> {
    let quest = quest.ok_or_else(|| {
        AppError::internal(format!("gig {} has no quest row", model.id))
    })?;

    Ok(Gig {
        id: model.id,
        status: parse_column(&model.status, "gigs.status")?,
        dater_id: model.dater_id,
        cupid_id: model.cupid_id,
        quest: Quest::from(quest),
        requested_at: model.requested_at,
        claimed_at: model.claimed_at,
        completed_at: model.completed_at,
        accept_count: model.accept_count,
        drop_count: model.drop_count,
    })
}
