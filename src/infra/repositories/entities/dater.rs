//! Dater profile entity, one row per dater user.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::parse_column;
use crate::domain::{DaterProfile, DaterProfileInput};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "daters")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    pub phone_number: String,
    pub budget_cents: i64,
    pub communication_preference: String,
    pub description: String,
    pub dating_strengths: String,
    pub dating_weaknesses: String,
    pub interests: String,
    pub past: String,
    pub nerd_type: String,
    pub relationship_goals: String,
    pub ai_degree: String,
    pub location: String,
    pub balance_cents: i64,
    pub rating_sum: i64,
    pub rating_count: i64,
    pub suspended: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for DaterProfile {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(DaterProfile {
            communication_preference: parse_column(
                &model.communication_preference,
                "daters.communication_preference",
            )?,
            phone_number: model.phone_number,
            budget_cents: model.budget_cents,
            description: model.description,
            dating_strengths: model.dating_strengths,
            dating_weaknesses: model.dating_weaknesses,
            interests: model.interests,
            past: model.past,
            nerd_type: model.nerd_type,
            relationship_goals: model.relationship_goals,
            ai_degree: model.ai_degree,
            location: model.location,
            balance_cents: model.balance_cents,
            rating_sum: model.rating_sum,
            rating_count: model.rating_count,
            suspended: model.suspended,
        })
    }
}

/// Full row for `user_id` built from a profile.
pub fn active_model(user_id: Uuid, profile: &DaterProfile) -> ActiveModel {
    ActiveModel {
        user_id: Set(user_id),
        phone_number: Set(profile.phone_number.clone()),
        budget_cents: Set(profile.budget_cents),
        communication_preference: Set(profile.communication_preference.to_string()),
        description: Set(profile.description.clone()),
        dating_strengths: Set(profile.dating_strengths.clone()),
        dating_weaknesses: Set(profile.dating_weaknesses.clone()),
        interests: Set(profile.interests.clone()),
        past: Set(profile.past.clone()),
        nerd_type: Set(profile.nerd_type.clone()),
        relationship_goals: Set(profile.relationship_goals.clone()),
        ai_degree: Set(profile.ai_degree.clone()),
        location: Set(profile.location.clone()),
        balance_cents: Set(profile.balance_cents),
        rating_sum: Set(profile.rating_sum),
        rating_count: Set(profile.rating_count),
        suspended: Set(profile.suspended),
    }
}

/// Only the columns a dater edits. Balance, rating accumulators and
/// moderation state stay `NotSet` so concurrent writers are never overwritten.
pub fn details_model(input: &DaterProfileInput) -> ActiveModel {
    ActiveModel {
        phone_number: Set(input.phone_number.clone()),
        budget_cents: Set(input.budget_cents),
        communication_preference: Set(input.communication_preference.to_string()),
        description: Set(input.description.clone()),
        dating_strengths: Set(input.dating_strengths.clone()),
        dating_weaknesses: Set(input.dating_weaknesses.clone()),
        interests: Set(input.interests.clone()),
        past: Set(input.past.clone()),
        nerd_type: Set(input.nerd_type.clone()),
        relationship_goals: Set(input.relationship_goals.clone()),
        ai_degree: Set(input.ai_degree.clone()),
        location: Set(input.location.clone()),
        ..Default::default()
    }
}
