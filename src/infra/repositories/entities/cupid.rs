//! Cupid profile entity, one row per cupid user.

use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::NotSet;
use sea_orm::Set;

use super::parse_column;
use crate::domain::{CupidProfile, CupidProfileInput};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cupids")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    pub accepting_gigs: bool,
    pub gigs_completed: i32,
    pub gigs_failed: i32,
    pub payout: String,
    pub status: String,
    pub balance_cents: i64,
    pub location: String,
    pub gig_range_km: f64,
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

impl TryFrom<Model> for CupidProfile {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(CupidProfile {
            status: parse_column(&model.status, "cupids.status")?,
            accepting_gigs: model.accepting_gigs,
            gigs_completed: model.gigs_completed,
            gigs_failed: model.gigs_failed,
            payout: model.payout,
            balance_cents: model.balance_cents,
            location: model.location,
            gig_range_km: model.gig_range_km,
            rating_sum: model.rating_sum,
            rating_count: model.rating_count,
            suspended: model.suspended,
        })
    }
}

/// Full row for `user_id` built from a profile.
pub fn active_model(user_id: Uuid, profile: &CupidProfile) -> ActiveModel {
    ActiveModel {
        user_id: Set(user_id),
        accepting_gigs: Set(profile.accepting_gigs),
        gigs_completed: Set(profile.gigs_completed),
        gigs_failed: Set(profile.gigs_failed),
        payout: Set(profile.payout.clone()),
        status: Set(profile.status.to_string()),
        balance_cents: Set(profile.balance_cents),
        location: Set(profile.location.clone()),
        gig_range_km: Set(profile.gig_range_km),
        rating_sum: Set(profile.rating_sum),
        rating_count: Set(profile.rating_count),
        suspended: Set(profile.suspended),
    }
}

/// Only the columns a cupid edits; an omitted range keeps the stored one.
pub fn details_model(input: &CupidProfileInput) -> ActiveModel {
    ActiveModel {
        accepting_gigs: Set(input.accepting_gigs),
        payout: Set(input.payout.clone()),
        location: Set(input.location.clone()),
        gig_range_km: input.gig_range_km.map_or(NotSet, Set),
        ..Default::default()
    }
}
