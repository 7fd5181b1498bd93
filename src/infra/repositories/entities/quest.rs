//! Quest entity: what a gig asks for and where to pick it up.

use sea_orm::entity::prelude::*;

use crate::domain::{GeoPoint, Quest};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "quests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub budget_cents: i64,
    pub items_requested: String,
    pub pickup_location: String,
    pub pickup_lat: Option<f64>,
    pub pickup_lng: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::gig::Entity")]
    Gig,
}

impl Related<super::gig::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Gig.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Quest {
    fn from(model: Model) -> Self {
        let pickup = match (model.pickup_lat, model.pickup_lng) {
            (Some(lat), Some(lng)) => GeoPoint::new(lat, lng),
            _ => None,
        };

        Quest {
            id: model.id,
            budget_cents: model.budget_cents,
            items_requested: model.items_requested,
            pickup_location: model.pickup_location,
            pickup,
        }
    }
}
