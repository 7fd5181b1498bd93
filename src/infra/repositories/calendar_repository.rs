//! Scheduled dates.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::outing;
use crate::domain::{NewOuting, Outing};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CalendarRepository: Send + Sync {
    /// The dater's dates in schedule order
    async fn list_for_dater(&self, dater_id: Uuid) -> AppResult<Vec<Outing>>;

    async fn create(&self, dater_id: Uuid, outing: NewOuting) -> AppResult<Outing>;
}

pub struct CalendarStore {
    db: DatabaseConnection,
}

impl CalendarStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CalendarRepository for CalendarStore {
    async fn list_for_dater(&self, dater_id: Uuid) -> AppResult<Vec<Outing>> {
        outing::Entity::find()
            .filter(outing::Column::DaterId.eq(dater_id))
            .order_by_asc(outing::Column::ScheduledAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Outing::try_from)
            .collect()
    }

    async fn create(&self, dater_id: Uuid, new_outing: NewOuting) -> AppResult<Outing> {
        let model = outing::ActiveModel {
            id: Set(Uuid::new_v4()),
            dater_id: Set(dater_id),
            scheduled_at: Set(new_outing.scheduled_at),
            location: Set(new_outing.location),
            description: Set(new_outing.description),
            status: Set(new_outing.status.to_string()),
            budget_cents: Set(new_outing.budget_cents),
        }
        .insert(&self.db)
        .await?;

        Outing::try_from(model)
    }
}
