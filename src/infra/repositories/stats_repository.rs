//! Read-only aggregates for manager analytics.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect,
    RelationTrait,
};
use sea_orm::sea_query::JoinType;

use super::entities::{cupid, dater, gig, session, user};
use crate::domain::{GigStatus, UserRole};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Number of stored dater or cupid profiles. Managers have none.
    async fn count_profiles(&self, role: UserRole) -> AppResult<u64>;

    /// All gigs, or only those in `status`
    async fn count_gigs(&self, status: Option<GigStatus>) -> AppResult<u64>;

    async fn count_gigs_requested_since(&self, since: DateTime<Utc>) -> AppResult<u64>;

    /// Sum of drop counters over gigs requested since `since`
    async fn drops_on_gigs_requested_since(&self, since: DateTime<Utc>) -> AppResult<u64>;

    /// Distinct users holding `role` with an unexpired session at `now`
    async fn active_sessions(&self, role: UserRole, now: DateTime<Utc>) -> AppResult<u64>;
}

pub struct StatsStore {
    db: DatabaseConnection,
}

impl StatsStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StatsRepository for StatsStore {
    async fn count_profiles(&self, role: UserRole) -> AppResult<u64> {
        let count = match role {
            UserRole::Dater => dater::Entity::find().count(&self.db).await?,
            UserRole::Cupid => cupid::Entity::find().count(&self.db).await?,
            UserRole::Manager => 0,
        };
        Ok(count)
    }

    async fn count_gigs(&self, status: Option<GigStatus>) -> AppResult<u64> {
        let mut query = gig::Entity::find();
        if let Some(status) = status {
            query = query.filter(gig::Column::Status.eq(status.as_str()));
        }
        Ok(query.count(&self.db).await?)
    }

    async fn count_gigs_requested_since(&self, since: DateTime<Utc>) -> AppResult<u64> {
        Ok(gig::Entity::find()
            .filter(gig::Column::RequestedAt.gte(since))
            .count(&self.db)
            .await?)
    }

    async fn drops_on_gigs_requested_since(&self, since: DateTime<Utc>) -> AppResult<u64> {
        let drops: Vec<i32> = gig::Entity::find()
            .select_only()
            .column(gig::Column::DropCount)
            .filter(gig::Column::RequestedAt.gte(since))
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(drops.into_iter().map(|d| d.max(0) as u64).sum())
    }

    async fn active_sessions(&self, role: UserRole, now: DateTime<Utc>) -> AppResult<u64> {
        Ok(session::Entity::find()
            .select_only()
            .column(session::Column::UserId)
            .distinct()
            .join(JoinType::InnerJoin, session::Relation::User.def())
            .filter(user::Column::Role.eq(role.as_str()))
            .filter(session::Column::ExpiresAt.gt(now))
            .count(&self.db)
            .await?)
    }
}
