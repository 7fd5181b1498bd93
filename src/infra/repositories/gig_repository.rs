//! Gigs and their quests.
//!
//! Every status transition is a single conditional `UPDATE` whose `WHERE`
//! clause carries the expected current state, so two racing callers can never
//! both win. A zero row count tells the caller the transition was refused.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::{gig, quest};
use crate::domain::{GeoPoint, Gig, GigStatus, NewQuest};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait GigRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Gig>>;

    /// Unclaimed gigs, oldest request first
    async fn list_unclaimed(&self) -> AppResult<Vec<Gig>>;

    /// Gigs currently or previously held by the cupid, newest request first
    async fn list_for_cupid(&self, cupid_id: Uuid) -> AppResult<Vec<Gig>>;
}

pub struct GigStore {
    db: DatabaseConnection,
}

impl GigStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GigRepository for GigStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Gig>> {
        find_gig(&self.db, id).await
    }

    async fn list_unclaimed(&self) -> AppResult<Vec<Gig>> {
        gig::Entity::find()
            .filter(gig::Column::Status.eq(GigStatus::Unclaimed.as_str()))
            .order_by_asc(gig::Column::RequestedAt)
            .find_also_related(quest::Entity)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|(g, q)| gig::into_domain(g, q))
            .collect()
    }

    async fn list_for_cupid(&self, cupid_id: Uuid) -> AppResult<Vec<Gig>> {
        gig::Entity::find()
            .filter(gig::Column::CupidId.eq(cupid_id))
            .order_by_desc(gig::Column::RequestedAt)
            .find_also_related(quest::Entity)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|(g, q)| gig::into_domain(g, q))
            .collect()
    }
}

/// Transaction-scoped gig operations.
pub struct TxGigRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxGigRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Gig>> {
        find_gig(self.txn, id).await
    }

    /// Insert the quest and its unclaimed gig.
    pub async fn insert(
        &self,
        dater_id: Uuid,
        quest: NewQuest,
        pickup: Option<GeoPoint>,
        requested_at: DateTime<Utc>,
    ) -> AppResult<Gig> {
        let quest_model = quest::ActiveModel {
            id: Set(Uuid::new_v4()),
            budget_cents: Set(quest.budget_cents),
            items_requested: Set(quest.items_requested),
            pickup_location: Set(quest.pickup_location),
            pickup_lat: Set(pickup.map(|p| p.lat)),
            pickup_lng: Set(pickup.map(|p| p.lng)),
        }
        .insert(self.txn)
        .await?;

        let gig_model = gig::ActiveModel {
            id: Set(Uuid::new_v4()),
            status: Set(GigStatus::Unclaimed.to_string()),
            dater_id: Set(dater_id),
            cupid_id: Set(None),
            quest_id: Set(quest_model.id),
            requested_at: Set(requested_at),
            claimed_at: Set(None),
            completed_at: Set(None),
            accept_count: Set(0),
            drop_count: Set(0),
        }
        .insert(self.txn)
        .await?;

        gig::into_domain(gig_model, Some(quest_model))
    }

    /// `unclaimed -> claimed` for `cupid_id`.
    pub async fn claim(&self, gig_id: Uuid, cupid_id: Uuid, now: DateTime<Utc>) -> AppResult<bool> {
        let result = gig::Entity::update_many()
            .col_expr(gig::Column::Status, Expr::value(GigStatus::Claimed.as_str()))
            .col_expr(gig::Column::CupidId, Expr::value(Some(cupid_id)))
            .col_expr(gig::Column::ClaimedAt, Expr::value(Some(now)))
            .col_expr(gig::Column::AcceptCount, Expr::col(gig::Column::AcceptCount).add(1))
            .filter(gig::Column::Id.eq(gig_id))
            .filter(gig::Column::Status.eq(GigStatus::Unclaimed.as_str()))
            .exec(self.txn)
            .await?;
        Ok(result.rows_affected == 1)
    }

    /// `claimed -> complete`, only while `cupid_id` still holds the gig.
    pub async fn complete(
        &self,
        gig_id: Uuid,
        cupid_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = gig::Entity::update_many()
            .col_expr(gig::Column::Status, Expr::value(GigStatus::Complete.as_str()))
            .col_expr(gig::Column::CompletedAt, Expr::value(Some(now)))
            .filter(gig::Column::Id.eq(gig_id))
            .filter(gig::Column::Status.eq(GigStatus::Claimed.as_str()))
            .filter(gig::Column::CupidId.eq(cupid_id))
            .exec(self.txn)
            .await?;
        Ok(result.rows_affected == 1)
    }

    /// `claimed -> released_to` (unclaimed or dropped), detaching `cupid_id`.
    pub async fn release(
        &self,
        gig_id: Uuid,
        cupid_id: Uuid,
        released_to: GigStatus,
    ) -> AppResult<bool> {
        let result = gig::Entity::update_many()
            .col_expr(gig::Column::Status, Expr::value(released_to.as_str()))
            .col_expr(gig::Column::CupidId, Expr::value(Option::<Uuid>::None))
            .col_expr(gig::Column::ClaimedAt, Expr::value(Option::<DateTime<Utc>>::None))
            .col_expr(gig::Column::DropCount, Expr::col(gig::Column::DropCount).add(1))
            .filter(gig::Column::Id.eq(gig_id))
            .filter(gig::Column::Status.eq(GigStatus::Claimed.as_str()))
            .filter(gig::Column::CupidId.eq(cupid_id))
            .exec(self.txn)
            .await?;
        Ok(result.rows_affected == 1)
    }

    /// Release every gig `cupid_id` currently holds, as a drop of each.
    pub async fn release_held_by(&self, cupid_id: Uuid, released_to: GigStatus) -> AppResult<u64> {
        let result = gig::Entity::update_many()
            .col_expr(gig::Column::Status, Expr::value(released_to.as_str()))
            .col_expr(gig::Column::CupidId, Expr::value(Option::<Uuid>::None))
            .col_expr(gig::Column::ClaimedAt, Expr::value(Option::<DateTime<Utc>>::None))
            .col_expr(gig::Column::DropCount, Expr::col(gig::Column::DropCount).add(1))
            .filter(gig::Column::Status.eq(GigStatus::Claimed.as_str()))
            .filter(gig::Column::CupidId.eq(cupid_id))
            .exec(self.txn)
            .await?;
        Ok(result.rows_affected)
    }
}

async fn find_gig<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<Option<Gig>> {
    gig::Entity::find_by_id(id)
        .find_also_related(quest::Entity)
        .one(conn)
        .await?
        .map(|(g, q)| gig::into_domain(g, q))
        .transpose()
}
