//! Feedback rows. Accumulators on the rated profile are maintained by
//! [`super::TxAccountRepository::add_rating`] in the same transaction.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::feedback;
use crate::domain::{Feedback, NewFeedback};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Every rating left for `target_id`, oldest first
    async fn list_for_target(&self, target_id: Uuid) -> AppResult<Vec<Feedback>>;
}

pub struct FeedbackStore {
    db: DatabaseConnection,
}

impl FeedbackStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FeedbackRepository for FeedbackStore {
    async fn list_for_target(&self, target_id: Uuid) -> AppResult<Vec<Feedback>> {
        let rows = feedback::Entity::find()
            .filter(feedback::Column::TargetId.eq(target_id))
            .order_by_asc(feedback::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Feedback::from).collect())
    }
}

pub struct TxFeedbackRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxFeedbackRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn insert(&self, new_feedback: NewFeedback) -> AppResult<Feedback> {
        let model = feedback::ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_id: Set(new_feedback.owner_id),
            target_id: Set(new_feedback.target_id),
            gig_id: Set(new_feedback.gig_id),
            message: Set(new_feedback.message),
            star_rating: Set(new_feedback.star_rating),
            created_at: Set(Utc::now()),
        }
        .insert(self.txn)
        .await?;

        Ok(Feedback::from(model))
    }
}
