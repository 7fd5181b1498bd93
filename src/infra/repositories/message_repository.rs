//! Chat log between a user and the assistant.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::message;
use crate::domain::Message;
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn append(&self, owner_id: Uuid, text: String, from_ai: bool) -> AppResult<Message>;

    /// The `limit` most recent messages, newest first
    async fn recent(&self, owner_id: Uuid, limit: u64) -> AppResult<Vec<Message>>;
}

pub struct MessageStore {
    db: DatabaseConnection,
}

impl MessageStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MessageRepository for MessageStore {
    async fn append(&self, owner_id: Uuid, text: String, from_ai: bool) -> AppResult<Message> {
        let model = message::ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_id: Set(owner_id),
            text: Set(text),
            from_ai: Set(from_ai),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;

        Ok(Message::from(model))
    }

    async fn recent(&self, owner_id: Uuid, limit: u64) -> AppResult<Vec<Message>> {
        let rows = message::Entity::find()
            .filter(message::Column::OwnerId.eq(owner_id))
            .order_by_desc(message::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Message::from).collect())
    }
}
