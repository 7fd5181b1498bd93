//! Chat service - the assistant conversation log.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::MAX_CHAT_HISTORY;
use crate::domain::{Message, Principal};
use crate::errors::{AppError, AppResult};
use crate::infra::{ChatResponder, UnitOfWork};

#[async_trait]
pub trait ChatService: Send + Sync {
    /// Log the caller's message, ask the assistant, and log its reply.
    async fn send(&self, principal: Principal, text: String) -> AppResult<Message>;

    /// The `count` latest messages of the conversation, newest first
    async fn recent(&self, principal: Principal, owner_id: Uuid, count: u32)
        -> AppResult<Vec<Message>>;
}

pub struct ChatManager<U: UnitOfWork> {
    uow: Arc<U>,
    responder: Arc<dyn ChatResponder>,
}

impl<U: UnitOfWork> ChatManager<U> {
    pub fn new(uow: Arc<U>, responder: Arc<dyn ChatResponder>) -> Self {
        Self { uow, responder }
    }
}

#[async_trait]
impl<U: UnitOfWork> ChatService for ChatManager<U> {
    async fn send(&self, principal: Principal, text: String) -> AppResult<Message> {
        if text.trim().is_empty() {
            return Err(AppError::validation("Message cannot be empty"));
        }

        let messages = self.uow.messages();
        let asked = messages.append(principal.user_id, text, false).await?;

        // The caller's message stays logged even when the assistant is down.
        let reply = self.responder.respond(&asked.text).await.map_err(|e| {
            tracing::warn!(user_id = %principal.user_id, error = %e, "Assistant unavailable");
            AppError::from(e)
        })?;

        messages.append(principal.user_id, reply, true).await
    }

    async fn recent(
        &self,
        principal: Principal,
        owner_id: Uuid,
        count: u32,
    ) -> AppResult<Vec<Message>> {
        principal.require_self(owner_id)?;
        let limit = count.min(MAX_CHAT_HISTORY);
        self.uow.messages().recent(owner_id, u64::from(limit)).await
    }
}
