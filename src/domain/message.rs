//! Chat log entries between a user and the assistant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Message {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub text: String,
    /// Written by the assistant rather than the owner
    pub from_ai: bool,
    pub created_at: DateTime<Utc>,
}
