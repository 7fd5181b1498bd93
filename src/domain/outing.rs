//! Dates on a dater's calendar.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutingStatus {
    #[default]
    Planned,
    Occurring,
    Past,
    Canceled,
}

text_enum!(OutingStatus {
    Planned => "planned",
    Occurring => "occurring",
    Past => "past",
    Canceled => "canceled",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Outing {
    pub id: Uuid,
    pub dater_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub location: String,
    pub description: String,
    pub status: OutingStatus,
    pub budget_cents: i64,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewOuting {
    pub scheduled_at: DateTime<Utc>,
    #[validate(length(min = 1, max = 255, message = "Location is required"))]
    pub location: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
    #[serde(default)]
    pub status: OutingStatus,
    #[validate(range(min = 0, message = "Budget cannot be negative"))]
    pub budget_cents: i64,
}
