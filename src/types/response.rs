//! Small response bodies shared by several handlers.

use serde::Serialize;
use utoipa::ToSchema;

/// Message-only response
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Signed out")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Cupid-cash balance in cents
#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceResponse {
    #[schema(example = 2500)]
    pub balance_cents: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AverageRatingResponse {
    #[schema(example = 4.5)]
    pub rating: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CountResponse {
    pub count: u64,
}

/// Events per hour, or a share of gigs, depending on the metric
#[derive(Debug, Serialize, ToSchema)]
pub struct RateResponse {
    pub rate: f64,
}
