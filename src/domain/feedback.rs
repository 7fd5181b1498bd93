//! Ratings left by one party of a gig for the other.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{MAX_STAR_RATING, MIN_STAR_RATING};
use crate::errors::{AppError, AppResult};

/// Which side of a gig is being rated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RatingTarget {
    Dater,
    Cupid,
}

text_enum!(RatingTarget {
    Dater => "dater",
    Cupid => "cupid",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Feedback {
    pub id: Uuid,
    /// The rater
    pub owner_id: Uuid,
    /// The rated user
    pub target_id: Uuid,
    pub gig_id: Uuid,
    pub message: String,
    pub star_rating: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub owner_id: Uuid,
    pub target_id: Uuid,
    pub gig_id: Uuid,
    pub message: String,
    pub star_rating: i32,
}

impl NewFeedback {
    pub fn check_rating(&self) -> AppResult<()> {
        if (MIN_STAR_RATING..=MAX_STAR_RATING).contains(&self.star_rating) {
            Ok(())
        } else {
            Err(AppError::validation(format!(
                "Rating must be between {} and {}",
                MIN_STAR_RATING, MAX_STAR_RATING
            )))
        }
    }
}

/// Mean of the accumulated stars.
pub fn average_rating(rating_sum: i64, rating_count: i64) -> AppResult<f64> {
    if rating_count <= 0 {
        return Err(AppError::no_data("no ratings"));
    }
    Ok(rating_sum as f64 / rating_count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_is_sum_over_count() {
        assert_eq!(average_rating(9, 2).unwrap(), 4.5);
        assert_eq!(average_rating(5, 1).unwrap(), 5.0);
    }

    #[test]
    fn test_no_ratings_is_no_data() {
        match average_rating(0, 0) {
            Err(AppError::NoData(msg)) => assert_eq!(msg, "no ratings"),
            other => panic!("expected NoData, got {:?}", other),
        }
    }

    #[test]
    fn test_rating_bounds() {
        let mut feedback = NewFeedback {
            owner_id: Uuid::new_v4(),
            target_id: Uuid::new_v4(),
            gig_id: Uuid::new_v4(),
            message: "great".into(),
            star_rating: 5,
        };
        assert!(feedback.check_rating().is_ok());
        feedback.star_rating = 0;
        assert!(feedback.check_rating().is_err());
        feedback.star_rating = 6;
        assert!(feedback.check_rating().is_err());
    }
}
