//! Rating service - feedback between the two sides of a gig.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{average_rating, Feedback, NewFeedback, Principal, RatingTarget};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::with_transaction;

/// A rating for the dater or cupid of a gig.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct Rating {
    /// Dater or cupid being rated
    #[serde(alias = "dater_id", alias = "cupid_id")]
    pub target_id: Uuid,
    pub gig_id: Uuid,
    #[serde(default)]
    pub message: String,
    #[schema(example = 5)]
    pub rating: i32,
}

#[async_trait]
pub trait RatingService: Send + Sync {
    /// Record feedback and fold it into the target's accumulators.
    async fn rate(
        &self,
        principal: Principal,
        target: RatingTarget,
        rating: Rating,
    ) -> AppResult<Feedback>;

    /// Feedback received by a user. Self or staff only.
    async fn ratings(&self, principal: Principal, target_id: Uuid) -> AppResult<Vec<Feedback>>;

    /// Mean star rating of a dater or cupid
    async fn average(
        &self,
        principal: Principal,
        target: RatingTarget,
        target_id: Uuid,
    ) -> AppResult<f64>;
}

pub struct RatingManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> RatingManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> RatingService for RatingManager<U> {
    async fn rate(
        &self,
        principal: Principal,
        target: RatingTarget,
        rating: Rating,
    ) -> AppResult<Feedback> {
        let gig = self
            .uow
            .gigs()
            .find_by_id(rating.gig_id)
            .await?
            .ok_or_not_found()?;

        // Each side of a claimed gig rates the other.
        let (rated, rater) = match target {
            RatingTarget::Dater => (Some(gig.dater_id), gig.cupid_id),
            RatingTarget::Cupid => (gig.cupid_id, Some(gig.dater_id)),
        };
        if rated != Some(rating.target_id) || rater != Some(principal.user_id) {
            return Err(AppError::Forbidden);
        }

        let new_feedback = NewFeedback {
            owner_id: principal.user_id,
            target_id: rating.target_id,
            gig_id: rating.gig_id,
            message: rating.message,
            star_rating: rating.rating,
        };
        new_feedback.check_rating()?;

        let feedback = with_transaction!(self.uow, |ctx| {
            let stars = new_feedback.star_rating;
            let target_id = new_feedback.target_id;
            let feedback = ctx.feedback().insert(new_feedback).await?;

            if !ctx.accounts().add_rating(target, target_id, stars).await? {
                return Err(AppError::NotFound);
            }
            Ok(feedback)
        })?;

        tracing::info!(
            feedback_id = %feedback.id,
            target = %target,
            target_id = %feedback.target_id,
            stars = feedback.star_rating,
            "Rating recorded"
        );
        Ok(feedback)
    }

    async fn ratings(&self, principal: Principal, target_id: Uuid) -> AppResult<Vec<Feedback>> {
        principal.require_self_or_staff(target_id)?;
        self.uow.feedback().list_for_target(target_id).await
    }

    async fn average(
        &self,
        principal: Principal,
        target: RatingTarget,
        target_id: Uuid,
    ) -> AppResult<f64> {
        principal.require_self_or_staff(target_id)?;
        let accounts = self.uow.accounts();
        let (sum, count) = match target {
            RatingTarget::Dater => {
                let d = accounts.find_dater(target_id).await?.ok_or_not_found()?;
                (d.rating_sum, d.rating_count)
            }
            RatingTarget::Cupid => {
                let c = accounts.find_cupid(target_id).await?.ok_or_not_found()?;
                (c.rating_sum, c.rating_count)
            }
        };
        average_rating(sum, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CupidProfile, CupidStatus, Gig, GigStatus, Quest, UserRole};
    use crate::infra::repositories::{MockAccountRepository, MockGigRepository};
    use crate::services::test_support::TestUnitOfWork;
    use chrono::Utc;

    fn unclaimed_gig() -> Gig {
        Gig {
            id: Uuid::new_v4(),
            status: GigStatus::Unclaimed,
            dater_id: Uuid::new_v4(),
            cupid_id: None,
            quest: Quest {
                id: Uuid::new_v4(),
                budget_cents: 500,
                items_requested: "tulips".into(),
                pickup_location: "market".into(),
                pickup: None,
            },
            requested_at: Utc::now(),
            claimed_at: None,
            completed_at: None,
            accept_count: 0,
            drop_count: 0,
        }
    }

    #[tokio::test]
    async fn test_target_must_belong_to_gig() {
        let gig = unclaimed_gig();
        let gig_id = gig.id;
        let mut gigs = MockGigRepository::new();
        gigs.expect_find_by_id().returning(move |_| Ok(Some(gig.clone())));

        let service = RatingManager::new(Arc::new(TestUnitOfWork {
            gigs: Arc::new(gigs),
            ..Default::default()
        }));
        let caller = Principal::new(Uuid::new_v4(), UserRole::Cupid, false);
        let rating = Rating {
            target_id: Uuid::new_v4(),
            gig_id,
            message: "lovely".into(),
            rating: 4,
        };

        assert!(matches!(
            service.rate(caller, RatingTarget::Dater, rating.clone()).await,
            Err(AppError::Forbidden)
        ));
        // No cupid holds the gig, so nobody can be rated as its cupid.
        assert!(matches!(
            service.rate(caller, RatingTarget::Cupid, rating).await,
            Err(AppError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn test_out_of_range_rating_is_rejected() {
        let cupid_id = Uuid::new_v4();
        let mut gig = unclaimed_gig();
        gig.status = GigStatus::Claimed;
        gig.cupid_id = Some(cupid_id);
        let (gig_id, dater_id) = (gig.id, gig.dater_id);
        let mut gigs = MockGigRepository::new();
        gigs.expect_find_by_id().returning(move |_| Ok(Some(gig.clone())));

        let service = RatingManager::new(Arc::new(TestUnitOfWork {
            gigs: Arc::new(gigs),
            ..Default::default()
        }));
        let caller = Principal::new(cupid_id, UserRole::Cupid, false);
        let rating = Rating {
            target_id: dater_id,
            gig_id,
            message: String::new(),
            rating: 7,
        };

        assert!(matches!(
            service.rate(caller, RatingTarget::Dater, rating).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_only_the_other_side_may_rate() {
        let cupid_id = Uuid::new_v4();
        let mut gig = unclaimed_gig();
        gig.status = GigStatus::Claimed;
        gig.cupid_id = Some(cupid_id);
        let (gig_id, dater_id) = (gig.id, gig.dater_id);
        let mut gigs = MockGigRepository::new();
        gigs.expect_find_by_id().returning(move |_| Ok(Some(gig.clone())));

        let service = RatingManager::new(Arc::new(TestUnitOfWork {
            gigs: Arc::new(gigs),
            ..Default::default()
        }));
        let of_dater = Rating {
            target_id: dater_id,
            gig_id,
            message: String::new(),
            rating: 5,
        };
        let stranger = Principal::new(Uuid::new_v4(), UserRole::Cupid, false);
        let dater = Principal::new(dater_id, UserRole::Dater, false);

        assert!(matches!(
            service.rate(stranger, RatingTarget::Dater, of_dater.clone()).await,
            Err(AppError::Forbidden)
        ));
        assert!(matches!(
            service.rate(dater, RatingTarget::Dater, of_dater).await,
            Err(AppError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn test_others_cannot_read_ratings() {
        // No repository expectations: the check runs before any read.
        let service = RatingManager::new(Arc::new(TestUnitOfWork::default()));
        let caller = Principal::new(Uuid::new_v4(), UserRole::Dater, false);
        let target = Uuid::new_v4();

        assert!(matches!(service.ratings(caller, target).await, Err(AppError::Forbidden)));
        assert!(matches!(
            service.average(caller, RatingTarget::Dater, target).await,
            Err(AppError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn test_average_without_ratings() {
        let mut accounts = MockAccountRepository::new();
        accounts.expect_find_cupid().returning(|_| {
            Ok(Some(CupidProfile {
                accepting_gigs: true,
                gigs_completed: 0,
                gigs_failed: 0,
                payout: String::new(),
                status: CupidStatus::Available,
                balance_cents: 0,
                location: String::new(),
                gig_range_km: 10.0,
                rating_sum: 0,
                rating_count: 0,
                suspended: false,
            }))
        });

        let service = RatingManager::new(Arc::new(TestUnitOfWork::with_accounts(accounts)));
        let cupid_id = Uuid::new_v4();
        let caller = Principal::new(cupid_id, UserRole::Cupid, false);
        match service.average(caller, RatingTarget::Cupid, cupid_id).await {
            Err(AppError::NoData(msg)) => assert_eq!(msg, "no ratings"),
            other => panic!("expected NoData, got {:?}", other),
        }
    }
}
