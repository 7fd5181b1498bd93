//! Manager analytics and moderation.
//!
//! Every operation here is reserved for managers and staff.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::ANALYTICS_WINDOW_HOURS;
use crate::domain::{Account, GigStatus, Principal, Profile, UserRole};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;
use crate::with_transaction;

/// Target of a suspend or unsuspend request.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct Moderation {
    pub user_id: Uuid,
    /// `dater` or `cupid`
    pub role: UserRole,
}

#[async_trait]
pub trait AnalyticsService: Send + Sync {
    /// One page of dater or cupid accounts, with the total
    async fn accounts(
        &self,
        principal: Principal,
        role: UserRole,
        page: PaginationParams,
    ) -> AppResult<(Vec<Account>, u64)>;

    async fn profile_count(&self, principal: Principal, role: UserRole) -> AppResult<u64>;

    async fn gig_count(&self, principal: Principal) -> AppResult<u64>;

    /// Users of `role` holding an unexpired session
    async fn active_users(&self, principal: Principal, role: UserRole) -> AppResult<u64>;

    /// Gigs requested per hour over the trailing window
    async fn gig_rate(&self, principal: Principal) -> AppResult<f64>;

    /// Drops per hour on gigs requested in the trailing window
    async fn drop_rate(&self, principal: Principal) -> AppResult<f64>;

    /// Share of all gigs that are complete
    async fn complete_rate(&self, principal: Principal) -> AppResult<f64>;

    async fn set_suspended(
        &self,
        principal: Principal,
        target: Moderation,
        suspended: bool,
    ) -> AppResult<Profile>;
}

pub struct AnalyticsManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AnalyticsManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

fn per_hour(count: u64) -> f64 {
    count as f64 / ANALYTICS_WINDOW_HOURS as f64
}

fn profile_role(role: UserRole) -> AppResult<UserRole> {
    if role.has_profile() {
        Ok(role)
    } else {
        Err(AppError::validation("role must be dater or cupid"))
    }
}

#[async_trait]
impl<U: UnitOfWork> AnalyticsService for AnalyticsManager<U> {
    async fn accounts(
        &self,
        principal: Principal,
        role: UserRole,
        page: PaginationParams,
    ) -> AppResult<(Vec<Account>, u64)> {
        principal.require_manager()?;
        let role = profile_role(role)?;
        self.uow
            .accounts()
            .list_accounts(role, page.offset(), page.limit())
            .await
    }

    async fn profile_count(&self, principal: Principal, role: UserRole) -> AppResult<u64> {
        principal.require_manager()?;
        self.uow.stats().count_profiles(profile_role(role)?).await
    }

    async fn gig_count(&self, principal: Principal) -> AppResult<u64> {
        principal.require_manager()?;
        self.uow.stats().count_gigs(None).await
    }

    async fn active_users(&self, principal: Principal, role: UserRole) -> AppResult<u64> {
        principal.require_manager()?;
        self.uow
            .stats()
            .active_sessions(profile_role(role)?, Utc::now())
            .await
    }

    async fn gig_rate(&self, principal: Principal) -> AppResult<f64> {
        principal.require_manager()?;
        let since = Utc::now() - Duration::hours(ANALYTICS_WINDOW_HOURS);
        let requested = self.uow.stats().count_gigs_requested_since(since).await?;
        Ok(per_hour(requested))
    }

    async fn drop_rate(&self, principal: Principal) -> AppResult<f64> {
        principal.require_manager()?;
        let since = Utc::now() - Duration::hours(ANALYTICS_WINDOW_HOURS);
        let drops = self.uow.stats().drops_on_gigs_requested_since(since).await?;
        Ok(per_hour(drops))
    }

    async fn complete_rate(&self, principal: Principal) -> AppResult<f64> {
        principal.require_manager()?;
        let stats = self.uow.stats();
        let (total, complete) = tokio::try_join!(
            stats.count_gigs(None),
            stats.count_gigs(Some(GigStatus::Complete))
        )?;

        if total == 0 {
            return Err(AppError::no_data("no gigs"));
        }
        Ok(complete as f64 / total as f64)
    }

    async fn set_suspended(
        &self,
        principal: Principal,
        target: Moderation,
        suspended: bool,
    ) -> AppResult<Profile> {
        principal.require_manager()?;
        let role = profile_role(target.role)?;
        let user_id = target.user_id;

        let profile = with_transaction!(self.uow, |ctx| {
            let accounts = ctx.accounts();
            let mut profile = match role {
                UserRole::Dater => Profile::Dater(accounts.find_dater(user_id).await?.ok_or_not_found()?),
                UserRole::Cupid => Profile::Cupid(accounts.find_cupid(user_id).await?.ok_or_not_found()?),
                UserRole::Manager => return Err(AppError::validation("role must be dater or cupid")),
            };

            // A corrupt profile is reported rather than silently flagged.
            profile.validate()?;
            accounts.set_suspended(role, user_id, suspended).await?;

            match &mut profile {
                Profile::Dater(d) => d.suspended = suspended,
                Profile::Cupid(c) => c.suspended = suspended,
                Profile::Manager => {}
            }
            Ok(profile)
        })?;

        tracing::info!(
            user_id = %user_id,
            role = %role,
            suspended,
            by = %principal.user_id,
            "Moderation state changed"
        );
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::repositories::MockStatsRepository;
    use crate::services::test_support::TestUnitOfWork;
    use mockall::predicate::eq;

    fn with_stats(stats: MockStatsRepository) -> AnalyticsManager<TestUnitOfWork> {
        AnalyticsManager::new(Arc::new(TestUnitOfWork {
            stats: Arc::new(stats),
            ..Default::default()
        }))
    }

    fn manager() -> Principal {
        Principal::new(Uuid::new_v4(), UserRole::Manager, true)
    }

    #[tokio::test]
    async fn test_non_managers_are_refused() {
        let service = with_stats(MockStatsRepository::new());
        let dater = Principal::new(Uuid::new_v4(), UserRole::Dater, false);

        assert!(matches!(service.gig_count(dater).await, Err(AppError::Forbidden)));
        assert!(matches!(service.complete_rate(dater).await, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_gig_rate_is_per_hour() {
        let mut stats = MockStatsRepository::new();
        stats.expect_count_gigs_requested_since().returning(|_| Ok(48));

        let rate = with_stats(stats).gig_rate(manager()).await.unwrap();
        assert_eq!(rate, 2.0);
    }

    #[tokio::test]
    async fn test_complete_rate() {
        let mut stats = MockStatsRepository::new();
        stats.expect_count_gigs().with(eq(None)).returning(|_| Ok(8));
        stats
            .expect_count_gigs()
            .with(eq(Some(GigStatus::Complete)))
            .returning(|_| Ok(2));

        let rate = with_stats(stats).complete_rate(manager()).await.unwrap();
        assert_eq!(rate, 0.25);
    }

    #[tokio::test]
    async fn test_complete_rate_without_gigs() {
        let mut stats = MockStatsRepository::new();
        stats.expect_count_gigs().returning(|_| Ok(0));

        match with_stats(stats).complete_rate(manager()).await {
            Err(AppError::NoData(msg)) => assert_eq!(msg, "no gigs"),
            other => panic!("expected NoData, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_manager_counts_are_rejected() {
        let service = with_stats(MockStatsRepository::new());
        assert!(matches!(
            service.profile_count(manager(), UserRole::Manager).await,
            Err(AppError::Validation(_))
        ));
    }
}
