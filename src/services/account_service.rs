//! Account service - identities, role profiles, balances and locations.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::domain::{
    Account, CupidProfile, CupidProfileInput, DaterProfile, DaterProfileInput, DropPolicy,
    Principal, UserRole,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::with_transaction;

#[async_trait]
pub trait AccountService: Send + Sync {
    async fn get_account(&self, principal: Principal, id: Uuid) -> AppResult<Account>;

    /// Delete the account and everything it owns.
    async fn delete_account(&self, principal: Principal, id: Uuid) -> AppResult<()>;

    async fn dater_profile(&self, principal: Principal, id: Uuid) -> AppResult<DaterProfile>;

    /// Rewrite the caller's editable dater fields
    async fn update_dater_profile(
        &self,
        principal: Principal,
        input: DaterProfileInput,
    ) -> AppResult<DaterProfile>;

    async fn cupid_profile(&self, principal: Principal, id: Uuid) -> AppResult<CupidProfile>;

    /// Rewrite the caller's editable cupid fields
    async fn update_cupid_profile(
        &self,
        principal: Principal,
        input: CupidProfileInput,
    ) -> AppResult<CupidProfile>;

    /// Cupid-cash balance in cents
    async fn balance(&self, principal: Principal, role: UserRole, id: Uuid) -> AppResult<i64>;

    /// The stored location string of a dater or cupid
    async fn location(&self, principal: Principal, id: Uuid) -> AppResult<String>;
}

pub struct AccountManager<U: UnitOfWork> {
    uow: Arc<U>,
    drop_policy: DropPolicy,
}

impl<U: UnitOfWork> AccountManager<U> {
    pub fn new(uow: Arc<U>, drop_policy: DropPolicy) -> Self {
        Self { uow, drop_policy }
    }
}

#[async_trait]
impl<U: UnitOfWork> AccountService for AccountManager<U> {
    async fn get_account(&self, principal: Principal, id: Uuid) -> AppResult<Account> {
        principal.require_self_or_staff(id)?;
        self.uow.accounts().find_account(id).await?.ok_or_not_found()
    }

    async fn delete_account(&self, principal: Principal, id: Uuid) -> AppResult<()> {
        principal.require_self_or_staff(id)?;
        let released_to = self.drop_policy.released_status();

        // Claims held by a departing cupid go back through the drop path first.
        let released = with_transaction!(self.uow, |ctx| {
            let released = ctx.gigs().release_held_by(id, released_to).await?;
            if !ctx.accounts().delete_user(id).await? {
                return Err(AppError::NotFound);
            }
            Ok(released)
        })?;

        tracing::info!(user_id = %id, by = %principal.user_id, released, "Account deleted");
        Ok(())
    }

    async fn dater_profile(&self, principal: Principal, id: Uuid) -> AppResult<DaterProfile> {
        principal.require_self_or_staff(id)?;
        self.uow.accounts().find_dater(id).await?.ok_or_not_found()
    }

    async fn update_dater_profile(
        &self,
        principal: Principal,
        input: DaterProfileInput,
    ) -> AppResult<DaterProfile> {
        principal.require_role(UserRole::Dater)?;
        input.validate()?;

        let accounts = self.uow.accounts();
        if !accounts.update_dater_details(principal.user_id, input).await? {
            return Err(AppError::NotFound);
        }
        let profile = accounts
            .find_dater(principal.user_id)
            .await?
            .ok_or_not_found()?;

        tracing::debug!(user_id = %principal.user_id, "Dater profile updated");
        Ok(profile)
    }

    async fn cupid_profile(&self, principal: Principal, id: Uuid) -> AppResult<CupidProfile> {
        principal.require_self_or_staff(id)?;
        self.uow.accounts().find_cupid(id).await?.ok_or_not_found()
    }

    async fn update_cupid_profile(
        &self,
        principal: Principal,
        input: CupidProfileInput,
    ) -> AppResult<CupidProfile> {
        principal.require_role(UserRole::Cupid)?;
        input.validate()?;

        let accounts = self.uow.accounts();
        if !accounts.update_cupid_details(principal.user_id, input).await? {
            return Err(AppError::NotFound);
        }
        let profile = accounts
            .find_cupid(principal.user_id)
            .await?
            .ok_or_not_found()?;

        tracing::debug!(user_id = %principal.user_id, "Cupid profile updated");
        Ok(profile)
    }

    async fn balance(&self, principal: Principal, role: UserRole, id: Uuid) -> AppResult<i64> {
        principal.require_self_or_staff(id)?;
        let accounts = self.uow.accounts();
        match role {
            UserRole::Dater => Ok(accounts.find_dater(id).await?.ok_or_not_found()?.balance_cents),
            UserRole::Cupid => Ok(accounts.find_cupid(id).await?.ok_or_not_found()?.balance_cents),
            UserRole::Manager => Err(AppError::NotFound),
        }
    }

    async fn location(&self, principal: Principal, id: Uuid) -> AppResult<String> {
        principal.require_self(id)?;
        let account = self.uow.accounts().find_account(id).await?.ok_or_not_found()?;
        account
            .profile
            .location()
            .map(str::to_string)
            .ok_or_else(|| AppError::bad_request("Managers have no location"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CommunicationPreference;
    use crate::infra::repositories::MockAccountRepository;
    use crate::services::test_support::TestUnitOfWork;
    use mockall::predicate::eq;

    fn service(uow: TestUnitOfWork) -> AccountManager<TestUnitOfWork> {
        AccountManager::new(Arc::new(uow), DropPolicy::Reopen)
    }

    fn dater() -> DaterProfile {
        DaterProfile {
            phone_number: "4355551234".into(),
            budget_cents: 5000,
            communication_preference: CommunicationPreference::Email,
            description: String::new(),
            dating_strengths: String::new(),
            dating_weaknesses: String::new(),
            interests: String::new(),
            past: String::new(),
            nerd_type: String::new(),
            relationship_goals: String::new(),
            ai_degree: String::new(),
            location: "41.7370,-111.8338".into(),
            balance_cents: 1200,
            rating_sum: 9,
            rating_count: 2,
            suspended: false,
        }
    }

    #[tokio::test]
    async fn test_get_account_forbidden_before_read() {
        // No expectations: any repository call would panic.
        let service = service(TestUnitOfWork::default());
        let caller = Principal::new(Uuid::new_v4(), UserRole::Dater, false);

        let result = service.get_account(caller, Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_staff_reads_any_balance() {
        let id = Uuid::new_v4();
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_dater()
            .with(eq(id))
            .returning(|_| Ok(Some(dater())));

        let service = service(TestUnitOfWork::with_accounts(accounts));
        let manager = Principal::new(Uuid::new_v4(), UserRole::Manager, true);

        assert_eq!(service.balance(manager, UserRole::Dater, id).await.unwrap(), 1200);
    }

    #[tokio::test]
    async fn test_profile_update_rereads_stored_row() {
        let id = Uuid::new_v4();
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_update_dater_details()
            .withf(move |user_id, input| *user_id == id && input.budget_cents == 8000)
            .returning(|_, _| Ok(true));
        accounts.expect_find_dater().with(eq(id)).returning(|_| {
            Ok(Some(DaterProfile {
                budget_cents: 8000,
                ..dater()
            }))
        });

        let service = service(TestUnitOfWork::with_accounts(accounts));
        let caller = Principal::new(id, UserRole::Dater, false);
        let input = DaterProfileInput {
            phone_number: "8015550000".into(),
            budget_cents: 8000,
            communication_preference: CommunicationPreference::Text,
            description: "likes hiking".into(),
            dating_strengths: String::new(),
            dating_weaknesses: String::new(),
            interests: String::new(),
            past: String::new(),
            nerd_type: String::new(),
            relationship_goals: String::new(),
            ai_degree: String::new(),
            location: "40.7608,-111.8910".into(),
        };

        let profile = service.update_dater_profile(caller, input).await.unwrap();
        assert_eq!(profile.budget_cents, 8000);
        assert_eq!(profile.rating_count, 2);
    }
}
