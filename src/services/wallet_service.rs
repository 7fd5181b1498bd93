//! Wallet service - payment instruments and cupid-cash transfers.
//!
//! A transfer is one ledger entry plus one balance change, committed together.
//! Replaying a transfer with the same idempotency key returns the entry that
//! was recorded the first time and moves no money.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::domain::{
    BankAccount, LedgerEntry, LedgerKind, NewBankAccount, NewCard, PaymentCard, Principal, UserRole,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::with_transaction;

/// Charge a saved card into the dater's balance.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct Deposit {
    pub card_id: Uuid,
    #[validate(range(min = 1, message = "Amount must be positive"))]
    #[schema(example = 2500)]
    pub amount_cents: i64,
    #[validate(length(min = 1, max = 64, message = "Idempotency key is required"))]
    pub idempotency_key: String,
}

/// Pay the cupid's whole balance out to their bank account.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct Payout {
    #[validate(length(min = 1, max = 64, message = "Idempotency key is required"))]
    pub idempotency_key: String,
}

#[async_trait]
pub trait WalletService: Send + Sync {
    async fn save_card(&self, principal: Principal, card: NewCard) -> AppResult<PaymentCard>;

    async fn save_bank_account(
        &self,
        principal: Principal,
        account: NewBankAccount,
    ) -> AppResult<BankAccount>;

    async fn deposit(&self, principal: Principal, deposit: Deposit) -> AppResult<LedgerEntry>;

    async fn payout(&self, principal: Principal, payout: Payout) -> AppResult<LedgerEntry>;

    /// Ledger history of the user, newest first
    async fn entries(&self, principal: Principal, user_id: Uuid) -> AppResult<Vec<LedgerEntry>>;
}

pub struct WalletManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> WalletManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> WalletService for WalletManager<U> {
    async fn save_card(&self, principal: Principal, card: NewCard) -> AppResult<PaymentCard> {
        principal.require_role(UserRole::Dater)?;
        card.validate()?;
        card.verify_checksum()?;

        let saved = self.uow.wallet().save_card(principal.user_id, card).await?;
        tracing::info!(user_id = %principal.user_id, card_id = %saved.id, "Card saved");
        Ok(saved)
    }

    async fn save_bank_account(
        &self,
        principal: Principal,
        account: NewBankAccount,
    ) -> AppResult<BankAccount> {
        principal.require_role(UserRole::Cupid)?;
        account.validate()?;

        let saved = self
            .uow
            .wallet()
            .save_bank_account(principal.user_id, account)
            .await?;
        tracing::info!(user_id = %principal.user_id, account_id = %saved.id, "Bank account saved");
        Ok(saved)
    }

    async fn deposit(&self, principal: Principal, deposit: Deposit) -> AppResult<LedgerEntry> {
        principal.require_role(UserRole::Dater)?;
        deposit.validate()?;

        let card = self
            .uow
            .wallet()
            .find_card(deposit.card_id)
            .await?
            .ok_or_not_found()?;
        if card.user_id != principal.user_id {
            return Err(AppError::Forbidden);
        }

        let user_id = principal.user_id;
        let Deposit {
            card_id,
            amount_cents,
            idempotency_key,
        } = deposit;

        let entry = with_transaction!(self.uow, |ctx| {
            let wallet = ctx.wallet();
            if let Some(existing) = wallet.find_entry(user_id, &idempotency_key).await? {
                return Ok(existing);
            }

            let entry = wallet
                .insert_entry(user_id, LedgerKind::Deposit, amount_cents, card_id, idempotency_key)
                .await?;
            if !ctx.accounts().credit_dater(user_id, amount_cents).await? {
                return Err(AppError::NotFound);
            }
            Ok(entry)
        })?;

        tracing::info!(user_id = %user_id, entry_id = %entry.id, amount_cents = entry.amount_cents, "Deposit recorded");
        Ok(entry)
    }

    async fn payout(&self, principal: Principal, payout: Payout) -> AppResult<LedgerEntry> {
        principal.require_role(UserRole::Cupid)?;
        payout.validate()?;

        let bank_account = self
            .uow
            .wallet()
            .find_bank_account(principal.user_id)
            .await?
            .ok_or_not_found()?;

        let user_id = principal.user_id;
        let account_id = bank_account.id;
        let idempotency_key = payout.idempotency_key;

        let entry = with_transaction!(self.uow, |ctx| {
            let wallet = ctx.wallet();
            if let Some(existing) = wallet.find_entry(user_id, &idempotency_key).await? {
                return Ok(existing);
            }

            let accounts = ctx.accounts();
            let balance = accounts
                .find_cupid(user_id)
                .await?
                .ok_or_not_found()?
                .balance_cents;
            if balance <= 0 {
                return Err(AppError::bad_request("No balance to transfer"));
            }

            let entry = wallet
                .insert_entry(user_id, LedgerKind::Payout, balance, account_id, idempotency_key)
                .await?;
            if !accounts.drain_cupid(user_id, balance).await? {
                return Err(AppError::bad_request("Balance changed during transfer"));
            }
            Ok(entry)
        })?;

        tracing::info!(user_id = %user_id, entry_id = %entry.id, amount_cents = entry.amount_cents, "Payout recorded");
        Ok(entry)
    }

    async fn entries(&self, principal: Principal, user_id: Uuid) -> AppResult<Vec<LedgerEntry>> {
        principal.require_self_or_staff(user_id)?;
        self.uow.wallet().list_entries(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::repositories::MockWalletRepository;
    use crate::services::test_support::TestUnitOfWork;
    use chrono::Utc;

    fn with_wallet(wallet: MockWalletRepository) -> WalletManager<TestUnitOfWork> {
        WalletManager::new(Arc::new(TestUnitOfWork {
            wallet: Arc::new(wallet),
            ..Default::default()
        }))
    }

    #[tokio::test]
    async fn test_card_failing_checksum_is_not_saved() {
        let mut wallet = MockWalletRepository::new();
        wallet.expect_save_card().never();

        let dater = Principal::new(Uuid::new_v4(), UserRole::Dater, false);
        let card = NewCard {
            name_on_card: "Jo Dater".into(),
            card_number: "4242424242424241".into(),
            cvv: "123".into(),
            expiration: "12/29".into(),
        };

        assert!(matches!(
            with_wallet(wallet).save_card(dater, card).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_deposit_from_someone_elses_card() {
        let mut wallet = MockWalletRepository::new();
        wallet.expect_find_card().returning(|id| {
            Ok(Some(PaymentCard {
                id,
                user_id: Uuid::new_v4(),
                name_on_card: "Someone Else".into(),
                last_four: "4242".into(),
                expiration: "12/29".into(),
                created_at: Utc::now(),
            }))
        });

        let dater = Principal::new(Uuid::new_v4(), UserRole::Dater, false);
        let deposit = Deposit {
            card_id: Uuid::new_v4(),
            amount_cents: 500,
            idempotency_key: "k-1".into(),
        };

        assert!(matches!(
            with_wallet(wallet).deposit(dater, deposit).await,
            Err(AppError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn test_payout_requires_bank_account() {
        let mut wallet = MockWalletRepository::new();
        wallet.expect_find_bank_account().returning(|_| Ok(None));

        let cupid = Principal::new(Uuid::new_v4(), UserRole::Cupid, false);
        let payout = Payout {
            idempotency_key: "p-1".into(),
        };

        assert!(matches!(
            with_wallet(wallet).payout(cupid, payout).await,
            Err(AppError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_deposit_amount_must_be_positive() {
        let dater = Principal::new(Uuid::new_v4(), UserRole::Dater, false);
        let deposit = Deposit {
            card_id: Uuid::new_v4(),
            amount_cents: 0,
            idempotency_key: "k-1".into(),
        };

        assert!(matches!(
            with_wallet(MockWalletRepository::new()).deposit(dater, deposit).await,
            Err(AppError::InvalidFields(_))
        ));
    }
}
