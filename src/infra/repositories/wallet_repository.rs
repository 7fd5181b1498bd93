//! Saved payment instruments and the cupid-cash ledger.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::{bank_account, ledger_entry, payment_card};
use crate::domain::{BankAccount, LedgerEntry, LedgerKind, NewBankAccount, NewCard, PaymentCard};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait WalletRepository: Send + Sync {
    /// Store a card. Only the last four digits are kept.
    async fn save_card(&self, user_id: Uuid, card: NewCard) -> AppResult<PaymentCard>;

    async fn find_card(&self, card_id: Uuid) -> AppResult<Option<PaymentCard>>;

    async fn save_bank_account(
        &self,
        user_id: Uuid,
        account: NewBankAccount,
    ) -> AppResult<BankAccount>;

    /// The most recently saved bank account
    async fn find_bank_account(&self, user_id: Uuid) -> AppResult<Option<BankAccount>>;

    /// Ledger history, newest first
    async fn list_entries(&self, user_id: Uuid) -> AppResult<Vec<LedgerEntry>>;
}

pub struct WalletStore {
    db: DatabaseConnection,
}

impl WalletStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WalletRepository for WalletStore {
    async fn save_card(&self, user_id: Uuid, card: NewCard) -> AppResult<PaymentCard> {
        let last_four = card.last_four();
        let model = payment_card::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            name_on_card: Set(card.name_on_card),
            last_four: Set(last_four),
            expiration: Set(card.expiration),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;

        Ok(PaymentCard::from(model))
    }

    async fn find_card(&self, card_id: Uuid) -> AppResult<Option<PaymentCard>> {
        Ok(payment_card::Entity::find_by_id(card_id)
            .one(&self.db)
            .await?
            .map(PaymentCard::from))
    }

    async fn save_bank_account(
        &self,
        user_id: Uuid,
        account: NewBankAccount,
    ) -> AppResult<BankAccount> {
        let model = bank_account::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            account_last_four: Set(account.account_last_four()),
            routing_number: Set(account.routing_number),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;

        Ok(BankAccount::from(model))
    }

    async fn find_bank_account(&self, user_id: Uuid) -> AppResult<Option<BankAccount>> {
        Ok(bank_account::Entity::find()
            .filter(bank_account::Column::UserId.eq(user_id))
            .order_by_desc(bank_account::Column::CreatedAt)
            .one(&self.db)
            .await?
            .map(BankAccount::from))
    }

    async fn list_entries(&self, user_id: Uuid) -> AppResult<Vec<LedgerEntry>> {
        ledger_entry::Entity::find()
            .filter(ledger_entry::Column::UserId.eq(user_id))
            .order_by_desc(ledger_entry::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(LedgerEntry::try_from)
            .collect()
    }
}

/// Ledger writes, always paired with a balance change in the same transaction.
pub struct TxWalletRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxWalletRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// The entry already recorded under `idempotency_key`, if any.
    pub async fn find_entry(
        &self,
        user_id: Uuid,
        idempotency_key: &str,
    ) -> AppResult<Option<LedgerEntry>> {
        ledger_entry::Entity::find()
            .filter(ledger_entry::Column::UserId.eq(user_id))
            .filter(ledger_entry::Column::IdempotencyKey.eq(idempotency_key))
            .one(self.txn)
            .await?
            .map(LedgerEntry::try_from)
            .transpose()
    }

    pub async fn insert_entry(
        &self,
        user_id: Uuid,
        kind: LedgerKind,
        amount_cents: i64,
        instrument_id: Uuid,
        idempotency_key: String,
    ) -> AppResult<LedgerEntry> {
        let model = ledger_entry::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            kind: Set(kind.to_string()),
            amount_cents: Set(amount_cents),
            instrument_id: Set(instrument_id),
            idempotency_key: Set(idempotency_key),
            created_at: Set(Utc::now()),
        }
        .insert(self.txn)
        .await?;

        LedgerEntry::try_from(model)
    }
}
