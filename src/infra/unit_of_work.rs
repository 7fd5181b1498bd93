//! Unit of Work pattern implementation.
//!
//! Centralizes access to the pool-backed repositories and runs multi-statement
//! workflows inside one database transaction. Everything reached through a
//! [`TransactionContext`] commits or rolls back together.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};
use std::sync::Arc;

use super::repositories::{
    AccountRepository, AccountStore, CalendarRepository, CalendarStore, FeedbackRepository,
    FeedbackStore, GigRepository, GigStore, MessageRepository, MessageStore, StatsRepository,
    StatsStore, TxAccountRepository, TxFeedbackRepository, TxGigRepository, TxWalletRepository,
    WalletRepository, WalletStore,
};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Not mockable directly because of the generic transaction methods. Tests
/// either implement it over mock repositories or run against SQLite.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn accounts(&self) -> Arc<dyn AccountRepository>;

    fn gigs(&self) -> Arc<dyn GigRepository>;

    fn feedback(&self) -> Arc<dyn FeedbackRepository>;

    fn messages(&self) -> Arc<dyn MessageRepository>;

    fn wallet(&self) -> Arc<dyn WalletRepository>;

    fn calendar(&self) -> Arc<dyn CalendarRepository>;

    fn stats(&self) -> Arc<dyn StatsRepository>;

    /// Execute a closure within a transaction.
    ///
    /// Committed on `Ok`, rolled back on `Err`. Uses ReadCommitted.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Repository access bound to one open transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn accounts(&self) -> TxAccountRepository<'a> {
        TxAccountRepository::new(self.txn)
    }

    pub fn gigs(&self) -> TxGigRepository<'a> {
        TxGigRepository::new(self.txn)
    }

    pub fn feedback(&self) -> TxFeedbackRepository<'a> {
        TxFeedbackRepository::new(self.txn)
    }

    pub fn wallet(&self) -> TxWalletRepository<'a> {
        TxWalletRepository::new(self.txn)
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    accounts: Arc<AccountStore>,
    gigs: Arc<GigStore>,
    feedback: Arc<FeedbackStore>,
    messages: Arc<MessageStore>,
    wallet: Arc<WalletStore>,
    calendar: Arc<CalendarStore>,
    stats: Arc<StatsStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            accounts: Arc::new(AccountStore::new(db.clone())),
            gigs: Arc::new(GigStore::new(db.clone())),
            feedback: Arc::new(FeedbackStore::new(db.clone())),
            messages: Arc::new(MessageStore::new(db.clone())),
            wallet: Arc::new(WalletStore::new(db.clone())),
            calendar: Arc::new(CalendarStore::new(db.clone())),
            stats: Arc::new(StatsStore::new(db.clone())),
            db,
        }
    }

    async fn execute_transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::ReadCommitted), Some(AccessMode::ReadWrite))
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn accounts(&self) -> Arc<dyn AccountRepository> {
        self.accounts.clone()
    }

    fn gigs(&self) -> Arc<dyn GigRepository> {
        self.gigs.clone()
    }

    fn feedback(&self) -> Arc<dyn FeedbackRepository> {
        self.feedback.clone()
    }

    fn messages(&self) -> Arc<dyn MessageRepository> {
        self.messages.clone()
    }

    fn wallet(&self) -> Arc<dyn WalletRepository> {
        self.wallet.clone()
    }

    fn calendar(&self) -> Arc<dyn CalendarRepository> {
        self.calendar.clone()
    }

    fn stats(&self) -> Arc<dyn StatsRepository> {
        self.stats.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        self.execute_transaction(f).await
    }
}

/// Run `$body` inside `$uow.transaction`, binding the context to `$ctx`.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
