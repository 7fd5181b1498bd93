//! Unit of Work over mock repositories for service unit tests.
//!
//! Transactions are not supported here; workflows that need one are covered
//! by the SQLite integration suites under `tests/`.

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::{AppError, AppResult};
use crate::infra::repositories::{
    AccountRepository, CalendarRepository, FeedbackRepository, GigRepository,
    MessageRepository, MockAccountRepository, MockCalendarRepository, MockFeedbackRepository,
    MockGigRepository, MockMessageRepository, MockStatsRepository, MockWalletRepository,
    StatsRepository, WalletRepository,
};
use crate::infra::{TransactionContext, UnitOfWork};

#[derive(Default)]
pub(crate) struct TestUnitOfWork {
    pub accounts: Arc<MockAccountRepository>,
    pub gigs: Arc<MockGigRepository>,
    pub feedback: Arc<MockFeedbackRepository>,
    pub messages: Arc<MockMessageRepository>,
    pub wallet: Arc<MockWalletRepository>,
    pub calendar: Arc<MockCalendarRepository>,
    pub stats: Arc<MockStatsRepository>,
}

impl TestUnitOfWork {
    pub fn with_accounts(accounts: MockAccountRepository) -> Self {
        Self {
            accounts: Arc::new(accounts),
            ..Default::default()
        }
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
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

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        Err(AppError::internal("Transactions not supported in test mock"))
    }
}
