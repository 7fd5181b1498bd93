//! Repository layer - Data access abstraction
//!
//! Each aggregate has a pool-backed store behind a mockable trait for plain
//! reads and single-statement writes, plus a `Tx*` repository that borrows an
//! open transaction for the multi-statement workflows.

mod account_repository;
mod calendar_repository;
pub(crate) mod entities;
mod feedback_repository;
mod gig_repository;
mod message_repository;
mod stats_repository;
mod wallet_repository;

pub use account_repository::{AccountRepository, AccountStore, TxAccountRepository};
pub use calendar_repository::{CalendarRepository, CalendarStore};
pub use feedback_repository::{FeedbackRepository, FeedbackStore, TxFeedbackRepository};
pub use gig_repository::{GigRepository, GigStore, TxGigRepository};
pub use message_repository::{MessageRepository, MessageStore};
pub use stats_repository::{StatsRepository, StatsStore};
pub use wallet_repository::{TxWalletRepository, WalletRepository, WalletStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use account_repository::MockAccountRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use calendar_repository::MockCalendarRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use feedback_repository::MockFeedbackRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use gig_repository::MockGigRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use message_repository::MockMessageRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use stats_repository::MockStatsRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use wallet_repository::MockWalletRepository;
