//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion, and receive the caller as an explicit `Principal`.
//!
//! All services use the Unit of Work pattern for repository access and
//! transaction management.

mod account_service;
mod analytics_service;
mod auth_service;
mod calendar_service;
mod chat_service;
pub mod container;
mod gig_service;
pub mod matching;
mod notification_service;
mod places_service;
mod rating_service;
mod voice_service;
mod wallet_service;

#[cfg(test)]
pub(crate) mod test_support;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use account_service::{AccountManager, AccountService};
pub use analytics_service::{AnalyticsManager, AnalyticsService, Moderation};
pub use auth_service::{
    Authenticated, AuthService, Authenticator, Claims, Registration, SignInResponse,
    TokenResponse,
};
pub use calendar_service::{CalendarManager, CalendarService};
pub use chat_service::{ChatManager, ChatService};
pub use gig_service::{GigManager, GigService};
pub use matching::{GigMatcher, LinearScanMatcher};
pub use notification_service::{
    dispatch, Channel, NotificationReceipt, NotificationService, Notifier,
};
pub use places_service::{PlaceCategory, PlacesFinder, PlacesService};
pub use rating_service::{Rating, RatingManager, RatingService};
pub use voice_service::{AudioClip, VoiceManager, VoiceOutcome, VoiceService};
pub use wallet_service::{Deposit, Payout, WalletManager, WalletService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
#[cfg(any(test, feature = "test-utils"))]
pub use matching::MockGigMatcher;
#[cfg(any(test, feature = "test-utils"))]
pub use notification_service::MockNotificationService;
