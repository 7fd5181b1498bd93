//! Service Container - Centralized service access.
//!
//! Wires every service over one shared Unit of Work and one set of
//! external adapters. Handlers reach services through the trait, so tests can
//! swap the whole container.

use std::sync::Arc;

use super::{
    AccountManager, AccountService, AnalyticsManager, AnalyticsService, AuthService,
    Authenticator, CalendarManager, CalendarService, ChatManager, ChatService, GigManager,
    GigService, LinearScanMatcher, NotificationService, Notifier, PlacesFinder, PlacesService,
    RatingManager, RatingService, VoiceManager, VoiceService, WalletManager, WalletService,
};
use crate::config::Config;
use crate::infra::{Adapters, Persistence};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn accounts(&self) -> Arc<dyn AccountService>;

    fn gigs(&self) -> Arc<dyn GigService>;

    fn ratings(&self) -> Arc<dyn RatingService>;

    fn analytics(&self) -> Arc<dyn AnalyticsService>;

    fn chat(&self) -> Arc<dyn ChatService>;

    fn wallet(&self) -> Arc<dyn WalletService>;

    fn calendar(&self) -> Arc<dyn CalendarService>;

    fn voice(&self) -> Arc<dyn VoiceService>;

    fn notifications(&self) -> Arc<dyn NotificationService>;

    fn places(&self) -> Arc<dyn PlacesService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth: Arc<dyn AuthService>,
    accounts: Arc<dyn AccountService>,
    gigs: Arc<dyn GigService>,
    ratings: Arc<dyn RatingService>,
    analytics: Arc<dyn AnalyticsService>,
    chat: Arc<dyn ChatService>,
    wallet: Arc<dyn WalletService>,
    calendar: Arc<dyn CalendarService>,
    voice: Arc<dyn VoiceService>,
    notifications: Arc<dyn NotificationService>,
    places: Arc<dyn PlacesService>,
}

impl Services {
    /// Build every service over the connection, configuration and adapters.
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config, adapters: Adapters) -> Self {
        let uow = Arc::new(Persistence::new(db));
        let drop_policy = config.gig_drop_policy;

        let notifications: Arc<dyn NotificationService> = Arc::new(Notifier::new(
            uow.clone(),
            adapters.email.clone(),
            adapters.sms.clone(),
        ));
        let gigs: Arc<dyn GigService> = Arc::new(GigManager::new(
            uow.clone(),
            adapters.geocoder.clone(),
            Arc::new(LinearScanMatcher),
            notifications.clone(),
            drop_policy,
        ));
        let voice = Arc::new(VoiceManager::new(
            uow.clone(),
            adapters.transcriber.clone(),
            adapters.chat.clone(),
            adapters.geocoder.clone(),
            adapters.places.clone(),
            gigs.clone(),
        ));

        Self {
            auth: Arc::new(Authenticator::new(uow.clone(), config)),
            accounts: Arc::new(AccountManager::new(uow.clone(), drop_policy)),
            ratings: Arc::new(RatingManager::new(uow.clone())),
            analytics: Arc::new(AnalyticsManager::new(uow.clone())),
            chat: Arc::new(ChatManager::new(uow.clone(), adapters.chat.clone())),
            wallet: Arc::new(WalletManager::new(uow.clone())),
            calendar: Arc::new(CalendarManager::new(uow.clone())),
            places: Arc::new(PlacesFinder::new(uow, adapters.geocoder, adapters.places)),
            gigs,
            voice,
            notifications,
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth.clone()
    }

    fn accounts(&self) -> Arc<dyn AccountService> {
        self.accounts.clone()
    }

    fn gigs(&self) -> Arc<dyn GigService> {
        self.gigs.clone()
    }

    fn ratings(&self) -> Arc<dyn RatingService> {
        self.ratings.clone()
    }

    fn analytics(&self) -> Arc<dyn AnalyticsService> {
        self.analytics.clone()
    }

    fn chat(&self) -> Arc<dyn ChatService> {
        self.chat.clone()
    }

    fn wallet(&self) -> Arc<dyn WalletService> {
        self.wallet.clone()
    }

    fn calendar(&self) -> Arc<dyn CalendarService> {
        self.calendar.clone()
    }

    fn voice(&self) -> Arc<dyn VoiceService> {
        self.voice.clone()
    }

    fn notifications(&self) -> Arc<dyn NotificationService> {
        self.notifications.clone()
    }

    fn places(&self) -> Arc<dyn PlacesService> {
        self.places.clone()
    }
}
