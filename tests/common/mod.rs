//! Shared setup for the integration suites.
//!
//! Every test gets its own in-memory SQLite database with migrations applied,
//! and deterministic stand-ins for the external services.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;

use cupid_concierge::config::Config;
use cupid_concierge::domain::{
    Account, CommunicationPreference, CupidProfileInput, DaterProfileInput, DropPolicy, GeoPoint,
    Principal, UserRole,
};
use cupid_concierge::infra::{
    Adapters, ChatResponder, ClientError, Database, EmailSender, Geocoder, Place, PlacesLookup,
    SmsSender, Transcriber,
};
use cupid_concierge::services::{Registration, ServiceContainer, Services};
use cupid_concierge::AppState;

pub const JWT_SECRET: &str = "integration-secret-key-at-least-32-chars";
pub const PASSWORD: &str = "password123";

/// Logan, UT
pub const HOME: &str = "41.7370,-111.8338";
/// A street address the stub geocoder resolves to `HOME`
pub const MAIN_ST: &str = "123 Main St";
/// New York, far outside any test cupid's range
pub const FAR_AWAY: &str = "40.7128,-74.0060";

/// Resolves `MAIN_ST`, and anything written as `lat,lng`.
pub struct StubGeocoder;

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn geocode(&self, location: &str) -> Result<Option<GeoPoint>, ClientError> {
        if location == MAIN_ST {
            return Ok(GeoPoint::parse(HOME));
        }
        Ok(GeoPoint::parse(location))
    }
}

/// One florist next to wherever the search is centred.
pub struct StubPlaces;

#[async_trait]
impl PlacesLookup for StubPlaces {
    async fn search(&self, near: GeoPoint, _term: &str) -> Result<Vec<Place>, ClientError> {
        Ok(vec![Place {
            name: "Bloom Florist".into(),
            address: "45 Center St".into(),
            point: Some(near),
        }])
    }
}

pub struct QuietEmail;

#[async_trait]
impl EmailSender for QuietEmail {
    async fn send(&self, _to: &str, _subject: &str, _body: &str) -> Result<(), ClientError> {
        Ok(())
    }
}

pub struct QuietSms;

#[async_trait]
impl SmsSender for QuietSms {
    async fn send(&self, _to: &str, _body: &str) -> Result<String, ClientError> {
        Ok("SM-test".into())
    }
}

/// Always hears the same sentence.
pub struct StubTranscriber;

#[async_trait]
impl Transcriber for StubTranscriber {
    async fn transcribe(&self, _audio: &[u8], _format: &str) -> Result<String, ClientError> {
        Ok("create gig, I need flowers for tonight".into())
    }
}

/// Replies with a fixed text, or fails when there is none.
pub struct StubChat(pub Option<String>);

#[async_trait]
impl ChatResponder for StubChat {
    async fn respond(&self, _prompt: &str) -> Result<String, ClientError> {
        self.0.clone().ok_or(ClientError::HttpStatus(503))
    }
}

pub fn config() -> Config {
    Config::new("sqlite::memory:", JWT_SECRET)
}

pub fn adapters_with_reply(reply: Option<&str>) -> Adapters {
    Adapters {
        geocoder: Arc::new(StubGeocoder),
        places: Arc::new(StubPlaces),
        email: Arc::new(QuietEmail),
        sms: Arc::new(QuietSms),
        transcriber: Arc::new(StubTranscriber),
        chat: Arc::new(StubChat(reply.map(str::to_string))),
    }
}

pub fn adapters() -> Adapters {
    adapters_with_reply(Some("Create gig: True\nItems requested: Flowers"))
}

pub async fn database(config: &Config) -> Arc<Database> {
    Arc::new(
        Database::connect(config)
            .await
            .expect("in-memory database should migrate"),
    )
}

pub async fn services_with(config: Config, adapters: Adapters) -> Services {
    let db = database(&config).await;
    Services::from_connection(db.get_connection(), config, adapters)
}

pub async fn services() -> Services {
    services_with(config(), adapters()).await
}

pub async fn services_with_policy(policy: DropPolicy) -> Services {
    let mut config = config();
    config.gig_drop_policy = policy;
    services_with(config, adapters()).await
}

pub async fn app_state() -> AppState {
    let config = config();
    let db = database(&config).await;
    AppState::from_config(db, config, adapters())
}

pub fn dater_input(location: &str) -> DaterProfileInput {
    DaterProfileInput {
        phone_number: "4355551234".into(),
        budget_cents: 5_000,
        communication_preference: CommunicationPreference::Email,
        description: String::new(),
        dating_strengths: String::new(),
        dating_weaknesses: String::new(),
        interests: "hiking".into(),
        past: String::new(),
        nerd_type: String::new(),
        relationship_goals: String::new(),
        ai_degree: String::new(),
        location: location.into(),
    }
}

pub fn cupid_input(location: &str) -> CupidProfileInput {
    CupidProfileInput {
        accepting_gigs: true,
        payout: String::new(),
        location: location.into(),
        gig_range_km: Some(10.0),
    }
}

pub fn registration(username: &str, role: UserRole) -> Registration {
    Registration {
        username: username.into(),
        email: format!("{}@example.com", username),
        password: PASSWORD.into(),
        confirm_password: PASSWORD.into(),
        first_name: "Test".into(),
        last_name: "User".into(),
        role,
        dater: None,
        cupid: None,
    }
}

pub async fn register_dater(services: &Services, username: &str) -> Account {
    let mut registration = registration(username, UserRole::Dater);
    registration.dater = Some(dater_input(HOME));
    services
        .auth()
        .register(registration)
        .await
        .expect("dater registration should succeed")
}

pub async fn register_cupid(services: &Services, username: &str, location: &str) -> Account {
    let mut registration = registration(username, UserRole::Cupid);
    registration.cupid = Some(cupid_input(location));
    services
        .auth()
        .register(registration)
        .await
        .expect("cupid registration should succeed")
}

pub async fn create_manager(services: &Services) -> Principal {
    let user = services
        .auth()
        .create_manager(
            "boss".into(),
            "boss@example.com".into(),
            PASSWORD.into(),
            "Big".into(),
            "Boss".into(),
        )
        .await
        .expect("manager creation should succeed");
    Principal::new(user.id, UserRole::Manager, true)
}

pub fn principal(account: &Account) -> Principal {
    Principal::new(account.id(), account.user.role, account.user.is_staff)
}
