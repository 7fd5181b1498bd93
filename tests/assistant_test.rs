//! Assistant chat, voice intake, notifications, places and the calendar.

mod common;

use chrono::{Duration, Utc};
use cupid_concierge::domain::{CommunicationPreference, NewOuting, OutingStatus, UserRole};
use cupid_concierge::errors::AppError;
use cupid_concierge::services::{AudioClip, Channel, PlaceCategory, ServiceContainer};
use uuid::Uuid;

use common::*;

fn clip(data: &str) -> AudioClip {
    AudioClip {
        format: "wav".into(),
        data: data.into(),
    }
}

#[tokio::test]
async fn test_chat_logs_both_sides() {
    let services = services_with(config(), adapters_with_reply(Some("Try the botanical garden."))).await;
    let dater = register_dater(&services, "dana").await;
    let caller = principal(&dater);

    let reply = services
        .chat()
        .send(caller, "Where should we go?".into())
        .await
        .unwrap();
    assert!(reply.from_ai);
    assert_eq!(reply.text, "Try the botanical garden.");

    let history = services.chat().recent(caller, dater.id(), 10).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history.iter().filter(|m| m.from_ai).count(), 1);

    let latest = services.chat().recent(caller, dater.id(), 1).await.unwrap();
    assert_eq!(latest.len(), 1);
}

#[tokio::test]
async fn test_chat_outage_keeps_question() {
    let services = services_with(config(), adapters_with_reply(None)).await;
    let dater = register_dater(&services, "dana").await;
    let caller = principal(&dater);

    assert!(matches!(
        services.chat().send(caller, "Hello?".into()).await,
        Err(AppError::Upstream(_))
    ));

    let history = services.chat().recent(caller, dater.id(), 10).await.unwrap();
    assert_eq!(history.len(), 1);
    assert!(!history[0].from_ai);
    assert_eq!(history[0].text, "Hello?");
}

#[tokio::test]
async fn test_chat_history_is_private() {
    let services = services().await;
    let dater = register_dater(&services, "dana").await;
    let manager = create_manager(&services).await;

    assert!(matches!(
        services.chat().recent(manager, dater.id(), 5).await,
        Err(AppError::Forbidden)
    ));
    assert!(matches!(
        services.chat().send(principal(&dater), "   ".into()).await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn test_voice_request_creates_gig() {
    let services = services().await;
    let dater = register_dater(&services, "dana").await;

    let outcome = services
        .voice()
        .intake(principal(&dater), clip("UklGRg=="))
        .await
        .unwrap();

    assert!(outcome.gig_created);
    let gig = outcome.gig.expect("a gig should be attached");
    assert_eq!(gig.dater_id, dater.id());
    assert_eq!(gig.quest.items_requested, "Flowers");
    assert_eq!(gig.quest.pickup_location, "45 Center St");
    assert_eq!(gig.quest.budget_cents, 5_000);
}

#[tokio::test]
async fn test_voice_without_items_or_intent() {
    let no_items = services_with(config(), adapters_with_reply(Some("Create gig: True\nItems requested: NA"))).await;
    let dater = register_dater(&no_items, "dana").await;
    let outcome = no_items
        .voice()
        .intake(principal(&dater), clip("UklGRg=="))
        .await
        .unwrap();
    assert!(!outcome.gig_created);
    assert!(outcome.error.is_some());

    let declined = services_with(config(), adapters_with_reply(Some("Create gig: False"))).await;
    let dater = register_dater(&declined, "dana").await;
    let outcome = declined
        .voice()
        .intake(principal(&dater), clip("UklGRg=="))
        .await
        .unwrap();
    assert!(!outcome.gig_created);
    assert_eq!(outcome.message.as_deref(), Some("gig creation not needed"));
}

#[tokio::test]
async fn test_voice_rejects_bad_audio() {
    let services = services().await;
    let dater = register_dater(&services, "dana").await;
    let cupid = register_cupid(&services, "cole", HOME).await;

    assert!(matches!(
        services.voice().intake(principal(&dater), clip("not base64!")).await,
        Err(AppError::BadRequest(_))
    ));
    assert!(matches!(
        services.voice().intake(principal(&cupid), clip("UklGRg==")).await,
        Err(AppError::Forbidden)
    ));
}

#[tokio::test]
async fn test_notify_uses_preferred_channel() {
    let services = services().await;
    let dater = register_dater(&services, "dana").await;
    let cupid = register_cupid(&services, "cole", HOME).await;
    let manager = create_manager(&services).await;

    let receipt = services
        .notifications()
        .notify(dater.id(), "Your cupid is on the way".into())
        .await
        .unwrap();
    assert_eq!(receipt.channel, Channel::Email);

    let receipt = services
        .notifications()
        .notify(cupid.id(), "New gig nearby".into())
        .await
        .unwrap();
    assert_eq!(receipt.channel, Channel::Email);

    assert!(matches!(
        services.notifications().notify(manager.user_id, "hi".into()).await,
        Err(AppError::BadRequest(_))
    ));
    assert!(matches!(
        services.notifications().notify(Uuid::new_v4(), "hi".into()).await,
        Err(AppError::NotFound)
    ));
}

#[tokio::test]
async fn test_text_preference_gets_sms() {
    let services = services().await;
    let mut registration = registration("tess", UserRole::Dater);
    let mut profile = dater_input(HOME);
    profile.communication_preference = CommunicationPreference::Text;
    registration.dater = Some(profile);
    let dater = services.auth().register(registration).await.unwrap();

    let receipt = services
        .notifications()
        .notify(dater.id(), "Flowers delivered".into())
        .await
        .unwrap();
    assert_eq!(receipt.channel, Channel::Text);
    assert_eq!(receipt.reference.as_deref(), Some("SM-test"));
}

#[tokio::test]
async fn test_places_around_own_location() {
    let services = services().await;
    let dater = register_dater(&services, "dana").await;
    let other = register_dater(&services, "drew").await;

    let places = services
        .places()
        .near_user(principal(&dater), PlaceCategory::Stores, dater.id())
        .await
        .unwrap();
    assert_eq!(places.len(), 1);
    assert_eq!(places[0].name, "Bloom Florist");

    assert!(matches!(
        services
            .places()
            .near_user(principal(&other), PlaceCategory::Stores, dater.id())
            .await,
        Err(AppError::Forbidden)
    ));
}

#[tokio::test]
async fn test_calendar_schedule_and_list() {
    let services = services().await;
    let dater = register_dater(&services, "dana").await;
    let manager = create_manager(&services).await;

    let outing = services
        .calendar()
        .schedule(
            principal(&dater),
            NewOuting {
                scheduled_at: Utc::now() + Duration::days(2),
                location: "Riverwoods".into(),
                description: "Picnic".into(),
                status: OutingStatus::Planned,
                budget_cents: 4_000,
            },
        )
        .await
        .unwrap();
    assert_eq!(outing.dater_id, dater.id());

    let dates = services.calendar().dates(manager, dater.id()).await.unwrap();
    assert_eq!(dates.len(), 1);
    assert_eq!(dates[0].location, "Riverwoods");
}
