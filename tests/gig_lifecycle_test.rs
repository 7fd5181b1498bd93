//! Gig lifecycle against a real store: claim races, drops and the nearby feed.

mod common;

use cupid_concierge::domain::{CupidStatus, DropPolicy, GigStatus, NewQuest, RatingTarget, UserRole};
use cupid_concierge::errors::AppError;
use cupid_concierge::services::{Moderation, Rating, ServiceContainer};
use uuid::Uuid;

use common::*;

fn quest(items: &str, pickup: &str) -> NewQuest {
    NewQuest {
        budget_cents: 5_000,
        items_requested: items.into(),
        pickup_location: pickup.into(),
    }
}

#[tokio::test]
async fn test_full_dater_cupid_scenario() {
    let services = services().await;
    let dater = register_dater(&services, "dana").await;
    let cupid = register_cupid(&services, "cole", HOME).await;
    let rival = register_cupid(&services, "rita", HOME).await;

    let gig = services
        .gigs()
        .create(principal(&dater), quest("flowers", MAIN_ST))
        .await
        .unwrap();
    assert_eq!(gig.status, GigStatus::Unclaimed);
    assert_eq!(gig.accept_count, 0);
    assert_eq!(gig.drop_count, 0);
    assert!(gig.quest.pickup.is_some());

    let feed = services
        .gigs()
        .nearby(principal(&cupid), cupid.id(), 10)
        .await
        .unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].id, gig.id);

    let claimed = services.gigs().accept(principal(&cupid), gig.id).await.unwrap();
    assert_eq!(claimed.status, GigStatus::Claimed);
    assert_eq!(claimed.cupid_id, Some(cupid.id()));
    assert_eq!(claimed.accept_count, 1);

    match services.gigs().accept(principal(&rival), gig.id).await {
        Err(AppError::BadRequest(reason)) => assert_eq!(reason, "Gig is not available to claim"),
        other => panic!("second claim should fail, got {:?}", other),
    }

    let profile = services
        .accounts()
        .cupid_profile(principal(&cupid), cupid.id())
        .await
        .unwrap();
    assert_eq!(profile.status, CupidStatus::Gigging);

    let done = services.gigs().complete(principal(&cupid), gig.id).await.unwrap();
    assert_eq!(done.status, GigStatus::Complete);
    assert!(done.completed_at.is_some());

    let profile = services
        .accounts()
        .cupid_profile(principal(&cupid), cupid.id())
        .await
        .unwrap();
    assert_eq!(profile.gigs_completed, 1);
    assert_eq!(profile.status, CupidStatus::Available);

    services
        .ratings()
        .rate(
            principal(&dater),
            RatingTarget::Cupid,
            Rating {
                target_id: cupid.id(),
                gig_id: gig.id,
                message: "Saved the night".into(),
                rating: 5,
            },
        )
        .await
        .unwrap();

    let average = services
        .ratings()
        .average(principal(&cupid), RatingTarget::Cupid, cupid.id())
        .await
        .unwrap();
    assert_eq!(average, 5.0);
}

#[tokio::test]
async fn test_concurrent_accepts_have_one_winner() {
    let services = services().await;
    let dater = register_dater(&services, "dana").await;
    let first = register_cupid(&services, "cole", HOME).await;
    let second = register_cupid(&services, "rita", HOME).await;

    let gig = services
        .gigs()
        .create(principal(&dater), quest("chocolate", MAIN_ST))
        .await
        .unwrap();

    let gigs = services.gigs();
    let (a, b) = tokio::join!(
        gigs.accept(principal(&first), gig.id),
        gigs.accept(principal(&second), gig.id)
    );

    assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
    let loser = if a.is_ok() { b } else { a };
    assert!(matches!(loser, Err(AppError::BadRequest(_))));

    let manager = create_manager(&services).await;
    let stored = services.gigs().get(manager, gig.id).await.unwrap();
    assert_eq!(stored.accept_count, 1);
}

#[tokio::test]
async fn test_accept_missing_gig() {
    let services = services().await;
    let cupid = register_cupid(&services, "cole", HOME).await;

    assert!(matches!(
        services.gigs().accept(principal(&cupid), Uuid::new_v4()).await,
        Err(AppError::NotFound)
    ));
}

#[tokio::test]
async fn test_drop_reopens_gig() {
    let services = services().await;
    let dater = register_dater(&services, "dana").await;
    let cupid = register_cupid(&services, "cole", HOME).await;
    let other = register_cupid(&services, "rita", HOME).await;

    let gig = services
        .gigs()
        .create(principal(&dater), quest("roses", MAIN_ST))
        .await
        .unwrap();

    // Nothing to drop before a claim
    assert!(matches!(
        services.gigs().drop_gig(principal(&cupid), gig.id).await,
        Err(AppError::Forbidden)
    ));

    services.gigs().accept(principal(&cupid), gig.id).await.unwrap();

    assert!(matches!(
        services.gigs().drop_gig(principal(&other), gig.id).await,
        Err(AppError::Forbidden)
    ));
    assert!(matches!(
        services.gigs().drop_gig(principal(&dater), gig.id).await,
        Err(AppError::Forbidden)
    ));

    let dropped = services.gigs().drop_gig(principal(&cupid), gig.id).await.unwrap();
    assert_eq!(dropped.status, GigStatus::Unclaimed);
    assert_eq!(dropped.cupid_id, None);
    assert_eq!(dropped.drop_count, 1);

    let profile = services
        .accounts()
        .cupid_profile(principal(&cupid), cupid.id())
        .await
        .unwrap();
    assert_eq!(profile.gigs_failed, 1);

    // Back in the pool for someone else
    let reclaimed = services.gigs().accept(principal(&other), gig.id).await.unwrap();
    assert_eq!(reclaimed.cupid_id, Some(other.id()));
    assert_eq!(reclaimed.accept_count, 2);
}

#[tokio::test]
async fn test_terminal_drop_retires_gig() {
    let services = services_with_policy(DropPolicy::Terminal).await;
    let dater = register_dater(&services, "dana").await;
    let cupid = register_cupid(&services, "cole", HOME).await;
    let other = register_cupid(&services, "rita", HOME).await;

    let gig = services
        .gigs()
        .create(principal(&dater), quest("roses", MAIN_ST))
        .await
        .unwrap();
    services.gigs().accept(principal(&cupid), gig.id).await.unwrap();

    let dropped = services.gigs().drop_gig(principal(&cupid), gig.id).await.unwrap();
    assert_eq!(dropped.status, GigStatus::Dropped);
    assert_eq!(dropped.cupid_id, None);

    assert!(matches!(
        services.gigs().accept(principal(&other), gig.id).await,
        Err(AppError::BadRequest(_))
    ));
}

#[tokio::test]
async fn test_complete_requires_claim_and_party() {
    let services = services().await;
    let dater = register_dater(&services, "dana").await;
    let stranger = register_dater(&services, "stan").await;
    let cupid = register_cupid(&services, "cole", HOME).await;

    let gig = services
        .gigs()
        .create(principal(&dater), quest("roses", MAIN_ST))
        .await
        .unwrap();

    assert!(matches!(
        services.gigs().complete(principal(&dater), gig.id).await,
        Err(AppError::BadRequest(_))
    ));

    services.gigs().accept(principal(&cupid), gig.id).await.unwrap();

    assert!(matches!(
        services.gigs().complete(principal(&stranger), gig.id).await,
        Err(AppError::Forbidden)
    ));

    // The dater may confirm completion too
    let done = services.gigs().complete(principal(&dater), gig.id).await.unwrap();
    assert_eq!(done.status, GigStatus::Complete);
}

#[tokio::test]
async fn test_nearby_filters_by_range_and_limit() {
    let services = services().await;
    let dater = register_dater(&services, "dana").await;
    let cupid = register_cupid(&services, "cole", HOME).await;

    let near_first = services
        .gigs()
        .create(principal(&dater), quest("roses", MAIN_ST))
        .await
        .unwrap();
    services
        .gigs()
        .create(principal(&dater), quest("bagels", FAR_AWAY))
        .await
        .unwrap();
    services
        .gigs()
        .create(principal(&dater), quest("mystery", "somewhere over the rainbow"))
        .await
        .unwrap();
    services
        .gigs()
        .create(principal(&dater), quest("candles", HOME))
        .await
        .unwrap();

    let feed = services
        .gigs()
        .nearby(principal(&cupid), cupid.id(), 10)
        .await
        .unwrap();
    assert_eq!(feed.len(), 2);
    assert!(feed.iter().all(|g| g.quest.items_requested != "bagels"));
    assert!(feed.iter().all(|g| g.quest.items_requested != "mystery"));

    let limited = services
        .gigs()
        .nearby(principal(&cupid), cupid.id(), 1)
        .await
        .unwrap();
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].id, near_first.id);
}

#[tokio::test]
async fn test_nearby_is_private_and_needs_a_cupid() {
    let services = services().await;
    let cupid = register_cupid(&services, "cole", HOME).await;
    let other = register_cupid(&services, "rita", HOME).await;
    let manager = create_manager(&services).await;

    assert!(matches!(
        services.gigs().nearby(principal(&other), cupid.id(), 5).await,
        Err(AppError::Forbidden)
    ));
    assert!(matches!(
        services.gigs().nearby(manager, Uuid::new_v4(), 5).await,
        Err(AppError::NotFound)
    ));
}

#[tokio::test]
async fn test_unresolvable_cupid_sees_nothing() {
    let services = services().await;
    let dater = register_dater(&services, "dana").await;
    let cupid = register_cupid(&services, "cole", "the moon").await;

    services
        .gigs()
        .create(principal(&dater), quest("roses", MAIN_ST))
        .await
        .unwrap();

    let feed = services
        .gigs()
        .nearby(principal(&cupid), cupid.id(), 10)
        .await
        .unwrap();
    assert!(feed.is_empty());
}

#[tokio::test]
async fn test_suspended_dater_cannot_request() {
    let services = services().await;
    let dater = register_dater(&services, "dana").await;
    let manager = create_manager(&services).await;

    services
        .analytics()
        .set_suspended(
            manager,
            Moderation {
                user_id: dater.id(),
                role: UserRole::Dater,
            },
            true,
        )
        .await
        .unwrap();

    assert!(matches!(
        services
            .gigs()
            .create(principal(&dater), quest("roses", MAIN_ST))
            .await,
        Err(AppError::Forbidden)
    ));
}
