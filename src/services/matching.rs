//! Gig matching - which unclaimed gigs a cupid should be offered.

use crate::domain::{GeoPoint, Gig};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Selects gigs for a cupid standing at `origin`.
///
/// `candidates` arrive in request order; implementations return at most
/// `limit` of them.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait GigMatcher: Send + Sync {
    fn nearby(&self, origin: GeoPoint, range_km: f64, candidates: Vec<Gig>, limit: usize)
        -> Vec<Gig>;
}

/// Keeps every candidate whose pickup lies within range, in the order given.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinearScanMatcher;

impl GigMatcher for LinearScanMatcher {
    fn nearby(
        &self,
        origin: GeoPoint,
        range_km: f64,
        candidates: Vec<Gig>,
        limit: usize,
    ) -> Vec<Gig> {
        candidates
            .into_iter()
            .filter(|gig| {
                gig.quest
                    .pickup
                    .is_some_and(|pickup| origin.within_km(&pickup, range_km))
            })
            .take(limit)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GigStatus, Quest};
    use chrono::Utc;
    use uuid::Uuid;

    fn gig_at(pickup: Option<GeoPoint>) -> Gig {
        Gig {
            id: Uuid::new_v4(),
            status: GigStatus::Unclaimed,
            dater_id: Uuid::new_v4(),
            cupid_id: None,
            quest: Quest {
                id: Uuid::new_v4(),
                budget_cents: 2_000,
                items_requested: "chocolates".into(),
                pickup_location: "somewhere".into(),
                pickup,
            },
            requested_at: Utc::now(),
            claimed_at: None,
            completed_at: None,
            accept_count: 0,
            drop_count: 0,
        }
    }

    fn point(lat: f64, lng: f64) -> Option<GeoPoint> {
        GeoPoint::new(lat, lng)
    }

    #[test]
    fn test_filters_by_range_and_keeps_order() {
        let logan = GeoPoint::new(41.7370, -111.8338).unwrap();
        let near_a = gig_at(point(41.7400, -111.8300));
        let far = gig_at(point(40.7608, -111.8910));
        let near_b = gig_at(point(41.7300, -111.8400));
        let unresolved = gig_at(None);
        let expected = vec![near_a.id, near_b.id];

        let matched = LinearScanMatcher.nearby(
            logan,
            10.0,
            vec![near_a, far, unresolved, near_b],
            10,
        );

        assert_eq!(matched.iter().map(|g| g.id).collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_truncates_to_limit() {
        let origin = GeoPoint::new(41.7370, -111.8338).unwrap();
        let gigs: Vec<_> = (0..5).map(|_| gig_at(Some(origin))).collect();
        let first_two: Vec<_> = gigs.iter().take(2).map(|g| g.id).collect();

        let matched = LinearScanMatcher.nearby(origin, 1.0, gigs, 2);
        assert_eq!(matched.iter().map(|g| g.id).collect::<Vec<_>>(), first_two);
    }

    #[test]
    fn test_zero_limit_is_empty() {
        let origin = GeoPoint::new(0.0, 0.0).unwrap();
        assert!(LinearScanMatcher
            .nearby(origin, 10.0, vec![gig_at(Some(origin))], 0)
            .is_empty());
    }
}
