//! Points of interest around a user's stored location.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::Principal;
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{Geocoder, Place, PlacesLookup, UnitOfWork};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PlaceCategory {
    Stores,
    Activities,
    Events,
    Attractions,
    Restaurants,
}

impl PlaceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceCategory::Stores => "stores",
            PlaceCategory::Activities => "activities",
            PlaceCategory::Events => "events",
            PlaceCategory::Attractions => "attractions",
            PlaceCategory::Restaurants => "restaurants",
        }
    }

    /// Search term sent to the places provider
    pub fn search_term(&self) -> &'static str {
        match self {
            PlaceCategory::Stores => "shopping",
            PlaceCategory::Activities => "active",
            PlaceCategory::Events => "events",
            PlaceCategory::Attractions => "attractions",
            PlaceCategory::Restaurants => "restaurants",
        }
    }
}

#[async_trait]
pub trait PlacesService: Send + Sync {
    async fn near_user(
        &self,
        principal: Principal,
        category: PlaceCategory,
        user_id: Uuid,
    ) -> AppResult<Vec<Place>>;
}

pub struct PlacesFinder<U: UnitOfWork> {
    uow: Arc<U>,
    geocoder: Arc<dyn Geocoder>,
    places: Arc<dyn PlacesLookup>,
}

impl<U: UnitOfWork> PlacesFinder<U> {
    pub fn new(uow: Arc<U>, geocoder: Arc<dyn Geocoder>, places: Arc<dyn PlacesLookup>) -> Self {
        Self {
            uow,
            geocoder,
            places,
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> PlacesService for PlacesFinder<U> {
    async fn near_user(
        &self,
        principal: Principal,
        category: PlaceCategory,
        user_id: Uuid,
    ) -> AppResult<Vec<Place>> {
        principal.require_self(user_id)?;

        let account = self
            .uow
            .accounts()
            .find_account(user_id)
            .await?
            .ok_or_not_found()?;
        let location = account
            .profile
            .location()
            .ok_or_else(|| AppError::bad_request("Managers have no location"))?;

        let origin = self
            .geocoder
            .geocode(location)
            .await?
            .ok_or_else(|| AppError::bad_request("Location could not be resolved"))?;

        let places = self.places.search(origin, category.search_term()).await?;
        tracing::debug!(user_id = %user_id, category = category.as_str(), found = places.len(), "Places looked up");
        Ok(places)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use crate::infra::clients::{MockGeocoder, MockPlacesLookup};
    use crate::services::test_support::TestUnitOfWork;

    #[test]
    fn test_category_from_path() {
        let parsed: PlaceCategory = serde_json::from_str("\"restaurants\"").unwrap();
        assert_eq!(parsed, PlaceCategory::Restaurants);
        assert_eq!(PlaceCategory::Stores.search_term(), "shopping");
        assert!(serde_json::from_str::<PlaceCategory>("\"casinos\"").is_err());
    }

    #[tokio::test]
    async fn test_only_own_surroundings() {
        let finder = PlacesFinder::new(
            Arc::new(TestUnitOfWork::default()),
            Arc::new(MockGeocoder::new()),
            Arc::new(MockPlacesLookup::new()),
        );
        let caller = Principal::new(Uuid::new_v4(), UserRole::Manager, true);

        assert!(matches!(
            finder
                .near_user(caller, PlaceCategory::Events, Uuid::new_v4())
                .await,
            Err(AppError::Forbidden)
        ));
    }
}
