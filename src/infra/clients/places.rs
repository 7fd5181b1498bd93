//! Points of interest near a location.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{ClientError, RetryPolicy};
use crate::config::PLACES_RESULT_LIMIT;
use crate::domain::GeoPoint;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Place {
    pub name: String,
    pub address: String,
    pub point: Option<GeoPoint>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PlacesLookup: Send + Sync {
    /// Places matching `term` around `near`, best match first.
    async fn search(&self, near: GeoPoint, term: &str) -> Result<Vec<Place>, ClientError>;
}

pub struct UnconfiguredPlaces;

#[async_trait]
impl PlacesLookup for UnconfiguredPlaces {
    async fn search(&self, _near: GeoPoint, _term: &str) -> Result<Vec<Place>, ClientError> {
        Err(ClientError::NotConfigured("places"))
    }
}

/// Yelp Fusion style business search.
pub struct YelpPlaces {
    client: reqwest::Client,
    url: String,
    api_key: String,
    retry: RetryPolicy,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    businesses: Vec<Business>,
}

#[derive(Debug, Deserialize)]
struct Business {
    name: String,
    #[serde(default)]
    location: BusinessLocation,
    coordinates: Option<Coordinates>,
}

#[derive(Debug, Default, Deserialize)]
struct BusinessLocation {
    #[serde(default)]
    display_address: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Coordinates {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl From<Business> for Place {
    fn from(business: Business) -> Self {
        let point = business
            .coordinates
            .and_then(|c| GeoPoint::new(c.latitude?, c.longitude?));
        Place {
            name: business.name,
            address: business.location.display_address.join(", "),
            point,
        }
    }
}

impl YelpPlaces {
    pub fn new(
        client: reqwest::Client,
        url: impl Into<String>,
        api_key: impl Into<String>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            client,
            url: url.into(),
            api_key: api_key.into(),
            retry,
        }
    }

    async fn fetch(&self, near: GeoPoint, term: &str) -> Result<SearchResponse, ClientError> {
        let response = self
            .client
            .get(&self.url)
            .bearer_auth(&self.api_key)
            .query(&[
                ("term", term.to_string()),
                ("latitude", near.lat.to_string()),
                ("longitude", near.lng.to_string()),
                ("limit", PLACES_RESULT_LIMIT.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::HttpStatus(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl PlacesLookup for YelpPlaces {
    async fn search(&self, near: GeoPoint, term: &str) -> Result<Vec<Place>, ClientError> {
        let body = self.retry.run("places", || self.fetch(near, term)).await?;
        Ok(body.businesses.into_iter().map(Place::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_into_place() {
        let body: SearchResponse = serde_json::from_value(serde_json::json!({
            "businesses": [{
                "name": "Rose Shop",
                "location": {"display_address": ["1 Flower Rd", "Salt Lake City, UT"]},
                "coordinates": {"latitude": 40.7, "longitude": -111.9}
            }]
        }))
        .unwrap();

        let place = Place::from(body.businesses.into_iter().next().unwrap());
        assert_eq!(place.address, "1 Flower Rd, Salt Lake City, UT");
        assert_eq!(place.point, GeoPoint::new(40.7, -111.9));
    }
}
