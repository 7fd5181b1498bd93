//! Free-text location to coordinates.

use async_trait::async_trait;
use serde::Deserialize;

use super::{ClientError, RetryPolicy};
use crate::domain::GeoPoint;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// `None` when the location cannot be resolved.
    async fn geocode(&self, location: &str) -> Result<Option<GeoPoint>, ClientError>;
}

/// Accepts only locations already written as `lat,lng`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CoordinateGeocoder;

#[async_trait]
impl Geocoder for CoordinateGeocoder {
    async fn geocode(&self, location: &str) -> Result<Option<GeoPoint>, ClientError> {
        Ok(GeoPoint::parse(location))
    }
}

/// Nominatim-style search endpoint (`?q=...&format=json&limit=1`).
pub struct HttpGeocoder {
    client: reqwest::Client,
    url: String,
    retry: RetryPolicy,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

impl HttpGeocoder {
    pub fn new(client: reqwest::Client, url: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            client,
            url: url.into(),
            retry,
        }
    }

    async fn search(&self, location: &str) -> Result<Vec<SearchHit>, ClientError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("q", location), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::HttpStatus(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl Geocoder for HttpGeocoder {
    async fn geocode(&self, location: &str) -> Result<Option<GeoPoint>, ClientError> {
        if let Some(point) = GeoPoint::parse(location) {
            return Ok(Some(point));
        }
        if location.trim().is_empty() {
            return Ok(None);
        }

        let hits = self.retry.run("geocoder", || self.search(location)).await?;
        Ok(hits.into_iter().find_map(|hit| {
            let lat = hit.lat.parse().ok()?;
            let lng = hit.lon.parse().ok()?;
            GeoPoint::new(lat, lng)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_coordinate_geocoder() {
        let geocoder = CoordinateGeocoder;
        let point = geocoder.geocode("40.76,-111.89").await.unwrap().unwrap();
        assert_eq!(point.lat, 40.76);
        assert!(geocoder.geocode("123 Main St").await.unwrap().is_none());
    }
}
