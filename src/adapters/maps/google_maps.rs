//! Google Maps Platform adapter: Geocoding, Places Nearby Search and Place Details.
//!
//! All three endpoints answer HTTP 200 with a `status` field; anything other than
//! `OK` (or `ZERO_RESULTS` where it is meaningful) is mapped to a DomainError.

use crate::domain::{Coordinate, DomainError, NearbyPage, PlaceDetail, RawPlace};
use crate::ports::{Geocoder, PlacesGateway};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Fields requested from Place Details.
const DETAIL_FIELDS: &str = "name,formatted_phone_number,website,types,vicinity";

const STATUS_OK: &str = "OK";
const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

pub struct GoogleMapsAdapter {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GoogleMapsAdapter {
    /// # Arguments
    /// * `base_url` - e.g. "https://maps.googleapis.com/maps/api"
    pub fn new(client: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, DomainError> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| DomainError::Maps(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, path, "Maps API returned error");
            return Err(DomainError::Maps(format!(
                "API error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| DomainError::Maps(format!("Failed to parse {} response: {}", path, e)))
    }
}

#[derive(Deserialize)]
struct Geometry {
    location: Coordinate,
}

#[derive(Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Deserialize)]
struct NearbyResponse {
    status: String,
    #[serde(default)]
    results: Vec<NearbyResult>,
    next_page_token: Option<String>,
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct NearbyResult {
    place_id: Option<String>,
    #[serde(default)]
    name: String,
    vicinity: Option<String>,
    geometry: Geometry,
}

#[derive(Deserialize)]
struct DetailsResponse {
    status: String,
    result: Option<DetailsResult>,
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct DetailsResult {
    #[serde(default)]
    name: String,
    formatted_phone_number: Option<String>,
    website: Option<String>,
    #[serde(default)]
    types: Vec<String>,
    vicinity: Option<String>,
}

fn status_error(status: &str, message: Option<String>) -> DomainError {
    match message {
        Some(m) => DomainError::Maps(format!("{}: {}", status, m)),
        None => DomainError::Maps(status.to_string()),
    }
}

#[async_trait::async_trait]
impl Geocoder for GoogleMapsAdapter {
    async fn geocode(&self, country: &str, postal_code: &str) -> Result<Coordinate, DomainError> {
        let address = format!("{}, {}", postal_code, country);
        let body: GeocodeResponse = self
            .get_json("geocode/json", &[("address", address.as_str())])
            .await?;

        if body.status != STATUS_OK && body.status != STATUS_ZERO_RESULTS {
            return Err(status_error(&body.status, body.error_message));
        }

        body.results
            .into_iter()
            .next()
            .map(|r| r.geometry.location)
            .ok_or_else(|| DomainError::Geocode("No results found.".to_string()))
    }
}

#[async_trait::async_trait]
impl PlacesGateway for GoogleMapsAdapter {
    async fn nearby_search(
        &self,
        origin: Coordinate,
        radius_meters: u32,
        page_token: Option<&str>,
    ) -> Result<NearbyPage, DomainError> {
        let location = format!("{},{}", origin.lat, origin.lng);
        let radius = radius_meters.to_string();
        let mut query = vec![("location", location.as_str()), ("radius", radius.as_str())];
        if let Some(token) = page_token {
            query.push(("pagetoken", token));
        }

        let body: NearbyResponse = self.get_json("place/nearbysearch/json", &query).await?;
        if body.status != STATUS_OK && body.status != STATUS_ZERO_RESULTS {
            return Err(status_error(&body.status, body.error_message));
        }

        let places: Vec<RawPlace> = body
            .results
            .into_iter()
            .filter_map(|r| {
                Some(RawPlace {
                    place_id: r.place_id?,
                    name: r.name,
                    vicinity: r.vicinity,
                    location: r.geometry.location,
                })
            })
            .collect();

        debug!(
            results = places.len(),
            has_next = body.next_page_token.is_some(),
            "nearby search response"
        );
        Ok(NearbyPage {
            places,
            next_page_token: body.next_page_token,
        })
    }

    async fn place_details(&self, place_id: &str) -> Result<PlaceDetail, DomainError> {
        let body: DetailsResponse = self
            .get_json(
                "place/details/json",
                &[("place_id", place_id), ("fields", DETAIL_FIELDS)],
            )
            .await?;

        if body.status != STATUS_OK {
            return Err(status_error(&body.status, body.error_message));
        }
        let result = body
            .result
            .ok_or_else(|| DomainError::Maps(format!("No details returned for {}", place_id)))?;

        Ok(PlaceDetail {
            name: result.name,
            formatted_phone_number: result.formatted_phone_number,
            website: result.website,
            types: result.types,
            vicinity: result.vicinity,
        })
    }
}
