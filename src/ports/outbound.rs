//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{Coordinate, DomainError, NearbyPage, OutreachDraft, PlaceDetail};
use std::time::Duration;

/// Resolves a postal code to a coordinate.
#[async_trait::async_trait]
pub trait Geocoder: Send + Sync {
    /// Location of the first geocoding result.
    ///
    /// Returns `DomainError::Geocode` when the service finds nothing.
    async fn geocode(&self, country: &str, postal_code: &str) -> Result<Coordinate, DomainError>;
}

/// Nearby search and place details.
#[async_trait::async_trait]
pub trait PlacesGateway: Send + Sync {
    /// Fetch one page of places around `origin`.
    ///
    /// - `page_token`: None for the first page; the previous page's `next_page_token` after that
    async fn nearby_search(
        &self,
        origin: Coordinate,
        radius_meters: u32,
        page_token: Option<&str>,
    ) -> Result<NearbyPage, DomainError>;

    /// Fetch name, phone, website, types and vicinity for one place.
    async fn place_details(&self, place_id: &str) -> Result<PlaceDetail, DomainError>;
}

/// A generative-AI provider that drafts outreach copy for one business.
#[async_trait::async_trait]
pub trait AiPort: Send + Sync {
    /// Short provider label for logs and responses (e.g. "gemini").
    fn provider(&self) -> &'static str;

    /// Draft email, builder prompt and description.
    ///
    /// Any failure (network, provider error, unparseable JSON) is an `Err`;
    /// the content generator moves on to the next provider.
    async fn draft_outreach(&self, detail: &PlaceDetail) -> Result<OutreachDraft, DomainError>;
}

/// Async sleep, injectable so pagination waits can be observed in tests.
#[async_trait::async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}
