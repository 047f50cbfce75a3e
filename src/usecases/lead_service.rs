//! Lead enrichment pipeline: geocode -> nearby search -> details -> distance (-> content).
//!
//! - Geocoder and Place Search failures abort the request
//! - A failed detail fetch only marks that lead (`Lead::error`); the batch continues
//! - Batches run one after another; places within a batch run concurrently

use crate::domain::{Coordinate, DomainError, GeneratedContent, Lead, RawPlace, SearchQuery};
use crate::ports::{Geocoder, PlacesGateway, Sleeper};
use crate::shared::config::{
    DEFAULT_ENRICH_BATCH_SIZE, DEFAULT_MAX_RESULTS, DEFAULT_PAGE_TOKEN_DELAY_MS,
};
use crate::usecases::content_generator::ContentGenerator;
use crate::usecases::pagination::NearbyPager;
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Pipeline tunables.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub max_results: usize,
    pub batch_size: usize,
    pub page_token_delay: Duration,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            batch_size: DEFAULT_ENRICH_BATCH_SIZE,
            page_token_delay: Duration::from_millis(DEFAULT_PAGE_TOKEN_DELAY_MS),
        }
    }
}

pub struct LeadService {
    geocoder: Arc<dyn Geocoder>,
    places: Arc<dyn PlacesGateway>,
    content: Arc<ContentGenerator>,
    sleeper: Arc<dyn Sleeper>,
    settings: SearchSettings,
}

impl LeadService {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        places: Arc<dyn PlacesGateway>,
        content: Arc<ContentGenerator>,
        sleeper: Arc<dyn Sleeper>,
        settings: SearchSettings,
    ) -> Self {
        Self {
            geocoder,
            places,
            content,
            sleeper,
            settings,
        }
    }

    /// Run a search and return enriched leads, filtered and sorted per the query.
    pub async fn search(
        &self,
        query: &SearchQuery,
        cancel: &CancellationToken,
    ) -> Result<Vec<Lead>, DomainError> {
        query.validate()?;
        if cancel.is_cancelled() {
            return Err(DomainError::Cancelled);
        }

        let origin = self
            .geocoder
            .geocode(&query.country, &query.postal_code)
            .await?;
        info!(
            country = %query.country,
            postal_code = %query.postal_code,
            lat = origin.lat,
            lng = origin.lng,
            "geocoded search origin"
        );

        let pager = NearbyPager::new(
            self.places.as_ref(),
            self.sleeper.as_ref(),
            origin,
            query.radius_meters(),
            self.settings.page_token_delay,
        );
        let mut raw = pager.collect(self.settings.max_results, cancel).await?;
        dedupe_by_place_id(&mut raw);
        info!(candidates = raw.len(), radius_km = query.radius_km, "nearby search complete");

        let mut leads = Vec::with_capacity(raw.len());
        for batch in raw.chunks(self.settings.batch_size.max(1)) {
            let enriched = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(DomainError::Cancelled),
                enriched = join_all(
                    batch
                        .iter()
                        .map(|place| self.enrich_one(place, origin, query.include_content)),
                ) => enriched,
            };
            leads.extend(enriched);
        }

        let failed = leads.iter().filter(|l| l.error.is_some()).count();
        if failed > 0 {
            warn!(failed, total = leads.len(), "some place details could not be fetched");
        }

        leads.retain(|lead| query.filter.matches(lead));
        query.sort.apply(&mut leads);
        info!(leads = leads.len(), "search complete");
        Ok(leads)
    }

    /// On-demand content for a single place.
    pub async fn summarize(&self, place_id: &str) -> Result<GeneratedContent, DomainError> {
        if place_id.trim().is_empty() {
            return Err(DomainError::InvalidInput("Place ID is required.".into()));
        }
        let detail = self.places.place_details(place_id).await?;
        Ok(self.content.generate(&detail).await)
    }

    pub fn content(&self) -> &ContentGenerator {
        &self.content
    }

    async fn enrich_one(&self, raw: &RawPlace, origin: Coordinate, include_content: bool) -> Lead {
        let (mut lead, detail) = match self.places.place_details(&raw.place_id).await {
            Ok(detail) => (Lead::enrich(raw, &detail, origin), detail),
            Err(e) => {
                warn!(place_id = %raw.place_id, error = %e, "place details failed");
                let lead = Lead::from_raw(raw, origin, e.to_string());
                let detail = lead.as_detail();
                (lead, detail)
            }
        };
        if include_content {
            let content = self.content.generate(&detail).await;
            lead.apply_content(&content);
        }
        lead
    }
}

/// Keep the first occurrence of each place id.
fn dedupe_by_place_id(places: &mut Vec<RawPlace>) {
    let mut seen = HashSet::with_capacity(places.len());
    places.retain(|p| seen.insert(p.place_id.clone()));
}
