//! Domain entities. Pure data structures for the core business.
//!
//! No Google/OpenAI wire types here; adapters map into these.

use super::errors::DomainError;
use super::geo::haversine_km;
use serde::{Deserialize, Serialize};

/// Default search radius in kilometers.
pub const DEFAULT_RADIUS_KM: f64 = 40.0;
/// Accepted radius range in kilometers.
pub const RADIUS_RANGE_KM: std::ops::RangeInclusive<f64> = 1.0..=100.0;

/// Shown until the client asks for on-demand content generation.
pub const DESCRIPTION_PLACEHOLDER: &str =
    "Click \"Summarize\" to generate a detailed AI description.";
/// Phone shown when the place has none on record.
pub const PHONE_UNAVAILABLE: &str = "N/A";
/// Category used when the place reports no types.
pub const DEFAULT_CATEGORY: &str = "business";

/// A search request: where to look and how to shape the result list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(rename = "radius", default = "default_radius")]
    pub radius_km: f64,
    /// Bulk variant: generate outreach content inline for every lead.
    #[serde(default)]
    pub include_content: bool,
    #[serde(default)]
    pub filter: LeadFilter,
    #[serde(default)]
    pub sort: LeadSort,
}

fn default_radius() -> f64 {
    DEFAULT_RADIUS_KM
}

impl SearchQuery {
    pub fn new(country: impl Into<String>, postal_code: impl Into<String>, radius_km: f64) -> Self {
        Self {
            country: country.into(),
            postal_code: postal_code.into(),
            radius_km,
            include_content: false,
            filter: LeadFilter::All,
            sort: LeadSort::Default,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.postal_code.trim().is_empty() {
            return Err(DomainError::InvalidInput("postal code is required".into()));
        }
        if self.country.trim().is_empty() {
            return Err(DomainError::InvalidInput("country is required".into()));
        }
        if !RADIUS_RANGE_KM.contains(&self.radius_km) {
            return Err(DomainError::InvalidInput(format!(
                "radius must be between {} and {} km, got {}",
                RADIUS_RANGE_KM.start(),
                RADIUS_RANGE_KM.end(),
                self.radius_km
            )));
        }
        Ok(())
    }

    pub fn radius_meters(&self) -> u32 {
        (self.radius_km * 1000.0).round() as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

/// A nearby-search hit. Ephemeral: discarded once the lead is built.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPlace {
    pub place_id: String,
    pub name: String,
    pub vicinity: Option<String>,
    pub location: Coordinate,
}

/// One page of nearby-search results.
#[derive(Debug, Clone, Default)]
pub struct NearbyPage {
    pub places: Vec<RawPlace>,
    pub next_page_token: Option<String>,
}

/// Structured fields of a single place, fetched once per place id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceDetail {
    pub name: String,
    pub formatted_phone_number: Option<String>,
    pub website: Option<String>,
    pub types: Vec<String>,
    pub vicinity: Option<String>,
}

impl PlaceDetail {
    /// Website, with an empty string treated as absent.
    pub fn website(&self) -> Option<&str> {
        self.website.as_deref().filter(|w| !w.is_empty())
    }

    pub fn has_website(&self) -> bool {
        self.website().is_some()
    }

    /// First reported type, or `business`.
    pub fn category(&self) -> &str {
        self.types
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_CATEGORY)
    }

    /// Category as prose: `car_repair` becomes `car repair`.
    pub fn category_label(&self) -> String {
        self.category().replace('_', " ")
    }

    pub fn vicinity_or_empty(&self) -> &str {
        self.vicinity.as_deref().unwrap_or_default()
    }
}

/// A business record enriched with outreach content and derived geodata.
///
/// Lives in the client's memory between calls; never stored server-side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub website: Option<String>,
    pub address: String,
    pub category: String,
    pub has_website: bool,
    pub email: String,
    pub antigravity_prompt: String,
    pub description: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(rename = "distanceKm", alias = "distance")]
    pub distance_km: f64,
    /// Set when the detail fetch for this place failed and the lead was built from the search hit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Lead {
    /// Merge a search hit with its detail record.
    pub fn enrich(raw: &RawPlace, detail: &PlaceDetail, origin: Coordinate) -> Self {
        let website = detail.website().map(str::to_string);
        let name = if detail.name.trim().is_empty() {
            raw.name.clone()
        } else {
            detail.name.clone()
        };
        Self {
            id: raw.place_id.clone(),
            name,
            phone: detail
                .formatted_phone_number
                .clone()
                .unwrap_or_else(|| PHONE_UNAVAILABLE.to_string()),
            has_website: website.is_some(),
            website,
            address: detail
                .vicinity
                .clone()
                .or_else(|| raw.vicinity.clone())
                .unwrap_or_default(),
            category: detail.category().to_string(),
            email: String::new(),
            antigravity_prompt: String::new(),
            description: DESCRIPTION_PLACEHOLDER.to_string(),
            lat: raw.location.lat,
            lng: raw.location.lng,
            distance_km: haversine_km(origin, raw.location),
            error: None,
        }
    }

    /// Build a lead from the search hit alone, recording why details are missing.
    pub fn from_raw(raw: &RawPlace, origin: Coordinate, error: String) -> Self {
        let detail = PlaceDetail {
            name: raw.name.clone(),
            vicinity: raw.vicinity.clone(),
            ..PlaceDetail::default()
        };
        Self {
            error: Some(error),
            ..Self::enrich(raw, &detail, origin)
        }
    }

    /// The detail record as far as it can be recovered from this lead.
    pub fn as_detail(&self) -> PlaceDetail {
        PlaceDetail {
            name: self.name.clone(),
            formatted_phone_number: Some(self.phone.clone()),
            website: self.website.clone(),
            types: vec![self.category.clone()],
            vicinity: Some(self.address.clone()),
        }
    }

    pub fn apply_content(&mut self, content: &GeneratedContent) {
        self.email = content.email.clone();
        self.antigravity_prompt = content.antigravity_prompt.clone();
        self.description = content.description.clone();
    }
}

/// Which content tier produced a piece of outreach copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentTier {
    Primary,
    Secondary,
    Static,
}

impl ContentTier {
    /// Tier for the provider at `index` in the fallback chain.
    pub fn for_position(index: usize) -> Self {
        if index == 0 {
            ContentTier::Primary
        } else {
            ContentTier::Secondary
        }
    }
}

/// Raw output of one content provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutreachDraft {
    pub email: String,
    pub antigravity_prompt: String,
    pub description: String,
}

/// Outreach copy for a single business, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    pub email: String,
    pub antigravity_prompt: String,
    pub description: String,
    pub has_website: bool,
    pub tier: ContentTier,
    pub provider: String,
}

impl GeneratedContent {
    pub fn from_draft(
        draft: OutreachDraft,
        detail: &PlaceDetail,
        tier: ContentTier,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            email: draft.email,
            antigravity_prompt: draft.antigravity_prompt,
            description: draft.description,
            has_website: detail.has_website(),
            tier,
            provider: provider.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LeadFilter {
    #[default]
    All,
    HasWebsite,
    NoWebsite,
}

impl LeadFilter {
    pub fn matches(self, lead: &Lead) -> bool {
        match self {
            LeadFilter::All => true,
            LeadFilter::HasWebsite => lead.has_website,
            LeadFilter::NoWebsite => !lead.has_website,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadSort {
    /// Keep the upstream ranking.
    #[default]
    Default,
    Distance,
}

impl LeadSort {
    pub fn apply(self, leads: &mut [Lead]) {
        if self == LeadSort::Distance {
            leads.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str) -> RawPlace {
        RawPlace {
            place_id: id.to_string(),
            name: "Raw Name".to_string(),
            vicinity: Some("1 Raw St".to_string()),
            location: Coordinate {
                lat: 34.07,
                lng: -118.40,
            },
        }
    }

    const ORIGIN: Coordinate = Coordinate {
        lat: 34.0901,
        lng: -118.4065,
    };

    #[test]
    fn test_query_defaults_from_json() {
        let query: SearchQuery =
            serde_json::from_str(r#"{"country":"United States","postalCode":"90210"}"#).unwrap();
        assert_eq!(query.radius_km, DEFAULT_RADIUS_KM);
        assert_eq!(query.filter, LeadFilter::All);
        assert_eq!(query.sort, LeadSort::Default);
        assert!(!query.include_content);
        assert_eq!(query.radius_meters(), 40_000);
    }

    #[test]
    fn test_query_validation() {
        assert!(SearchQuery::new("United States", "90210", 40.0).validate().is_ok());
        assert!(matches!(
            SearchQuery::new("United States", " ", 40.0).validate(),
            Err(DomainError::InvalidInput(_))
        ));
        assert!(SearchQuery::new("United States", "90210", 0.5).validate().is_err());
        assert!(SearchQuery::new("United States", "90210", 101.0).validate().is_err());
    }

    #[test]
    fn test_enrich_prefers_detail_fields() {
        let detail = PlaceDetail {
            name: "Detail Name".to_string(),
            formatted_phone_number: Some("(310) 555-0100".to_string()),
            website: Some("https://example.com".to_string()),
            types: vec!["car_repair".to_string(), "point_of_interest".to_string()],
            vicinity: Some("9 Detail Ave".to_string()),
        };
        let lead = Lead::enrich(&raw("p1"), &detail, ORIGIN);
        assert_eq!(lead.id, "p1");
        assert_eq!(lead.name, "Detail Name");
        assert_eq!(lead.phone, "(310) 555-0100");
        assert_eq!(lead.address, "9 Detail Ave");
        assert_eq!(lead.category, "car_repair");
        assert!(lead.has_website);
        assert_eq!(lead.website.as_deref(), Some("https://example.com"));
        assert_eq!(lead.description, DESCRIPTION_PLACEHOLDER);
        assert!(lead.distance_km >= 0.0);
    }

    #[test]
    fn test_enrich_empty_website_is_absent() {
        let detail = PlaceDetail {
            website: Some(String::new()),
            ..PlaceDetail::default()
        };
        let lead = Lead::enrich(&raw("p1"), &detail, ORIGIN);
        assert!(!lead.has_website);
        assert_eq!(lead.website, None);
        assert_eq!(lead.name, "Raw Name");
        assert_eq!(lead.phone, PHONE_UNAVAILABLE);
        assert_eq!(lead.category, DEFAULT_CATEGORY);
        assert_eq!(lead.address, "1 Raw St");
    }

    #[test]
    fn test_whitespace_website_is_kept() {
        let detail = PlaceDetail {
            website: Some(" ".to_string()),
            ..PlaceDetail::default()
        };
        assert!(detail.has_website());
        let lead = Lead::enrich(&raw("p1"), &detail, ORIGIN);
        assert!(lead.has_website);
        assert_eq!(lead.website.as_deref(), Some(" "));
    }

    #[test]
    fn test_from_raw_carries_error() {
        let lead = Lead::from_raw(&raw("p2"), ORIGIN, "timeout".to_string());
        assert_eq!(lead.error.as_deref(), Some("timeout"));
        assert!(!lead.has_website);
        assert_eq!(lead.name, "Raw Name");
    }

    #[test]
    fn test_lead_serializes_camel_case() {
        let lead = Lead::enrich(&raw("p1"), &PlaceDetail::default(), ORIGIN);
        let json = serde_json::to_value(&lead).unwrap();
        assert!(json.get("hasWebsite").is_some());
        assert!(json.get("antigravityPrompt").is_some());
        assert!(json.get("distanceKm").is_some());
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_lead_accepts_partial_client_payload() {
        let lead: Lead = serde_json::from_str(
            r#"{"id":"x","name":"Ace","website":null,"hasWebsite":false,"distance":3.5}"#,
        )
        .unwrap();
        assert_eq!(lead.distance_km, 3.5);
        assert_eq!(lead.email, "");
    }

    #[test]
    fn test_filter_and_sort() {
        let mut far = Lead::enrich(&raw("far"), &PlaceDetail::default(), ORIGIN);
        far.distance_km = 12.0;
        let mut near = Lead::enrich(&raw("near"), &PlaceDetail::default(), ORIGIN);
        near.distance_km = 1.5;
        near.has_website = true;

        assert!(LeadFilter::HasWebsite.matches(&near));
        assert!(!LeadFilter::HasWebsite.matches(&far));
        assert!(LeadFilter::NoWebsite.matches(&far));
        assert!(LeadFilter::All.matches(&far));

        let mut leads = vec![far.clone(), near.clone()];
        LeadSort::Default.apply(&mut leads);
        assert_eq!(leads[0].id, "far");
        LeadSort::Distance.apply(&mut leads);
        assert_eq!(leads[0].id, "near");
    }
}
