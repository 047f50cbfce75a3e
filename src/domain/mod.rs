//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod entities;
pub mod errors;
pub mod export;
pub mod geo;
pub mod templates;

pub use entities::{
    ContentTier, Coordinate, GeneratedContent, Lead, LeadFilter, LeadSort, NearbyPage,
    OutreachDraft, PlaceDetail, RawPlace, SearchQuery,
};
pub use errors::DomainError;
pub use geo::haversine_km;
