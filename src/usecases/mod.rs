//! Application use cases. Orchestrate domain logic via ports.

pub mod content_generator;
pub mod export_service;
pub mod lead_service;
pub mod pagination;

pub use content_generator::ContentGenerator;
pub use export_service::ExportService;
pub use lead_service::{LeadService, SearchSettings};
pub use pagination::NearbyPager;
