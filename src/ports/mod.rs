//! Port traits. API boundaries for the hexagon.
//!
//! Outbound only: called by use cases into maps, AI, spreadsheet and clock adapters.
//! The HTTP adapter drives the use cases directly.

pub mod outbound;
pub mod spreadsheet;

pub use outbound::{AiPort, Geocoder, PlacesGateway, Sleeper};
pub use spreadsheet::SpreadsheetPort;
