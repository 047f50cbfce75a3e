//! Infrastructure adapters. Implement outbound ports and serve the HTTP API.
//!
//! Google Maps, AI providers, Google Sheets, clock. Map errors to DomainError.

pub mod ai;
pub mod clock;
pub mod http;
pub mod integrations;
pub mod maps;
