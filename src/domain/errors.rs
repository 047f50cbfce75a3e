//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    /// Zero geocode results. Aborts the search: there is no origin to search around.
    #[error("Geocoding failed: {0}")]
    Geocode(String),

    #[error("Maps API error: {0}")]
    Maps(String),

    #[error("AI generation failed: {0}")]
    Ai(String),

    #[error("Export failed: {0}")]
    Export(String),

    /// Absent API key or credentials. Raised before any upstream call.
    #[error("{0} is missing.")]
    ConfigurationMissing(String),

    #[error("Invalid request: {0}")]
    InvalidInput(String),

    #[error("Request cancelled")]
    Cancelled,
}

impl DomainError {
    /// True when the error came from a third-party API rather than from the caller or config.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            DomainError::Maps(_) | DomainError::Ai(_) | DomainError::Export(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_missing_message() {
        let err = DomainError::ConfigurationMissing("Maps API Key".to_string());
        assert_eq!(err.to_string(), "Maps API Key is missing.");
    }

    #[test]
    fn test_upstream_classification() {
        assert!(DomainError::Maps("boom".into()).is_upstream());
        assert!(DomainError::Export("boom".into()).is_upstream());
        assert!(!DomainError::Geocode("none".into()).is_upstream());
        assert!(!DomainError::Cancelled.is_upstream());
    }
}
