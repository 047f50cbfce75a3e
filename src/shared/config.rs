//! Application configuration. API credentials, upstream endpoints, pipeline tunables.

use serde::Deserialize;
use std::time::Duration;

/// Upstream wait before a `next_page_token` becomes valid.
pub const DEFAULT_PAGE_TOKEN_DELAY_MS: u64 = 2000;
/// Maximum number of raw places collected per search.
pub const DEFAULT_MAX_RESULTS: usize = 100;
/// Places enriched concurrently per batch.
pub const DEFAULT_ENRICH_BATCH_SIZE: usize = 10;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Listen address. Read from LEAD_SCOUT_BIND_ADDR.
    #[serde(default)]
    pub bind_addr: Option<String>,

    /// Timeout in seconds for every upstream HTTP call. Read from LEAD_SCOUT_HTTP_TIMEOUT_SECS.
    #[serde(default)]
    pub http_timeout_secs: Option<u64>,

    #[serde(default)]
    pub page_token_delay_ms: Option<u64>,

    #[serde(default)]
    pub max_results: Option<usize>,

    #[serde(default)]
    pub enrich_batch_size: Option<usize>,

    // ─────────────────────────────────────────────────────────────────────────
    // Google Maps
    // ─────────────────────────────────────────────────────────────────────────
    /// Maps API key. Read from MAPS_API_KEY.
    #[serde(default)]
    pub maps_api_key: Option<String>,

    /// Maps API base URL. Defaults to https://maps.googleapis.com/maps/api.
    #[serde(default)]
    pub maps_base_url: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // AI providers (primary: Gemini, secondary: OpenAI)
    // ─────────────────────────────────────────────────────────────────────────
    /// Read from GEMINI_API_KEY.
    #[serde(default)]
    pub gemini_api_key: Option<String>,

    #[serde(default)]
    pub gemini_base_url: Option<String>,

    /// Defaults to "gemini-1.5-flash".
    #[serde(default)]
    pub gemini_model: Option<String>,

    /// Read from OPENAI_API_KEY.
    #[serde(default)]
    pub openai_api_key: Option<String>,

    /// Chat completions endpoint. Defaults to OpenAI.
    #[serde(default)]
    pub openai_api_url: Option<String>,

    /// Defaults to "gpt-4o".
    #[serde(default)]
    pub openai_model: Option<String>,

    /// Append the mock provider after the real providers (local development without API costs).
    #[serde(default)]
    pub ai_mock: Option<bool>,

    // ─────────────────────────────────────────────────────────────────────────
    // Google Sheets export
    // ─────────────────────────────────────────────────────────────────────────
    /// Target spreadsheet ID. Read from GOOGLE_SHEETS_ID.
    #[serde(default)]
    pub google_sheets_id: Option<String>,

    /// Service-account key JSON (inline). Read from GOOGLE_SERVICE_ACCOUNT_KEY.
    #[serde(default)]
    pub google_service_account_key: Option<String>,

    /// Pre-issued OAuth access token; used instead of the service account when set.
    /// Read from GOOGLE_SHEETS_ACCESS_TOKEN.
    #[serde(default)]
    pub google_sheets_access_token: Option<String>,

    /// Defaults to "Sheet1!A1".
    #[serde(default)]
    pub sheets_range: Option<String>,

    #[serde(default)]
    pub sheets_base_url: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("LEAD_SCOUT"));
        if let Ok(path) = std::env::var("LEAD_SCOUT_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c.build()?.try_deserialize()
    }

    pub fn bind_addr_or_default(&self) -> String {
        self.bind_addr
            .clone()
            .unwrap_or_else(|| "0.0.0.0:3000".to_string())
    }

    /// Returns the upstream HTTP timeout. Defaults to 30 seconds.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs.unwrap_or(30))
    }

    pub fn page_token_delay(&self) -> Duration {
        Duration::from_millis(
            self.page_token_delay_ms
                .unwrap_or(DEFAULT_PAGE_TOKEN_DELAY_MS),
        )
    }

    pub fn max_results_or_default(&self) -> usize {
        self.max_results.unwrap_or(DEFAULT_MAX_RESULTS).max(1)
    }

    pub fn enrich_batch_size_or_default(&self) -> usize {
        self.enrich_batch_size
            .unwrap_or(DEFAULT_ENRICH_BATCH_SIZE)
            .max(1)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Maps Helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the Maps API key from config or MAPS_API_KEY env, ignoring placeholders.
    pub fn maps_api_key(&self) -> Option<String> {
        key_from(&self.maps_api_key, "MAPS_API_KEY")
    }

    pub fn maps_base_url_or_default(&self) -> String {
        self.maps_base_url
            .clone()
            .unwrap_or_else(|| "https://maps.googleapis.com/maps/api".to_string())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // AI Helpers
    // ─────────────────────────────────────────────────────────────────────────

    pub fn gemini_api_key(&self) -> Option<String> {
        key_from(&self.gemini_api_key, "GEMINI_API_KEY")
    }

    pub fn gemini_base_url_or_default(&self) -> String {
        self.gemini_base_url
            .clone()
            .unwrap_or_else(|| "https://generativelanguage.googleapis.com".to_string())
    }

    pub fn gemini_model_or_default(&self) -> String {
        self.gemini_model
            .clone()
            .unwrap_or_else(|| "gemini-1.5-flash".to_string())
    }

    pub fn openai_api_key(&self) -> Option<String> {
        key_from(&self.openai_api_key, "OPENAI_API_KEY")
    }

    pub fn openai_api_url_or_default(&self) -> String {
        self.openai_api_url
            .clone()
            .unwrap_or_else(|| "https://api.openai.com/v1/chat/completions".to_string())
    }

    pub fn openai_model_or_default(&self) -> String {
        self.openai_model
            .clone()
            .unwrap_or_else(|| "gpt-4o".to_string())
    }

    pub fn is_ai_mock_enabled(&self) -> bool {
        self.ai_mock.unwrap_or(false)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Sheets Helpers
    // ─────────────────────────────────────────────────────────────────────────

    pub fn google_sheets_id(&self) -> Option<String> {
        key_from(&self.google_sheets_id, "GOOGLE_SHEETS_ID")
    }

    pub fn google_service_account_key(&self) -> Option<String> {
        key_from(
            &self.google_service_account_key,
            "GOOGLE_SERVICE_ACCOUNT_KEY",
        )
    }

    pub fn google_sheets_access_token(&self) -> Option<String> {
        key_from(
            &self.google_sheets_access_token,
            "GOOGLE_SHEETS_ACCESS_TOKEN",
        )
    }

    pub fn sheets_range_or_default(&self) -> String {
        self.sheets_range
            .clone()
            .unwrap_or_else(|| "Sheet1!A1".to_string())
    }

    pub fn sheets_base_url_or_default(&self) -> String {
        self.sheets_base_url
            .clone()
            .unwrap_or_else(|| "https://sheets.googleapis.com".to_string())
    }

    /// Returns true if a sheet ID and some form of credentials are present.
    pub fn is_sheets_configured(&self) -> bool {
        self.google_sheets_id().is_some()
            && (self.google_sheets_access_token().is_some()
                || self.google_service_account_key().is_some())
    }
}

/// Config value, else the conventional env var; placeholders count as unset.
fn key_from(configured: &Option<String>, env_var: &str) -> Option<String> {
    configured
        .clone()
        .or_else(|| std::env::var(env_var).ok())
        .filter(|v| is_real_key(v))
}

/// Rejects empty values and the placeholders shipped in sample `.env` files.
pub fn is_real_key(value: &str) -> bool {
    let v = value.trim();
    !v.is_empty() && !v.contains("your_") && v != "dummy_key_for_build"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_keys_rejected() {
        assert!(!is_real_key(""));
        assert!(!is_real_key("your_gemini_api_key_here"));
        assert!(!is_real_key("dummy_key_for_build"));
        assert!(is_real_key("AIzaSyExample"));
    }

    #[test]
    fn test_configured_value_wins() {
        let cfg = AppConfig {
            maps_api_key: Some("configured-key".to_string()),
            ..AppConfig::default()
        };
        assert_eq!(cfg.maps_api_key().as_deref(), Some("configured-key"));
    }

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.page_token_delay(), Duration::from_millis(2000));
        assert_eq!(cfg.max_results_or_default(), 100);
        assert_eq!(cfg.enrich_batch_size_or_default(), 10);
        assert_eq!(cfg.gemini_model_or_default(), "gemini-1.5-flash");
        assert_eq!(cfg.openai_model_or_default(), "gpt-4o");
        assert_eq!(cfg.sheets_range_or_default(), "Sheet1!A1");
    }

    #[test]
    fn test_zero_batch_size_clamped() {
        let cfg = AppConfig {
            enrich_batch_size: Some(0),
            ..AppConfig::default()
        };
        assert_eq!(cfg.enrich_batch_size_or_default(), 1);
    }
}
