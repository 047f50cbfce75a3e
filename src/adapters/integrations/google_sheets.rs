//! Google Sheets adapter. Implements SpreadsheetPort via the Sheets v4 `values.update` call.

use super::service_account::AccessTokenSource;
use crate::domain::DomainError;
use crate::ports::SpreadsheetPort;
use reqwest::Client;
use std::sync::Arc;
use tracing::{info, warn};

/// Google Sheets adapter for overwriting a range with lead rows.
///
/// Values are written with `valueInputOption=RAW`, so nothing the AI wrote is
/// interpreted as a formula.
pub struct GoogleSheetsAdapter {
    client: Client,
    base_url: String,
    spreadsheet_id: String,
    range: String,
    tokens: Arc<dyn AccessTokenSource>,
}

impl GoogleSheetsAdapter {
    /// Create a new Sheets adapter.
    ///
    /// # Arguments
    /// * `base_url` - e.g. "https://sheets.googleapis.com"
    /// * `spreadsheet_id` - ID from the sheet's URL
    /// * `range` - A1 range whose top-left cell receives the header row (e.g. "Sheet1!A1")
    /// * `tokens` - OAuth access token source
    pub fn new(
        client: Client,
        base_url: String,
        spreadsheet_id: String,
        range: String,
        tokens: Arc<dyn AccessTokenSource>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            spreadsheet_id,
            range,
            tokens,
        }
    }

    fn values_url(&self) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.base_url, self.spreadsheet_id, self.range
        )
    }
}

#[async_trait::async_trait]
impl SpreadsheetPort for GoogleSheetsAdapter {
    async fn overwrite(&self, rows: &[Vec<String>]) -> Result<(), DomainError> {
        let token = self.tokens.access_token().await?;

        let body = serde_json::json!({
            "range": self.range,
            "majorDimension": "ROWS",
            "values": rows,
        });

        let res = self
            .client
            .put(self.values_url())
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::Export(format!("Request failed: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_else(|_| "unknown".to_string());
            warn!(status = %status, "Sheets API returned error");
            return Err(DomainError::Export(format!(
                "Sheets API error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        info!(
            spreadsheet_id = %self.spreadsheet_id,
            range = %self.range,
            rows = rows.len(),
            "sheet range overwritten"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::integrations::StaticToken;

    #[test]
    fn test_values_url() {
        let adapter = GoogleSheetsAdapter::new(
            Client::new(),
            "https://sheets.googleapis.com/".to_string(),
            "sheet-123".to_string(),
            "Sheet1!A1".to_string(),
            Arc::new(StaticToken::new("t")),
        );
        assert_eq!(
            adapter.values_url(),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet-123/values/Sheet1!A1"
        );
    }
}
