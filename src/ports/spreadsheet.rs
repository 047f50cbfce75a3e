//! Spreadsheet outbound port. Overwrite a target range in an external sheet.

use crate::domain::DomainError;

/// Port for writing tabular data to an external spreadsheet.
///
/// Implemented by adapters (e.g. Google Sheets). When not configured, the export
/// service fails fast with `ConfigurationMissing` instead of calling this.
#[async_trait::async_trait]
pub trait SpreadsheetPort: Send + Sync {
    /// Overwrite the configured range with `rows` in a single write call.
    ///
    /// # Errors
    /// Returns `DomainError::Export` if authentication or the write call fails.
    async fn overwrite(&self, rows: &[Vec<String>]) -> Result<(), DomainError>;
}
