//! Export service. Writes the client's lead list to the spreadsheet or to CSV.

use crate::adapters::integrations::leads_to_csv;
use crate::domain::export::export_rows;
use crate::domain::{DomainError, Lead};
use crate::ports::SpreadsheetPort;
use std::sync::Arc;
use tracing::info;

pub struct ExportService {
    sheet: Option<Arc<dyn SpreadsheetPort>>,
}

impl ExportService {
    /// # Arguments
    /// * `sheet` - Spreadsheet adapter, or None when export credentials are not configured
    pub fn new(sheet: Option<Arc<dyn SpreadsheetPort>>) -> Self {
        Self { sheet }
    }

    pub fn is_configured(&self) -> bool {
        self.sheet.is_some()
    }

    /// Overwrite the target sheet with a header row plus one row per lead.
    ///
    /// Returns the number of leads written.
    pub async fn sync_to_sheet(&self, leads: &[Lead]) -> Result<usize, DomainError> {
        let sheet = self.sheet.as_ref().ok_or_else(|| {
            DomainError::ConfigurationMissing("Google Sheets configuration".to_string())
        })?;

        let rows = export_rows(leads);
        sheet.overwrite(&rows).await?;

        info!(leads = leads.len(), rows = rows.len(), "leads synced to spreadsheet");
        Ok(leads.len())
    }

    /// Same table as the spreadsheet export, as CSV.
    pub fn to_csv(&self, leads: &[Lead]) -> Result<String, DomainError> {
        leads_to_csv(leads).map_err(|e| DomainError::Export(format!("Failed to generate CSV: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct CapturingSheet {
        written: Mutex<Vec<Vec<String>>>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl SpreadsheetPort for CapturingSheet {
        async fn overwrite(&self, rows: &[Vec<String>]) -> Result<(), DomainError> {
            if self.fail {
                return Err(DomainError::Export("403 PERMISSION_DENIED".into()));
            }
            *self.written.lock().await = rows.to_vec();
            Ok(())
        }
    }

    fn leads(n: usize) -> Vec<Lead> {
        (0..n)
            .map(|i| Lead {
                id: format!("id-{i}"),
                name: format!("Lead {i}"),
                ..Lead::default()
            })
            .collect()
    }

    #[tokio::test]
    async fn test_sync_writes_n_plus_one_rows() {
        let sheet = Arc::new(CapturingSheet::default());
        let svc = ExportService::new(Some(sheet.clone() as Arc<dyn SpreadsheetPort>));

        let written = svc.sync_to_sheet(&leads(4)).await.unwrap();

        assert_eq!(written, 4);
        let rows = sheet.written.lock().await;
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|r| r.len() == 8));
    }

    #[tokio::test]
    async fn test_unconfigured_export_fails_fast() {
        let svc = ExportService::new(None);
        let err = svc.sync_to_sheet(&leads(1)).await.unwrap_err();
        assert!(matches!(err, DomainError::ConfigurationMissing(_)));
        assert_eq!(err.to_string(), "Google Sheets configuration is missing.");
    }

    #[tokio::test]
    async fn test_write_failure_surfaces() {
        let sheet = Arc::new(CapturingSheet {
            fail: true,
            ..CapturingSheet::default()
        });
        let svc = ExportService::new(Some(sheet as Arc<dyn SpreadsheetPort>));
        assert!(matches!(
            svc.sync_to_sheet(&leads(1)).await,
            Err(DomainError::Export(_))
        ));
    }

    #[test]
    fn test_csv_export() {
        let svc = ExportService::new(None);
        let csv = svc.to_csv(&leads(2)).unwrap();
        assert_eq!(csv.lines().count(), 3);
        assert!(csv.starts_with("Name,Phone,Website"));
    }
}
