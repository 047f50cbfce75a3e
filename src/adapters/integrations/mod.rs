//! External integrations for exporting leads.

pub mod csv_utils;
pub mod google_sheets;
pub mod service_account;

pub use csv_utils::leads_to_csv;
pub use google_sheets::GoogleSheetsAdapter;
pub use service_account::{AccessTokenSource, ServiceAccountTokenSource, StaticToken};
