//! Tabular shape of an exported lead list. Shared by the spreadsheet and CSV exports.

use super::entities::Lead;

pub const EXPORT_HEADER: [&str; 8] = [
    "Name",
    "Phone",
    "Website",
    "Address",
    "Category",
    "Status",
    "Email Content",
    "Antigravity Prompt",
];

/// Header row followed by one row per lead, columns in [`EXPORT_HEADER`] order.
pub fn export_rows(leads: &[Lead]) -> Vec<Vec<String>> {
    let mut rows = Vec::with_capacity(leads.len() + 1);
    rows.push(EXPORT_HEADER.iter().map(|h| h.to_string()).collect());
    rows.extend(leads.iter().map(lead_row));
    rows
}

fn lead_row(lead: &Lead) -> Vec<String> {
    let status = if lead.has_website {
        "Website"
    } else {
        "No Website"
    };
    vec![
        lead.name.clone(),
        lead.phone.clone(),
        lead.website.clone().unwrap_or_else(|| "N/A".to_string()),
        lead.address.clone(),
        lead.category.clone(),
        status.to_string(),
        lead.email.clone(),
        lead.antigravity_prompt.clone(),
    ]
}
