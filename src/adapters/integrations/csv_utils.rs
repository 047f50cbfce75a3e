//! CSV rendering of the export table. Uses the `csv` crate for safe quoting.

use crate::domain::Lead;
use crate::domain::export::export_rows;

/// Convert leads to a CSV string: header row plus one record per lead.
///
/// Multi-line email bodies stay in one quoted field.
pub fn leads_to_csv(leads: &[Lead]) -> Result<String, csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    for row in export_rows(leads) {
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    let bytes = wtr.into_inner().map_err(|e| {
        csv::Error::from(std::io::Error::new(
            std::io::ErrorKind::Other,
            e.to_string(),
        ))
    })?;

    String::from_utf8(bytes).map_err(|e| {
        csv::Error::from(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e.to_string(),
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leads_to_csv_quotes_multiline_email() {
        let leads = vec![Lead {
            name: "Ace, Inc.".to_string(),
            email: "Subject: Hi\n\nDear team".to_string(),
            ..Lead::default()
        }];

        let csv = leads_to_csv(&leads).unwrap();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(csv.as_bytes());
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();

        assert_eq!(records.len(), 1);
        assert_eq!(&records[0][0], "Ace, Inc.");
        assert_eq!(&records[0][6], "Subject: Hi\n\nDear team");
        assert_eq!(&records[0][5], "No Website");
    }

    #[test]
    fn test_empty_leads_is_header_only() {
        let csv = leads_to_csv(&[]).unwrap();
        assert_eq!(csv.trim_end(), "Name,Phone,Website,Address,Category,Status,Email Content,Antigravity Prompt");
    }
}
