use log::info;

use crate::config::MatchConfig;
use crate::error::MatchError;
use crate::model::MatchReport;

/// Merge match results back onto the original master-list CSV.
///
/// Output carries the original columns with the identifier column backfilled
/// from each entity's selected registry record; a freshly scraped identifier
/// wins over a stale one already present. The column is appended when the
/// input does not have it. Exactly one row out per row in.
pub fn merge_masterlist(
    csv_data: &str,
    report: &MatchReport,
    config: &MatchConfig,
) -> Result<String, MatchError> {
    let origin = "masterlist";
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error(origin, e))?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let col = &config.masterlist.columns;

    let company_idx = headers
        .iter()
        .position(|h| h == &col.company)
        .ok_or_else(|| MatchError::MissingColumn {
            origin: origin.into(),
            column: col.company.clone(),
        })?;

    let mut out_headers = headers.clone();
    let identifier_idx = match headers.iter().position(|h| h == &col.identifier) {
        Some(idx) => idx,
        None => {
            out_headers.push(col.identifier.clone());
            out_headers.len() - 1
        }
    };

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(&out_headers)
        .map_err(|e| csv_error("output", e))?;

    let mut rows = 0usize;
    let mut backfilled = 0usize;

    for record in reader.records() {
        let record = record.map_err(|e| csv_error(origin, e))?;
        let mut fields: Vec<String> = record.iter().map(String::from).collect();
        fields.resize(out_headers.len(), String::new());

        let company = record.get(company_idx).unwrap_or("").trim();
        let new_key = report
            .match_for(company)
            .and_then(|m| m.registry_key.as_deref());
        if let Some(key) = new_key {
            if fields[identifier_idx] != key {
                backfilled += 1;
            }
            fields[identifier_idx] = key.to_string();
        }

        writer
            .write_record(&fields)
            .map_err(|e| csv_error("output", e))?;
        rows += 1;
    }

    info!("merged output: {rows} rows, {backfilled} identifiers backfilled");

    let bytes = writer
        .into_inner()
        .map_err(|e| csv_error("output", e))?;
    String::from_utf8(bytes).map_err(|e| MatchError::Csv {
        origin: "output".into(),
        message: e.to_string(),
    })
}

fn csv_error(origin: &str, e: impl std::fmt::Display) -> MatchError {
    MatchError::Csv {
        origin: origin.into(),
        message: e.to_string(),
    }
}
