use std::collections::HashMap;

use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::MatchConfig;
use crate::error::MatchError;
use crate::model::{AddressComponents, CompanyRecord, Origin};
use crate::normalize::normalize_company_name;

// ---------------------------------------------------------------------------
// Header resolution
// ---------------------------------------------------------------------------

fn read_headers<R: std::io::Read>(
    reader: &mut csv::Reader<R>,
    origin: &str,
) -> Result<Vec<String>, MatchError> {
    Ok(reader
        .headers()
        .map_err(|e| MatchError::Csv {
            origin: origin.into(),
            message: e.to_string(),
        })?
        .iter()
        .map(|h| h.to_string())
        .collect())
}

/// Structural column: its absence is fatal for the run.
fn require(headers: &[String], origin: &str, column: &str) -> Result<usize, MatchError> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| MatchError::MissingColumn {
            origin: origin.into(),
            column: column.into(),
        })
}

/// Degradable column: absence means every row has an absent value.
fn optional(headers: &[String], origin: &str, column: &str) -> Option<usize> {
    let idx = headers.iter().position(|h| h == column);
    if idx.is_none() {
        warn!("{origin}: column '{column}' not present, treating values as absent");
    }
    idx
}

fn field<'r>(record: &'r csv::StringRecord, idx: Option<usize>) -> &'r str {
    idx.and_then(|i| record.get(i)).unwrap_or("").trim()
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// ---------------------------------------------------------------------------
// Master-list adapter
// ---------------------------------------------------------------------------

/// Adapt per-person master-list rows into one record per company.
///
/// Contact names are `First Name` + `Last Name` concatenations, deduplicated;
/// the first non-empty value wins for singleton fields (website, identifier).
/// Rows whose company normalizes to empty are retained — relevance is the
/// joiner's decision, not the adapter's.
pub fn masterlist_records(
    csv_data: &str,
    config: &MatchConfig,
) -> Result<Vec<CompanyRecord>, MatchError> {
    let origin = "masterlist";
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_data.as_bytes());
    let headers = read_headers(&mut reader, origin)?;
    let col = &config.masterlist.columns;

    let company_idx = require(&headers, origin, &col.company)?;
    let first_idx = optional(&headers, origin, &col.first_name);
    let last_idx = optional(&headers, origin, &col.last_name);
    let website_idx = optional(&headers, origin, &col.website);
    let identifier_idx = optional(&headers, origin, &col.identifier);

    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, CompanyRecord> = HashMap::new();
    let mut row_count = 0usize;

    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|e| MatchError::Csv {
            origin: origin.into(),
            message: e.to_string(),
        })?;
        let row = i + 2; // 1-based, after the header line
        row_count += 1;

        let company = field(&record, Some(company_idx)).to_string();
        if company.is_empty() {
            warn!("{origin} row {row}: empty company name");
        }

        let entry = groups.entry(company.clone()).or_insert_with(|| {
            order.push(company.clone());
            CompanyRecord {
                origin: Origin::Masterlist,
                key: None,
                search_term: None,
                normalized_name: normalize_company_name(&company, &config.normalizer),
                display_name: company.clone(),
                website: None,
                contacts: Vec::new(),
                address: None,
            }
        });

        let first = field(&record, first_idx);
        let last = field(&record, last_idx);
        let full_name = [first, last]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        if full_name.is_empty() {
            warn!("{origin} row {row}: no contact name");
        } else if !entry.contacts.iter().any(|c| c == &full_name) {
            entry.contacts.push(full_name);
        }

        if entry.website.is_none() {
            entry.website = non_empty(field(&record, website_idx));
        }
        if entry.key.is_none() {
            entry.key = non_empty(field(&record, identifier_idx));
        }
    }

    let records: Vec<CompanyRecord> = order
        .iter()
        .filter_map(|name| groups.remove(name))
        .collect();
    info!(
        "masterlist: {} rows grouped into {} entities",
        row_count,
        records.len()
    );
    Ok(records)
}

// ---------------------------------------------------------------------------
// Registry adapter
// ---------------------------------------------------------------------------

/// Adapt registry rows onto the common record shape, one record per row.
pub fn registry_records(
    csv_data: &str,
    config: &MatchConfig,
) -> Result<Vec<CompanyRecord>, MatchError> {
    let origin = "registry";
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_data.as_bytes());
    let headers = read_headers(&mut reader, origin)?;
    let col = &config.registry.columns;

    let keyword_idx = require(&headers, origin, &col.keyword)?;
    let legal_idx = require(&headers, origin, &col.legal_name)?;
    let url_idx = optional(&headers, origin, &col.entity_url);
    let contacts_idx = optional(&headers, origin, &col.contacts);
    let identifier_idx = optional(&headers, origin, &col.identifier);
    let address_idx = optional(&headers, origin, &col.physical_address);

    let mut records = Vec::new();

    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|e| MatchError::Csv {
            origin: origin.into(),
            message: e.to_string(),
        })?;
        let row = i + 2;

        let display_name = field(&record, Some(legal_idx)).to_string();
        if display_name.is_empty() {
            warn!("{origin} row {row}: empty legal name");
        }

        let contacts = match contacts_idx {
            Some(idx) => {
                let raw = field(&record, Some(idx));
                match parse_contact_list(raw) {
                    Some(list) => list,
                    None => {
                        warn!("{origin} row {row}: unparseable contact list {raw:?}");
                        Vec::new()
                    }
                }
            }
            None => Vec::new(),
        };

        let address = non_empty(field(&record, address_idx)).and_then(|raw| {
            let parsed = split_address(&raw);
            if parsed.is_none() {
                warn!("{origin} row {row}: unrecognized address format");
            }
            parsed
        });

        records.push(CompanyRecord {
            origin: Origin::Registry,
            key: non_empty(field(&record, identifier_idx)),
            search_term: non_empty(field(&record, Some(keyword_idx))),
            normalized_name: normalize_company_name(&display_name, &config.normalizer),
            display_name,
            website: non_empty(field(&record, url_idx)),
            contacts,
            address,
        });
    }

    info!("registry: loaded {} records", records.len());
    Ok(records)
}

// ---------------------------------------------------------------------------
// Field parsers
// ---------------------------------------------------------------------------

/// Decode a serialized contact list without evaluating it.
///
/// Accepts a bracketed, quoted list (`['Jane Doe', 'John Smith']`), a
/// `;`-delimited string, or a single bare name. Returns `None` when the
/// input is structurally broken (unbalanced quotes, unclosed bracket).
pub fn parse_contact_list(raw: &str) -> Option<Vec<String>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(Vec::new());
    }
    if let Some(rest) = trimmed.strip_prefix('[') {
        let inner = rest.strip_suffix(']')?;
        return parse_bracketed(inner);
    }
    if trimmed.contains(';') {
        return Some(
            trimmed
                .split(';')
                .filter_map(non_empty)
                .filter(|entry| !is_null_token(entry))
                .collect(),
        );
    }
    if is_null_token(trimmed) {
        return Some(Vec::new());
    }
    Some(vec![trimmed.to_string()])
}

fn parse_bracketed(inner: &str) -> Option<Vec<String>> {
    let mut entries = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in inner.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None => match c {
                '\'' | '"' => quote = Some(c),
                ',' => flush_entry(&mut entries, &mut current),
                _ => current.push(c),
            },
        }
    }
    if quote.is_some() {
        return None;
    }
    flush_entry(&mut entries, &mut current);
    Some(entries)
}

fn flush_entry(entries: &mut Vec<String>, current: &mut String) {
    let entry = current.trim();
    if !entry.is_empty() && !is_null_token(entry) {
        entries.push(entry.to_string());
    }
    current.clear();
}

/// Serialized null markers that leak out of upstream scrapers.
fn is_null_token(entry: &str) -> bool {
    matches!(entry, "None" | "nan" | "null")
}

static ADDRESS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<street>\d+[A-Za-z0-9 .]*?),\s*(?P<city>[A-Za-z ]+?),\s*(?P<state>[A-Za-z ]+?),\s*(?P<zip>\d{5})(?:-\d{4})?,\s*(?P<country>.+)$",
    )
    .expect("address pattern compiles")
});

/// Split a single-line registry address into components. Returns `None`
/// when the line does not follow the street,city,state,zip,country shape.
pub fn split_address(raw: &str) -> Option<AddressComponents> {
    let caps = ADDRESS_RE.captures(raw.trim())?;
    let part = |name: &str| caps.name(name).map(|m| m.as_str().trim().to_string());
    Some(AddressComponents {
        street: part("street"),
        city: part("city"),
        state: part("state"),
        zip: part("zip"),
        country: part("country"),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
