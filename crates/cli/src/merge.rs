//! `entlink merge` — concatenate scraper batch CSVs into one file.
//!
//! Scrapers checkpoint long browser sessions by writing `batch_*.csv`
//! files; downstream matching wants a single registry CSV. The first
//! file's header wins and every later file must agree with it.

use std::path::{Path, PathBuf};

use log::info;

use crate::CliError;

pub struct MergeStats {
    pub files: usize,
    pub rows: usize,
}

pub fn cmd_merge(dir: &Path, pattern: &str, output: &Path) -> Result<(), CliError> {
    let stats = merge_batches(dir, pattern, output)?;
    eprintln!(
        "merged {} rows from {} files into {}",
        stats.rows,
        stats.files,
        output.display()
    );
    Ok(())
}

/// Concatenate every file matching `pattern` under `dir` into `output`.
/// Buffers in memory so a mid-run failure never leaves partial output.
pub fn merge_batches(dir: &Path, pattern: &str, output: &Path) -> Result<MergeStats, CliError> {
    let glob_pattern = dir.join(pattern).to_string_lossy().into_owned();
    let mut paths: Vec<PathBuf> = glob::glob(&glob_pattern)
        .map_err(|e| CliError::runtime(format!("bad pattern '{glob_pattern}': {e}")))?
        .filter_map(Result::ok)
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(CliError::runtime(format!(
            "no files match {glob_pattern}"
        )));
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    let mut expected_headers: Option<Vec<String>> = None;
    let mut rows = 0usize;

    for path in &paths {
        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| CliError::runtime(format!("cannot read {}: {e}", path.display())))?;
        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| CliError::runtime(format!("{}: {e}", path.display())))?
            .iter()
            .map(|h| h.to_string())
            .collect();

        if let Some(ref expected) = expected_headers {
            if *expected != headers {
                return Err(CliError::runtime(format!(
                    "{}: header mismatch (expected {:?}, found {:?})",
                    path.display(),
                    expected,
                    headers
                )));
            }
        } else {
            writer
                .write_record(&headers)
                .map_err(|e| CliError::runtime(e.to_string()))?;
            expected_headers = Some(headers);
        }

        for record in reader.records() {
            let record = record
                .map_err(|e| CliError::runtime(format!("{}: {e}", path.display())))?;
            writer
                .write_record(&record)
                .map_err(|e| CliError::runtime(e.to_string()))?;
            rows += 1;
        }
        info!("merged {}", path.display());
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CliError::runtime(e.to_string()))?;
    std::fs::write(output, bytes)
        .map_err(|e| CliError::runtime(format!("cannot write {}: {e}", output.display())))?;

    Ok(MergeStats {
        files: paths.len(),
        rows,
    })
}
