//! `entlink run` / `entlink validate` — config-driven record linkage.

use std::path::{Path, PathBuf};

use entlink_match::{
    masterlist_records, merge_masterlist, registry_records, MatchConfig, MatchInput,
};

use crate::CliError;

pub fn cmd_run(
    config_path: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| CliError::runtime(format!("cannot read config: {e}")))?;
    let config =
        MatchConfig::from_toml(&config_str).map_err(|e| CliError::config(e.to_string()))?;

    // Resolve input/output paths relative to the config file's directory
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));

    let master_csv = read_input(base_dir, &config.masterlist.file)?;
    let registry_csv = read_input(base_dir, &config.registry.file)?;

    let input = MatchInput {
        masterlist: masterlist_records(&master_csv, &config)
            .map_err(|e| CliError::runtime(e.to_string()))?,
        registry: registry_records(&registry_csv, &config)
            .map_err(|e| CliError::runtime(e.to_string()))?,
    };

    let report = entlink_match::run(&config, &input)
        .map_err(|e| CliError::runtime(e.to_string()))?;

    // Merged CSV is the primary output
    let merged = merge_masterlist(&master_csv, &report, &config)
        .map_err(|e| CliError::runtime(e.to_string()))?;
    let merged_path = base_dir.join(&config.output.csv);
    std::fs::write(&merged_path, merged)
        .map_err(|e| CliError::runtime(format!("cannot write {}: {e}", merged_path.display())))?;
    eprintln!("wrote {}", merged_path.display());

    // Optional JSON report
    let json_str = serde_json::to_string_pretty(&report)
        .map_err(|e| CliError::runtime(format!("JSON serialization error: {e}")))?;

    let json_path = output_file.or_else(|| {
        config
            .output
            .json
            .as_ref()
            .map(|name| base_dir.join(name))
    });
    if let Some(ref path) = json_path {
        std::fs::write(path, &json_str)
            .map_err(|e| CliError::runtime(format!("cannot write {}: {e}", path.display())))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    }

    // Human summary to stderr. Unresolved entities are not an error —
    // absence from the matched set is the caller's "no match found" signal.
    let s = &report.summary;
    eprintln!(
        "matched {} of {} entities ({} by identifier, {} by keyword), {} unresolved",
        s.matched, s.masterlist_entities, s.identifier_joins, s.keyword_joins, s.unmatched,
    );

    Ok(())
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| CliError::runtime(format!("cannot read config: {e}")))?;

    match MatchConfig::from_toml(&config_str) {
        Ok(config) => {
            eprintln!(
                "valid: '{}' at threshold {} with weights {}/{}/{}",
                config.name,
                config.threshold,
                config.weights.name,
                config.weights.website,
                config.weights.contact,
            );
            Ok(())
        }
        Err(e) => Err(CliError::config(e.to_string())),
    }
}

fn read_input(base_dir: &Path, file: &str) -> Result<String, CliError> {
    let path = base_dir.join(file);
    std::fs::read_to_string(&path)
        .map_err(|e| CliError::runtime(format!("cannot read {}: {e}", path.display())))
}
