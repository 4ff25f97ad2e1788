use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::MatchError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct MatchConfig {
    pub name: String,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default)]
    pub weights: Weights,
    #[serde(default)]
    pub normalizer: NormalizerConfig,
    pub masterlist: MasterlistConfig,
    pub registry: RegistryConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_threshold() -> f64 {
    80.0
}

// ---------------------------------------------------------------------------
// Scoring weights
// ---------------------------------------------------------------------------

/// Relative weight of each similarity dimension. Must sum to 1.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Weights {
    pub name: f64,
    pub website: f64,
    pub contact: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            name: 0.65,
            website: 0.15,
            contact: 0.20,
        }
    }
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct NormalizerConfig {
    /// Legal-entity suffixes stripped from the end of a name, as whole tokens.
    #[serde(default = "default_suffixes")]
    pub suffixes: Vec<String>,
    /// Full-word replacements applied before suffix stripping.
    #[serde(default = "default_synonyms")]
    pub synonyms: BTreeMap<String, String>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            suffixes: default_suffixes(),
            synonyms: default_synonyms(),
        }
    }
}

fn default_suffixes() -> Vec<String> {
    ["inc", "llc", "ltd", "corp", "co", "company", "pllc", "lp", "llp"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_synonyms() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("corporation".to_string(), "corp".to_string()),
        ("incorporated".to_string(), "inc".to_string()),
    ])
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct MasterlistConfig {
    pub file: String,
    #[serde(default)]
    pub columns: MasterlistColumns,
}

/// Column names in the master-list CSV. `company` is structural; the rest
/// degrade to absent values when the column is not present.
#[derive(Debug, Clone, Deserialize)]
pub struct MasterlistColumns {
    #[serde(default = "default_company")]
    pub company: String,
    #[serde(default = "default_first_name")]
    pub first_name: String,
    #[serde(default = "default_last_name")]
    pub last_name: String,
    #[serde(default = "default_website")]
    pub website: String,
    #[serde(default = "default_master_identifier")]
    pub identifier: String,
}

impl Default for MasterlistColumns {
    fn default() -> Self {
        Self {
            company: default_company(),
            first_name: default_first_name(),
            last_name: default_last_name(),
            website: default_website(),
            identifier: default_master_identifier(),
        }
    }
}

fn default_company() -> String {
    "Company".into()
}
fn default_first_name() -> String {
    "First Name".into()
}
fn default_last_name() -> String {
    "Last Name".into()
}
fn default_website() -> String {
    "Website".into()
}
fn default_master_identifier() -> String {
    "UEI".into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    pub file: String,
    #[serde(default)]
    pub columns: RegistryColumns,
}

/// Column names in the registry CSV. `keyword` and `legal_name` are
/// structural; the rest degrade to absent values.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryColumns {
    #[serde(default = "default_keyword")]
    pub keyword: String,
    #[serde(default = "default_legal_name")]
    pub legal_name: String,
    #[serde(default = "default_entity_url")]
    pub entity_url: String,
    #[serde(default = "default_contacts")]
    pub contacts: String,
    #[serde(default = "default_registry_identifier")]
    pub identifier: String,
    #[serde(default = "default_physical_address")]
    pub physical_address: String,
}

impl Default for RegistryColumns {
    fn default() -> Self {
        Self {
            keyword: default_keyword(),
            legal_name: default_legal_name(),
            entity_url: default_entity_url(),
            contacts: default_contacts(),
            identifier: default_registry_identifier(),
            physical_address: default_physical_address(),
        }
    }
}

fn default_keyword() -> String {
    "keyword".into()
}
fn default_legal_name() -> String {
    "legal_name".into()
}
fn default_entity_url() -> String {
    "entity_url".into()
}
fn default_contacts() -> String {
    "contacts".into()
}
fn default_registry_identifier() -> String {
    "num_uei".into()
}
fn default_physical_address() -> String {
    "physical_address".into()
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Merged master-list CSV with the identifier column backfilled.
    #[serde(default = "default_output_csv")]
    pub csv: String,
    /// Optional JSON report of the full run.
    #[serde(default)]
    pub json: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv: default_output_csv(),
            json: None,
        }
    }
}

fn default_output_csv() -> String {
    "post_matching.csv".into()
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl MatchConfig {
    pub fn from_toml(input: &str) -> Result<Self, MatchError> {
        let config: MatchConfig =
            toml::from_str(input).map_err(|e| MatchError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        if !(0.0..=100.0).contains(&self.threshold) {
            return Err(MatchError::ConfigValidation(format!(
                "threshold must be in [0, 100], got {}",
                self.threshold
            )));
        }

        let w = &self.weights;
        for (label, value) in [
            ("weights.name", w.name),
            ("weights.website", w.website),
            ("weights.contact", w.contact),
        ] {
            if value < 0.0 {
                return Err(MatchError::ConfigValidation(format!(
                    "{label} must be non-negative, got {value}"
                )));
            }
        }
        let sum = w.name + w.website + w.contact;
        if (sum - 1.0).abs() > 1e-6 {
            return Err(MatchError::ConfigValidation(format!(
                "weights must sum to 1.0, got {sum}"
            )));
        }

        if self.masterlist.file.is_empty() {
            return Err(MatchError::ConfigValidation(
                "masterlist.file must not be empty".into(),
            ));
        }
        if self.registry.file.is_empty() {
            return Err(MatchError::ConfigValidation(
                "registry.file must not be empty".into(),
            ));
        }
        if self.output.csv.is_empty() {
            return Err(MatchError::ConfigValidation(
                "output.csv must not be empty".into(),
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
