use serde::Serialize;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Which side of the linkage a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Masterlist,
    Registry,
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Masterlist => write!(f, "masterlist"),
            Self::Registry => write!(f, "registry"),
        }
    }
}

/// Structured postal address, every component optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AddressComponents {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
}

/// A single normalized company record from either source.
///
/// `normalized_name` is always derived from `display_name` through the
/// configured normalizer at construction time, never set independently.
#[derive(Debug, Clone)]
pub struct CompanyRecord {
    pub origin: Origin,
    /// Exact identifier (UEI) when the source carries one.
    pub key: Option<String>,
    /// The upstream search term that produced this row (registry side only).
    pub search_term: Option<String>,
    pub display_name: String,
    pub normalized_name: String,
    pub website: Option<String>,
    /// Deduplicated person names, insertion order preserved.
    pub contacts: Vec<String>,
    pub address: Option<AddressComponents>,
}

/// Pre-adapted records for both sides of a run.
pub struct MatchInput {
    pub masterlist: Vec<CompanyRecord>,
    pub registry: Vec<CompanyRecord>,
}

// ---------------------------------------------------------------------------
// Candidate pairs
// ---------------------------------------------------------------------------

/// How a candidate pair was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKind {
    /// Exact identifier (UEI) agreement between the two sides.
    Identifier,
    /// Registry row's search term equals the master entity's display name.
    Keyword,
}

impl std::fmt::Display for JoinKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identifier => write!(f, "identifier"),
            Self::Keyword => write!(f, "keyword"),
        }
    }
}

/// Index pair into (masterlist, registry) collections. Ephemeral.
#[derive(Debug, Clone, Copy)]
pub struct CandidatePair {
    pub master: usize,
    pub registry: usize,
    pub join: JoinKind,
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Per-dimension similarity, each in [0, 100].
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ComponentScores {
    pub name: f64,
    pub website: f64,
    pub contact: f64,
}

/// The contact pair that produced the contact score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedContacts {
    pub masterlist: String,
    pub registry: String,
}

#[derive(Debug, Clone)]
pub struct PairScore {
    pub components: ComponentScores,
    pub overall: f64,
    pub matched_contacts: Option<MatchedContacts>,
}

/// A candidate pair plus its score, ready for selection.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub pair: CandidatePair,
    pub score: PairScore,
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// The selected registry record for one master-list entity.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    /// Master entity's natural key: its display name as it appeared in input.
    pub masterlist_name: String,
    pub registry_name: String,
    /// Identifier carried over from the registry side, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_key: Option<String>,
    pub join: JoinKind,
    pub component_scores: ComponentScores,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_contacts: Option<MatchedContacts>,
    /// Registry-side address, carried through for manual follow-up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_address: Option<AddressComponents>,
    pub overall_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchSummary {
    pub masterlist_entities: usize,
    pub registry_records: usize,
    pub candidate_pairs: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub identifier_joins: usize,
    pub keyword_joins: usize,
    pub mean_overall_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub meta: RunMeta,
    pub summary: MatchSummary,
    pub matches: Vec<MatchResult>,
}

impl MatchReport {
    /// Look up the selected match for a master entity by its display name.
    pub fn match_for(&self, masterlist_name: &str) -> Option<&MatchResult> {
        self.matches
            .iter()
            .find(|m| m.masterlist_name == masterlist_name)
    }
}
