use std::collections::{HashMap, HashSet};

use log::debug;

use crate::model::{CompanyRecord, JoinKind, MatchResult, ScoredCandidate};

/// Keep the single best candidate per master-list entity.
///
/// Pairs under the threshold are discarded first. Within an entity the
/// highest overall score wins; at equal score an identifier join beats a
/// keyword join, and the first-encountered pair wins as the final tie-break.
/// Entities with no surviving pair simply produce no result.
pub fn select_matches(
    masterlist: &[CompanyRecord],
    registry: &[CompanyRecord],
    scored: &[ScoredCandidate],
    threshold: f64,
) -> Vec<MatchResult> {
    // Entity natural key -> index into `scored` of the best pair so far.
    let mut best: HashMap<&str, usize> = HashMap::new();

    for (idx, candidate) in scored.iter().enumerate() {
        if candidate.score.overall < threshold {
            debug!(
                "selector: dropping '{}' vs '{}' at {:.2} (threshold {})",
                masterlist[candidate.pair.master].display_name,
                registry[candidate.pair.registry].display_name,
                candidate.score.overall,
                threshold
            );
            continue;
        }

        let name = masterlist[candidate.pair.master].display_name.as_str();
        match best.get(name).copied() {
            None => {
                best.insert(name, idx);
            }
            Some(held) => {
                if beats(candidate, &scored[held]) {
                    best.insert(name, idx);
                }
            }
        }
    }

    // Emit in master-list order so output is deterministic.
    let mut emitted: Vec<MatchResult> = Vec::with_capacity(best.len());
    let mut seen: HashSet<&str> = HashSet::new();
    for master in masterlist {
        let name = master.display_name.as_str();
        if !seen.insert(name) {
            continue;
        }
        if let Some(&idx) = best.get(name) {
            let candidate = &scored[idx];
            let registry_record = &registry[candidate.pair.registry];
            emitted.push(MatchResult {
                masterlist_name: name.to_string(),
                registry_name: registry_record.display_name.clone(),
                registry_key: registry_record.key.clone(),
                join: candidate.pair.join,
                component_scores: candidate.score.components,
                matched_contacts: candidate.score.matched_contacts.clone(),
                registry_address: registry_record.address.clone(),
                overall_score: candidate.score.overall,
            });
        }
    }

    emitted
}

/// Strict ordering between two surviving candidates for the same entity.
fn beats(challenger: &ScoredCandidate, holder: &ScoredCandidate) -> bool {
    if challenger.score.overall != holder.score.overall {
        return challenger.score.overall > holder.score.overall;
    }
    challenger.pair.join == JoinKind::Identifier && holder.pair.join == JoinKind::Keyword
}
