use std::collections::HashMap;

use log::debug;

use crate::model::{CandidatePair, CompanyRecord, JoinKind};

/// Produce all candidate pairs to be scored.
///
/// Identifier agreement is the primary join; an entity that yields no
/// identifier pair falls back to the keyword join, pairing it with every
/// registry record whose upstream search term equals the entity's display
/// name. The keyword join bounds pair count by the scraped row count —
/// unrelated companies are never crossed. Pairs missing a display name on
/// either side are dropped before scoring.
pub fn candidate_pairs(
    masterlist: &[CompanyRecord],
    registry: &[CompanyRecord],
) -> Vec<CandidatePair> {
    let mut by_key: HashMap<&str, Vec<usize>> = HashMap::new();
    let mut by_search_term: HashMap<&str, Vec<usize>> = HashMap::new();

    for (ri, record) in registry.iter().enumerate() {
        if record.display_name.is_empty() {
            continue;
        }
        if let Some(key) = record.key.as_deref() {
            by_key.entry(key).or_default().push(ri);
        }
        if let Some(term) = record.search_term.as_deref() {
            by_search_term.entry(term).or_default().push(ri);
        }
    }

    let mut pairs = Vec::new();

    for (mi, master) in masterlist.iter().enumerate() {
        if master.display_name.is_empty() {
            continue;
        }

        let mut found_identifier = false;
        if let Some(key) = master.key.as_deref() {
            if let Some(indices) = by_key.get(key) {
                for &ri in indices {
                    pairs.push(CandidatePair {
                        master: mi,
                        registry: ri,
                        join: JoinKind::Identifier,
                    });
                    found_identifier = true;
                }
            }
        }
        if found_identifier {
            continue;
        }

        if let Some(indices) = by_search_term.get(master.display_name.as_str()) {
            for &ri in indices {
                pairs.push(CandidatePair {
                    master: mi,
                    registry: ri,
                    join: JoinKind::Keyword,
                });
            }
        }
    }

    debug!(
        "joiner: {} candidate pairs from {} entities x {} registry records",
        pairs.len(),
        masterlist.len(),
        registry.len()
    );
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Origin;

    fn master(name: &str, key: Option<&str>) -> CompanyRecord {
        CompanyRecord {
            origin: Origin::Masterlist,
            key: key.map(String::from),
            search_term: None,
            display_name: name.into(),
            normalized_name: name.to_lowercase(),
            website: None,
            contacts: Vec::new(),
            address: None,
        }
    }

    fn reg(name: &str, term: &str, key: Option<&str>) -> CompanyRecord {
        CompanyRecord {
            origin: Origin::Registry,
            key: key.map(String::from),
            search_term: Some(term.into()),
            display_name: name.into(),
            normalized_name: name.to_lowercase(),
            website: None,
            contacts: Vec::new(),
            address: None,
        }
    }

    #[test]
    fn identifier_join_preferred() {
        let masters = vec![master("Acme Robotics", Some("U1"))];
        let registry = vec![
            reg("Acme Robotics LLC", "Acme Robotics", Some("U1")),
            reg("Acme Robotics Inc", "Acme Robotics", Some("U2")),
        ];
        let pairs = candidate_pairs(&masters, &registry);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].registry, 0);
        assert_eq!(pairs[0].join, JoinKind::Identifier);
    }

    #[test]
    fn keyword_fallback_when_no_identifier() {
        let masters = vec![master("Acme Robotics", None)];
        let registry = vec![
            reg("Acme Robotics LLC", "Acme Robotics", Some("U1")),
            reg("Acme Holdings", "Acme Robotics", None),
            reg("Zenith Foods Inc", "Zenith Foods", None),
        ];
        let pairs = candidate_pairs(&masters, &registry);
        assert_eq!(pairs.len(), 2);
        assert!(pairs.iter().all(|p| p.join == JoinKind::Keyword));
        assert!(pairs.iter().all(|p| p.registry != 2));
    }

    #[test]
    fn unmatched_identifier_falls_back_to_keyword() {
        let masters = vec![master("Acme Robotics", Some("U-absent"))];
        let registry = vec![reg("Acme Robotics LLC", "Acme Robotics", Some("U1"))];
        let pairs = candidate_pairs(&masters, &registry);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].join, JoinKind::Keyword);
    }

    #[test]
    fn no_cross_product_across_terms() {
        let masters = vec![master("Acme Robotics", None), master("Zenith Foods", None)];
        let registry = vec![
            reg("Acme Robotics LLC", "Acme Robotics", None),
            reg("Zenith Foods Inc", "Zenith Foods", None),
        ];
        let pairs = candidate_pairs(&masters, &registry);
        assert_eq!(pairs.len(), 2);
        for pair in pairs {
            assert_eq!(
                masterlist_name(&masters, pair.master),
                registry[pair.registry].search_term.as_deref().unwrap()
            );
        }
    }

    fn masterlist_name(masters: &[CompanyRecord], idx: usize) -> &str {
        &masters[idx].display_name
    }

    #[test]
    fn empty_names_dropped() {
        let masters = vec![master("", None), master("Acme", None)];
        let registry = vec![reg("", "Acme", None), reg("Acme LLC", "Acme", None)];
        let pairs = candidate_pairs(&masters, &registry);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].master, 1);
        assert_eq!(pairs[0].registry, 1);
    }
}
