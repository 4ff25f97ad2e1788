use log::{debug, info};

use crate::config::MatchConfig;
use crate::error::MatchError;
use crate::join::candidate_pairs;
use crate::model::{
    JoinKind, MatchInput, MatchReport, MatchSummary, RunMeta, ScoredCandidate,
};
use crate::score::score_pair;
use crate::select::select_matches;

/// Run the full pipeline over pre-adapted records: join, score, select.
pub fn run(config: &MatchConfig, input: &MatchInput) -> Result<MatchReport, MatchError> {
    info!(
        "matching '{}': {} master-list entities vs {} registry records",
        config.name,
        input.masterlist.len(),
        input.registry.len()
    );

    let pairs = candidate_pairs(&input.masterlist, &input.registry);
    info!("generated {} candidate pairs", pairs.len());

    let scored: Vec<ScoredCandidate> = pairs
        .iter()
        .map(|&pair| {
            let score = score_pair(
                &input.masterlist[pair.master],
                &input.registry[pair.registry],
                &config.weights,
            );
            debug!(
                "scored '{}' vs '{}': name {:.1} website {:.1} contact {:.1} -> {:.2} ({})",
                input.masterlist[pair.master].display_name,
                input.registry[pair.registry].display_name,
                score.components.name,
                score.components.website,
                score.components.contact,
                score.overall,
                pair.join
            );
            ScoredCandidate { pair, score }
        })
        .collect();

    let matches = select_matches(&input.masterlist, &input.registry, &scored, config.threshold);
    info!(
        "selected {} matches at threshold {}",
        matches.len(),
        config.threshold
    );

    let summary = summarize(input, &scored, &matches);

    Ok(MatchReport {
        meta: RunMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        matches,
    })
}

fn summarize(
    input: &MatchInput,
    scored: &[ScoredCandidate],
    matches: &[crate::model::MatchResult],
) -> MatchSummary {
    let distinct_entities = {
        let mut names: Vec<&str> = input
            .masterlist
            .iter()
            .map(|r| r.display_name.as_str())
            .collect();
        names.sort_unstable();
        names.dedup();
        names.len()
    };

    let identifier_joins = matches
        .iter()
        .filter(|m| m.join == JoinKind::Identifier)
        .count();
    let keyword_joins = matches.len() - identifier_joins;

    let mean_overall_score = if matches.is_empty() {
        0.0
    } else {
        let sum: f64 = matches.iter().map(|m| m.overall_score).sum();
        (sum / matches.len() as f64 * 100.0).round() / 100.0
    };

    MatchSummary {
        masterlist_entities: distinct_entities,
        registry_records: input.registry.len(),
        candidate_pairs: scored.len(),
        matched: matches.len(),
        unmatched: distinct_entities - matches.len(),
        identifier_joins,
        keyword_joins,
        mean_overall_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CompanyRecord, Origin};

    fn config() -> MatchConfig {
        MatchConfig::from_toml(
            r#"
name = "engine test"

[masterlist]
file = "a.csv"

[registry]
file = "b.csv"
"#,
        )
        .unwrap()
    }

    fn master(name: &str, website: Option<&str>, contacts: &[&str]) -> CompanyRecord {
        let cfg = config();
        CompanyRecord {
            origin: Origin::Masterlist,
            key: None,
            search_term: None,
            display_name: name.into(),
            normalized_name: crate::normalize::normalize_company_name(name, &cfg.normalizer),
            website: website.map(String::from),
            contacts: contacts.iter().map(|c| c.to_string()).collect(),
            address: None,
        }
    }

    fn reg(
        name: &str,
        term: &str,
        key: Option<&str>,
        website: Option<&str>,
        contacts: &[&str],
    ) -> CompanyRecord {
        let cfg = config();
        CompanyRecord {
            origin: Origin::Registry,
            key: key.map(String::from),
            search_term: Some(term.into()),
            display_name: name.into(),
            normalized_name: crate::normalize::normalize_company_name(name, &cfg.normalizer),
            website: website.map(String::from),
            contacts: contacts.iter().map(|c| c.to_string()).collect(),
            address: None,
        }
    }

    #[test]
    fn similar_records_match() {
        let input = MatchInput {
            masterlist: vec![master(
                "Acme Robotics, Inc.",
                Some("acme.com"),
                &["Jane Doe"],
            )],
            registry: vec![reg(
                "Acme Robotics LLC",
                "Acme Robotics, Inc.",
                Some("U123"),
                Some("http://acme.com"),
                &["Jane A Doe"],
            )],
        };
        let report = run(&config(), &input).unwrap();
        assert_eq!(report.summary.matched, 1);
        let m = &report.matches[0];
        assert_eq!(m.component_scores.name, 100.0);
        assert!(m.overall_score >= 80.0);
        assert_eq!(m.registry_key.as_deref(), Some("U123"));
    }

    #[test]
    fn dissimilar_records_do_not_match() {
        let input = MatchInput {
            masterlist: vec![master("Acme Robotics", None, &["Jane Doe"])],
            registry: vec![reg(
                "Zenith Catering Group",
                "Acme Robotics",
                Some("U9"),
                Some("zenithcatering.example"),
                &["Bob Roberts"],
            )],
        };
        let report = run(&config(), &input).unwrap();
        assert_eq!(report.summary.matched, 0);
        assert_eq!(report.summary.unmatched, 1);
        assert!(report.matches.is_empty());
    }

    #[test]
    fn summary_counts_joins() {
        let input = MatchInput {
            masterlist: vec![
                master("Acme Robotics", None, &[]),
                master("Zenith Foods", None, &[]),
            ],
            registry: vec![
                reg("Acme Robotics", "Acme Robotics", None, None, &[]),
                reg("Zenith Foods", "Zenith Foods", None, None, &[]),
            ],
        };
        let mut cfg = config();
        cfg.threshold = 60.0;
        let report = run(&cfg, &input).unwrap();
        assert_eq!(report.summary.masterlist_entities, 2);
        assert_eq!(report.summary.matched, 2);
        assert_eq!(report.summary.keyword_joins, 2);
        assert_eq!(report.summary.identifier_joins, 0);
        assert!(report.summary.mean_overall_score > 0.0);
    }

    #[test]
    fn empty_input_is_not_an_error() {
        let input = MatchInput {
            masterlist: Vec::new(),
            registry: Vec::new(),
        };
        let report = run(&config(), &input).unwrap();
        assert_eq!(report.summary.matched, 0);
        assert_eq!(report.summary.candidate_pairs, 0);
    }
}
