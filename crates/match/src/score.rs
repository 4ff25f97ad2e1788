use crate::config::Weights;
use crate::model::{CompanyRecord, ComponentScores, MatchedContacts, PairScore};
use crate::normalize::{normalize_person, normalize_website};
use crate::similarity::ratio;

/// Score one candidate pair across the name, website and contact dimensions.
pub fn score_pair(
    master: &CompanyRecord,
    registry: &CompanyRecord,
    weights: &Weights,
) -> PairScore {
    let name = ratio(&master.normalized_name, &registry.normalized_name);

    let website = match (master.website.as_deref(), registry.website.as_deref()) {
        (Some(a), Some(b)) => ratio(&normalize_website(a), &normalize_website(b)),
        // Absence is not a match, never an automatic pass.
        _ => 0.0,
    };

    let (contact, matched_contacts) = best_contact_pair(&master.contacts, &registry.contacts);

    let overall = round2(name * weights.name + website * weights.website + contact * weights.contact);

    PairScore {
        components: ComponentScores {
            name,
            website,
            contact,
        },
        overall,
        matched_contacts,
    }
}

/// Highest pairwise similarity between the two contact sets, plus the pair
/// that achieved it. Zero and no pair when either side is empty.
fn best_contact_pair(
    masterlist: &[String],
    registry: &[String],
) -> (f64, Option<MatchedContacts>) {
    let mut best = 0.0;
    let mut best_pair = None;

    for m in masterlist {
        for r in registry {
            let score = ratio(&normalize_person(m), &normalize_person(r));
            if score > best {
                best = score;
                best_pair = Some(MatchedContacts {
                    masterlist: m.clone(),
                    registry: r.clone(),
                });
            }
        }
    }

    (best, best_pair)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
