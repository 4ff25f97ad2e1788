use crate::config::NormalizerConfig;

/// Canonicalize a company name for comparison.
///
/// Lowercases, drops everything outside word characters and whitespace,
/// applies full-word synonym replacements, then strips trailing legal-entity
/// suffix tokens. Absent input yields an empty string; this never fails.
pub fn normalize_company_name(raw: &str, config: &NormalizerConfig) -> String {
    let lowered = raw.to_lowercase();
    let stripped: String = lowered
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    let mut tokens: Vec<&str> = stripped
        .split_whitespace()
        .map(|token| match config.synonyms.get(token) {
            Some(replacement) => replacement.as_str(),
            None => token,
        })
        .collect();

    // Suffixes only come off the tail, and a name that is nothing but a
    // suffix keeps its last token.
    while tokens.len() > 1 {
        let last = tokens[tokens.len() - 1];
        if config.suffixes.iter().any(|s| s == last) {
            tokens.pop();
        } else {
            break;
        }
    }

    tokens.join(" ")
}

/// Reduce a URL-ish string to a comparable site identity: lowercase, strip
/// scheme and leading `www.`, drop a trailing slash.
pub fn normalize_website(raw: &str) -> String {
    let mut site = raw.trim().to_lowercase();
    for scheme in ["https://", "http://"] {
        if let Some(rest) = site.strip_prefix(scheme) {
            site = rest.to_string();
            break;
        }
    }
    if let Some(rest) = site.strip_prefix("www.") {
        site = rest.to_string();
    }
    site.trim_end_matches('/').to_string()
}

/// Person names compare case-insensitively with collapsed whitespace.
pub fn normalize_person(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
