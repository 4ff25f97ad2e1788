use strsim::normalized_levenshtein;

/// Edit-similarity ratio in [0, 100].
///
/// Case-insensitive and whitespace-trimmed. Either side empty scores 0 —
/// absence is never a match. Identical non-empty strings score 100.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 100.0;
    }
    normalized_levenshtein(&a, &b) * 100.0
}
