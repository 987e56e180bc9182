/// Canonical lookup key for a product code: surrounding whitespace removed, uppercased.
///
/// Callers must reject an empty result before using it as a key.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Grouping and filter key for free-text labels such as brand and category.
pub fn normalize_label(raw: &str) -> String {
    raw.trim().to_lowercase()
}
