//! Slug derivation

/// Normalize a title or user-supplied slug into a URL-safe slug.
///
/// Lowercases, collapses every whitespace run into a single `-` and drops
/// apostrophes: `"Men's Chill Crew Neck"` becomes `"mens-chill-crew-neck"`.
pub fn slugify(source: &str) -> String {
    source
        .split_whitespace()
        .map(|word| word.replace(['\'', '’'], "").to_lowercase())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
