//! Business-name slug generation
//!
//! Pure string munging, no I/O. The slug is the storage key for profiles and
//! checkpoint entries; two businesses reducing to the same slug overwrite
//! each other (documented limitation, collisions are not resolved here).

use once_cell::sync::Lazy;
use regex::Regex;

/// Trailing legal-entity suffixes stripped before slugging
static LEGAL_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+(ltd\.?|limited|llc|inc\.?|plc|co\.?)\s*$").unwrap());

/// Trailing generic words stripped when deriving the display name
static DISPLAY_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+(ltd\.?|limited|services|cleaning|company|co\.?)\s*$").unwrap());

/// Filler words deprioritized so distinguishing words lead the slug
const GENERIC_WORDS: &[&str] = &[
    "cleaning",
    "services",
    "company",
    "group",
    "contractors",
    "maintenance",
    "solutions",
];

/// Derive the canonical slug for a business name.
///
/// "Owl Cleaning Services" -> "owl-cleaning"
/// "Alb Shining Cleaning Services Ltd" -> "alb-shining"
/// "RT Office Cleaning Ltd" -> "rt-office"
pub fn generate_slug(name: &str) -> String {
    let cleaned = LEGAL_SUFFIX_RE.replace(name, "");
    let normalized: String = cleaned
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();
    let words: Vec<&str> = normalized.split_whitespace().collect();

    let significant: Vec<&str> = words
        .iter()
        .copied()
        .filter(|w| !GENERIC_WORDS.contains(w))
        .collect();

    if significant.len() >= 2 {
        return significant[..2].join("-");
    }
    if significant.len() == 1 {
        let partner = words
            .iter()
            .copied()
            .find(|w| *w != significant[0])
            .unwrap_or("cleaning");
        return format!("{}-{}", significant[0], partner);
    }
    words.iter().take(2).copied().collect::<Vec<_>>().join("-")
}

/// Short display name: the full company name with one trailing generic
/// suffix word removed ("Owl Cleaning Services" -> "Owl Cleaning").
pub fn display_name(name: &str) -> String {
    let short = DISPLAY_SUFFIX_RE.replace(name, "").trim().to_string();
    if short.is_empty() {
        name.trim().to_string()
    } else {
        short
    }
}

/// Single uppercase initial for the logo monogram
pub fn logo_initial(name: &str) -> String {
    display_name(name)
        .chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_default()
}
