//! Search-engine fallback resolver
//!
//! Consulted when a business has no website, the primary fetch failed, or
//! the page yielded no brand palette. Fetches a search result page through
//! the same fetcher contract and mines it three ways: embedded JSON-LD
//! blocks first, then the page's meta description, then quoted review
//! snippets in visible text. A blocked or implausibly short response is
//! reported as absence, never as an error.
//!
//! The mandatory post-search cooldown is the orchestrator's policy; this
//! resolver assumes its caller honors it.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::SearchConfig;
use crate::extract::{self, ExtractedSignals};
use crate::fetch::Fetcher;

/// Meta-description floor on the fallback path (stricter than the primary
/// path's, SERP meta tags are mostly boilerplate)
const MIN_FALLBACK_DESCRIPTION_LEN: usize = 20;

/// Structured review entries considered per matching JSON-LD item
const MAX_STRUCTURED_REVIEWS: usize = 4;

/// Structured review texts at or below this length are discarded
const MIN_REVIEW_TEXT_LEN: usize = 20;

/// Visible-text snippets considered per page
const MAX_SNIPPET_REVIEWS: usize = 3;

const DEFAULT_REVIEWER: &str = "Google Reviewer";
const DEFAULT_RATING: u8 = 5;

static JSON_LD_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"script[type="application/ld+json"]"#).unwrap());

/// Quoted runs of 40-200 chars trailed by review/rating context
static SNIPPET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)"([^"]{40,200})"[^"]*(?:star|review|rating)"#).unwrap());

/// Service-positive keywords a snippet must contain to count as a review
static POSITIVE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)clean|profess|recommend|service|great|excel").unwrap());

/// Escaped unicode sequences inside snippet text
static UNICODE_ESCAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\u([0-9a-fA-F]{4})").unwrap());

/// One review pulled from the fallback page
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewSnippet {
    pub author: String,
    pub text: String,
    pub rating: u8,
}

/// Loosely-structured facts mined from the search result page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchSignals {
    pub description: Option<String>,
    pub reviews: Vec<ReviewSnippet>,
    pub opening_hours: Option<String>,
}

impl SearchSignals {
    /// Number of resolved facts, for operator-facing reporting
    pub fn data_points(&self) -> usize {
        self.description.is_some() as usize
            + self.opening_hours.is_some() as usize
            + self.reviews.len()
    }
}

/// Everything one fallback lookup produced: the structured facts plus the
/// ordinary brand extractors run over the same page, merged downstream at
/// lower priority than primary-site signals.
#[derive(Debug, Clone, Default)]
pub struct SerpSignals {
    pub brand: ExtractedSignals,
    pub search: SearchSignals,
}

/// Fallback search client bound to a fetcher and the search policy
pub struct SearchClient<'a> {
    fetcher: &'a Fetcher,
    config: &'a SearchConfig,
}

impl<'a> SearchClient<'a> {
    pub fn new(fetcher: &'a Fetcher, config: &'a SearchConfig) -> Self {
        Self { fetcher, config }
    }

    /// Search for a business and mine the result page. `None` means the
    /// source was blocked, empty, or unreachable.
    pub async fn lookup(&self, name: &str, city: &str) -> Option<SerpSignals> {
        let query = format!("{} {} {}", name, city, self.config.query_suffix)
            .trim()
            .to_string();

        let mut url = match Url::parse(&self.config.base_url) {
            Ok(u) => u,
            Err(e) => {
                warn!("Invalid search base URL {}: {}", self.config.base_url, e);
                return None;
            }
        };
        url.query_pairs_mut()
            .append_pair("q", &query)
            .append_pair("hl", "en");

        debug!("Searching fallback source for {:?}", query);
        let html = self.fetcher.fetch_text(url.as_str()).await;
        if html.len() < self.config.min_response_bytes {
            warn!(
                "Fallback source blocked or empty for {:?} ({} bytes)",
                name,
                html.len()
            );
            return None;
        }

        let signals = SerpSignals {
            brand: extract::extract_signals(&html, &self.config.base_url),
            search: parse_search_page(&html),
        };
        debug!(
            "Fallback for {:?}: {} data points",
            name,
            signals.search.data_points()
        );
        Some(signals)
    }
}

/// Mine a search result page. Pure function of the HTML text.
pub fn parse_search_page(html: &str) -> SearchSignals {
    let mut signals = SearchSignals::default();

    harvest_structured_blocks(html, &mut signals);

    if signals.description.is_none() {
        signals.description = extract::extract_meta_description(html, MIN_FALLBACK_DESCRIPTION_LEN);
    }
    if signals.reviews.is_empty() {
        signals.reviews = harvest_visible_snippets(html);
    }

    signals
}

/// Walk every JSON-LD block, harvesting description, opening hours and
/// reviews from LocalBusiness/Organization/Service items. Malformed blocks
/// are skipped individually and never abort the remaining ones.
fn harvest_structured_blocks(html: &str, signals: &mut SearchSignals) {
    let document = Html::parse_document(html);

    for element in document.select(&JSON_LD_SELECTOR) {
        let raw: String = element.text().collect();
        let parsed: Value = match serde_json::from_str(&raw) {
            Ok(v) => v,
            Err(e) => {
                debug!("Skipping malformed JSON-LD block: {}", e);
                continue;
            }
        };

        for item in flatten_items(&parsed) {
            if !is_business_item(item) {
                continue;
            }
            harvest_item(item, signals);
        }
    }
}

/// A block may be a single item, an array of items, or an item carrying an
/// `@graph` array; flatten all three shapes.
fn flatten_items(parsed: &Value) -> Vec<&Value> {
    match parsed {
        Value::Array(items) => items.iter().collect(),
        Value::Object(_) => {
            let mut items = vec![parsed];
            if let Some(Value::Array(graph)) = parsed.get("@graph") {
                items.extend(graph.iter());
            }
            items
        }
        _ => Vec::new(),
    }
}

/// Declared type matches LocalBusiness/Organization/Service, exact string or
/// inside a type array, case-insensitively.
fn is_business_item(item: &Value) -> bool {
    let type_text = match item.get("@type") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(","),
        _ => return false,
    };
    let lowered = type_text.to_lowercase();
    lowered.contains("localbusiness")
        || lowered.contains("organization")
        || lowered.contains("service")
}

fn harvest_item(item: &Value, signals: &mut SearchSignals) {
    if signals.description.is_none() {
        if let Some(description) = item.get("description").and_then(Value::as_str) {
            if !description.is_empty() {
                signals.description = Some(description.to_string());
            }
        }
    }

    if signals.opening_hours.is_none() {
        signals.opening_hours = match item.get("openingHours") {
            Some(Value::String(hours)) => Some(hours.clone()),
            Some(Value::Array(entries)) => {
                let joined = entries
                    .iter()
                    .filter_map(|e| e.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                (!joined.is_empty()).then_some(joined)
            }
            _ => None,
        };
    }

    let reviews = item
        .get("review")
        .or_else(|| item.get("reviews"))
        .map(|r| match r {
            Value::Array(entries) => entries.iter().collect::<Vec<_>>(),
            single => vec![single],
        })
        .unwrap_or_default();

    for review in reviews.into_iter().take(MAX_STRUCTURED_REVIEWS) {
        let text = review
            .get("reviewBody")
            .or_else(|| review.get("description"))
            .and_then(Value::as_str)
            .unwrap_or("");
        if text.len() <= MIN_REVIEW_TEXT_LEN {
            continue;
        }
        let author = review
            .get("author")
            .and_then(|a| a.get("name"))
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_REVIEWER);
        let rating = review
            .get("reviewRating")
            .and_then(|r| r.get("ratingValue"))
            .map(parse_rating)
            .unwrap_or(DEFAULT_RATING);
        signals.reviews.push(ReviewSnippet {
            author: author.to_string(),
            text: text.to_string(),
            rating,
        });
    }
}

/// Rating values show up as numbers or strings; parse as an integer,
/// defaulting to 5.
fn parse_rating(value: &Value) -> u8 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .map(|r| r.trunc() as i64)
        .filter(|r| (1..=5).contains(r))
        .map(|r| r as u8)
        .unwrap_or(DEFAULT_RATING)
}

/// Last resort: quoted runs of visible text near review/rating words,
/// filtered to service-positive content, escaped unicode decoded.
fn harvest_visible_snippets(html: &str) -> Vec<ReviewSnippet> {
    SNIPPET_RE
        .captures_iter(html)
        .filter_map(|cap| {
            let text = decode_unicode_escapes(&cap[1]);
            POSITIVE_RE.is_match(&text).then(|| ReviewSnippet {
                author: DEFAULT_REVIEWER.to_string(),
                text,
                rating: DEFAULT_RATING,
            })
        })
        .take(MAX_SNIPPET_REVIEWS)
        .collect()
}

/// Decode literal \uXXXX escape sequences left in scraped snippet text
fn decode_unicode_escapes(text: &str) -> String {
    UNICODE_ESCAPE_RE
        .replace_all(text, |cap: &regex::Captures| {
            u32::from_str_radix(&cap[1], 16)
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| cap[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_description_hours_and_reviews() {
        let html = r#"<script type="application/ld+json">
        {
            "@type": "LocalBusiness",
            "name": "Owl Cleaning",
            "description": "Family-run commercial cleaning in Uxbridge.",
            "openingHours": ["Mo-Fr 08:00-18:00", "Sa 09:00-13:00"],
            "review": [
                {
                    "author": {"name": "S. Patel"},
                    "reviewBody": "Fantastic team, our office has never been cleaner.",
                    "reviewRating": {"ratingValue": "5"}
                },
                {"reviewBody": "too short"}
            ]
        }
        </script>"#;

        let signals = parse_search_page(html);
        assert_eq!(
            signals.description.as_deref(),
            Some("Family-run commercial cleaning in Uxbridge.")
        );
        assert_eq!(
            signals.opening_hours.as_deref(),
            Some("Mo-Fr 08:00-18:00, Sa 09:00-13:00")
        );
        assert_eq!(signals.reviews.len(), 1);
        assert_eq!(signals.reviews[0].author, "S. Patel");
        assert_eq!(signals.reviews[0].rating, 5);
    }

    #[test]
    fn test_type_array_and_graph() {
        let html = r#"<script type="application/ld+json">
        {
            "@context": "https://schema.org",
            "@graph": [
                {"@type": "WebPage", "description": "ignored page description"},
                {"@type": ["Service", "Thing"], "description": "Deep cleans, scheduled contracts, end of tenancy."}
            ]
        }
        </script>"#;

        let signals = parse_search_page(html);
        assert_eq!(
            signals.description.as_deref(),
            Some("Deep cleans, scheduled contracts, end of tenancy.")
        );
    }

    #[test]
    fn test_malformed_block_does_not_abort_others() {
        let html = r#"
        <script type="application/ld+json">{not valid json</script>
        <script type="application/ld+json">
        {"@type": "Organization", "description": "Trusted cleaning partner since 2009."}
        </script>"#;

        let signals = parse_search_page(html);
        assert_eq!(
            signals.description.as_deref(),
            Some("Trusted cleaning partner since 2009.")
        );
    }

    #[test]
    fn test_review_defaults_applied() {
        let html = r#"<script type="application/ld+json">
        {
            "@type": "LocalBusiness",
            "review": {"reviewBody": "Really impressed with the service they provided."}
        }
        </script>"#;

        let signals = parse_search_page(html);
        assert_eq!(signals.reviews.len(), 1);
        assert_eq!(signals.reviews[0].author, "Google Reviewer");
        assert_eq!(signals.reviews[0].rating, 5);
    }

    #[test]
    fn test_structured_reviews_capped_at_four() {
        let reviews: Vec<String> = (0..6)
            .map(|i| {
                format!(
                    r#"{{"reviewBody": "Review number {} with plenty of length to it."}}"#,
                    i
                )
            })
            .collect();
        let html = format!(
            r#"<script type="application/ld+json">{{"@type": "LocalBusiness", "review": [{}]}}</script>"#,
            reviews.join(",")
        );

        let signals = parse_search_page(&html);
        assert_eq!(signals.reviews.len(), 4);
    }

    #[test]
    fn test_meta_fallback_requires_twenty_chars() {
        let short = r#"<meta name="description" content="Cleaning company.">"#;
        assert!(parse_search_page(short).description.is_none());

        let long = r#"<meta name="description" content="Commercial cleaning services across West London.">"#;
        assert_eq!(
            parse_search_page(long).description.as_deref(),
            Some("Commercial cleaning services across West London.")
        );
    }

    #[test]
    fn test_snippet_fallback_filters_and_decodes() {
        let html = concat!(
            r#"<div>"The team was professional and the office spotless, couldn\u2019t ask for more" "#,
            r#"5 star review</div>"#,
            r#"<div>"Nothing relevant about anything in particular here, just filler words on and on" "#,
            r#"2 star rating</div>"#,
        );

        let signals = parse_search_page(html);
        assert_eq!(signals.reviews.len(), 1);
        assert!(signals.reviews[0].text.contains("couldn\u{2019}t"));
        assert_eq!(signals.reviews[0].author, "Google Reviewer");
    }

    #[test]
    fn test_snippet_cap_counts_only_qualifying_quotes() {
        // the first quote has no service-positive keyword and must not use
        // up one of the three slots
        let filler = r#"<p>"Quoted but entirely unrelated content about the weather around here" 1 star</p>"#;
        let keepers: String = (0..4)
            .map(|i| {
                format!(
                    r#"<p>"Snippet {} praising a professional and reliable cleaning team" 5 star review</p>"#,
                    i
                )
            })
            .collect();
        let html = format!("{}{}", filler, keepers);

        let signals = parse_search_page(&html);
        assert_eq!(signals.reviews.len(), 3);
        assert!(signals.reviews[0].text.starts_with("Snippet 0"));
    }

    #[test]
    fn test_snippet_length_bounds() {
        // under 40 chars: not a candidate
        let html = r#""Too short to qualify" review"#;
        assert!(parse_search_page(html).reviews.is_empty());
    }

    #[test]
    fn test_rating_parsing() {
        assert_eq!(parse_rating(&serde_json::json!(4)), 4);
        assert_eq!(parse_rating(&serde_json::json!("4.5")), 4);
        assert_eq!(parse_rating(&serde_json::json!("five")), 5);
        assert_eq!(parse_rating(&serde_json::json!(99)), 5);
    }
}
