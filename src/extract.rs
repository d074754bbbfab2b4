//! Brand signal extraction
//!
//! Independent heuristic functions, each pulling one category of brand
//! signal out of raw HTML. All of them are pure (no I/O) and all of them
//! are optional: absence is an expected outcome, never an error. The
//! synthesizer composes their results; the heuristics stay isolated here
//! because they are approximate and will need tuning.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

/// Embedded stylesheet blocks
static STYLE_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style[^>]*>(.*?)</style>").unwrap());

/// Inline style attributes
static INLINE_STYLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?i)style="[^"]*""#).unwrap());

/// 3- or 6-digit hex color literals
static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#([0-9a-fA-F]{6}|[0-9a-fA-F]{3})\b").unwrap());

/// Web-font stylesheet references (Google Fonts, v1 and v2 endpoints)
static FONT_HREF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https://fonts\.googleapis\.com/css2?\?[^"'\s>]+"#).unwrap());

static META_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("meta").unwrap());
static IMG_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("img").unwrap());

/// Minimum meta description length on the primary (website) path
pub const MIN_META_DESCRIPTION_LEN: usize = 10;

/// Attribute tokens that mark an `<img>` as a likely logo
const LOGO_TOKENS: &[&str] = &["logo", "brand", "header-img"];

/// Everything the extractors managed to pull from one page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedSignals {
    /// Candidate brand colors, most frequent first, at most 3
    pub colors: Vec<String>,
    pub fonts: Option<FontSignals>,
    pub meta_description: Option<String>,
    pub logo_url: Option<String>,
}

impl ExtractedSignals {
    /// The fallback-trigger heuristic: a page without a single usable brand
    /// color is treated as not having yielded usable brand signal.
    pub fn has_brand_palette(&self) -> bool {
        !self.colors.is_empty()
    }
}

/// A web-font stylesheet reference and the families it requests
#[derive(Debug, Clone, PartialEq)]
pub struct FontSignals {
    /// Original stylesheet URL, kept for reuse in the generated profile
    pub stylesheet_url: String,
    pub families: Vec<String>,
}

/// Run every extractor over one page
pub fn extract_signals(html: &str, base_url: &str) -> ExtractedSignals {
    ExtractedSignals {
        colors: extract_palette(html),
        fonts: extract_fonts(html),
        meta_description: extract_meta_description(html, MIN_META_DESCRIPTION_LEN),
        logo_url: extract_logo(html, base_url),
    }
}

/// Find prominent non-neutral brand colors.
///
/// Scans `<style>` blocks and inline style attributes for hex literals,
/// expands the 3-digit form, discards near-white (brightness > 210),
/// near-black (< 35) and near-grey (channel spread < 20) candidates, then
/// ranks the rest by frequency. Ties keep first-appearance order.
pub fn extract_palette(html: &str) -> Vec<String> {
    let mut search_text = String::new();
    for cap in STYLE_BLOCK_RE.captures_iter(html) {
        search_text.push_str(&cap[1]);
        search_text.push(' ');
    }
    for m in INLINE_STYLE_RE.find_iter(html) {
        search_text.push_str(m.as_str());
        search_text.push(' ');
    }

    // Vec instead of a map so equal counts keep first-seen order
    let mut counts: Vec<(String, u32)> = Vec::new();
    for cap in HEX_COLOR_RE.captures_iter(&search_text) {
        let full = expand_hex(&cap[1]);
        let (r, g, b) = hex_channels(&full);
        let brightness = (r as f32 + g as f32 + b as f32) / 3.0;
        let spread = r.max(g).max(b) - r.min(g).min(b);
        if brightness > 210.0 || brightness < 35.0 || spread < 20 {
            continue;
        }
        match counts.iter_mut().find(|(c, _)| *c == full) {
            Some(entry) => entry.1 += 1,
            None => counts.push((full, 1)),
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().map(|(color, _)| color).take(3).collect()
}

/// "#D45" -> "#DD4455"; 6-digit input is uppercased as-is
fn expand_hex(hex: &str) -> String {
    let expanded: String = if hex.len() == 3 {
        hex.chars().flat_map(|c| [c, c]).collect()
    } else {
        hex.to_string()
    };
    format!("#{}", expanded.to_uppercase())
}

fn hex_channels(full: &str) -> (u8, u8, u8) {
    let hex = &full[1..];
    let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
    let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
    let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
    (r, g, b)
}

/// Find a web-font stylesheet link and the font families it requests.
///
/// `family` query parameters are form-decoded (`+` as space, percent
/// escapes), `|`-separated lists split apart, and weight/axis suffixes
/// after `:` dropped.
pub fn extract_fonts(html: &str) -> Option<FontSignals> {
    let stylesheet_url = FONT_HREF_RE.find(html)?.as_str().replace("&amp;", "&");
    let query = stylesheet_url.splitn(2, '?').nth(1).unwrap_or("");

    let families: Vec<String> = url::form_urlencoded::parse(query.as_bytes())
        .filter(|(key, _)| key == "family")
        .flat_map(|(_, value)| {
            value
                .split('|')
                .map(|family| {
                    family
                        .split(':')
                        .next()
                        .unwrap_or("")
                        .trim()
                        .to_string()
                })
                .collect::<Vec<_>>()
        })
        .filter(|family| !family.is_empty())
        .collect();

    Some(FontSignals {
        stylesheet_url,
        families,
    })
}

/// Find the page's meta description, regardless of attribute order,
/// rejecting contents shorter than `min_len`.
pub fn extract_meta_description(html: &str, min_len: usize) -> Option<String> {
    let document = Html::parse_document(html);
    for element in document.select(&META_SELECTOR) {
        let is_description = element
            .value()
            .attr("name")
            .map(|n| n.eq_ignore_ascii_case("description"))
            .unwrap_or(false);
        if !is_description {
            continue;
        }
        if let Some(content) = element.value().attr("content") {
            let content = content.trim();
            if content.len() >= min_len {
                return Some(content.to_string());
            }
        }
    }
    None
}

/// Find a logo image URL.
///
/// Considers `<img>` tags carrying a logo-ish token in any attribute name or
/// value; skips `data:` URIs; resolves protocol-relative and relative paths
/// against the page's base URL.
pub fn extract_logo(html: &str, base_url: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let base = Url::parse(base_url).ok();

    for element in document.select(&IMG_SELECTOR) {
        let looks_like_logo = element.value().attrs().any(|(name, value)| {
            let value = value.to_lowercase();
            LOGO_TOKENS
                .iter()
                .any(|token| name.contains(token) || value.contains(token))
        });
        if !looks_like_logo {
            continue;
        }

        let Some(src) = element.value().attr("src") else {
            continue;
        };
        if src.starts_with("data:") {
            continue;
        }
        if src.starts_with("http") {
            return Some(src.to_string());
        }
        if let Some(proto_relative) = src.strip_prefix("//") {
            return Some(format!("https://{}", proto_relative));
        }
        if let Some(resolved) = base.as_ref().and_then(|b| b.join(src).ok()) {
            return Some(resolved.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_filters_neutrals_and_ranks_by_frequency() {
        let html = r##"<html><head><style>
            body { background: #FFFFFF; color: #000000; }
            .muted { color: #808080; }
            .cta { background: #D45544; }
            .cta:hover { background: #D45544; border-color: #D45544; }
        </style></head><body></body></html>"##;
        assert_eq!(extract_palette(html), vec!["#D45544".to_string()]);
    }

    #[test]
    fn test_palette_expands_three_digit_hex() {
        let html = r##"<div style="color: #d45"></div>"##;
        assert_eq!(extract_palette(html), vec!["#DD4455".to_string()]);
    }

    #[test]
    fn test_palette_orders_most_frequent_first_capped_at_three() {
        let html = r##"<style>
            a { color: #112299; }
            b { color: #D45544; } c { color: #D45544; }
            d { color: #2E7D32; } e { color: #2E7D32; } f { color: #2E7D32; }
            g { color: #AA5511; }
        </style>"##;
        assert_eq!(
            extract_palette(html),
            vec![
                "#2E7D32".to_string(),
                "#D45544".to_string(),
                "#112299".to_string()
            ]
        );
    }

    #[test]
    fn test_palette_ignores_colors_outside_styles() {
        let html = "<p>our brand color is #D45544</p>";
        assert!(extract_palette(html).is_empty());
    }

    #[test]
    fn test_palette_tie_keeps_first_seen_order() {
        let html = r##"<style>a { color: #AA5511; } b { color: #2E7D32; }</style>"##;
        assert_eq!(
            extract_palette(html),
            vec!["#AA5511".to_string(), "#2E7D32".to_string()]
        );
    }

    #[test]
    fn test_fonts_css2_families() {
        let html = r#"<link rel="stylesheet"
            href="https://fonts.googleapis.com/css2?family=Inter:wght@300;400;600&amp;family=Playfair+Display:ital,wght@0,700&amp;display=swap">"#;
        let fonts = extract_fonts(html).unwrap();
        assert_eq!(fonts.families, vec!["Inter", "Playfair Display"]);
        assert!(fonts.stylesheet_url.contains("family=Inter"));
        assert!(!fonts.stylesheet_url.contains("&amp;"));
    }

    #[test]
    fn test_fonts_v1_pipe_separated() {
        let html =
            r#"<link href="https://fonts.googleapis.com/css?family=Open+Sans|Roboto:400,700">"#;
        let fonts = extract_fonts(html).unwrap();
        assert_eq!(fonts.families, vec!["Open Sans", "Roboto"]);
    }

    #[test]
    fn test_fonts_absent() {
        assert!(extract_fonts("<html><head></head></html>").is_none());
    }

    #[test]
    fn test_meta_description_attribute_order() {
        let first = r#"<meta name="description" content="Professional cleaning across West London.">"#;
        let second = r#"<meta content="Professional cleaning across West London." name="description">"#;
        for html in [first, second] {
            assert_eq!(
                extract_meta_description(html, MIN_META_DESCRIPTION_LEN).as_deref(),
                Some("Professional cleaning across West London.")
            );
        }
    }

    #[test]
    fn test_meta_description_rejects_short_placeholder() {
        let html = r#"<meta name="description" content="Home">"#;
        assert!(extract_meta_description(html, MIN_META_DESCRIPTION_LEN).is_none());
    }

    #[test]
    fn test_logo_absolute_src() {
        let html = r#"<img class="site-logo" src="https://cdn.example.com/logo.png">"#;
        assert_eq!(
            extract_logo(html, "https://example.com"),
            Some("https://cdn.example.com/logo.png".to_string())
        );
    }

    #[test]
    fn test_logo_relative_resolved_against_base() {
        let html = r#"<img alt="Acme brand mark" src="/assets/mark.svg">"#;
        assert_eq!(
            extract_logo(html, "https://example.com/about"),
            Some("https://example.com/assets/mark.svg".to_string())
        );
    }

    #[test]
    fn test_logo_protocol_relative() {
        let html = r#"<img id="header-img" src="//cdn.example.com/h.png">"#;
        assert_eq!(
            extract_logo(html, "https://example.com"),
            Some("https://cdn.example.com/h.png".to_string())
        );
    }

    #[test]
    fn test_logo_skips_data_uri_and_plain_images() {
        let html = r#"
            <img class="logo" src="data:image/png;base64,AAAA">
            <img src="/photos/team.jpg">
        "#;
        assert!(extract_logo(html, "https://example.com").is_none());
    }

    #[test]
    fn test_extract_signals_composes() {
        let html = r##"<html><head>
            <meta name="description" content="Spotless offices, vetted staff.">
            <link href="https://fonts.googleapis.com/css2?family=Inter:wght@400">
            <style>.hero { background: #1A3A5C; }</style>
        </head><body><img class="logo" src="/logo.png"></body></html>"##;
        let signals = extract_signals(html, "https://example.com");
        assert_eq!(signals.colors, vec!["#1A3A5C".to_string()]);
        assert_eq!(signals.fonts.as_ref().unwrap().families, vec!["Inter"]);
        assert_eq!(
            signals.meta_description.as_deref(),
            Some("Spotless offices, vetted staff.")
        );
        assert_eq!(
            signals.logo_url.as_deref(),
            Some("https://example.com/logo.png")
        );
        assert!(signals.has_brand_palette());
    }
}
