//! Profile synthesis and artifact generation
//!
//! Merges CSV-sourced facts, primary-site signals and fallback signals into
//! one complete brand profile. Field priority: verified CSV facts always
//! win; primary-site signals beat fallback signals; anything still
//! unresolved gets a fixed, clearly-labeled placeholder and bumps the
//! needs-manual-review counter. Every field of the schema is always
//! populated so the consuming template never sees a hole.
//!
//! The artifact is one TOML document per slug with a provenance header and
//! inline markers on placeholder lines, written atomically.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use crate::extract::ExtractedSignals;
use crate::leads::{format_phone, BusinessRecord};
use crate::search::{ReviewSnippet, SerpSignals};
use crate::slug;

const DEFAULT_PRIMARY_COLOR: &str = "#1a3a5c";
const DEFAULT_ACCENT_COLOR: &str = "#f59e0b";
const SURFACE_COLOR: &str = "#f8fafc";

const DEFAULT_FONT_SANS: &str = r#""Inter", ui-sans-serif, system-ui, sans-serif"#;
const DEFAULT_FONT_SERIF: &str = r#""Playfair Display", ui-serif, Georgia, serif"#;
const DEFAULT_FONT_IMPORT: &str = "https://fonts.googleapis.com/css2?family=Inter:wght@300;400;500;600&family=Playfair+Display:ital,wght@0,700;1,700&display=swap";

const HERO_IMAGE: &str = "https://images.unsplash.com/photo-1581578731548-c64695cc6952?q=80&w=2070&auto=format&fit=crop";

/// How many review entries the profile always carries
const REVIEW_BLOCK_SIZE: usize = 3;

#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub identity: Identity,
    pub styling: Styling,
    pub contact: Contact,
    pub hero: Hero,
    pub services: Services,
    pub pricing: Pricing,
    pub reviews: Reviews,
    pub areas: Areas,
    pub footer: Footer,
    pub trust_badges: Vec<String>,
    pub provenance: Provenance,
    pub manual_review: ManualReview,
}

#[derive(Debug, Clone, Serialize)]
pub struct Identity {
    pub company_name: String,
    pub company_name_full: String,
    pub logo_initial: String,
    pub logo_url: String,
    pub tagline: String,
    pub sub_tagline: String,
    pub badge_text: String,
    pub meta_title: String,
    pub meta_description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Styling {
    pub primary_color: String,
    pub accent_color: String,
    pub surface_color: String,
    pub font_sans: String,
    pub font_serif: String,
    pub font_display: String,
    pub font_import_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Contact {
    pub phone: String,
    pub phone_tel: String,
    pub email: String,
    pub address: String,
    pub address_line2: String,
    pub facebook: String,
    pub linkedin: String,
    pub instagram: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Hero {
    pub background_image: String,
    pub background_alt: String,
    pub cta_primary: String,
    pub cta_secondary: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Services {
    pub section_title: String,
    pub section_subtitle: String,
    pub items: Vec<ServiceItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceItem {
    pub title: String,
    pub description: String,
    pub image: String,
    pub alt: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Pricing {
    pub section_title: String,
    pub section_subtitle: String,
    pub plans: Vec<PricingPlan>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PricingPlan {
    pub name: String,
    pub description: String,
    pub features: Vec<String>,
    pub highlight: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Reviews {
    pub average_rating: String,
    /// True when the block holds verbatim reviews from the fallback source;
    /// false means canned defaults needing manual replacement.
    pub real: bool,
    pub items: Vec<ReviewItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewItem {
    pub name: String,
    pub role: String,
    pub text: String,
    pub rating: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct Areas {
    pub section_title: String,
    pub section_subtitle: String,
    pub locations: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Footer {
    pub description: String,
    pub copyright: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Provenance {
    /// Website URL the signals came from, or "no website"
    pub source: String,
    pub generated_at: String,
    pub rating: String,
    pub review_count: u32,
}

/// Which fields are placeholders, for operator visibility
#[derive(Debug, Clone, Default, Serialize)]
pub struct ManualReview {
    pub needs_review: usize,
    pub fields: Vec<String>,
}

impl ManualReview {
    fn flag(&mut self, field: &str) {
        self.fields.push(field.to_string());
        self.needs_review = self.fields.len();
    }

    pub fn is_flagged(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }
}

/// Merge everything known about one business into a complete profile.
///
/// `source_url` is the normalized website URL the primary signals were
/// extracted from, if there was one.
pub fn synthesize(
    lead: &BusinessRecord,
    primary: &ExtractedSignals,
    fallback: Option<&SerpSignals>,
    source_url: Option<&str>,
) -> Profile {
    let mut review = ManualReview::default();

    let name = lead.name.as_str();
    let city = lead.city_or_default().to_string();
    let short_name = slug::display_name(name);
    let rating = lead.rating_display();

    // Primary-site signals beat fallback-page signals, field by field
    let colors: &[String] = if !primary.colors.is_empty() {
        &primary.colors
    } else {
        fallback.map(|f| f.brand.colors.as_slice()).unwrap_or(&[])
    };

    let primary_color = match colors.first() {
        Some(c) => c.clone(),
        None => {
            review.flag("styling.primary_color");
            DEFAULT_PRIMARY_COLOR.to_string()
        }
    };
    let accent_color = match colors.get(1) {
        Some(c) => c.clone(),
        None => {
            review.flag("styling.accent_color");
            DEFAULT_ACCENT_COLOR.to_string()
        }
    };

    let fonts = primary
        .fonts
        .as_ref()
        .filter(|f| !f.families.is_empty())
        .or_else(|| {
            fallback
                .and_then(|f| f.brand.fonts.as_ref())
                .filter(|f| !f.families.is_empty())
        });
    let (font_sans, font_display, font_import_url) = match fonts {
        Some(fonts) => {
            let stack = format!(
                r#""{}", ui-sans-serif, system-ui, sans-serif"#,
                fonts.families[0]
            );
            (stack.clone(), stack, fonts.stylesheet_url.clone())
        }
        None => {
            review.flag("styling.fonts");
            (
                DEFAULT_FONT_SANS.to_string(),
                DEFAULT_FONT_SANS.to_string(),
                DEFAULT_FONT_IMPORT.to_string(),
            )
        }
    };

    let logo_url = primary
        .logo_url
        .clone()
        .or_else(|| fallback.and_then(|f| f.brand.logo_url.clone()))
        .unwrap_or_else(|| {
            review.flag("identity.logo_url");
            String::new()
        });

    let meta_description = primary
        .meta_description
        .clone()
        .or_else(|| fallback.and_then(|f| f.search.description.clone()))
        .unwrap_or_else(|| {
            review.flag("identity.meta_description");
            format!(
                "{} - Professional cleaning services in {}. Get a free quote today.",
                name, city
            )
        });

    // Verified CSV facts are taken as-is and never overridden
    let phone = format_phone(lead.phone.as_deref().unwrap_or(""));
    let email = match &lead.email {
        Some(email) => email.clone(),
        None => {
            review.flag("contact.email");
            String::new()
        }
    };
    let social_link = |value: &Option<String>| -> String {
        value
            .as_deref()
            .filter(|v| v.contains("http"))
            .unwrap_or("")
            .to_string()
    };
    let facebook = social_link(&lead.facebook);
    let linkedin = social_link(&lead.linkedin);
    let instagram = social_link(&lead.instagram);
    if facebook.is_empty() && linkedin.is_empty() && instagram.is_empty() {
        review.flag("contact.social");
    }

    let reviews = build_reviews(
        &rating,
        fallback.map(|f| f.search.reviews.as_slice()).unwrap_or(&[]),
        &city,
    );

    Profile {
        identity: Identity {
            company_name: short_name.to_uppercase(),
            company_name_full: name.to_string(),
            logo_initial: slug::logo_initial(name),
            logo_url,
            tagline: format!("Professional Cleaning\nServices in {}", city),
            sub_tagline: format!(
                "Trusted, professional cleaning services for businesses and homes across {}. We deliver spotless results every time.",
                city
            ),
            badge_text: "PROFESSIONAL CLEANING SERVICES".to_string(),
            meta_title: format!("{} | Professional Cleaning Services {}", name, city),
            meta_description,
        },
        styling: Styling {
            primary_color,
            accent_color,
            surface_color: SURFACE_COLOR.to_string(),
            font_sans,
            font_serif: DEFAULT_FONT_SERIF.to_string(),
            font_display,
            font_import_url,
        },
        contact: Contact {
            phone: phone.display,
            phone_tel: phone.tel,
            email,
            address: lead.address.clone().unwrap_or_else(|| city.clone()),
            address_line2: city.clone(),
            facebook,
            linkedin,
            instagram,
        },
        hero: Hero {
            background_image: HERO_IMAGE.to_string(),
            background_alt: format!("Professional cleaning team at work in {}", city),
            cta_primary: "Get a Free Quote".to_string(),
            cta_secondary: "Call Us Now".to_string(),
        },
        services: canned_services(&city),
        pricing: canned_pricing(),
        reviews,
        areas: canned_areas(&city),
        footer: Footer {
            description: format!(
                "{} - professional cleaning services you can trust. Fully insured, vetted staff, and a commitment to quality on every visit.",
                name
            ),
            copyright: format!(
                "© {} {} | All Rights Reserved.",
                Utc::now().format("%Y"),
                name
            ),
        },
        trust_badges: vec![
            "Fully Insured".to_string(),
            "Vetted Staff".to_string(),
            format!("{}★ Rated", rating),
            "Free Quote".to_string(),
        ],
        provenance: Provenance {
            source: source_url.unwrap_or("no website").to_string(),
            generated_at: Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            rating,
            review_count: lead.review_count,
        },
        manual_review: review,
    }
}

/// Verbatim fallback reviews when at least three exist, otherwise topped up
/// with the fixed defaults and flagged for manual replacement.
fn build_reviews(rating: &str, found: &[ReviewSnippet], city: &str) -> Reviews {
    let real = found.len() >= REVIEW_BLOCK_SIZE;

    let mut items: Vec<ReviewItem> = found
        .iter()
        .take(REVIEW_BLOCK_SIZE)
        .map(|r| ReviewItem {
            name: r.author.clone(),
            role: "Verified Google Review".to_string(),
            text: r.text.replace('\n', " "),
            rating: r.rating,
        })
        .collect();

    if !real {
        let defaults = [
            format!(
                "Excellent service - very professional and reliable. Would highly recommend to anyone needing quality cleaning services in {}.",
                city
            ),
            "Very impressed with the standard of work. The team was punctual, thorough and friendly. Will definitely be using again.".to_string(),
            "Reliable, professional service. Our premises have never looked better. Great value for money.".to_string(),
        ];
        for text in defaults {
            if items.len() >= REVIEW_BLOCK_SIZE {
                break;
            }
            items.push(ReviewItem {
                name: "Google Reviewer".to_string(),
                role: "Verified Google Review".to_string(),
                text,
                rating: 5,
            });
        }
    }

    Reviews {
        average_rating: format!("{}/5", rating),
        real,
        items,
    }
}

fn canned_services(city: &str) -> Services {
    Services {
        section_title: "Our Services".to_string(),
        section_subtitle: format!(
            "Professional cleaning solutions tailored to your specific needs across {}.",
            city
        ),
        items: vec![
            ServiceItem {
                title: "Commercial Cleaning".to_string(),
                description: format!(
                    "Professional commercial cleaning for offices, shops, and business premises in {}. Reliable, vetted staff delivering consistent results.",
                    city
                ),
                image: "https://images.unsplash.com/photo-1497366216548-37526070297c?q=80&w=2301&auto=format&fit=crop".to_string(),
                alt: "Clean professional office environment".to_string(),
            },
            ServiceItem {
                title: "Deep Cleaning".to_string(),
                description: "Intensive deep clean services for premises that need a thorough refresh. Industrial-grade equipment and eco-friendly products used throughout.".to_string(),
                image: "https://images.unsplash.com/photo-1584622650111-993a426fbf0a?q=80&w=2070&auto=format&fit=crop".to_string(),
                alt: "Professional deep cleaning in progress".to_string(),
            },
            ServiceItem {
                title: "Regular Maintenance".to_string(),
                description: "Scheduled maintenance cleaning to keep your premises spotless day after day. Flexible scheduling to minimise disruption to your business.".to_string(),
                image: "https://images.unsplash.com/photo-1560448204-e02f11c3d0e2?q=80&w=2070&auto=format&fit=crop".to_string(),
                alt: "Regular maintenance cleaning service".to_string(),
            },
        ],
    }
}

fn canned_pricing() -> Pricing {
    Pricing {
        section_title: "Pricing".to_string(),
        section_subtitle: "Competitive rates with no hidden fees. Contact us for a free, tailored quote.".to_string(),
        plans: vec![
            PricingPlan {
                name: "Regular Contract".to_string(),
                description: "Scheduled ongoing cleaning".to_string(),
                features: vec![
                    "Flexible daily or weekly schedule".to_string(),
                    "Dedicated cleaning team".to_string(),
                    "All equipment included".to_string(),
                    "Fully insured staff".to_string(),
                ],
                highlight: false,
            },
            PricingPlan {
                name: "Bespoke Package".to_string(),
                description: "Tailored to your requirements".to_string(),
                features: vec![
                    "Custom cleaning plan".to_string(),
                    "Free site assessment".to_string(),
                    "Vetted & DBS-checked staff".to_string(),
                    "Quality guarantee".to_string(),
                ],
                highlight: true,
            },
            PricingPlan {
                name: "One-Off Deep Clean".to_string(),
                description: "Intensive single session".to_string(),
                features: vec![
                    "Full premises deep clean".to_string(),
                    "Industrial-grade equipment".to_string(),
                    "Eco-friendly products".to_string(),
                    "Weekend availability".to_string(),
                ],
                highlight: false,
            },
        ],
    }
}

fn canned_areas(city: &str) -> Areas {
    Areas {
        section_title: "Areas We Cover".to_string(),
        section_subtitle: format!(
            "Providing professional cleaning services across {} and the surrounding areas.",
            city
        ),
        locations: vec![
            city.to_string(),
            "Uxbridge".to_string(),
            "Hillingdon".to_string(),
            "Hayes".to_string(),
            "West Drayton".to_string(),
            "Ickenham".to_string(),
            "Harefield".to_string(),
        ],
    }
}

/// Escape a string for a TOML basic string
fn q(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn q_list(values: &[String]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| q(v)).collect();
    format!("[{}]", quoted.join(", "))
}

/// Render the profile as a TOML document with a provenance header and
/// inline markers on placeholder lines.
pub fn render_profile(profile: &Profile) -> String {
    let mut out = String::new();
    let review = &profile.manual_review;

    let mark = |flagged: bool| -> &'static str {
        if flagged {
            "  # needs manual review"
        } else {
            "  # scraped from website"
        }
    };

    out.push_str("# ============================================================\n");
    out.push_str(&format!("# {}\n", profile.identity.company_name_full.to_uppercase()));
    out.push_str("# Brand profile generated by brandprofiler\n");
    out.push_str(&format!("# Source: {}\n", profile.provenance.source));
    out.push_str(&format!(
        "# Rating: {} stars | {} reviews\n",
        profile.provenance.rating, profile.provenance.review_count
    ));
    out.push_str(&format!("# Generated: {}\n", profile.provenance.generated_at));
    out.push_str(&format!(
        "# Fields needing manual review: {}\n",
        review.needs_review
    ));
    out.push_str("# ============================================================\n\n");

    out.push_str(&format!("trust_badges = {}\n\n", q_list(&profile.trust_badges)));

    let id = &profile.identity;
    out.push_str("[identity]\n");
    out.push_str(&format!("company_name = {}\n", q(&id.company_name)));
    out.push_str(&format!("company_name_full = {}\n", q(&id.company_name_full)));
    out.push_str(&format!("logo_initial = {}\n", q(&id.logo_initial)));
    out.push_str(&format!(
        "logo_url = {}{}\n",
        q(&id.logo_url),
        if review.is_flagged("identity.logo_url") {
            "  # needs manual review"
        } else {
            "  # scraped, verify it loads correctly"
        }
    ));
    out.push_str(&format!(
        "tagline = {}  # placeholder, write a compelling tagline\n",
        q(&id.tagline)
    ));
    out.push_str(&format!(
        "sub_tagline = {}  # placeholder, personalize from their website\n",
        q(&id.sub_tagline)
    ));
    out.push_str(&format!("badge_text = {}\n", q(&id.badge_text)));
    out.push_str(&format!("meta_title = {}\n", q(&id.meta_title)));
    out.push_str(&format!(
        "meta_description = {}{}\n\n",
        q(&id.meta_description),
        if review.is_flagged("identity.meta_description") {
            "  # needs manual review"
        } else {
            ""
        }
    ));

    let st = &profile.styling;
    out.push_str("[styling]\n");
    out.push_str(&format!(
        "primary_color = {}{}\n",
        q(&st.primary_color),
        mark(review.is_flagged("styling.primary_color"))
    ));
    out.push_str(&format!(
        "accent_color = {}{}\n",
        q(&st.accent_color),
        mark(review.is_flagged("styling.accent_color"))
    ));
    out.push_str(&format!("surface_color = {}\n", q(&st.surface_color)));
    out.push_str(&format!("font_sans = {}\n", q(&st.font_sans)));
    out.push_str(&format!("font_serif = {}\n", q(&st.font_serif)));
    out.push_str(&format!("font_display = {}\n", q(&st.font_display)));
    out.push_str(&format!(
        "font_import_url = {}{}\n\n",
        q(&st.font_import_url),
        if review.is_flagged("styling.fonts") {
            "  # needs manual review"
        } else {
            "  # scraped from website"
        }
    ));

    let contact = &profile.contact;
    out.push_str("[contact]\n");
    out.push_str(&format!("phone = {}\n", q(&contact.phone)));
    out.push_str(&format!("phone_tel = {}\n", q(&contact.phone_tel)));
    out.push_str(&format!(
        "email = {}{}\n",
        q(&contact.email),
        if review.is_flagged("contact.email") {
            "  # needs manual review"
        } else {
            ""
        }
    ));
    out.push_str(&format!("address = {}\n", q(&contact.address)));
    out.push_str(&format!("address_line2 = {}\n", q(&contact.address_line2)));
    out.push_str(&format!(
        "facebook = {}\n",
        q(&contact.facebook)
    ));
    out.push_str(&format!("linkedin = {}\n", q(&contact.linkedin)));
    out.push_str(&format!(
        "instagram = {}{}\n\n",
        q(&contact.instagram),
        if review.is_flagged("contact.social") {
            "  # no social links found, needs manual review"
        } else {
            ""
        }
    ));

    let hero = &profile.hero;
    out.push_str("[hero]\n");
    out.push_str(&format!("background_image = {}  # placeholder, pick the best hero image for this company type\n", q(&hero.background_image)));
    out.push_str(&format!("background_alt = {}\n", q(&hero.background_alt)));
    out.push_str(&format!("cta_primary = {}\n", q(&hero.cta_primary)));
    out.push_str(&format!("cta_secondary = {}\n\n", q(&hero.cta_secondary)));

    let services = &profile.services;
    out.push_str("[services]  # placeholder content, replace with their real services\n");
    out.push_str(&format!("section_title = {}\n", q(&services.section_title)));
    out.push_str(&format!(
        "section_subtitle = {}\n",
        q(&services.section_subtitle)
    ));
    for item in &services.items {
        out.push_str("\n[[services.items]]\n");
        out.push_str(&format!("title = {}\n", q(&item.title)));
        out.push_str(&format!("description = {}\n", q(&item.description)));
        out.push_str(&format!("image = {}\n", q(&item.image)));
        out.push_str(&format!("alt = {}\n", q(&item.alt)));
    }
    out.push('\n');

    let pricing = &profile.pricing;
    out.push_str("[pricing]  # placeholder rates, replace with their actual pricing\n");
    out.push_str(&format!("section_title = {}\n", q(&pricing.section_title)));
    out.push_str(&format!(
        "section_subtitle = {}\n",
        q(&pricing.section_subtitle)
    ));
    for plan in &pricing.plans {
        out.push_str("\n[[pricing.plans]]\n");
        out.push_str(&format!("name = {}\n", q(&plan.name)));
        out.push_str(&format!("description = {}\n", q(&plan.description)));
        out.push_str(&format!("features = {}\n", q_list(&plan.features)));
        out.push_str(&format!("highlight = {}\n", plan.highlight));
    }
    out.push('\n');

    let reviews = &profile.reviews;
    out.push_str(&format!(
        "[reviews]{}\n",
        if reviews.real {
            "  # real reviews from the search source"
        } else {
            "  # default reviews, needs manual replacement"
        }
    ));
    out.push_str(&format!("average_rating = {}\n", q(&reviews.average_rating)));
    out.push_str(&format!("real = {}\n", reviews.real));
    for item in &reviews.items {
        out.push_str("\n[[reviews.items]]\n");
        out.push_str(&format!("name = {}\n", q(&item.name)));
        out.push_str(&format!("role = {}\n", q(&item.role)));
        out.push_str(&format!("text = {}\n", q(&item.text)));
        out.push_str(&format!("rating = {}\n", item.rating));
    }
    out.push('\n');

    let areas = &profile.areas;
    out.push_str("[areas]  # placeholder coverage list, replace with their actual areas\n");
    out.push_str(&format!("section_title = {}\n", q(&areas.section_title)));
    out.push_str(&format!("section_subtitle = {}\n", q(&areas.section_subtitle)));
    out.push_str(&format!("locations = {}\n\n", q_list(&areas.locations)));

    let footer = &profile.footer;
    out.push_str("[footer]\n");
    out.push_str(&format!(
        "description = {}  # placeholder, personalize\n",
        q(&footer.description)
    ));
    out.push_str(&format!("copyright = {}\n\n", q(&footer.copyright)));

    let prov = &profile.provenance;
    out.push_str("[provenance]\n");
    out.push_str(&format!("source = {}\n", q(&prov.source)));
    out.push_str(&format!("generated_at = {}\n", q(&prov.generated_at)));
    out.push_str(&format!("rating = {}\n", q(&prov.rating)));
    out.push_str(&format!("review_count = {}\n\n", prov.review_count));

    out.push_str("[manual_review]\n");
    out.push_str(&format!("needs_review = {}\n", review.needs_review));
    out.push_str(&format!("fields = {}\n", q_list(&review.fields)));

    out
}

/// Write the profile artifact for a slug: temp file, fsync, atomic rename.
/// The deploy automation treats the file's existence as its unit of work,
/// so a partially-written artifact must never be observable.
pub fn write_profile(profile: &Profile, out_dir: &Path, slug: &str) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)
        .context(format!("Failed to create output directory {}", out_dir.display()))?;

    let path = out_dir.join(format!("{}.toml", slug));
    let temp_path = out_dir.join(format!(".{}.toml.tmp", slug));
    let content = render_profile(profile);

    {
        let mut file = fs::File::create(&temp_path)
            .context(format!("Failed to create {}", temp_path.display()))?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }
    fs::rename(&temp_path, &path)
        .context(format!("Failed to move profile into place at {}", path.display()))?;

    Ok(path)
}
