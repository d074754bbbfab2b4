//! Shared HTML fixtures for integration tests

/// A business homepage with a full brand signal set: two non-neutral
/// colors (one dominant), a web-font stylesheet, a meta description and a
/// logo image.
pub const SITE_HTML: &str = r##"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="description" content="Professional cleaning across West London since 2009.">
    <link rel="stylesheet" href="https://fonts.googleapis.com/css2?family=Inter:wght@300;400;600&amp;display=swap">
    <style>
        body { color: #000000; background: #FFFFFF; }
        .hero { background: #1A3A5C; }
        .panel { border-color: #1A3A5C; }
        .cta { background: #D45544; }
    </style>
</head>
<body>
    <img class="site-logo" src="/assets/logo.png" alt="Owl Cleaning logo">
    <p style="color: #1A3A5C">Spotless offices, vetted staff, free quotes.</p>
</body>
</html>
"##;

/// A usable page (over the minimum body size) that yields no brand colors,
/// which triggers the search fallback.
pub const PLAIN_SITE_HTML: &str = r##"<!DOCTYPE html>
<html>
<head><title>Welcome</title></head>
<body>
    <p>We are a small cleaning firm. This page carries no styling at all,
    no hex colors, no fonts, no logo and no meta description.</p>
</body>
</html>
"##;

/// A search result page with an embedded LocalBusiness JSON-LD block:
/// description, opening hours and three usable reviews.
pub const SERP_HTML: &str = r##"<!DOCTYPE html>
<html>
<head><title>owl cleaning london cleaning - Search</title></head>
<body>
<div id="results">
    <h3>Owl Cleaning Services - London</h3>
</div>
<script type="application/ld+json">
{
    "@type": "LocalBusiness",
    "name": "Owl Cleaning Services",
    "description": "Family-run commercial cleaning company covering Uxbridge and West London.",
    "openingHours": ["Mo-Fr 08:00-18:00", "Sa 09:00-13:00"],
    "review": [
        {
            "author": {"name": "S. Patel"},
            "reviewBody": "Fantastic team, our office has never been cleaner.",
            "reviewRating": {"ratingValue": 5}
        },
        {
            "author": {"name": "M. Reeves"},
            "reviewBody": "Punctual, thorough and easy to deal with every week.",
            "reviewRating": {"ratingValue": "5"}
        },
        {
            "author": {"name": "J. Okafor"},
            "reviewBody": "Great value and a consistently professional service.",
            "reviewRating": {"ratingValue": 4}
        }
    ]
}
</script>
</body>
</html>
"##;
