//! Per-job-board HTML extraction strategies.
//!
//! Each [`SiteAdapter`] variant knows one vendor's markup and returns a
//! partial [`ScrapedMetadata`] holding only the fields it found. The
//! [`Generic`](SiteAdapter::Generic) variant relies on Open Graph tags and
//! the page title and is used for every domain without a dedicated adapter.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::models::ScrapedMetadata;
use crate::text::normalize_ws;

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css:?}: {e}"))
}

static GREENHOUSE_TITLE: LazyLock<Selector> =
    LazyLock::new(|| selector("div#app_body h1.app-title, h1"));
static GREENHOUSE_COMPANY: LazyLock<Selector> = LazyLock::new(|| {
    selector("div#header .company-name, a.company-name, a[href*='greenhouse.io/']")
});
static GREENHOUSE_LOCATION: LazyLock<Selector> =
    LazyLock::new(|| selector(".location, .location-and-id, .metadata .location"));
static LEVER_TITLE: LazyLock<Selector> =
    LazyLock::new(|| selector("h2.posting-headline, .posting-headline h2, h1"));
static LEVER_LOCATION: LazyLock<Selector> =
    LazyLock::new(|| selector(".location, .posting-categories .location"));
static H1: LazyLock<Selector> = LazyLock::new(|| selector("h1"));
static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("title"));
static TWITTER_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"meta[name="twitter:description"]"#));
static OG_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"meta[property="og:description"]"#));
static OG_TITLE: LazyLock<Selector> = LazyLock::new(|| selector(r#"meta[property="og:title"]"#));
static OG_SITE_NAME: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"meta[property="og:site_name"]"#));

static LOCATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Location:\s*([^.|]+)").expect("Failed to compile location regex")
});

/// Extraction strategy for one job-board vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteAdapter {
    Workday,
    Greenhouse,
    Lever,
    LinkedIn,
    Generic,
}

/// Domain substring → adapter, checked in order.
const DISPATCH: &[(&str, SiteAdapter)] = &[
    ("myworkdayjobs.com", SiteAdapter::Workday),
    ("greenhouse.io", SiteAdapter::Greenhouse),
    ("lever.co", SiteAdapter::Lever),
    ("linkedin.com", SiteAdapter::LinkedIn),
    ("smartrecruiters.com", SiteAdapter::Generic),
    ("icims.com", SiteAdapter::Generic),
    ("workable.com", SiteAdapter::Generic),
    ("ashbyhq.com", SiteAdapter::Generic),
    ("bamboohr.com", SiteAdapter::Generic),
];

impl SiteAdapter {
    /// Pick the adapter for a registrable domain (see
    /// [`extract_domain`](crate::patterns::extract_domain)).
    pub fn for_domain(domain: &str) -> Self {
        DISPATCH
            .iter()
            .find(|(key, _)| !domain.is_empty() && domain.contains(key))
            .map(|(_, adapter)| *adapter)
            .unwrap_or(SiteAdapter::Generic)
    }

    pub fn name(&self) -> &'static str {
        match self {
            SiteAdapter::Workday => "workday",
            SiteAdapter::Greenhouse => "greenhouse",
            SiteAdapter::Lever => "lever",
            SiteAdapter::LinkedIn => "linkedin",
            SiteAdapter::Generic => "generic",
        }
    }

    /// Extract whatever fields this vendor's markup exposes.
    pub fn extract(&self, doc: &Html) -> ScrapedMetadata {
        match self {
            SiteAdapter::Workday => extract_workday(doc),
            SiteAdapter::Greenhouse => extract_greenhouse(doc),
            SiteAdapter::Lever => extract_lever(doc),
            SiteAdapter::LinkedIn => extract_linkedin(doc),
            SiteAdapter::Generic => extract_generic(doc),
        }
    }
}

fn extract_greenhouse(doc: &Html) -> ScrapedMetadata {
    ScrapedMetadata {
        title: select_text(doc, &GREENHOUSE_TITLE),
        company: select_text(doc, &GREENHOUSE_COMPANY),
        location: select_text(doc, &GREENHOUSE_LOCATION),
        ..Default::default()
    }
}

// Lever rarely exposes the company cleanly in markup; the resolver covers it.
fn extract_lever(doc: &Html) -> ScrapedMetadata {
    ScrapedMetadata {
        title: select_text(doc, &LEVER_TITLE),
        location: select_text(doc, &LEVER_LOCATION),
        ..Default::default()
    }
}

fn extract_workday(doc: &Html) -> ScrapedMetadata {
    let location = [&*TWITTER_DESCRIPTION, &*OG_DESCRIPTION]
        .into_iter()
        .filter_map(|sel| meta_content(doc, sel))
        .find_map(|content| {
            let content = normalize_ws(&content);
            LOCATION_RE
                .captures(&content)
                .map(|caps| caps[1].trim().to_string())
                .filter(|loc| !loc.is_empty())
        });

    ScrapedMetadata {
        title: select_text(doc, &H1),
        location,
        ..Default::default()
    }
}

fn extract_linkedin(doc: &Html) -> ScrapedMetadata {
    ScrapedMetadata {
        title: og_title(doc).and_then(|t| first_pipe_segment(&t)),
        ..Default::default()
    }
}

fn extract_generic(doc: &Html) -> ScrapedMetadata {
    let mut out = ScrapedMetadata::default();

    if let Some(og) = og_title(doc) {
        let mut parts = og.split(" - ").map(str::trim).filter(|p| !p.is_empty());
        out.title = parts.next().map(str::to_string);
        out.company = parts.next().map(str::to_string);
    }
    if out.title.is_none() {
        out.title = select_text(doc, &TITLE);
    }
    out
}

/// Content of the `og:title` meta tag, trimmed.
pub fn og_title(doc: &Html) -> Option<String> {
    meta_content(doc, &OG_TITLE)
}

/// Content of the `og:site_name` meta tag, trimmed.
pub fn og_site_name(doc: &Html) -> Option<String> {
    meta_content(doc, &OG_SITE_NAME)
}

/// First `|`-separated segment, trimmed. Sites append branding after the pipe.
pub fn first_pipe_segment(title: &str) -> Option<String> {
    title
        .split('|')
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn meta_content(doc: &Html, sel: &Selector) -> Option<String> {
    doc.select(sel)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn select_text(doc: &Html, sel: &Selector) -> Option<String> {
    doc.select(sel)
        .next()
        .map(element_text)
        .filter(|s| !s.is_empty())
}

/// Trimmed text nodes of an element, joined by single spaces.
fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_by_domain() {
        assert_eq!(SiteAdapter::for_domain("myworkdayjobs.com"), SiteAdapter::Workday);
        assert_eq!(SiteAdapter::for_domain("greenhouse.io"), SiteAdapter::Greenhouse);
        assert_eq!(SiteAdapter::for_domain("lever.co"), SiteAdapter::Lever);
        assert_eq!(SiteAdapter::for_domain("linkedin.com"), SiteAdapter::LinkedIn);
        assert_eq!(SiteAdapter::for_domain("ashbyhq.com"), SiteAdapter::Generic);
        assert_eq!(SiteAdapter::for_domain("acme.com"), SiteAdapter::Generic);
        assert_eq!(SiteAdapter::for_domain(""), SiteAdapter::Generic);
    }

    #[test]
    fn test_greenhouse_adapter() {
        let html = r#"
            <html><body>
              <div id="header"><span class="company-name">Acme Corp</span></div>
              <div id="app_body">
                <h1 class="app-title">  Software Engineer </h1>
                <div class="location">Remote, US</div>
              </div>
            </body></html>"#;
        let meta = SiteAdapter::Greenhouse.extract(&Html::parse_document(html));
        assert_eq!(meta.title.as_deref(), Some("Software Engineer"));
        assert_eq!(meta.company.as_deref(), Some("Acme Corp"));
        assert_eq!(meta.location.as_deref(), Some("Remote, US"));
    }

    #[test]
    fn test_greenhouse_without_company_leaves_it_absent() {
        let html = "<html><body><h1>Data Analyst</h1></body></html>";
        let meta = SiteAdapter::Greenhouse.extract(&Html::parse_document(html));
        assert_eq!(meta.title.as_deref(), Some("Data Analyst"));
        assert!(meta.company.is_none());
        assert!(meta.location.is_none());
    }

    #[test]
    fn test_lever_adapter_never_sets_company() {
        let html = r#"
            <html><body>
              <div class="posting-headline"><h2>Backend Engineer</h2></div>
              <div class="posting-categories"><div class="location">Toronto</div></div>
              <a class="company-name">Ignored</a>
            </body></html>"#;
        let meta = SiteAdapter::Lever.extract(&Html::parse_document(html));
        assert_eq!(meta.title.as_deref(), Some("Backend Engineer"));
        assert_eq!(meta.location.as_deref(), Some("Toronto"));
        assert!(meta.company.is_none());
    }

    #[test]
    fn test_workday_location_prefers_twitter_description() {
        let html = r#"
            <html><head>
              <meta name="twitter:description" content="Great role.   Location: Rahway, NJ. Apply now">
              <meta property="og:description" content="Location: Elsewhere">
            </head><body><h1>Summer Intern</h1></body></html>"#;
        let meta = SiteAdapter::Workday.extract(&Html::parse_document(html));
        assert_eq!(meta.title.as_deref(), Some("Summer Intern"));
        assert_eq!(meta.location.as_deref(), Some("Rahway, NJ"));
    }

    #[test]
    fn test_workday_location_falls_back_to_og_description() {
        let html = r#"
            <html><head>
              <meta name="twitter:description" content="No place mentioned here">
              <meta property="og:description" content="LOCATION: Austin, TX | Full time">
            </head><body><h1>Analyst</h1></body></html>"#;
        let meta = SiteAdapter::Workday.extract(&Html::parse_document(html));
        assert_eq!(meta.location.as_deref(), Some("Austin, TX"));
    }

    #[test]
    fn test_linkedin_strips_branding() {
        let html = r#"<html><head>
            <meta property="og:title" content="Acme hiring Product Manager | LinkedIn">
            </head></html>"#;
        let meta = SiteAdapter::LinkedIn.extract(&Html::parse_document(html));
        assert_eq!(meta.title.as_deref(), Some("Acme hiring Product Manager"));
    }

    #[test]
    fn test_generic_splits_og_title() {
        let html = r#"<html><head>
            <meta property="og:title" content="Quant Researcher - Jane Street">
            </head></html>"#;
        let meta = SiteAdapter::Generic.extract(&Html::parse_document(html));
        assert_eq!(meta.title.as_deref(), Some("Quant Researcher"));
        assert_eq!(meta.company.as_deref(), Some("Jane Street"));
    }

    #[test]
    fn test_generic_falls_back_to_title_element() {
        let html = "<html><head><title>Careers at Initech</title></head></html>";
        let meta = SiteAdapter::Generic.extract(&Html::parse_document(html));
        assert_eq!(meta.title.as_deref(), Some("Careers at Initech"));
        assert!(meta.company.is_none());
    }

    #[test]
    fn test_first_pipe_segment() {
        assert_eq!(first_pipe_segment("Engineer | Acme").as_deref(), Some("Engineer"));
        assert_eq!(first_pipe_segment(" | Acme"), None);
    }
}
