//! URL pattern extractors: registrable domain, hostname, application IDs.

use std::sync::LazyLock;

use regex::Regex;
use url::{Host, Url};

// Workday requisition: -R362134 / _R362134 / R-362134
static WORKDAY_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:[_-]|\b)R[-_]?(\d{3,})(?:\b|/|$)").expect("Failed to compile Workday regex")
});
// Greenhouse numeric: /jobs/1234567
static GREENHOUSE_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/jobs/(\d+)(?:\b|/|$)").expect("Failed to compile Greenhouse regex")
});
// Lever-style slug after /jobs or /postings
static SLUG_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)/(?:jobs?|postings)/([a-z0-9-]{8,})(?:\b|/|$)")
        .expect("Failed to compile posting slug regex")
});

/// Parse a URL, retrying with an `https://` prefix for scheme-less input.
fn parse_lenient(url: &str) -> Option<Url> {
    let url = url.trim();
    match Url::parse(url) {
        Ok(parsed) if parsed.host().is_some() => Some(parsed),
        _ => Url::parse(&format!("https://{url}"))
            .ok()
            .filter(|parsed| parsed.host().is_some()),
    }
}

/// Full lower-case hostname, e.g. `msd.wd5.myworkdayjobs.com`.
///
/// Returns an empty string when the URL has no host.
pub fn hostname_from_url(url: &str) -> String {
    parse_lenient(url)
        .and_then(|parsed| parsed.host_str().map(str::to_string))
        .unwrap_or_default()
}

/// Registrable domain plus public suffix, e.g. `greenhouse.io`.
///
/// Used as the site-adapter dispatch key. IP-literal hosts are returned
/// unchanged; unparseable input yields an empty string.
pub fn extract_domain(url: &str) -> String {
    let Some(parsed) = parse_lenient(url) else {
        return String::new();
    };
    match parsed.host() {
        Some(Host::Domain(host)) => {
            let host = host.trim_end_matches('.');
            psl::domain_str(host).unwrap_or(host).to_string()
        }
        Some(Host::Ipv4(ip)) => ip.to_string(),
        Some(Host::Ipv6(ip)) => ip.to_string(),
        None => String::new(),
    }
}

/// The registrable domain's second-level label, e.g. `acme` for
/// `careers.acme.co.uk`. Empty for IP hosts and unparseable input.
pub fn second_level_label(url: &str) -> String {
    let Some(parsed) = parse_lenient(url) else {
        return String::new();
    };
    match parsed.host() {
        Some(Host::Domain(host)) => {
            let host = host.trim_end_matches('.');
            let domain = psl::domain_str(host).unwrap_or(host);
            domain.split('.').next().unwrap_or_default().to_string()
        }
        _ => String::new(),
    }
}

/// Extract an application identifier from the posting URL.
///
/// Pattern families are tried in order and the first match wins:
/// 1. Workday requisition number → `"R" + digits`
/// 2. Greenhouse `/jobs/<digits>`
/// 3. `/jobs/` or `/postings/` followed by an 8+ char slug
///
/// The Workday pattern goes first because Workday URLs also satisfy the
/// generic slug pattern.
pub fn find_id_from_url(url: &str) -> String {
    if let Some(caps) = WORKDAY_ID_RE.captures(url) {
        return format!("R{}", &caps[1]);
    }
    if let Some(caps) = GREENHOUSE_ID_RE.captures(url) {
        return caps[1].to_string();
    }
    if let Some(caps) = SLUG_ID_RE.captures(url) {
        return caps[1].to_string();
    }
    String::new()
}
