//! Company-name resolution.
//!
//! An ordered chain of independent strategies. Each one either produces a
//! non-empty name or fails completely, and the next is only consulted after
//! the previous one failed.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::adapters::og_site_name;
use crate::config::Config;
use crate::patterns::{hostname_from_url, second_level_label};
use crate::text::{capitalize, slug_to_name};

/// Job-board brand names that are never trusted as a company name.
pub const GENERIC_SITES: &[&str] = &["workday", "linkedin", "greenhouse", "lever"];

static JSON_LD: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("Failed to parse JSON-LD selector")
});

static TENANT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)boards\.greenhouse\.io/([^/?#]+)",
        r"(?i)jobs\.lever\.co/([^/?#]+)",
        r"(?i)https?://([a-z0-9-]+)\.wd\d+\.myworkdayjobs\.com",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Failed to compile tenant regex"))
    .collect()
});

/// Inputs shared by every resolution step.
pub struct CompanyContext<'a> {
    pub url: &'a str,
    pub doc: &'a Html,
    pub config: &'a Config,
}

type Step = fn(&CompanyContext<'_>) -> Option<String>;

const STEPS: &[(&str, Step)] = &[
    ("company_map", from_company_map),
    ("json_ld", from_json_ld),
    ("og_site_name", from_site_name),
    ("url_pattern", from_url_pattern),
    ("domain", from_domain),
];

/// True if `name` is a job-board brand rather than an employer.
pub fn is_generic_site_name(name: &str) -> bool {
    let name = name.trim();
    GENERIC_SITES.iter().any(|g| g.eq_ignore_ascii_case(name))
}

/// Resolve the company name for a posting.
///
/// Returns an empty string only when every step fails, which in practice
/// means the URL has no usable domain.
pub fn resolve_company(url: &str, doc: &Html, config: &Config) -> String {
    let ctx = CompanyContext { url, doc, config };
    for (step, resolve) in STEPS {
        if let Some(name) = resolve(&ctx).map(|n| n.trim().to_string()).filter(|n| !n.is_empty()) {
            tracing::debug!(%url, step, company = %name, "Company resolved");
            return name;
        }
    }
    tracing::debug!(%url, "Company resolution exhausted every step");
    String::new()
}

fn from_company_map(ctx: &CompanyContext<'_>) -> Option<String> {
    let host = hostname_from_url(ctx.url);
    if host.is_empty() {
        return None;
    }
    ctx.config.company_map.get(&host).cloned()
}

fn from_json_ld(ctx: &CompanyContext<'_>) -> Option<String> {
    ctx.doc.select(&JSON_LD).find_map(|script| {
        let raw = script.text().collect::<String>();
        let data: serde_json::Value = serde_json::from_str(raw.trim()).ok()?;
        let candidates = match &data {
            serde_json::Value::Array(items) => items.iter().collect::<Vec<_>>(),
            other => vec![other],
        };
        candidates.into_iter().find_map(hiring_organization_name)
    })
}

fn hiring_organization_name(obj: &serde_json::Value) -> Option<String> {
    let obj = obj.as_object()?;
    let is_posting = obj
        .get("@type")
        .and_then(|t| t.as_str())
        .is_some_and(|t| t.eq_ignore_ascii_case("jobposting"));
    if !is_posting {
        return None;
    }
    let org = obj
        .get("hiringOrganization")
        .or_else(|| obj.get("hiringorganization"))?;
    org.get("name")
        .and_then(|n| n.as_str())
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

fn from_site_name(ctx: &CompanyContext<'_>) -> Option<String> {
    og_site_name(ctx.doc).filter(|name| !is_generic_site_name(name))
}

fn from_url_pattern(ctx: &CompanyContext<'_>) -> Option<String> {
    TENANT_PATTERNS
        .iter()
        .find_map(|re| re.captures(ctx.url))
        .map(|caps| slug_to_name(&caps[1]))
}

fn from_domain(ctx: &CompanyContext<'_>) -> Option<String> {
    Some(capitalize(&second_level_label(ctx.url)))
}
