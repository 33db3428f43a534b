use std::sync::Arc;

use scraper::Html;

use crate::adapters::{SiteAdapter, first_pipe_segment, og_title};
use crate::company::{is_generic_site_name, resolve_company};
use crate::config::Config;
use crate::error::AppError;
use crate::models::ScrapedMetadata;
use crate::patterns::extract_domain;
use crate::traits::Fetcher;

/// Resolve metadata from an already-fetched page.
///
/// 1. Run the site adapter chosen by domain
/// 2. Fill a missing title from the Generic adapter, then from og:title
/// 3. Run the company resolver (always)
/// 4. Keep the adapter's company unless it is empty or a job-board brand
/// 5. Collapse whitespace in every field
pub fn resolve_html(url: &str, html: &str, config: &Config) -> ScrapedMetadata {
    let doc = Html::parse_document(html);
    let domain = extract_domain(url);
    let adapter = SiteAdapter::for_domain(&domain);

    let mut out = adapter.extract(&doc);
    tracing::debug!(%url, %domain, adapter = adapter.name(), ?out, "Adapter extraction");

    if out.title.is_none() && adapter != SiteAdapter::Generic {
        out.fill_missing(SiteAdapter::Generic.extract(&doc));
    }
    if out.title.is_none() {
        out.title = og_title(&doc).and_then(|t| first_pipe_segment(&t));
    }

    let resolved = resolve_company(url, &doc, config);
    let adapter_company = out.company.take().map(|c| c.trim().to_string());
    out.company = match adapter_company {
        Some(c) if !c.is_empty() && !is_generic_site_name(&c) => Some(c),
        _ => Some(resolved.clone()).filter(|c| !c.is_empty()),
    };
    out.resolved_company = Some(resolved).filter(|c| !c.is_empty());

    out.normalize_whitespace();
    out
}

/// Orchestrates the metadata pipeline: fetch → adapter → resolver → normalise.
///
/// Generic over the fetcher so tests run without real HTTP.
pub struct MetadataPipeline<F>
where
    F: Fetcher,
{
    fetcher: F,
    config: Arc<Config>,
}

impl<F> MetadataPipeline<F>
where
    F: Fetcher,
{
    pub fn new(fetcher: F, config: Arc<Config>) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch and resolve, propagating fetch errors.
    pub async fn try_resolve(&self, url: &str) -> Result<ScrapedMetadata, AppError> {
        tracing::info!("Fetching {}", url);
        let html = self.fetcher.fetch(url).await?;
        tracing::info!("Fetched {} bytes of HTML", html.len());

        let meta = resolve_html(url, &html, &self.config);
        tracing::info!(
            title = meta.title.as_deref().unwrap_or_default(),
            company = meta.company.as_deref().unwrap_or_default(),
            location = meta.location.as_deref().unwrap_or_default(),
            "Metadata resolved"
        );
        Ok(meta)
    }

    /// Fetch and resolve, downgrading any failure to empty metadata.
    ///
    /// Scrape failure is never fatal to record creation; the caller proceeds
    /// with overrides and defaults only.
    pub async fn resolve(&self, url: &str) -> ScrapedMetadata {
        match self.try_resolve(url).await {
            Ok(meta) => meta,
            Err(e) => {
                tracing::warn!(%url, stage = e.stage(), error = %e, "Scrape failed, continuing without metadata");
                ScrapedMetadata::empty()
            }
        }
    }
}
