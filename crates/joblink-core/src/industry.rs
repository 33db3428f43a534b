//! Industry classification: keyword rules first, then alias normalisation.
//!
//! Only labels from `industry_allowed` are ever returned. A miss yields an
//! empty string; industry is never guessed.

use indexmap::IndexMap;

use crate::config::{Config, canonical_label};

/// Return the first allowed label (in declared order) whose keywords appear
/// in `text`, case-insensitively.
pub fn choose_first_match(text: &str, config: &Config) -> String {
    let blob = text.to_lowercase();
    config
        .industry_allowed
        .iter()
        .find(|label| {
            config
                .rules_for(label)
                .iter()
                .map(|kw| kw.trim().to_lowercase())
                .any(|kw| !kw.is_empty() && blob.contains(&kw))
        })
        .cloned()
        .unwrap_or_default()
}

/// Map free text onto an allowed label.
///
/// Tries, in order: exact match against the allowed list, exact alias key,
/// then any alias key contained in the text. Used on its own to validate a
/// user-supplied industry override.
pub fn normalize_industry(raw: &str, allowed: &[String], aliases: &IndexMap<String, String>) -> String {
    let text = raw.trim().to_lowercase();
    if text.is_empty() {
        return String::new();
    }

    if let Some(label) = canonical_label(allowed, &text) {
        return label.to_string();
    }

    // Alias targets outside the allowed list are ignored.
    let resolve = |target: &String| canonical_label(allowed, target).map(str::to_string);
    let keys = || {
        aliases
            .iter()
            .map(|(k, v)| (k.trim().to_lowercase(), v))
            .filter(|(k, _)| !k.is_empty())
    };

    keys()
        .filter(|(k, _)| *k == text)
        .find_map(|(_, v)| resolve(v))
        .or_else(|| keys().filter(|(k, _)| text.contains(k.as_str())).find_map(|(_, v)| resolve(v)))
        .unwrap_or_default()
}

/// Classify a posting from its title, company, and URL.
pub fn classify_industry(title: &str, company: &str, url: &str, config: &Config) -> String {
    let label = choose_first_match(&[title, company, url].join(" "), config);
    if !label.is_empty() {
        tracing::debug!(industry = %label, "Industry matched by rule");
        return label;
    }

    let label = normalize_industry(
        [title, company].join(" ").trim(),
        &config.industry_allowed,
        &config.industry_aliases,
    );
    if !label.is_empty() {
        tracing::debug!(industry = %label, "Industry matched by alias");
    }
    label
}
