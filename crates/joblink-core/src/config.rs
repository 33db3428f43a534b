//! joblink configuration.
//!
//! Loaded once per invocation from a YAML document and treated as immutable
//! for the lifetime of the pipeline. Unlike scraping, config is not allowed
//! to degrade silently: a missing or malformed document is a [`ConfigError`].
//!
//! ```yaml
//! sheet:
//!   path: applications.csv
//! defaults:
//!   timezone: America/New_York
//!   date_format: "%Y-%m-%d %H:%M:%S"
//!   source: LinkedIn
//!   status: Applied
//! industry_allowed: [Finance, Tech]
//! industry_aliases: { fintech: Finance }
//! industry_rules: { Finance: [bank, capital], Tech: [software] }
//! company_map: { msd.wd5.myworkdayjobs.com: Merck }
//! ```
//!
//! [`ConfigError`]: crate::error::AppError::ConfigError

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::AppError;

pub const DEFAULT_TIMEZONE: &str = "America/New_York";
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Process-wide read-only settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Tracking sheet identity.
    pub sheet: SheetConfig,

    /// Default field values, timezone, and date format.
    pub defaults: Defaults,

    /// Valid industry labels. Declaration order is the classifier's
    /// tie-break priority.
    pub industry_allowed: Vec<String>,

    /// Raw text → canonical industry label.
    pub industry_aliases: IndexMap<String, String>,

    /// Canonical industry label → trigger keywords, in priority order.
    pub industry_rules: IndexMap<String, Vec<String>>,

    /// Exact hostname → canonical company name.
    pub company_map: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetConfig {
    /// Path to the CSV sheet that rows are appended to.
    pub path: PathBuf,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("applications.csv"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Defaults {
    /// IANA timezone name used for the Date column and period guessing.
    pub timezone: String,
    /// strftime-style format for the Date column.
    pub date_format: String,
    pub source: String,
    pub status: String,
    pub industry: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            source: String::new(),
            status: String::new(),
            industry: String::new(),
        }
    }
}

impl Config {
    /// Load and validate a YAML config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::ConfigError(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_yaml(&content).map_err(|e| match e {
            AppError::ConfigError(msg) => {
                AppError::ConfigError(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Parse and validate a YAML config document.
    ///
    /// Empty documents and unknown keys are rejected.
    pub fn from_yaml(content: &str) -> Result<Self, AppError> {
        let value: serde_yaml::Value = serde_yaml::from_str(content)
            .map_err(|e| AppError::ConfigError(format!("Invalid YAML: {e}")))?;
        if value.is_null() {
            return Err(AppError::ConfigError("Config document is empty".to_string()));
        }
        let config: Config = serde_yaml::from_value(value)
            .map_err(|e| AppError::ConfigError(format!("Invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field invariants.
    ///
    /// Every rule key and alias target must name an allowed industry, rule
    /// keys must be unique ignoring case, and the timezone must be a known
    /// IANA name.
    pub fn validate(&self) -> Result<(), AppError> {
        self.timezone()?;

        let mut seen: Vec<&str> = Vec::new();
        for label in self.industry_rules.keys() {
            if seen.iter().any(|s| s.eq_ignore_ascii_case(label)) {
                return Err(AppError::ConfigError(format!(
                    "industry_rules key '{label}' is listed more than once"
                )));
            }
            seen.push(label);
            if self.canonical_industry(label).is_none() {
                return Err(AppError::ConfigError(format!(
                    "industry_rules key '{label}' is not listed in industry_allowed"
                )));
            }
        }
        for (alias, label) in &self.industry_aliases {
            if self.canonical_industry(label).is_none() {
                return Err(AppError::ConfigError(format!(
                    "industry_aliases '{alias}' maps to '{label}', which is not listed in industry_allowed"
                )));
            }
        }
        Ok(())
    }

    /// Parsed configured timezone.
    pub fn timezone(&self) -> Result<Tz, AppError> {
        self.defaults.timezone.parse::<Tz>().map_err(|_| {
            AppError::ConfigError(format!(
                "Unknown timezone '{}' in defaults.timezone",
                self.defaults.timezone
            ))
        })
    }

    /// The allowed label matching `label` case-insensitively, in its
    /// declared casing.
    pub fn canonical_industry(&self, label: &str) -> Option<&str> {
        canonical_label(&self.industry_allowed, label)
    }

    /// Keywords configured for an allowed label. An exact key wins over a
    /// case-insensitive one.
    pub fn rules_for(&self, label: &str) -> &[String] {
        self.industry_rules
            .get(label)
            .or_else(|| {
                self.industry_rules
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(label))
                    .map(|(_, keywords)| keywords)
            })
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

pub(crate) fn canonical_label<'a>(allowed: &'a [String], label: &str) -> Option<&'a str> {
    let label = label.trim();
    allowed
        .iter()
        .find(|a| a.eq_ignore_ascii_case(label))
        .map(String::as_str)
}
