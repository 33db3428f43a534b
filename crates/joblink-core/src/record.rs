//! The 20-column job record and its assembly from scraped metadata,
//! user overrides, and configured defaults.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone};
use indexmap::IndexMap;

use crate::config::{Config, DEFAULT_DATE_FORMAT};
use crate::error::AppError;
use crate::industry::{classify_industry, normalize_industry};
use crate::models::ScrapedMetadata;
use crate::patterns::find_id_from_url;
use crate::period::{detect_period_from_text, guess_period};
use crate::text::capitalize;

/// Canonical sheet header. Order must match the sheet exactly.
pub const FIELDS: [&str; 20] = [
    "AID",
    "Date",
    "Company Name",
    "Industry / Sector",
    "Position Title",
    "Period",
    "Application Link",
    "Contact Person",
    "Contact Email",
    "Contact Phone",
    "Source (Job Board / Referral / Career Fair)",
    "Application Status",
    "Next Follow-up Date",
    "Interview Dates",
    "Notes / Observations",
    "Resume Version Used",
    "Cover Letter Version Used",
    "Offer Received (Y/N)",
    "Offer Details",
    "Decision Made (Y/N)",
];

/// One row of the tracking sheet. Absent data is the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct JobRecord {
    pub aid: String,
    pub date: String,
    pub company: String,
    pub industry: String,
    pub title: String,
    pub period: String,
    pub link: String,
    pub contact_person: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub source: String,
    pub status: String,
    pub next_followup: String,
    pub interview_dates: String,
    pub notes: String,
    pub resume_version: String,
    pub cover_letter_version: String,
    pub offer_received: String,
    pub offer_details: String,
    pub decision_made: String,
}

impl JobRecord {
    /// Field values in [`FIELDS`] order.
    pub fn values(&self) -> [&str; 20] {
        [
            &self.aid,
            &self.date,
            &self.company,
            &self.industry,
            &self.title,
            &self.period,
            &self.link,
            &self.contact_person,
            &self.contact_email,
            &self.contact_phone,
            &self.source,
            &self.status,
            &self.next_followup,
            &self.interview_dates,
            &self.notes,
            &self.resume_version,
            &self.cover_letter_version,
            &self.offer_received,
            &self.offer_details,
            &self.decision_made,
        ]
    }

    /// Owned row ready for a sink.
    pub fn to_row(&self) -> Vec<String> {
        self.values().iter().map(|v| v.to_string()).collect()
    }

    /// Header name → value, in header order.
    pub fn to_map(&self) -> IndexMap<&'static str, String> {
        FIELDS
            .iter()
            .copied()
            .zip(self.values().iter().map(|v| v.to_string()))
            .collect()
    }

    /// Rebuild a record from a sheet row.
    pub fn from_row(row: &[String]) -> Result<Self, AppError> {
        let [
            aid,
            date,
            company,
            industry,
            title,
            period,
            link,
            contact_person,
            contact_email,
            contact_phone,
            source,
            status,
            next_followup,
            interview_dates,
            notes,
            resume_version,
            cover_letter_version,
            offer_received,
            offer_details,
            decision_made,
        ]: [String; 20] = row.to_vec().try_into().map_err(|r: Vec<String>| {
            AppError::Generic(format!("Expected {} columns, got {}", FIELDS.len(), r.len()))
        })?;

        Ok(Self {
            aid,
            date,
            company,
            industry,
            title,
            period,
            link,
            contact_person,
            contact_email,
            contact_phone,
            source,
            status,
            next_followup,
            interview_dates,
            notes,
            resume_version,
            cover_letter_version,
            offer_received,
            offer_details,
            decision_made,
        })
    }
}

/// Explicit user values (CLI flags, form edits). Always win over scraped or
/// configured values. Blank strings count as absent.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub company: Option<String>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub industry: Option<String>,
    pub period: Option<String>,
    pub source: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub contact_person: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub next_followup: Option<String>,
    pub interview_dates: Option<String>,
    pub resume_version: Option<String>,
    pub cover_letter_version: Option<String>,
    pub offer_received: Option<String>,
    pub offer_details: Option<String>,
    pub decision_made: Option<String>,
}

/// A record plus the resolved location, which has no sheet column.
#[derive(Debug, Clone)]
pub struct AssembledRecord {
    pub record: JobRecord,
    pub location: String,
}

fn given(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Build the final record.
///
/// Every field follows the same precedence: explicit override, then the
/// scraped or derived value, then the configured default, then empty.
pub fn assemble_record<Tz: TimeZone>(
    url: &str,
    meta: &ScrapedMetadata,
    overrides: &Overrides,
    config: &Config,
    now: &DateTime<Tz>,
) -> AssembledRecord
where
    Tz::Offset: std::fmt::Display,
{
    let scraped = |field: &Option<String>| field.as_deref().and_then(non_empty);

    let company = given(&overrides.company)
        .or_else(|| scraped(&meta.company))
        .or_else(|| scraped(&meta.resolved_company))
        .unwrap_or_default();
    let title = given(&overrides.title)
        .or_else(|| scraped(&meta.title))
        .unwrap_or_default();
    let location = given(&overrides.location)
        .or_else(|| scraped(&meta.location))
        .unwrap_or_default();
    let notes = given(&overrides.notes).unwrap_or_default();

    let industry = given(&overrides.industry)
        .map(|raw| normalize_industry(&raw, &config.industry_allowed, &config.industry_aliases))
        .and_then(|label| non_empty(&label))
        .or_else(|| non_empty(&classify_industry(&title, &company, url, config)))
        .or_else(|| non_empty(&config.defaults.industry))
        .unwrap_or_default();

    let period = given(&overrides.period)
        .map(|p| capitalize(&p))
        .or_else(|| detect_period_from_text(&[title.as_str(), url, notes.as_str()]).map(|s| s.to_string()))
        .unwrap_or_else(|| guess_period(now).to_string());

    let source = given(&overrides.source)
        .or_else(|| non_empty(&config.defaults.source))
        .unwrap_or_default();
    let status = given(&overrides.status)
        .or_else(|| non_empty(&config.defaults.status))
        .unwrap_or_default();

    let record = JobRecord {
        aid: find_id_from_url(url),
        date: format_timestamp(now, &config.defaults.date_format),
        company,
        industry,
        title,
        period,
        link: url.to_string(),
        contact_person: given(&overrides.contact_person).unwrap_or_default(),
        contact_email: given(&overrides.contact_email).unwrap_or_default(),
        contact_phone: given(&overrides.contact_phone).unwrap_or_default(),
        source,
        status,
        next_followup: given(&overrides.next_followup).unwrap_or_default(),
        interview_dates: given(&overrides.interview_dates).unwrap_or_default(),
        notes,
        resume_version: given(&overrides.resume_version).unwrap_or_default(),
        cover_letter_version: given(&overrides.cover_letter_version).unwrap_or_default(),
        offer_received: given(&overrides.offer_received).unwrap_or_default(),
        offer_details: given(&overrides.offer_details).unwrap_or_default(),
        decision_made: given(&overrides.decision_made).unwrap_or_default(),
    };

    AssembledRecord { record, location }
}

/// Format `now` with a strftime-style pattern.
///
/// Windows-style no-padding flags (`%#d`) are accepted as their POSIX
/// spelling (`%-d`). An invalid pattern falls back to `%Y-%m-%d %H:%M:%S`.
pub fn format_timestamp<Tz: TimeZone>(now: &DateTime<Tz>, fmt: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let fmt = fmt.replace("%#", "%-");
    let items: Vec<Item<'_>> = StrftimeItems::new(&fmt).collect();
    if fmt.trim().is_empty() || items.iter().any(|item| matches!(item, Item::Error)) {
        tracing::warn!(date_format = %fmt, "Invalid date format, using default");
        return now.format(DEFAULT_DATE_FORMAT).to_string();
    }
    now.format_with_items(items.iter()).to_string()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 9, 5, 0).unwrap()
    }

    fn config() -> Config {
        Config::from_yaml(
            r#"
defaults:
  source: LinkedIn
  status: Applied
industry_allowed: [Finance, Tech]
industry_aliases:
  fintech: Finance
industry_rules:
  Tech: [software]
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_fields_round_trip_through_map() {
        let record = JobRecord {
            aid: "R1".into(),
            company: "Acme".into(),
            decision_made: "N".into(),
            ..Default::default()
        };
        let map = record.to_map();
        assert_eq!(map.len(), FIELDS.len());
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), FIELDS.to_vec());
        assert_eq!(map["AID"], "R1");
        assert_eq!(map["Company Name"], "Acme");
        assert_eq!(map["Decision Made (Y/N)"], "N");

        let back = JobRecord::from_row(&map.values().cloned().collect::<Vec<_>>()).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_from_row_rejects_wrong_arity() {
        let err = JobRecord::from_row(&["only".to_string()]).unwrap_err();
        assert!(err.to_string().contains("Expected 20 columns, got 1"));
    }

    #[test]
    fn test_scraped_values_and_defaults() {
        let meta = ScrapedMetadata {
            title: Some("Software Engineer".into()),
            location: Some("Remote".into()),
            resolved_company: Some("Acme".into()),
            ..Default::default()
        };
        let url = "https://boards.greenhouse.io/acme/jobs/1234567";
        let out = assemble_record(url, &meta, &Overrides::default(), &config(), &at(2025, 3, 2));
        let r = out.record;
        assert_eq!(r.aid, "1234567");
        assert_eq!(r.date, "2025-03-02 09:05:00");
        assert_eq!(r.company, "Acme");
        assert_eq!(r.industry, "Tech");
        assert_eq!(r.title, "Software Engineer");
        assert_eq!(r.period, "Spring");
        assert_eq!(r.link, url);
        assert_eq!(r.source, "LinkedIn");
        assert_eq!(r.status, "Applied");
        assert_eq!(r.notes, "");
        assert_eq!(out.location, "Remote");
    }

    #[test]
    fn test_overrides_win_everywhere() {
        let meta = ScrapedMetadata {
            title: Some("Scraped Title".into()),
            company: Some("Scraped Co".into()),
            location: Some("Scraped City".into()),
            ..Default::default()
        };
        let overrides = Overrides {
            company: Some("Given Co".into()),
            title: Some("Given Title".into()),
            location: Some("Given City".into()),
            industry: Some("FINTECH".into()),
            period: Some("winter".into()),
            source: Some("Referral".into()),
            status: Some("Interview".into()),
            contact_email: Some("hr@example.com".into()),
            ..Default::default()
        };
        let out = assemble_record(
            "https://acme.com/jobs/software-role",
            &meta,
            &overrides,
            &config(),
            &at(2025, 7, 1),
        );
        let r = out.record;
        assert_eq!(r.company, "Given Co");
        assert_eq!(r.title, "Given Title");
        assert_eq!(r.industry, "Finance");
        assert_eq!(r.period, "Winter");
        assert_eq!(r.source, "Referral");
        assert_eq!(r.status, "Interview");
        assert_eq!(r.contact_email, "hr@example.com");
        assert_eq!(out.location, "Given City");
    }

    #[test]
    fn test_unrecognised_industry_override_falls_back_to_classifier() {
        let overrides = Overrides {
            industry: Some("Basket weaving".into()),
            title: Some("Software Developer".into()),
            ..Default::default()
        };
        let out = assemble_record(
            "https://example.com",
            &ScrapedMetadata::empty(),
            &overrides,
            &config(),
            &at(2025, 10, 1),
        );
        assert_eq!(out.record.industry, "Tech");
    }

    #[test]
    fn test_blank_override_is_absent() {
        let meta = ScrapedMetadata {
            title: Some("Scraped Title".into()),
            ..Default::default()
        };
        let overrides = Overrides {
            title: Some("   ".into()),
            ..Default::default()
        };
        let out = assemble_record("https://example.com", &meta, &overrides, &config(), &at(2025, 1, 1));
        assert_eq!(out.record.title, "Scraped Title");
    }

    #[test]
    fn test_empty_metadata_yields_complete_record() {
        let out = assemble_record(
            "https://example.com/careers",
            &ScrapedMetadata::empty(),
            &Overrides::default(),
            &Config::default(),
            &at(2025, 3, 15),
        );
        let r = out.record;
        assert_eq!(r.company, "");
        assert_eq!(r.title, "");
        assert_eq!(r.industry, "");
        assert_eq!(r.period, "Spring");
        assert_eq!(r.source, "");
        assert_eq!(r.to_row().len(), 20);
    }

    #[test]
    fn test_period_detected_from_notes() {
        let overrides = Overrides {
            notes: Some("Internship runs May-Aug".into()),
            ..Default::default()
        };
        let out = assemble_record(
            "https://example.com",
            &ScrapedMetadata::empty(),
            &overrides,
            &Config::default(),
            &at(2025, 11, 1),
        );
        assert_eq!(out.record.period, "Summer");
    }

    #[test]
    fn test_format_timestamp() {
        let now = at(2025, 3, 2);
        assert_eq!(format_timestamp(&now, "%Y-%m-%d"), "2025-03-02");
        assert_eq!(format_timestamp(&now, "%-m/%-d/%Y"), "3/2/2025");
        assert_eq!(format_timestamp(&now, "%#m/%#d/%Y"), "3/2/2025");
        assert_eq!(format_timestamp(&now, "%Q"), "2025-03-02 09:05:00");
        assert_eq!(format_timestamp(&now, ""), "2025-03-02 09:05:00");
    }
}
