//! Recruiting-period detection.

use std::fmt;

use chrono::Datelike;

/// Recruiting season a posting belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direct trigger phrases, checked season by season in this order.
const SEASON_WORDS: &[(Season, &[&str])] = &[
    (Season::Spring, &["spring"]),
    (
        Season::Summer,
        &["summer", "may-aug", "may to aug", "may through aug"],
    ),
    (Season::Fall, &["fall", "autumn", "sep-dec", "sept-dec"]),
    (Season::Winter, &["winter", "dec-mar", "jan-mar"]),
];

const MONTHS: &[&str] = &[
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec",
];

// Month buckets are a heuristic, not a calendar: Jan/Feb deliberately map to
// Spring and Winter is only reachable through a direct keyword.
const MONTH_BUCKETS: &[(Season, &[&str])] = &[
    (Season::Summer, &["may", "jun", "jul", "aug"]),
    (Season::Spring, &["mar", "apr"]),
    (Season::Fall, &["sep", "sept", "oct", "nov", "dec"]),
    (Season::Spring, &["jan", "feb"]),
];

/// Infer the season from free-text fragments (title, URL, notes...).
///
/// Direct season keywords win; otherwise month abbreviations are bucketed.
/// Matching is by substring on the lower-cased, space-joined fragments.
pub fn detect_period_from_text(texts: &[&str]) -> Option<Season> {
    let blob = texts.join(" ").to_lowercase();

    let direct = SEASON_WORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| blob.contains(w)))
        .map(|(season, _)| *season);
    if direct.is_some() {
        return direct;
    }

    if !MONTHS.iter().any(|m| blob.contains(m)) {
        return None;
    }
    MONTH_BUCKETS
        .iter()
        .find(|(_, months)| months.iter().any(|m| blob.contains(m)))
        .map(|(season, _)| *season)
}

/// Calendar mapping: months 1–4 Spring, 5–8 Summer, 9–12 Fall.
pub fn month_to_season(month: u32) -> Option<Season> {
    match month {
        1..=4 => Some(Season::Spring),
        5..=8 => Some(Season::Summer),
        9..=12 => Some(Season::Fall),
        _ => None,
    }
}

/// Fallback period from the current date. Never returns Winter.
pub fn guess_period(now: &impl Datelike) -> Season {
    month_to_season(now.month()).unwrap_or(Season::Fall)
}
