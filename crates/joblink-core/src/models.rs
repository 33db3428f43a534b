use crate::text::normalize_ws;

/// Best-effort metadata scraped from one posting page.
///
/// Only keys an extraction step is confident about are `Some`. `None` means
/// "not found", which downstream fallbacks treat differently from a value
/// that was found but blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ScrapedMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Company resolver output, kept for comparison with the adapter's guess.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_company: Option<String>,
}

impl ScrapedMetadata {
    /// Metadata with nothing found, used when a fetch fails.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.company.is_none()
            && self.location.is_none()
            && self.resolved_company.is_none()
    }

    /// Fill keys that are still missing from `other`, keeping found values.
    pub fn fill_missing(&mut self, other: ScrapedMetadata) {
        self.title = self.title.take().or(other.title);
        self.company = self.company.take().or(other.company);
        self.location = self.location.take().or(other.location);
        self.resolved_company = self.resolved_company.take().or(other.resolved_company);
    }

    /// Collapse whitespace runs and trim every present field.
    pub fn normalize_whitespace(&mut self) {
        for field in [
            &mut self.title,
            &mut self.company,
            &mut self.location,
            &mut self.resolved_company,
        ] {
            if let Some(value) = field.as_mut() {
                *value = normalize_ws(value);
            }
        }
    }
}
