mod date_parser;
mod document;
mod table;
mod text;

pub use date_parser::{
    default_reference, extract_date, extract_date_with_reference, parse_fuzzy_date,
    RELEASED_MARKER, SCHEDULED_MARKER,
};
pub use document::{HeadingLevel, ParsedDocument};
pub use table::{extract_section, extract_section_with_reference};

use chrono::NaiveDate;
use shared_types::ReleaseRecord;

/// Sections read from a discography page, in output order.
pub const DEFAULT_SECTIONS: [&str; 2] = ["albums", "EPs"];

/// Collects release records from every configured section of a page.
pub struct DiscographyExtractor {
    sections: Vec<String>,
    reference: Option<NaiveDate>,
}

impl DiscographyExtractor {
    pub fn new() -> Self {
        Self::with_sections(DEFAULT_SECTIONS.iter().map(|s| s.to_string()).collect())
    }

    pub fn with_sections(sections: Vec<String>) -> Self {
        Self {
            sections,
            reference: None,
        }
    }

    /// Pin the date used to fill in partial release dates.
    pub fn with_reference(mut self, reference: NaiveDate) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn extract(&self, document: Option<&ParsedDocument>) -> Vec<ReleaseRecord> {
        let reference = self.reference.unwrap_or_else(default_reference);

        self.sections
            .iter()
            .flat_map(|heading| extract_section_with_reference(document, heading, reference))
            .collect()
    }
}

impl Default for DiscographyExtractor {
    fn default() -> Self {
        Self::new()
    }
}
