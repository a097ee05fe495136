use super::date_parser::{
    default_reference, extract_date_with_reference, RELEASED_MARKER, SCHEDULED_MARKER,
};
use super::document::{descendants, element_text, first_descendant, HeadingLevel, ParsedDocument};
use super::text::{normalize_whitespace, strip_citations};
use chrono::NaiveDate;
use scraper::ElementRef;
use shared_types::{ReleaseRecord, ReleaseStatus};
use tracing::{debug, warn};

/// Header and column-group rows at the top of every discography table.
const HEADER_ROWS: usize = 2;

/// Release records from the first table following the section named `heading`.
pub fn extract_section(document: Option<&ParsedDocument>, heading: &str) -> Vec<ReleaseRecord> {
    extract_section_with_reference(document, heading, default_reference())
}

pub fn extract_section_with_reference(
    document: Option<&ParsedDocument>,
    heading: &str,
    reference: NaiveDate,
) -> Vec<ReleaseRecord> {
    let mut results = Vec::new();
    let Some(document) = document else {
        return results;
    };

    let Some(table) = locate_table(document, heading) else {
        warn!("No table found for {}.", heading);
        return results;
    };

    for (i, row) in descendants(table, "tr").into_iter().enumerate() {
        if i < HEADER_ROWS {
            continue;
        }
        if let Some(record) = parse_row(row, reference) {
            results.push(record);
        }
    }

    debug!("Extracted {} rows for {}", results.len(), heading);
    results
}

fn locate_table<'a>(document: &'a ParsedDocument, heading: &str) -> Option<ElementRef<'a>> {
    let anchor = HeadingLevel::SEARCH_ORDER
        .iter()
        .find_map(|level| document.find_heading(*level, heading))?;
    document.following_table(anchor)
}

/// `None` for rows without a header cell.
fn parse_row(row: ElementRef<'_>, reference: NaiveDate) -> Option<ReleaseRecord> {
    let header = first_descendant(row, "th")?;
    let title = normalize_whitespace(&strip_citations(&element_text(&header)));

    let details = match first_descendant(row, "td") {
        Some(cell) => match first_descendant(cell, "li") {
            Some(item) => element_text(&item),
            None => element_text(&cell),
        },
        None => String::new(),
    };

    let (status, release_date) =
        match extract_date_with_reference(&details, RELEASED_MARKER, reference) {
            Some(date) => (ReleaseStatus::Released, Some(date)),
            None => (
                ReleaseStatus::Scheduled,
                extract_date_with_reference(&details, SCHEDULED_MARKER, reference),
            ),
        };

    Some(ReleaseRecord {
        title,
        status,
        release_date,
    })
}
