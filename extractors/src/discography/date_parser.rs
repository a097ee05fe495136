//! Lenient parsing of release dates out of discography detail text.
//!
//! Wikipedia detail bullets look like `Released: 12 March 2021 [3]` or
//! `Scheduled: 2025`. Dates are frequently partial, so any component that
//! the text leaves out is filled in from a reference date:
//!
//! - missing day   -> reference day (clamped to the month's length)
//! - missing month -> reference month
//! - missing year  -> reference year
//!
//! The default reference is 1 January of the current year, so a bare
//! `2021` becomes `2021-01-01` and `March 2021` becomes `2021-03-01`.

use super::text::strip_annotations;
use chrono::{Datelike, NaiveDate, Utc};
use shared_types::ExtractionError;
use tracing::debug;

pub const RELEASED_MARKER: &str = "Released: ";
pub const SCHEDULED_MARKER: &str = "Scheduled: ";

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

const FILLER_WORDS: [&str; 5] = ["of", "on", "the", "and", "at"];

/// 1 January of the current year.
pub fn default_reference() -> NaiveDate {
    let year = Utc::now().year();
    NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Find `marker` in `text` and parse the date that follows its last occurrence.
///
/// Returns `None` when the marker is absent or the remainder is not a date.
pub fn extract_date(text: &str, marker: &str) -> Option<NaiveDate> {
    extract_date_with_reference(text, marker, default_reference())
}

pub fn extract_date_with_reference(
    text: &str,
    marker: &str,
    reference: NaiveDate,
) -> Option<NaiveDate> {
    let marker_lower = marker.to_ascii_lowercase();
    if !text.to_ascii_lowercase().contains(&marker_lower) {
        return None;
    }

    let cleaned = strip_annotations(text);
    // ASCII lowering keeps byte offsets aligned with `cleaned`
    let remainder = match cleaned.to_ascii_lowercase().rfind(&marker_lower) {
        Some(idx) => &cleaned[idx + marker_lower.len()..],
        None => cleaned.as_str(),
    };

    match parse_fuzzy_date(remainder.trim(), reference) {
        Ok(date) => Some(date),
        Err(e) => {
            debug!("No date after {:?} in {:?}: {}", marker.trim(), text, e);
            None
        }
    }
}

#[derive(Debug, Default)]
struct DateParts {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
}

impl DateParts {
    fn set_year(&mut self, year: i32, token: &str) -> Result<(), ExtractionError> {
        if self.year.replace(year).is_some() {
            return Err(conflict("year", token));
        }
        Ok(())
    }

    fn set_month(&mut self, month: u32, token: &str) -> Result<(), ExtractionError> {
        if !(1..=12).contains(&month) {
            return Err(ExtractionError::DateParse(format!(
                "month out of range in '{}'",
                token
            )));
        }
        if self.month.replace(month).is_some() {
            return Err(conflict("month", token));
        }
        Ok(())
    }

    fn set_day(&mut self, day: u32, token: &str) -> Result<(), ExtractionError> {
        if !(1..=31).contains(&day) {
            return Err(ExtractionError::DateParse(format!(
                "day out of range in '{}'",
                token
            )));
        }
        if self.day.replace(day).is_some() {
            return Err(conflict("day", token));
        }
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.year.is_none() && self.month.is_none() && self.day.is_none()
    }
}

fn conflict(field: &str, token: &str) -> ExtractionError {
    ExtractionError::DateParse(format!("second {} found at '{}'", field, token))
}

/// Parse a free-text, possibly partial date.
pub fn parse_fuzzy_date(text: &str, reference: NaiveDate) -> Result<NaiveDate, ExtractionError> {
    let lowered = text.to_lowercase();
    let mut parts = DateParts::default();

    for raw in lowered.split(|c: char| c.is_whitespace() || c == ',' || c == ';') {
        let token = raw.trim_matches(|c: char| c == '.' || c == '\'');
        if token.is_empty() || token.chars().all(|c| c == '-' || c == '/') {
            continue;
        }
        parse_token(token, &mut parts)?;
    }

    if parts.is_empty() {
        return Err(ExtractionError::DateParse(format!(
            "no date components in '{}'",
            text
        )));
    }

    let year = parts.year.unwrap_or_else(|| reference.year());
    let month = parts.month.unwrap_or_else(|| reference.month());
    let day = match parts.day {
        Some(day) => day,
        None => reference.day().min(days_in_month(year, month)),
    };

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        ExtractionError::DateParse(format!("{}-{:02}-{:02} is not a valid date", year, month, day))
    })
}

fn parse_token(token: &str, parts: &mut DateParts) -> Result<(), ExtractionError> {
    if token.chars().all(|c| c.is_ascii_digit()) {
        return parse_number(token, parts);
    }

    if token.contains('-') || token.contains('/') {
        return parse_numeric_date(token, parts);
    }

    if let Some(digits) = strip_ordinal(token) {
        let day = digits.parse::<u32>().map_err(|e| invalid_token(token, e))?;
        return parts.set_day(day, token);
    }

    if token.chars().all(|c| c.is_alphabetic()) {
        if let Some(month) = month_from_name(token) {
            return parts.set_month(month, token);
        }
        if is_weekday(token) || FILLER_WORDS.contains(&token) {
            return Ok(());
        }
    }

    Err(ExtractionError::DateParse(format!("unknown token '{}'", token)))
}

fn parse_number(token: &str, parts: &mut DateParts) -> Result<(), ExtractionError> {
    match token.len() {
        4 => {
            let year = token.parse::<i32>().map_err(|e| invalid_token(token, e))?;
            parts.set_year(year, token)
        }
        1 | 2 => {
            let value = token.parse::<u32>().map_err(|e| invalid_token(token, e))?;
            parts.set_day(value, token)
        }
        _ => Err(ExtractionError::DateParse(format!(
            "unexpected number '{}'",
            token
        ))),
    }
}

/// `2021-03-12`, `2021-03`, `03/12/2021` and `03/2021`.
fn parse_numeric_date(token: &str, parts: &mut DateParts) -> Result<(), ExtractionError> {
    let separator = if token.contains('-') { '-' } else { '/' };
    let fields = token
        .split(separator)
        .map(|field| field.parse::<u32>().map_err(|e| invalid_token(token, e)))
        .collect::<Result<Vec<_>, _>>()?;

    let year = |value: u32| i32::try_from(value).map_err(|e| invalid_token(token, e));

    match (separator, fields.as_slice()) {
        ('-', [y, m]) => {
            parts.set_year(year(*y)?, token)?;
            parts.set_month(*m, token)
        }
        ('-', [y, m, d]) => {
            parts.set_year(year(*y)?, token)?;
            parts.set_month(*m, token)?;
            parts.set_day(*d, token)
        }
        ('/', [m, y]) => {
            parts.set_month(*m, token)?;
            parts.set_year(year(*y)?, token)
        }
        ('/', [m, d, y]) => {
            parts.set_month(*m, token)?;
            parts.set_day(*d, token)?;
            parts.set_year(year(*y)?, token)
        }
        _ => Err(ExtractionError::DateParse(format!(
            "unsupported numeric date '{}'",
            token
        ))),
    }
}

fn strip_ordinal(token: &str) -> Option<&str> {
    ["st", "nd", "rd", "th"].iter().find_map(|suffix| {
        token
            .strip_suffix(suffix)
            .filter(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
    })
}

/// Full names and abbreviations of at least three letters (`sep`, `sept`).
fn month_from_name(token: &str) -> Option<u32> {
    if token.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|name| name.starts_with(token))
        .map(|idx| idx as u32 + 1)
}

fn is_weekday(token: &str) -> bool {
    token.len() >= 3 && WEEKDAYS.iter().any(|name| name.starts_with(token))
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

fn invalid_token(token: &str, err: impl std::fmt::Display) -> ExtractionError {
    ExtractionError::DateParse(format!("invalid token '{}': {}", token, err))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_extract_full_date() {
        let date = extract_date_with_reference("Released: 12 March 2021", RELEASED_MARKER, reference());
        assert_eq!(date, Some(ymd(2021, 3, 12)));
    }

    #[test]
    fn test_extract_year_after_citation() {
        let date = extract_date_with_reference(
            "Released: [citation needed] 2021",
            RELEASED_MARKER,
            reference(),
        );
        assert_eq!(date, Some(ymd(2021, 1, 1)));
    }

    #[test]
    fn test_default_reference_fills_day_and_month() {
        let date = extract_date("Released: [citation needed] 2021", RELEASED_MARKER).unwrap();
        assert_eq!(date.year(), 2021);
        assert_eq!(date.month(), 1);
        assert_eq!(date.day(), 1);
    }

    #[test]
    fn test_missing_marker() {
        assert_eq!(extract_date("No release info", RELEASED_MARKER), None);
        assert_eq!(extract_date("Released: 2020", SCHEDULED_MARKER), None);
    }

    #[test]
    fn test_unparseable_remainder() {
        assert_eq!(extract_date("Released: TBA", RELEASED_MARKER), None);
        assert_eq!(extract_date("Released: ", RELEASED_MARKER), None);
    }

    #[test]
    fn test_marker_is_case_insensitive() {
        let date = extract_date_with_reference("RELEASED: 5 May 2020", RELEASED_MARKER, reference());
        assert_eq!(date, Some(ymd(2020, 5, 5)));
    }

    #[test]
    fn test_last_marker_occurrence_wins() {
        let date = extract_date_with_reference(
            "Released: 1 June 2019 Released: 3 July 2020",
            RELEASED_MARKER,
            reference(),
        );
        assert_eq!(date, Some(ymd(2020, 7, 3)));
    }

    #[test]
    fn test_annotations_are_removed() {
        let date = extract_date_with_reference(
            "Released: 5 May 2020 (US)[4]",
            RELEASED_MARKER,
            reference(),
        );
        assert_eq!(date, Some(ymd(2020, 5, 5)));
    }

    #[test]
    fn test_scheduled_marker() {
        let date = extract_date_with_reference("Scheduled: 2025", SCHEDULED_MARKER, reference());
        assert_eq!(date, Some(ymd(2025, 1, 1)));
    }

    #[test]
    fn test_written_orders() {
        assert_eq!(parse_fuzzy_date("March 12, 2021", reference()), Ok(ymd(2021, 3, 12)));
        assert_eq!(parse_fuzzy_date("12th of March 2021", reference()), Ok(ymd(2021, 3, 12)));
        assert_eq!(parse_fuzzy_date("Sept. 9 1999", reference()), Ok(ymd(1999, 9, 9)));
        assert_eq!(parse_fuzzy_date("Friday, 13 Oct 2017", reference()), Ok(ymd(2017, 10, 13)));
    }

    #[test]
    fn test_numeric_forms() {
        assert_eq!(parse_fuzzy_date("2021-03-12", reference()), Ok(ymd(2021, 3, 12)));
        assert_eq!(parse_fuzzy_date("2021-03", reference()), Ok(ymd(2021, 3, 1)));
        assert_eq!(parse_fuzzy_date("03/12/2021", reference()), Ok(ymd(2021, 3, 12)));
    }

    #[test]
    fn test_partial_dates_use_reference() {
        let reference = ymd(2024, 6, 30);
        assert_eq!(parse_fuzzy_date("2019", reference), Ok(ymd(2019, 6, 30)));
        assert_eq!(parse_fuzzy_date("February 2019", reference), Ok(ymd(2019, 2, 28)));
        assert_eq!(parse_fuzzy_date("4 July", reference), Ok(ymd(2024, 7, 4)));
    }

    #[test]
    fn test_rejects_non_dates() {
        assert!(parse_fuzzy_date("", reference()).is_err());
        assert!(parse_fuzzy_date("TBA", reference()).is_err());
        assert!(parse_fuzzy_date("Spring 2021", reference()).is_err());
        assert!(parse_fuzzy_date("31 February 2021", reference()).is_err());
        assert!(parse_fuzzy_date("2020 2021", reference()).is_err());
    }
}
