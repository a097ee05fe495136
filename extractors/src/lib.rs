//! Extractors Crate
//!
//! Turns Wikipedia discography pages into structured release records.
//!
//! # Available Extractors
//!
//! - `DiscographyExtractor`: reads the albums and EPs tables of a discography page
//!
//! # Example
//!
//! ```rust,ignore
//! use extractors::{DiscographyExtractor, ParsedDocument};
//!
//! let document = ParsedDocument::parse(&body);
//! let records = DiscographyExtractor::new().extract(Some(&document));
//! ```

pub mod discography;

// Re-export commonly used types
pub use discography::{
    extract_date, extract_section, parse_fuzzy_date, DiscographyExtractor, ParsedDocument,
};
