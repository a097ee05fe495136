/// Extraction error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    #[error("Date parse error: {0}")]
    DateParse(String),
}
