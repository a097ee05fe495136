pub mod extraction;
pub mod release;

pub use extraction::ExtractionError;
pub use release::{ReleaseRecord, ReleaseStatus};
