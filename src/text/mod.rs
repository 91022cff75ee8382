//! Local text processing: attribute parsing, JSON recovery and normalization.

mod attributes;
pub mod extract;
mod normalize;

pub use attributes::{parse_attributes, AttributeMap};
pub use extract::{extract, extract_array, ExtractionError, Shape};
pub use normalize::{normalize, DescriptionResult};
