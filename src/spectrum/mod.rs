pub mod analyzer;
pub mod extractor;
pub mod frequency;

pub use analyzer::{SpectrumAnalyzer, UnsupportedWindowSize};
pub use extractor::extract;
pub use frequency::build_frequency_axis;
