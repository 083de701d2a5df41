pub mod errors;
pub mod sample_window;

pub use errors::CycleError;
pub use sample_window::{Axis, SampleWindow, BYTES_PER_SAMPLE};
