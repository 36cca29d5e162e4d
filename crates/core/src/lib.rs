pub mod error;
pub mod sample;

pub use error::{MonitorError, Result};
pub use sample::{Report, Sample};
