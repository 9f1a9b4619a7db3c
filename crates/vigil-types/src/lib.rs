pub mod observation;
pub mod sweep;

pub use observation::{Observation, RegionUsage};
pub use sweep::{SweepResult, SweepStatus, Violation};
