pub mod aggregate;
pub mod detect;
pub mod runner;
pub mod scheduler;

pub use aggregate::aggregate;
pub use detect::detect;
pub use runner::SweepRunner;
pub use scheduler::{start_sweep_task, SweepTaskHandle};
