pub mod client;
pub mod error;
pub mod query;
pub mod source;

pub use client::MonitoringClient;
pub use error::QueryError;
pub use query::{TimeWindow, UsageQuery};
pub use source::UsageSource;
