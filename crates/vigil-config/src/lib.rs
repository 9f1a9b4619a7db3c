pub mod global;
pub mod loader;

pub use global::{
    AlertConfig, AllowlistConfig, GlobalConfig, MonitoringConfig, ScheduleConfig, ServerConfig,
};
pub use loader::ConfigLoader;
