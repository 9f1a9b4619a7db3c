pub mod store;

pub use store::{AllowlistStore, StoreError};
