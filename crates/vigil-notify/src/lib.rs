pub mod dispatcher;
pub mod sink;

pub use dispatcher::{AlertDispatcher, RunPhase};
pub use sink::{AlertSink, HttpAlertSink, NotifyError};
