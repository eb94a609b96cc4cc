//! Structured request logging for the AluraGeek catalog.
//!
//! Each request gets a [`StructuredLogger`] carrying its [`RequestId`],
//! the workload and the matched route. Entries go to stderr as JSON lines
//! (or a human format when running locally).

mod logging;
mod request_id;

pub use logging::{
    LogBuilder, LogEntry, LogFormat, LogLevel, LogSink, ParseLogSettingError, StructuredLogger,
};
pub use request_id::RequestId;
