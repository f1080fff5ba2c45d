//! Console presentation of the capture stream.

pub mod formatter;
pub mod record_logger;

pub use formatter::render_record;
pub use record_logger::RecordLogger;
