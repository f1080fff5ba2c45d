//! Relay-and-capture subsystem.
//!
//! This module owns the core of the tap: the capture value types, the
//! observation sink the forwarding tasks publish into, and the relay engine
//! that moves bytes between the device and proxy endpoints.

pub mod relay;
pub mod sink;
pub mod types;

pub use relay::{RelayConfig, RelayEngine};
pub use sink::{record_channel, RecordSink, RecordStream};
pub use types::{CaptureRecord, Direction, SniffMode};
