//! Common data types used across the capture subsystem.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Direction of a relayed chunk, always relative to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Bytes flowing from the host application towards the serial device.
    Incoming,
    /// Bytes flowing from the serial device back to the host application.
    Outgoing,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Incoming => write!(f, "INCOMING"),
            Direction::Outgoing => write!(f, "OUTGOING"),
        }
    }
}

/// Which directions get copied into the observation sink.
///
/// Both directions are always *forwarded*; the mode only selects what is
/// captured. With neither CLI flag set the tap records device output only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SniffMode {
    IncomingOnly,
    OutgoingOnly,
    Bidirectional,
}

impl SniffMode {
    /// Resolve the mode from the two direction flags. No flags defaults to
    /// outgoing-only.
    pub fn from_flags(incoming: bool, outgoing: bool) -> Self {
        match (incoming, outgoing) {
            (true, true) => SniffMode::Bidirectional,
            (true, false) => SniffMode::IncomingOnly,
            _ => SniffMode::OutgoingOnly,
        }
    }

    /// Whether chunks transferred in `direction` are captured.
    pub fn captures(&self, direction: Direction) -> bool {
        match self {
            SniffMode::Bidirectional => true,
            SniffMode::IncomingOnly => direction == Direction::Incoming,
            SniffMode::OutgoingOnly => direction == Direction::Outgoing,
        }
    }
}

/// One observed transfer chunk.
///
/// The payload is a private copy of exactly the bytes the underlying read
/// returned; it never aliases the relay's working buffer and is not mutated
/// after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureRecord {
    /// Flow direction of this chunk.
    pub direction: Direction,
    /// Capture instant (UTC), taken when the chunk was forwarded.
    pub timestamp: DateTime<Utc>,
    /// The forwarded bytes, length >= 1.
    pub payload: Vec<u8>,
}

impl CaptureRecord {
    pub fn new(direction: Direction, payload: Vec<u8>) -> Self {
        Self {
            direction,
            timestamp: Utc::now(),
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_defaults_to_outgoing_only() {
        assert_eq!(SniffMode::from_flags(false, false), SniffMode::OutgoingOnly);
        assert_eq!(SniffMode::from_flags(false, true), SniffMode::OutgoingOnly);
        assert_eq!(SniffMode::from_flags(true, false), SniffMode::IncomingOnly);
        assert_eq!(SniffMode::from_flags(true, true), SniffMode::Bidirectional);
    }

    #[test]
    fn mode_selects_captured_directions() {
        assert!(SniffMode::Bidirectional.captures(Direction::Incoming));
        assert!(SniffMode::Bidirectional.captures(Direction::Outgoing));
        assert!(SniffMode::IncomingOnly.captures(Direction::Incoming));
        assert!(!SniffMode::IncomingOnly.captures(Direction::Outgoing));
        assert!(!SniffMode::OutgoingOnly.captures(Direction::Incoming));
        assert!(SniffMode::OutgoingOnly.captures(Direction::Outgoing));
    }

    #[test]
    fn direction_display_matches_log_tags() {
        assert_eq!(Direction::Incoming.to_string(), "INCOMING");
        assert_eq!(Direction::Outgoing.to_string(), "OUTGOING");
    }

    #[test]
    fn record_owns_its_payload() {
        let record = CaptureRecord::new(Direction::Incoming, b"AT\r".to_vec());
        assert_eq!(record.direction, Direction::Incoming);
        assert_eq!(record.payload, b"AT\r");
    }
}
