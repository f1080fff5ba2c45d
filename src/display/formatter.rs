//! Hex + ASCII rendering of capture records.
//!
//! One record renders as a header line followed by rows of `columns` payload
//! bytes each:
//!
//! ```text
//! [INCOMING] 18:21:33.123456 (3 bytes)    AT\r                             41 54 0d
//! ```
//!
//! The ASCII column is escaped (so control bytes stay visible) and padded to
//! `columns * 4` characters, the worst case being a `\xNN` escape per byte.
//! Continuation rows are indented to the width of the header so the columns
//! line up.

use crate::capture::types::CaptureRecord;

pub fn render_record(record: &CaptureRecord, columns: usize) -> String {
    let header = format!(
        "[{}] {} ({} bytes)",
        record.direction,
        record.timestamp.format("%H:%M:%S%.6f"),
        record.payload.len()
    );

    let mut out = String::new();
    for (row, chunk) in record.payload.chunks(columns).enumerate() {
        if row == 0 {
            out.push_str(&header);
        } else {
            out.push_str(&" ".repeat(header.len()));
        }
        let ascii = chunk.escape_ascii().to_string();
        let hex = chunk
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>()
            .join(" ");
        out.push('\t');
        out.push_str(&format!("{:<width$} {}", ascii, hex, width = columns * 4));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::types::Direction;
    use chrono::TimeZone;

    fn record_at(direction: Direction, payload: &[u8]) -> CaptureRecord {
        let timestamp = chrono::Utc
            .with_ymd_and_hms(2024, 5, 17, 18, 21, 33)
            .unwrap()
            + chrono::Duration::microseconds(123456);
        CaptureRecord {
            direction,
            timestamp,
            payload: payload.to_vec(),
        }
    }

    #[test]
    fn renders_a_single_row_payload() {
        let record = record_at(Direction::Incoming, b"AT\r");
        let rendered = render_record(&record, 8);
        let expected = format!(
            "[INCOMING] 18:21:33.123456 (3 bytes)\t{:<32} 41 54 0d\n",
            "AT\\r"
        );
        assert_eq!(rendered, expected);
    }

    #[test]
    fn renders_device_output_with_outgoing_tag() {
        let record = record_at(Direction::Outgoing, b"\r\nOK\r\n");
        let rendered = render_record(&record, 8);
        assert!(rendered.starts_with("[OUTGOING] 18:21:33.123456 (6 bytes)\t"));
        assert!(rendered.ends_with(" 0d 0a 4f 4b 0d 0a\n"));
        assert!(rendered.contains("\\r\\nOK\\r\\n"));
    }

    #[test]
    fn wraps_long_payloads_and_aligns_continuation_rows() {
        let record = record_at(Direction::Outgoing, b"0123456789");
        let rendered = render_record(&record, 4);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            format!("[OUTGOING] 18:21:33.123456 (10 bytes)\t{:<16} 30 31 32 33", "0123")
        );
        let indent = " ".repeat("[OUTGOING] 18:21:33.123456 (10 bytes)".len());
        assert_eq!(lines[1], format!("{}\t{:<16} 34 35 36 37", indent, "4567"));
        assert_eq!(lines[2], format!("{}\t{:<16} 38 39", indent, "89"));
    }

    #[test]
    fn escapes_non_printable_bytes() {
        let record = record_at(Direction::Incoming, &[0x00, 0x1a, 0xff]);
        let rendered = render_record(&record, 8);
        assert!(rendered.contains("\\x00\\x1a\\xff"));
        assert!(rendered.contains("00 1a ff"));
    }
}
