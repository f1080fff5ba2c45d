use std::io::Write;

use log::{debug, error};

use crate::capture::sink::RecordStream;
use crate::storage::storage_trait::CaptureStorage;

use super::formatter::render_record;

/// Drains a session's record stream, printing each record to the console
/// and mirroring the same text into the capture log when one is configured.
///
/// A storage failure is logged and otherwise swallowed: a broken consumer
/// must never reach back into the relay path, and the console output stays
/// useful on its own.
pub struct RecordLogger {
    columns: usize,
    storage: Option<Box<dyn CaptureStorage>>,
}

impl RecordLogger {
    pub fn new(columns: usize) -> Self {
        Self {
            columns,
            storage: None,
        }
    }

    pub fn with_storage(mut self, storage: Box<dyn CaptureStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Writes `text` to the console and, when configured, the capture log.
    pub fn emit(&mut self, text: &str) {
        print!("{}", text);
        let _ = std::io::stdout().flush();
        if let Some(storage) = self.storage.as_mut() {
            if let Err(e) = storage.append_text(text) {
                error!("Capture log write failed: {}", e);
            }
        }
    }

    /// Consumes records until every sink handle is gone and the queue is
    /// drained, i.e. until the session is fully torn down.
    pub async fn run(mut self, mut records: RecordStream) {
        debug!("record logger started, {} column(s)", self.columns);
        while let Some(record) = records.next().await {
            let block = format!("{}\n", render_record(&record, self.columns));
            self.emit(&block);
        }
        debug!("record stream closed, logger exiting");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::sink::record_channel;
    use crate::capture::types::{CaptureRecord, Direction};
    use crate::error_handling::types::StorageError;
    use std::sync::{Arc, Mutex};

    struct MemStorage {
        inner: Arc<Mutex<String>>,
        fail: bool,
    }

    impl CaptureStorage for MemStorage {
        fn append_text(&mut self, text: &str) -> Result<(), StorageError> {
            if self.fail {
                return Err(StorageError::WriteFailed);
            }
            self.inner.lock().unwrap().push_str(text);
            Ok(())
        }
    }

    #[tokio::test]
    async fn mirrors_rendered_records_into_storage() {
        let _ = env_logger::builder().is_test(true).try_init();
        let written = Arc::new(Mutex::new(String::new()));
        let storage = MemStorage {
            inner: Arc::clone(&written),
            fail: false,
        };
        let logger = RecordLogger::new(8).with_storage(Box::new(storage));

        let (sink, stream) = record_channel();
        sink.push(CaptureRecord::new(Direction::Outgoing, b"OK".to_vec()));
        drop(sink);
        logger.run(stream).await;

        let written = written.lock().unwrap();
        assert!(written.starts_with("[OUTGOING] "));
        assert!(written.contains(" 4f 4b\n"));
    }

    #[tokio::test]
    async fn storage_failure_does_not_stop_the_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
        let written = Arc::new(Mutex::new(String::new()));
        let storage = MemStorage {
            inner: Arc::clone(&written),
            fail: true,
        };
        let logger = RecordLogger::new(8).with_storage(Box::new(storage));

        let (sink, stream) = record_channel();
        sink.push(CaptureRecord::new(Direction::Incoming, b"a".to_vec()));
        sink.push(CaptureRecord::new(Direction::Incoming, b"b".to_vec()));
        drop(sink);
        // Must drain both records and return despite the failing backend.
        logger.run(stream).await;
        assert!(written.lock().unwrap().is_empty());
    }
}
