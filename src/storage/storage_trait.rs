//! Storage Trait
//!
//! Interface implemented by capture persistence backends. The record logger
//! writes the same text it prints, so a backend only needs append semantics.

use crate::error_handling::types::StorageError;

pub trait CaptureStorage: Send {
    /// Appends already-rendered capture text. Implementations must not
    /// reorder or rewrite earlier content.
    fn append_text(&mut self, text: &str) -> Result<(), StorageError>;
}
