//! Storage subsystem
//!
//! Persistence for the rendered capture stream.
//!
//! Components:
//! - `storage_trait`: the CaptureStorage trait defining a uniform API.
//! - `file_storage`: append-only filesystem implementation.

pub mod file_storage;
pub mod storage_trait;

pub use file_storage::FileStorage;
pub use storage_trait::CaptureStorage;
