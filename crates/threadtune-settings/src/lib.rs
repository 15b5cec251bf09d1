//! # ThreadTune Settings
//!
//! Persistence of the thread parameter dialog: the flat comma-separated
//! record, its legacy migration, and the store that reads and writes it
//! under the platform configuration directory.

pub mod error;
pub mod persistence;
pub mod record;

pub use error::{SettingsError, SettingsResult};
pub use persistence::{RecordStore, RECORD_FILE_NAME};
pub use record::{
    ParsedRecord, Substitution, ThreadRecord, FIELD_COUNT, LEGACY_FIELD_COUNT,
};
