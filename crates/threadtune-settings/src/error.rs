//! Error types for the settings crate.
//!
//! This module provides structured error types for parameter record
//! persistence and validation.

use std::io;
use thiserror::Error;
use threadtune_core::SpecError;

/// Errors that can occur while loading or saving parameter records.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The configuration directory could not be found or created.
    #[error("Config directory error: {0}")]
    ConfigDirectory(String),

    /// A record value is invalid and cannot be written.
    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },

    /// The thread parameters failed validation.
    #[error("Invalid thread parameters: {0}")]
    Spec(#[from] SpecError),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

/// Result type alias for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;
