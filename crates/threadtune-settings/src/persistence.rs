//! Loading and saving the parameter record.

use crate::error::{SettingsError, SettingsResult};
use crate::record::{ParsedRecord, ThreadRecord};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the persisted record.
pub const RECORD_FILE_NAME: &str = "DialogInput_V3.txt";

/// Reads and writes the single-line parameter record.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform configuration directory.
    pub fn open_default() -> SettingsResult<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    /// `<config dir>/threadtune/DialogInput_V3.txt`
    pub fn default_path() -> SettingsResult<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| {
            SettingsError::ConfigDirectory("no configuration directory on this platform".into())
        })?;
        Ok(dir.join("threadtune").join(RECORD_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the record. A missing file yields the defaults.
    ///
    /// Only the first non-blank line is read. Substituted fields are
    /// logged and returned with the record.
    pub fn load(&self) -> SettingsResult<ParsedRecord> {
        if !self.path.exists() {
            tracing::debug!("No parameter record at {:?}, using defaults", self.path);
            return Ok(ParsedRecord {
                record: ThreadRecord::default(),
                substitutions: Vec::new(),
                migrated: false,
            });
        }

        let content = fs::read_to_string(&self.path)?;
        let line = content
            .lines()
            .find(|l| !l.trim().is_empty())
            .unwrap_or_default();
        let parsed = ThreadRecord::parse(line);

        if parsed.migrated {
            tracing::info!("Migrated legacy parameter record from {:?}", self.path);
        }
        for sub in &parsed.substitutions {
            tracing::warn!("Parameter record {:?}: {}", self.path, sub);
        }
        Ok(parsed)
    }

    /// Validate and write the record as one line.
    pub fn save(&self, record: &ThreadRecord) -> SettingsResult<()> {
        validate(record)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    SettingsError::ConfigDirectory(format!("{}: {}", parent.display(), e))
                })?;
            }
        }
        fs::write(&self.path, format!("{}\n", record))?;
        tracing::debug!("Saved parameter record to {:?}", self.path);
        Ok(())
    }
}

fn validate(record: &ThreadRecord) -> SettingsResult<()> {
    record.spec.validate()?;
    for (key, dims) in [("bolt_head", &record.bolt_head), ("nut", &record.nut)] {
        if dims.sides < 3 {
            return Err(SettingsError::InvalidSetting {
                key: format!("{}_sides", key),
                reason: "at least 3 sides required".to_string(),
            });
        }
        for (field, value) in [("flat", dims.across_flats), ("height", dims.height)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SettingsError::InvalidSetting {
                    key: format!("{}_{}", key, field),
                    reason: format!("must be positive, got {}", value),
                });
            }
        }
    }
    if !(record.chamfer_width.is_finite() && record.chamfer_width > 0.0) {
        return Err(SettingsError::InvalidSetting {
            key: "chamfer_width".to_string(),
            reason: format!("must be positive, got {}", record.chamfer_width),
        });
    }
    Ok(())
}
