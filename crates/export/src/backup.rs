use crate::error::ExportError;
use chrono::{DateTime, Utc};
use configuration::Config;
use ledger::{FarmSnapshot, FarmState};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The only backup layout this build reads and writes.
pub const BACKUP_FORMAT_VERSION: u32 = 1;

/// A versioned, timestamped wrapper around a `FarmSnapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Backup {
    pub version: u32,
    pub exported_at: DateTime<Utc>,
    pub data: FarmSnapshot,
}

impl Backup {
    pub fn of(state: &FarmState) -> Self {
        Self {
            version: BACKUP_FORMAT_VERSION,
            exported_at: Utc::now(),
            data: state.snapshot(),
        }
    }
}

/// Serializes the entire state as pretty-printed JSON.
pub fn backup_json(state: &FarmState) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(&Backup::of(state))?)
}

/// Rebuilds a state container from a JSON backup.
///
/// The backup is checked for consistency (unique ids, known nutrients) and the
/// derived inventory fields are recomputed under `config`'s stock policy.
pub fn restore_json(config: &Config, json: &str) -> Result<FarmState, ExportError> {
    let backup: Backup = serde_json::from_str(json)?;
    if backup.version != BACKUP_FORMAT_VERSION {
        return Err(ExportError::UnsupportedVersion(backup.version));
    }
    tracing::info!(
        exported_at = %backup.exported_at,
        feeds = backup.data.feeds.len(),
        purchases = backup.data.purchases.len(),
        "Restoring farm backup."
    );
    Ok(FarmState::from_snapshot(config, backup.data)?)
}

pub fn save_backup(state: &FarmState, path: &Path) -> Result<(), ExportError> {
    fs::write(path, backup_json(state)?)?;
    tracing::info!(path = %path.display(), "Backup written.");
    Ok(())
}

pub fn load_backup(config: &Config, path: &Path) -> Result<FarmState, ExportError> {
    let json = fs::read_to_string(path)?;
    restore_json(config, &json)
}
