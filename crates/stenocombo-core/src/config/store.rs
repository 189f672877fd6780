//! Flat key-value settings storage.
//!
//! Settings live in a single TOML table at
//! `~/.config/stenocombo/settings.toml`. Values are typed loosely on disk; a
//! read only succeeds when the stored value matches the kind the caller asks
//! for, so a hand-edited file with a bad value falls back to the default.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::fields::{Alignment, FieldKind, FieldValue};
use crate::error::ConfigError;

/// Persisted key-value storage for settings.
pub trait SettingsStore {
    /// The value under `key`, if one is stored and has the expected kind.
    fn get(&self, key: &str, kind: FieldKind) -> Option<FieldValue>;

    fn set(&mut self, key: &str, value: FieldValue);
}

/// In-memory store, used by tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, FieldValue>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str, kind: FieldKind) -> Option<FieldValue> {
        self.values.get(key).filter(|v| v.fits(kind)).cloned()
    }

    fn set(&mut self, key: &str, value: FieldValue) {
        self.values.insert(key.to_string(), value);
    }
}

/// TOML-file-backed store. Changes are held in memory until [`TomlStore::flush`].
#[derive(Debug, Clone)]
pub struct TomlStore {
    path: PathBuf,
    table: toml::Table,
}

impl TomlStore {
    /// Open the settings file in the default data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created or the file
    /// exists but is not valid TOML.
    pub fn open_default() -> Result<Self, ConfigError> {
        let dir = data_dir()?;
        Self::open(dir.join("settings.toml"))
    }

    /// Open `path`. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let table = match std::fs::read_to_string(&path) {
            Ok(content) => content
                .parse::<toml::Table>()
                .map_err(|e| ConfigError::ParseFailed {
                    path: path.clone(),
                    message: e.to_string(),
                })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no settings file at {}, using defaults", path.display());
                toml::Table::new()
            }
            Err(e) => {
                return Err(ConfigError::LoadFailed {
                    path,
                    message: e.to_string(),
                })
            }
        };
        Ok(Self { path, table })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drop every stored value.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be serialized or written.
    pub fn flush(&self) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: self.path.clone(),
            message,
        };
        let content = toml::to_string_pretty(&self.table).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(&self.path, content).map_err(|e| save_failed(e.to_string()))?;
        tracing::debug!("settings written to {}", self.path.display());
        Ok(())
    }
}

impl SettingsStore for TomlStore {
    fn get(&self, key: &str, kind: FieldKind) -> Option<FieldValue> {
        let value = self.table.get(key)?;
        match (kind, value) {
            (FieldKind::Bool, toml::Value::Boolean(b)) => Some(FieldValue::Bool(*b)),
            (FieldKind::Int, toml::Value::Integer(i)) => Some(FieldValue::Int(*i)),
            (FieldKind::Text | FieldKind::ColorTable, toml::Value::String(s)) => {
                Some(FieldValue::Text(s.clone()))
            }
            (FieldKind::Alignment, toml::Value::String(s)) => {
                s.parse::<Alignment>().ok().map(FieldValue::Alignment)
            }
            (FieldKind::Alignment, toml::Value::Integer(i)) => {
                Alignment::from_index(*i).map(FieldValue::Alignment)
            }
            _ => None,
        }
    }

    fn set(&mut self, key: &str, value: FieldValue) {
        let value = match value {
            FieldValue::Bool(b) => toml::Value::Boolean(b),
            FieldValue::Int(i) => toml::Value::Integer(i),
            FieldValue::Alignment(a) => toml::Value::String(a.as_str().to_string()),
            FieldValue::Text(s) => toml::Value::String(s),
        };
        self.table.insert(key.to_string(), value);
    }
}

/// Returns `~/.config/stenocombo[-dev]/`, creating it if needed.
///
/// `STENOCOMBO_CONFIG_DIR` overrides the location; otherwise
/// `STENOCOMBO_ENV=dev` selects the development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("STENOCOMBO_CONFIG_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("STENOCOMBO_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("stenocombo-dev")
            } else {
                base_dir.join("stenocombo")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::LoadFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
