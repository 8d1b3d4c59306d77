//! Persistent import defaults.
//!
//! Stored in `~/.config/registry-import/settings.toml`:
//!
//! ```text
//! [import]
//! delimiter = ";"
//! on_invalid = "skip"
//! stable_ids = true
//! ```
//!
//! Command-line flags always win over the file, and the file over the
//! built-in defaults.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ids::IdMode;
use crate::normalize::InvalidValuePolicy;
use crate::pipeline::ImportOptions;

/// Canonical path to the settings file: `~/.config/registry-import/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("registry-import").join("settings.toml")
}

/// The `[import]` table. Unset keys fall through to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<char>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_invalid: Option<InvalidValuePolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stable_ids: Option<bool>,
}

/// Flag values given on the command line; `None` means not given.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionOverrides {
    pub delimiter: Option<char>,
    pub on_invalid: Option<InvalidValuePolicy>,
    /// `Some(false)` forces random ids even when the file enables stable ones.
    pub stable_ids: Option<bool>,
}

impl ImportSettings {
    /// Resolve run options: overrides, then these settings, then defaults.
    pub fn resolve(&self, overrides: OptionOverrides) -> Result<ImportOptions, String> {
        let defaults = ImportOptions::default();

        let delimiter = match overrides.delimiter.or(self.delimiter) {
            Some(c) => delimiter_byte(c)?,
            None => defaults.delimiter,
        };
        let on_invalid = overrides
            .on_invalid
            .or(self.on_invalid)
            .unwrap_or(defaults.on_invalid);
        let id_mode = if overrides.stable_ids.or(self.stable_ids).unwrap_or(false) {
            IdMode::Stable
        } else {
            defaults.id_mode
        };

        Ok(ImportOptions {
            delimiter,
            id_mode,
            on_invalid,
        })
    }
}

/// Delimiters must be a single ASCII character.
pub fn delimiter_byte(c: char) -> Result<u8, String> {
    if c.is_ascii() && c != '"' && c != '\n' && c != '\r' {
        Ok(c as u8)
    } else {
        Err(format!("unsupported delimiter {c:?} (must be one ASCII character)"))
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    import: ImportSettings,
}

/// Read the `[import]` table from `settings.toml`, if present.
pub fn load_import_settings() -> ImportSettings {
    load_import_settings_from(&settings_path())
}

/// Read the `[import]` table from a specific file.
///
/// A missing or unparseable file yields empty settings; the parse failure
/// is logged.
pub fn load_import_settings_from(path: &Path) -> ImportSettings {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return ImportSettings::default();
    };
    match toml::from_str::<SettingsFile>(&contents) {
        Ok(file) => file.import,
        Err(e) => {
            log::warn!("Ignoring unreadable settings in {}: {}", path.display(), e);
            ImportSettings::default()
        }
    }
}

/// Save the `[import]` table to `settings.toml`.
pub fn save_import_settings(settings: &ImportSettings) -> io::Result<()> {
    save_import_settings_to(&settings_path(), settings)
}

/// Save the `[import]` table to a specific file.
///
/// Uses `toml::Value` for a surgical update so other tables in the file
/// are preserved. A file that does not parse is left alone and reported.
pub fn save_import_settings_to(path: &Path, settings: &ImportSettings) -> io::Result<()> {
    let mut doc: toml::Value = match std::fs::read_to_string(path) {
        Ok(contents) => contents.parse::<toml::Value>().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{} is not valid TOML: {e}", path.display()),
            )
        })?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => toml::Value::Table(Default::default()),
        Err(e) => return Err(e),
    };

    let table = doc
        .as_table_mut()
        .ok_or_else(|| io::Error::other("settings.toml root is not a table"))?;
    let import = toml::Value::try_from(settings).map_err(io::Error::other)?;
    table.insert("import".to_string(), import);

    // Write atomically
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let serialized = toml::to_string_pretty(&doc).map_err(io::Error::other)?;
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, &serialized)?;
    std::fs::rename(&tmp, path)?;

    Ok(())
}

/// Load the full settings file as a pretty-printed TOML string for display.
pub fn load_settings_string() -> Option<String> {
    let contents = std::fs::read_to_string(settings_path()).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    toml::to_string_pretty(&doc).ok()
}
