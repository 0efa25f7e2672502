//! Application preferences
//!
//! Typed preference groups stored as JSON in the platform config directory,
//! addressed from the outside by `"group/name"` keys. Every change that
//! actually alters a value is announced through `preference_changed` with the
//! key that changed.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::i18n::Lang;
use crate::signal::Signal;

/// Only list objects on the active build plate
pub const FILTER_CURRENT_BUILD_PLATE: &str = "view/filter_current_build_plate";
/// UI language
pub const LANGUAGE: &str = "general/language";

/// All known preference keys
pub const KEYS: &[&str] = &[FILTER_CURRENT_BUILD_PLATE, LANGUAGE];

const FILE_NAME: &str = "preferences.json";

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("unknown preference: {0}")]
    UnknownKey(String),
    #[error("wrong value type for {key}: {source}")]
    TypeMismatch {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("preferences I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed preferences file: {0}")]
    Json(#[from] serde_json::Error),
}

/// View preferences
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewPreferences {
    /// Hide objects that are not on the active build plate
    #[serde(default)]
    pub filter_current_build_plate: bool,
}

/// General preferences
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GeneralPreferences {
    #[serde(default)]
    pub language: Lang,
}

/// All preferences
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppPreferences {
    #[serde(default)]
    pub view: ViewPreferences,
    #[serde(default)]
    pub general: GeneralPreferences,
}

impl AppPreferences {
    /// Default location of the preferences file
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("org", "objects-list", "objects-list")
            .map(|dirs| dirs.config_dir().join(FILE_NAME))
    }

    /// Load preferences from the default location, or return defaults
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(prefs) => prefs,
            Err(e) => {
                tracing::warn!("Ignoring preferences at {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, PreferenceError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Save preferences to the default location
    pub fn save(&self) -> Result<(), PreferenceError> {
        match Self::config_path() {
            Some(path) => self.save_to(&path),
            None => {
                tracing::warn!("No config directory available, preferences not saved");
                Ok(())
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), PreferenceError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Preference store with change notification
#[derive(Debug, Default)]
pub struct Preferences {
    values: RefCell<AppPreferences>,
    preference_changed: Signal<String>,
}

impl Preferences {
    pub fn new(values: AppPreferences) -> Self {
        Self {
            values: RefCell::new(values),
            preference_changed: Signal::new(),
        }
    }

    /// Fired with the key of every preference whose value changed
    pub fn preference_changed(&self) -> &Signal<String> {
        &self.preference_changed
    }

    /// Copy of all current values
    pub fn snapshot(&self) -> AppPreferences {
        self.values.borrow().clone()
    }

    pub fn get_value(&self, key: &str) -> Option<Value> {
        let values = self.values.borrow();
        match key {
            FILTER_CURRENT_BUILD_PLATE => Some(Value::Bool(values.view.filter_current_build_plate)),
            LANGUAGE => Some(Value::String(values.general.language.code().to_string())),
            _ => None,
        }
    }

    pub fn set_value(&self, key: &str, value: Value) -> Result<(), PreferenceError> {
        let mismatch = |source: serde_json::Error| PreferenceError::TypeMismatch {
            key: key.to_string(),
            source,
        };
        match key {
            FILTER_CURRENT_BUILD_PLATE => {
                let v: bool = serde_json::from_value(value).map_err(mismatch)?;
                self.set_filter_current_build_plate(v);
            }
            LANGUAGE => {
                let v: Lang = serde_json::from_value(value).map_err(mismatch)?;
                self.set_language(v);
            }
            _ => return Err(PreferenceError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    pub fn filter_current_build_plate(&self) -> bool {
        self.values.borrow().view.filter_current_build_plate
    }

    pub fn set_filter_current_build_plate(&self, value: bool) {
        self.update(FILTER_CURRENT_BUILD_PLATE, |p| {
            std::mem::replace(&mut p.view.filter_current_build_plate, value) != value
        });
    }

    pub fn language(&self) -> Lang {
        self.values.borrow().general.language
    }

    pub fn set_language(&self, value: Lang) {
        self.update(LANGUAGE, |p| std::mem::replace(&mut p.general.language, value) != value);
    }

    pub fn save_to(&self, path: &Path) -> Result<(), PreferenceError> {
        self.values.borrow().save_to(path)
    }

    /// Apply `f` and notify if it reports a change
    fn update(&self, key: &str, f: impl FnOnce(&mut AppPreferences) -> bool) {
        let changed = f(&mut self.values.borrow_mut());
        if changed {
            tracing::debug!("Preference {key} changed");
            self.preference_changed.emit(&key.to_string());
        }
    }
}
