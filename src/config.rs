//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/sgftree/sgftree.toml`
//! 3. Local config: file given with `--config`
//! 4. Environment variables: `SGFTREE_*` prefix

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{ParseMode, ValueType};

/// Unified configuration for sgftree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Treatment of malformed input (default: lenient)
    pub mode: ParseMode,
    /// Property identifier → value type, used to decode values for display
    pub value_types: BTreeMap<String, ValueType>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: ParseMode::default(),
            value_types: default_value_types(),
        }
    }
}

/// Raw settings for intermediate parsing (None → not specified, inherit from base).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub mode: Option<ParseMode>,
    pub value_types: Option<BTreeMap<String, ValueType>>,
}

/// Value types of the common Go (GM[1]) properties of FF[4].
fn default_value_types() -> BTreeMap<String, ValueType> {
    use ValueType as T;

    let table: &[(&[&str], ValueType)] = &[
        (&["B", "W"], T::Move),
        (
            &["AB", "AW", "AE", "TR", "SQ", "CR", "MA", "SL", "DD", "TB", "TW", "VW"],
            T::CompressedPoint,
        ),
        (&["AR", "LN", "LB"], T::Composed),
        (&["C", "GC"], T::Text),
        (
            &[
                "N", "GN", "PB", "PW", "BR", "WR", "BT", "WT", "EV", "RO", "DT", "PC", "RE",
                "RU", "SO", "US", "AN", "CP", "ON", "OT", "AP", "CA",
            ],
            T::SimpleText,
        ),
        (&["KM", "TM", "BL", "WL", "V"], T::Real),
        (
            &["SZ", "HA", "FF", "GM", "ST", "MN", "OB", "OW", "PM", "FG"],
            T::Number,
        ),
        (&["PL"], T::Color),
        (&["GB", "GW", "DM", "UC", "BM", "TE", "HO"], T::Double),
        (&["KO", "DO", "IT"], T::None),
    ];

    table
        .iter()
        .flat_map(|(ids, ty)| ids.iter().map(move |id| (id.to_string(), *ty)))
        .collect()
}

/// Get the XDG config directory for sgftree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "sgftree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("sgftree.toml"))
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Look up the configured value type of a property identifier.
    pub fn value_type(&self, id: &str) -> Option<ValueType> {
        self.value_types.get(id).copied()
    }

    /// Apply global config onto defaults.
    ///
    /// A `value_types` table in the global config REPLACES the defaults.
    fn apply_global(&self, global: &RawSettings) -> Self {
        Self {
            mode: global.mode.unwrap_or(self.mode),
            value_types: global
                .value_types
                .clone()
                .unwrap_or_else(|| self.value_types.clone()),
        }
    }

    /// Merge overlay config onto self (base).
    ///
    /// `value_types` entries merge per identifier, overlay wins.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        let mut value_types = self.value_types.clone();
        if let Some(extra) = &overlay.value_types {
            value_types.extend(extra.iter().map(|(k, v)| (k.clone(), *v)));
        }
        Self {
            mode: overlay.mode.unwrap_or(self.mode),
            value_types,
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local` - Optional explicit config file
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/sgftree/sgftree.toml` (value types REPLACE defaults)
    /// 3. Local config (value types merge per identifier)
    /// 4. Environment variables: `SGFTREE_MODE`
    pub fn load(local: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.apply_global(&raw);
            }
        }

        if let Some(local_path) = local {
            if !local_path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", local_path.display()),
                });
            }
            let raw = load_raw_settings(local_path)?;
            current = current.merge_with(&raw);
        }

        current = Self::apply_env_overrides(current)?;
        current.validate()?;
        Ok(current)
    }

    /// Apply SGFTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("SGFTREE").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get::<ParseMode>("mode") {
            settings.mode = val;
        } else if let Ok(val) = config.get_string("mode") {
            return Err(ApplicationError::Config {
                message: format!("SGFTREE_MODE: unknown mode {:?}", val),
            });
        }

        Ok(settings)
    }

    /// Property identifiers must be uppercase letters only.
    fn validate(&self) -> Result<(), ApplicationError> {
        match self
            .value_types
            .keys()
            .find(|id| id.is_empty() || !id.bytes().all(|b| b.is_ascii_uppercase()))
        {
            Some(id) => Err(ApplicationError::Config {
                message: format!("invalid property identifier in value_types: {:?}", id),
            }),
            None => Ok(()),
        }
    }

    /// Render the effective settings as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_value_types_cover_moves_and_comments() {
        let settings = Settings::default();
        assert_eq!(settings.value_type("B"), Some(ValueType::Move));
        assert_eq!(settings.value_type("C"), Some(ValueType::Text));
        assert_eq!(settings.value_type("KM"), Some(ValueType::Real));
        assert_eq!(settings.value_type("XX"), None);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_merge_with_overrides_per_identifier() {
        let base = Settings::default();
        let overlay = RawSettings {
            mode: Some(ParseMode::Strict),
            value_types: Some(BTreeMap::from([("C".to_string(), ValueType::SimpleText)])),
        };
        let merged = base.merge_with(&overlay);
        assert_eq!(merged.mode, ParseMode::Strict);
        assert_eq!(merged.value_type("C"), Some(ValueType::SimpleText));
        assert_eq!(merged.value_type("B"), Some(ValueType::Move));
    }

    #[test]
    fn test_apply_global_replaces_value_types() {
        let base = Settings::default();
        let global = RawSettings {
            mode: None,
            value_types: Some(BTreeMap::from([("B".to_string(), ValueType::Point)])),
        };
        let applied = base.apply_global(&global);
        assert_eq!(applied.mode, ParseMode::Lenient);
        assert_eq!(applied.value_types.len(), 1);
    }
}
