//! Designer settings loaded from a TOML file.
//!
//! ```toml
//! app_properties_only = true
//! show_file_property = false
//! current_container = "/home/project"
//! mandatory_field_names = ["ParticipantID", "Date"]
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use designer_model::TypeOptions;

/// Settings shared by every command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignerSettings {
    /// Restrict type choices to application-managed domain types.
    pub app_properties_only: bool,
    /// Offer the file type when `app_properties_only` is set.
    pub show_file_property: bool,
    /// Container the caller works in; domains defined elsewhere are shared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_container: Option<String>,
    /// Extra names that lock fields, on top of the domain's own.
    pub mandatory_field_names: Vec<String>,
}

impl Default for DesignerSettings {
    fn default() -> Self {
        Self {
            app_properties_only: false,
            show_file_property: true,
            current_container: None,
            mandatory_field_names: Vec::new(),
        }
    }
}

impl DesignerSettings {
    /// Read settings from `path`.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not valid settings TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("read settings {}", path.display()))?;
        let settings = Self::from_toml_str(&content)
            .with_context(|| format!("parse settings {}", path.display()))?;
        tracing::info!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Settings from `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Type options with command-line overrides applied.
    pub fn type_options(&self, app_only: bool, hide_file: bool) -> TypeOptions {
        TypeOptions {
            app_properties_only: app_only || self.app_properties_only,
            show_file_property: !hide_file && self.show_file_property,
        }
    }
}
