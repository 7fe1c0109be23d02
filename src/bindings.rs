//! Binding attribute configuration
//!
//! Every attribute name the engine looks for in markup is configurable, so a
//! host document with its own attribute conventions can still be driven by
//! the reconciler. Defaults are compiled in; a TOML file can override any
//! subset.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading or parsing a bindings file
#[derive(Error, Debug)]
pub enum BindingsError {
    #[error("Failed to read bindings file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse bindings TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Attribute names used by the reconciler and the field projector
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BindingConfig {
    /// Tags both template fragments and their insertion placeholders
    pub template: String,
    /// Mirrors the data item's join key onto the instance root
    pub key: String,
    /// Mirrors the lifecycle classification (`added`/`updated`/`removed`)
    pub state: String,
    /// Presentation state applied to exiting instances
    pub hidden: String,
    /// Text binding: attribute value names the bound field. Binding markers
    /// are `bind-` prefixed by default so projected output attributes
    /// (`id`, `href`) can never clobber a marker.
    pub text: String,
    /// Link binding: target's `href` is set from the bound field
    pub link: String,
    /// Id binding: target's `id` is set from the bound field
    pub id: String,
    /// Plugin mount binding
    pub plugin: String,
    /// Plugin update binding
    pub plugin_update: String,
    /// Click-triggered fetch binding
    pub fetch: String,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            template: "template".to_string(),
            key: "key".to_string(),
            state: "state".to_string(),
            hidden: "hidden".to_string(),
            text: "bind-text".to_string(),
            link: "bind-link".to_string(),
            id: "bind-id".to_string(),
            plugin: "bind-plugin".to_string(),
            plugin_update: "bind-plugin-update".to_string(),
            fetch: "bind-fetch".to_string(),
        }
    }
}

impl BindingConfig {
    /// Load a bindings file, falling back to defaults for absent keys
    pub fn from_file(path: &Path) -> Result<Self, BindingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse bindings from TOML content
    pub fn from_toml(content: &str) -> Result<Self, BindingsError> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let bindings = BindingConfig::default();
        assert_eq!(bindings.template, "template");
        assert_eq!(bindings.plugin_update, "bind-plugin-update");
    }

    #[test]
    fn test_partial_override() {
        let bindings = BindingConfig::from_toml(
            r#"
            template = "data-template"
            text = "data-text"
            "#,
        )
        .unwrap();
        assert_eq!(bindings.template, "data-template");
        assert_eq!(bindings.text, "data-text");
        // Untouched keys keep their defaults
        assert_eq!(bindings.fetch, "bind-fetch");
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(matches!(
            BindingConfig::from_toml("template = ["),
            Err(BindingsError::ParseError(_))
        ));
    }
}
