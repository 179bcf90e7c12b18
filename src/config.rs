use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::RenderError;

pub const DEFAULT_FILENAME_PREFIX: &str = "CCEW";

/// How pages are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Every band, label and box is drawn by the renderer.
    #[default]
    #[serde(alias = "self_drawn")]
    SelfDrawn,
    /// Values only, composited onto the official template.
    Overlay,
}

/// Render settings. Every field has a default, so `{}` is a valid config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub strategy: Strategy,
    /// Template PDF path or http(s) URL; required by the overlay strategy.
    pub template: Option<String>,
    pub filename_prefix: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            template: None,
            filename_prefix: DEFAULT_FILENAME_PREFIX.to_string(),
        }
    }
}

impl RenderConfig {
    pub fn self_drawn() -> Self {
        Self::default()
    }

    pub fn overlay(template: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::Overlay,
            template: Some(template.into()),
            ..Self::default()
        }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| RenderError::Config(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| RenderError::Config(format!("{}: invalid JSON: {}", path.display(), e)))
    }

    /// Reject settings that cannot produce a document.
    pub fn validate(&self) -> Result<(), RenderError> {
        let has_template = self.template.as_deref().is_some_and(|t| !t.is_empty());
        if self.strategy == Strategy::Overlay && !has_template {
            return Err(RenderError::Config(
                "the overlay strategy needs a template path or URL".to_string(),
            ));
        }
        if self.filename_prefix.is_empty() {
            return Err(RenderError::Config("filename prefix must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Write;

    #[test]
    fn empty_object_gives_defaults() {
        let config: RenderConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RenderConfig::default());
        assert_eq!(config.filename_prefix, "CCEW");
        assert_eq!(config.strategy, Strategy::SelfDrawn);
    }

    #[test]
    fn reads_overlay_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"strategy": "overlay", "template": "form.pdf"}}"#).unwrap();
        let config = RenderConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config, RenderConfig::overlay("form.pdf"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn accepts_snake_case_strategy() {
        let config: RenderConfig = serde_json::from_str(r#"{"strategy": "self_drawn"}"#).unwrap();
        assert_eq!(config.strategy, Strategy::SelfDrawn);
    }

    #[test]
    fn overlay_without_template_is_rejected() {
        let config = RenderConfig {
            strategy: Strategy::Overlay,
            ..RenderConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn missing_config_file_is_a_configuration_error() {
        let err = RenderConfig::from_json_file("/nonexistent/ccew.json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
