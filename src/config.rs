// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Deserialize the window manager's startup configuration.
// Author: Lukas Bower

//! Runtime configuration.
//!
//! Everything here is also reachable at runtime through the root control
//! file; the config only seeds the initial values.

use serde::Deserialize;
use thiserror::Error;

/// Startup configuration, deserialized from JSON.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Font specification handed to the drawing layer.
    pub font: String,
    /// Border width in pixels.
    pub border: u32,
    /// Modifier used for mouse operations, `Mod1` through `Mod5`.
    pub grabmod: String,
    /// Colors of selected frames.
    pub selcolors: String,
    /// Colors of unselected frames.
    pub normcolors: String,
    /// Colors of the three border states.
    pub bcolors: [String; 3],
    /// Initial key-binding blob.
    pub keys: String,
    /// Initial tag rules.
    pub tagrules: String,
    /// Initial column rules.
    pub colrules: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            font: "fixed".to_owned(),
            border: 2,
            grabmod: "Mod1".to_owned(),
            selcolors: "#ffffff #335577 #447799".to_owned(),
            normcolors: "#222222 #eeeeee #666666".to_owned(),
            bcolors: [
                "#222222 #eeeeee #666666".to_owned(),
                "#222222 #eeeeee #666666".to_owned(),
                "#222222 #eeeeee #666666".to_owned(),
            ],
            keys: String::new(),
            tagrules: String::new(),
            colrules: String::new(),
        }
    }
}

/// Failures while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("read config: {0}")]
    Io(#[from] std::io::Error),
    /// The contents were not valid JSON for [`Config`].
    #[error("parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A color field was not a valid three-color specification.
    #[error("bad color spec {0:?}")]
    Color(String),
}

impl Config {
    /// Parse configuration from a JSON string.
    pub fn from_str(data: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(data)?)
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.border, 2);
        assert_eq!(config.grabmod, "Mod1");
    }

    #[test]
    fn partial_json_overrides_defaults() {
        let config = Config::from_str(r#"{"border": 4, "font": "terminus"}"#).expect("parse");
        assert_eq!(config.border, 4);
        assert_eq!(config.font, "terminus");
        assert_eq!(config.grabmod, "Mod1");
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(Config::from_str("{nope").is_err());
    }
}
