//! TOML-backed configuration.
//!
//! Every table uses `#[serde(default)]`, so a partial file (for example one
//! that only sets `[compositor] runtime_secs`) fills the rest with defaults:
//!
//! ```toml
//! [run]
//! fps = 30.0
//!
//! [compositor]
//! runtime_secs = 5.0
//!
//! [demo]
//! rates = [12.0, 20.0]
//! ```

mod compositor;
mod demo;

use std::path::Path;

pub use compositor::CompositorOptions;
pub use demo::DemoOptions;
use serde::{Deserialize, Serialize};

use crate::animation::RunParams;
use crate::error::{PixelpaceError, Result};

/// Top-level options container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Parameters of the top-level run.
    pub run: RunParams,
    /// Compositor settings.
    pub compositor: CompositorOptions,
    /// Demo settings.
    pub demo: DemoOptions,
}

impl Options {
    /// Parse options from TOML text. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PixelpaceError::OptionsParse`] on malformed TOML.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| PixelpaceError::OptionsParse(e.to_string()))
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PixelpaceError::Io`] if the file cannot be read and
    /// [`PixelpaceError::OptionsParse`] on malformed TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(PixelpaceError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`PixelpaceError::OptionsParse`] if serialization fails and
    /// [`PixelpaceError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| PixelpaceError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(PixelpaceError::Io)?;
        }
        std::fs::write(path, content).map_err(PixelpaceError::Io)
    }
}
