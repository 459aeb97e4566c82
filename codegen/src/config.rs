//! Generator configuration.
//!
//! Read from a TOML file by the `retrofit-gen` binary; every field is
//! optional.
//!
//! ```toml
//! runtime_path = "::retrofit_core"
//! client_suffix = "Client"
//! copy_uses = true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const DEFAULT_RUNTIME_PATH: &str = "::retrofit_core";
pub const DEFAULT_CLIENT_SUFFIX: &str = "Client";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Path under which generated code finds the runtime crate.
    pub runtime_path: String,
    /// Appended to the trait name to name the client struct.
    pub client_suffix: String,
    /// Repeat the source file's `use` items at the top of the output.
    pub copy_uses: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            runtime_path: DEFAULT_RUNTIME_PATH.to_string(),
            client_suffix: DEFAULT_CLIENT_SUFFIX.to_string(),
            copy_uses: true,
        }
    }
}

impl GeneratorConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn target_for(&self, interface_name: &str) -> GenerationTarget {
        GenerationTarget::new(format!("{interface_name}{}", self.client_suffix))
            .with_runtime_path(self.runtime_path.clone())
            .with_copy_uses(self.copy_uses)
    }
}

/// Where the generated client goes and what it refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationTarget {
    pub client_name: String,
    pub runtime_path: String,
    /// Path of the trait as seen from the generated code. Defaults to the
    /// bare trait name.
    pub interface_path: Option<String>,
    pub copy_uses: bool,
}

impl GenerationTarget {
    pub fn new(client_name: impl Into<String>) -> Self {
        Self {
            client_name: client_name.into(),
            runtime_path: DEFAULT_RUNTIME_PATH.to_string(),
            interface_path: None,
            copy_uses: false,
        }
    }

    pub fn with_runtime_path(mut self, runtime_path: impl Into<String>) -> Self {
        self.runtime_path = runtime_path.into();
        self
    }

    pub fn with_interface_path(mut self, interface_path: impl Into<String>) -> Self {
        self.interface_path = Some(interface_path.into());
        self
    }

    pub fn with_copy_uses(mut self, copy_uses: bool) -> Self {
        self.copy_uses = copy_uses;
        self
    }
}
