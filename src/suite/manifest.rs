//! Test manifest
//!
//! Declares a test tree as modules, classes and methods in YAML or JSON.
//!
//! ```yaml
//! version: "1.0"
//! modules:
//!   - name: mod
//!     classes:
//!       - name: A
//!         setup: "./scripts/start-db.sh"
//!         methods:
//!           - name: t1
//!             command: "cargo test -p core t1"
//!           - name: t2
//! ```

#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::Fixtures;

const SUPPORTED_VERSIONS: &[&str] = &["1.0"];

/// Manifest loading errors
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to read manifest {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse manifest {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Unsupported manifest version: {0}")]
    UnsupportedVersion(String),
}

/// Root of a test manifest
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub modules: Vec<ModuleSpec>,
}

fn default_version() -> String {
    "1.0".to_string()
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ModuleSpec {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub classes: Vec<ClassSpec>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ClassSpec {
    #[serde(default)]
    pub name: String,

    /// Runs once before the class's methods
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup: Option<String>,

    /// Runs once after the class's methods
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teardown: Option<String>,

    #[serde(default)]
    pub methods: Vec<MethodSpec>,
}

impl ClassSpec {
    pub fn fixtures(&self) -> Fixtures {
        Fixtures {
            setup: self.setup.clone(),
            teardown: self.teardown.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MethodSpec {
    #[serde(default)]
    pub name: String,

    /// Shell command acting as the test body. Absent means the test passes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

impl Manifest {
    /// Load a manifest, picking YAML or JSON by extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let parsed = if is_json_file(path) {
            serde_json::from_str::<Self>(&content).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str::<Self>(&content).map_err(|e| e.to_string())
        };

        let manifest = parsed.map_err(|message| ManifestError::Parse {
            path: path.to_path_buf(),
            message,
        })?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ManifestError> {
        let manifest: Self =
            serde_yaml::from_str(content).map_err(|e| ManifestError::Parse {
                path: PathBuf::from("<inline>"),
                message: e.to_string(),
            })?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn validate(&self) -> Result<(), ManifestError> {
        if !SUPPORTED_VERSIONS.contains(&self.version.as_str()) {
            return Err(ManifestError::UnsupportedVersion(self.version.clone()));
        }
        Ok(())
    }

    /// Number of declared test methods
    pub fn case_count(&self) -> usize {
        self.modules
            .iter()
            .flat_map(|m| &m.classes)
            .map(|c| c.methods.len())
            .sum()
    }
}

fn is_json_file(path: &Path) -> bool {
    path.extension().map(|e| e == "json").unwrap_or(false)
}
