/// Construction properties of a hair shape and resolution of its source file
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Radius used when the properties do not name one
pub const DEFAULT_RADIUS: f32 = 0.05;

fn default_radius() -> f32 {
    DEFAULT_RADIUS
}

/// Properties a hair shape is constructed from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HairConfig {
    /// Strand file, resolved against a [`FileResolver`] when relative
    pub filename: PathBuf,
    #[serde(default = "default_radius")]
    pub radius: f32,
}

impl HairConfig {
    pub fn new(filename: impl Into<PathBuf>) -> Self {
        Self {
            filename: filename.into(),
            radius: DEFAULT_RADIUS,
        }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Read properties from a TOML table such as `filename = "a.hair"`
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: HairConfig =
            toml::from_str(input).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.filename.as_os_str().is_empty() {
            return Err(Error::InvalidConfig("filename must not be empty".into()));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "radius must be a positive number, got {}",
                self.radius
            )));
        }
        Ok(())
    }
}

/// Ordered list of directories relative file names are looked up in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileResolver {
    search_paths: Vec<PathBuf>,
}

impl FileResolver {
    /// Resolver without any search directory
    pub fn empty() -> Self {
        Self {
            search_paths: Vec::new(),
        }
    }

    /// Search `path` after every directory added so far
    pub fn append(&mut self, path: impl Into<PathBuf>) {
        self.search_paths.push(path.into());
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// First existing `dir/path` in search order; absolute or unmatched paths come back unchanged
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        self.search_paths
            .iter()
            .map(|dir| dir.join(path))
            .find(|candidate| candidate.exists())
            .unwrap_or_else(|| path.to_path_buf())
    }
}

impl Default for FileResolver {
    /// Searches the working directory
    fn default() -> Self {
        Self {
            search_paths: vec![PathBuf::from(".")],
        }
    }
}
