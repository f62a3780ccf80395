//! Project manifest (`package.json`) access.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::{fs, io};

use crate::hooks::{legacy_script_key, HookName};

pub const MANIFEST_FILE: &str = "package.json";

/// The parts of `package.json` hookline reads.
#[derive(Debug, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub scripts: BTreeMap<String, String>,
}

/// Errors that can occur while reading the manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid package.json: {0}")]
    Json(#[from] serde_json::Error),
}

impl Manifest {
    /// Read `dir/package.json`. A missing file yields an empty manifest.
    pub fn load(dir: &Path) -> Result<Self, ManifestError> {
        let path = dir.join(MANIFEST_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Command kept for `hook` under the old `scripts` convention.
    pub fn legacy_script(&self, hook: HookName) -> Option<&str> {
        self.scripts
            .get(&legacy_script_key(hook))
            .map(String::as_str)
            .filter(|c| !c.is_empty())
    }
}
