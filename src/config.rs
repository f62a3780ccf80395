//! Configuration loading.
//!
//! Settings come from `hookline.toml` in the project root, or from the
//! `"hookline"` key of `package.json` when there is no TOML file. A project
//! with neither gets the defaults.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::{fs, io};

use crate::hooks::HookName;
use crate::package;

pub const CONFIG_FILE: &str = "hookline.toml";

/// Key in `package.json` that holds settings.
pub const PACKAGE_KEY: &str = "hookline";

/// Project settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    /// Skip installation when running under CI.
    #[serde(default = "default_skip_ci", alias = "skipCI")]
    pub skip_ci: bool,

    /// Shell command per hook name.
    #[serde(default)]
    pub hooks: BTreeMap<String, String>,
}

fn default_skip_ci() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            skip_ci: default_skip_ci(),
            hooks: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Command configured for `hook`, ignoring empty entries.
    pub fn command_for(&self, hook: HookName) -> Option<&str> {
        self.hooks
            .get(hook.as_str())
            .map(String::as_str)
            .filter(|c| !c.is_empty())
    }
}

/// Errors that can occur while loading settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid hookline.toml: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid package.json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Load settings for the project rooted at `root`.
pub fn load(root: &Path) -> Result<Settings, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    if config_path.exists() {
        let content = fs::read_to_string(&config_path)?;
        let settings: Settings = toml::from_str(&content)?;
        tracing::debug!(path = %config_path.display(), "loaded settings");
        return Ok(settings);
    }

    let manifest_path = root.join(package::MANIFEST_FILE);
    if manifest_path.exists() {
        let content = fs::read_to_string(&manifest_path)?;
        let mut value: serde_json::Value = serde_json::from_str(&content)?;
        if let Some(section) = value.get_mut(PACKAGE_KEY).map(serde_json::Value::take) {
            let settings: Settings = serde_json::from_value(section)?;
            tracing::debug!(path = %manifest_path.display(), "loaded settings");
            return Ok(settings);
        }
    }

    Ok(Settings::default())
}

/// Find the project root by searching upward for `package.json`.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        if dir.join(package::MANIFEST_FILE).is_file() {
            return Some(dir);
        }
        if !dir.pop() {
            return None;
        }
    }
}

/// Find the git dir by searching upward for `.git`.
///
/// The search stops at the first `.git` entry, so a submodule or worktree
/// never resolves to the enclosing repository.
pub fn find_git_dir(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        if dir.join(".git").exists() {
            return git_dir_at(&dir);
        }
        if !dir.pop() {
            return None;
        }
    }
}

/// Git dir of the working tree at `dir`.
///
/// Either `dir/.git` itself, or the target of the `gitdir:` line when `.git`
/// is a file. Relative targets resolve against `dir`.
pub fn git_dir_at(dir: &Path) -> Option<PathBuf> {
    let dot_git = dir.join(".git");
    if dot_git.is_dir() {
        return Some(dot_git);
    }

    let content = fs::read_to_string(&dot_git).ok()?;
    let Some(target) = content
        .lines()
        .find_map(|line| line.strip_prefix("gitdir:"))
        .map(str::trim)
        .filter(|t| !t.is_empty())
    else {
        tracing::warn!(path = %dot_git.display(), "no gitdir line in .git file");
        return None;
    };
    let resolved = dir.join(target);
    Some(fs::canonicalize(&resolved).unwrap_or(resolved))
}
