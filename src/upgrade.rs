//! Moves hook commands from `package.json` scripts into `hookline.hooks`.

use serde_json::{json, Map, Value};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::config::{CONFIG_FILE, PACKAGE_KEY};
use crate::hooks::{legacy_script_key, HookName};
use crate::package::MANIFEST_FILE;

#[derive(Debug, thiserror::Error)]
pub enum UpgradeError {
    #[error("No package.json found in {0}")]
    NoManifest(String),
    #[error("hookline.toml exists; move the scripts into its [hooks] table by hand")]
    ConfigFile,
    #[error("Unexpected package.json layout: {0}")]
    Layout(&'static str),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid package.json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rewrite `root/package.json`, returning the hooks whose scripts moved.
///
/// A command already present in `hookline.hooks` is kept; the legacy script
/// is dropped either way.
pub fn upgrade(root: &Path, out: &mut impl Write) -> Result<Vec<HookName>, UpgradeError> {
    let path = root.join(MANIFEST_FILE);
    if !path.is_file() {
        return Err(UpgradeError::NoManifest(root.display().to_string()));
    }

    let mut manifest: Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
    let obj = manifest
        .as_object_mut()
        .ok_or(UpgradeError::Layout("top level is not an object"))?;

    let mut taken = Vec::new();
    if let Some(scripts) = obj.get_mut("scripts").and_then(Value::as_object_mut) {
        for hook in HookName::ALL {
            if let Some(command) = scripts.shift_remove(&legacy_script_key(hook)) {
                taken.push((hook, command));
            }
        }
    }

    if taken.is_empty() {
        writeln!(out, "No hook scripts to move")?;
        return Ok(Vec::new());
    }
    if root.join(CONFIG_FILE).exists() {
        return Err(UpgradeError::ConfigFile);
    }

    let hooks = hooks_section(obj)?;
    let mut moved = Vec::with_capacity(taken.len());
    for (hook, command) in taken {
        let key = legacy_script_key(hook);
        if hooks.contains_key(hook.as_str()) {
            writeln!(out, "dropped scripts.{key}, hookline.hooks.{hook} already set")?;
        } else {
            hooks.insert(hook.as_str().to_string(), command);
            writeln!(out, "moved scripts.{key} to hookline.hooks.{hook}")?;
        }
        moved.push(hook);
    }

    let mut content = serde_json::to_string_pretty(&manifest)?;
    content.push('\n');
    fs::write(&path, content)?;
    Ok(moved)
}

fn hooks_section(obj: &mut Map<String, Value>) -> Result<&mut Map<String, Value>, UpgradeError> {
    obj.entry(PACKAGE_KEY)
        .or_insert_with(|| json!({}))
        .as_object_mut()
        .ok_or(UpgradeError::Layout("hookline is not an object"))?
        .entry("hooks")
        .or_insert_with(|| json!({}))
        .as_object_mut()
        .ok_or(UpgradeError::Layout("hookline.hooks is not an object"))
}
