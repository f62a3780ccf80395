//! Hook lifecycle: installs, migrates and removes hook scripts.
//!
//! Only files hookline wrote itself are ever replaced silently or removed.
//! Scripts from ghooks and pre-commit are migrated; anything else in the
//! hooks directory belongs to the user and is left alone.

mod writer;

pub use writer::write_hook;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::config::{self, ConfigError};
use crate::hooks::ownership::{classify, Ownership};
use crate::hooks::script::{self, ScriptContext};
use crate::hooks::{hook_paths, hooks_dir, HookName};

/// Errors from install and uninstall. Any of these aborts the remaining hooks.
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Inputs to [`install`] that come from the process environment.
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Skip-install override is set.
    pub skip_install: bool,
    /// Running under CI.
    pub is_ci: bool,
    /// Binary the generated scripts call.
    pub runner: PathBuf,
}

/// Why an install did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoProjectRoot,
    EnvOverride,
    Ci,
}

/// What happened to one hook file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookAction {
    Create,
    Migrate,
    Update,
    Skip,
}

#[derive(Debug, PartialEq, Eq)]
pub enum InstallReport {
    Skipped(SkipReason),
    Installed(Vec<(HookName, HookAction)>),
}

#[derive(Debug, PartialEq, Eq)]
pub enum UninstallReport {
    /// The git dir does not belong to the resolved project; nothing touched.
    OutsideProject,
    Removed(Vec<HookName>),
}

/// Install every hook script into `git_dir`.
///
/// The project root is found by searching upward from `start_dir`.
pub fn install(
    git_dir: &Path,
    start_dir: &Path,
    options: &InstallOptions,
    out: &mut impl Write,
) -> Result<InstallReport, InstallError> {
    writeln!(out, "hookline > setting up git hooks")?;

    let Some(root) = config::find_project_root(start_dir) else {
        writeln!(
            out,
            "Can't find package.json, skipping Git hooks installation"
        )?;
        return Ok(InstallReport::Skipped(SkipReason::NoProjectRoot));
    };

    let settings = config::load(&root)?;

    if options.skip_install {
        writeln!(
            out,
            "HOOKLINE_SKIP_INSTALL environment variable is set to 'true', skipping Git hooks installation"
        )?;
        return Ok(InstallReport::Skipped(SkipReason::EnvOverride));
    }

    if options.is_ci && settings.skip_ci {
        writeln!(out, "CI detected, skipping Git hooks installation")?;
        return Ok(InstallReport::Skipped(SkipReason::Ci));
    }

    if !git_dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("git dir not found: {}", git_dir.display()),
        )
        .into());
    }
    let hooks = hooks_dir(git_dir);
    if !hooks.is_dir() {
        fs::create_dir(&hooks)?;
    }

    let ctx = ScriptContext::new(&root, &options.runner);
    let mut actions = Vec::with_capacity(HookName::ALL.len());
    for (hook, path) in hook_paths(git_dir) {
        let action = create_hook(&path, &script::render(&ctx, hook), out)?;
        tracing::debug!(hook = %hook, ?action, "hook processed");
        actions.push((hook, action));
    }

    writeln!(out, "hookline > done")?;
    Ok(InstallReport::Installed(actions))
}

/// Create, migrate, update or skip a single hook file.
pub fn create_hook(path: &Path, script: &str, out: &mut impl Write) -> io::Result<HookAction> {
    let name = hook_file_name(path);

    if !path.exists() {
        write_hook(path, script)?;
        return Ok(HookAction::Create);
    }

    let existing = read_hook(path)?;
    match classify(&existing) {
        owner if owner.is_legacy() => {
            writeln!(out, "migrating existing {} script: {name}", owner.label())?;
            write_hook(path, script)?;
            Ok(HookAction::Migrate)
        }
        Ownership::Hookline => {
            write_hook(path, script)?;
            Ok(HookAction::Update)
        }
        _ => {
            writeln!(out, "skipping existing user hook: {name}")?;
            Ok(HookAction::Skip)
        }
    }
}

/// Remove hookline's scripts from `git_dir`.
///
/// Nothing is removed unless `git_dir` is the git dir of the project found
/// from `start_dir`: its `.git` directory, or the target of its `.git` file.
pub fn uninstall(
    git_dir: &Path,
    start_dir: &Path,
    out: &mut impl Write,
) -> Result<UninstallReport, InstallError> {
    writeln!(out, "hookline > uninstalling git hooks")?;

    let owns_git_dir = config::find_project_root(start_dir)
        .and_then(|root| config::git_dir_at(&root))
        .is_some_and(|own| same_dir(&own, git_dir));

    let report = if owns_git_dir {
        let mut removed = Vec::new();
        for (hook, path) in hook_paths(git_dir) {
            if can_remove(&path)? {
                fs::remove_file(&path)?;
                removed.push(hook);
            }
        }
        UninstallReport::Removed(removed)
    } else {
        tracing::debug!(git_dir = %git_dir.display(), "git dir outside project, leaving hooks");
        UninstallReport::OutsideProject
    };

    writeln!(out, "hookline > done")?;
    Ok(report)
}

/// Whether the file at `path` exists and was written by hookline.
pub fn can_remove(path: &Path) -> io::Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    Ok(classify(&read_hook(path)?) == Ownership::Hookline)
}

fn read_hook(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

fn hook_file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
