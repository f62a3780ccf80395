//! Hook script generation.

use std::path::{Path, PathBuf};

use super::HookName;

/// What a generated script needs to know about the project.
#[derive(Debug, Clone)]
pub struct ScriptContext {
    /// Directory the hook command runs in.
    pub project_root: PathBuf,
    /// Binary invoked by the script.
    pub runner: PathBuf,
}

impl ScriptContext {
    pub fn new(project_root: &Path, runner: &Path) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            runner: runner.to_path_buf(),
        }
    }
}

/// Render the script installed as `.git/hooks/<hook>`.
///
/// The marker line is what later install and uninstall passes use to
/// recognize the file as ours.
pub fn render(ctx: &ScriptContext, hook: HookName) -> String {
    format!(
        r#"#!/bin/sh
{marker}
# v{version}

hookName="{hook}"
gitParams="$*"

cd {root} || exit 0

if command -v {runner} >/dev/null 2>&1; then
  {runner} run "$hookName" "$gitParams"
else
  echo "Can't find hookline, skipping $hookName hook"
  echo "You can reinstall it or delete this hook"
fi
"#,
        marker = super::ownership::HOOKLINE_MARKER,
        version = env!("CARGO_PKG_VERSION"),
        root = sh_quote(&ctx.project_root.to_string_lossy()),
        runner = sh_quote(&ctx.runner.to_string_lossy()),
    )
}

/// Single-quote `s` for `sh`. Nothing inside single quotes is expanded, and
/// an embedded `'` becomes `'\''`.
fn sh_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}
