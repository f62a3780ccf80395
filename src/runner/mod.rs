//! Hook dispatch: what runs when git fires a hook.
//!
//! The command comes from `hooks.<name>` in the settings. Older projects kept
//! it in `package.json` scripts under the hook name without dashes; that
//! location still works but prints a deprecation warning.

pub mod shell;

use std::io::Write;
use std::path::Path;

use crate::config::{self, Settings};
use crate::hooks::{legacy_script_key, HookName};
use crate::package::Manifest;
use shell::CommandRunner;

/// Environment variable carrying git's hook arguments to the command.
pub const GIT_PARAMS_VAR: &str = "HOOKLINE_GIT_PARAMS";

/// Where a hook command was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandSource {
    Hooks,
    LegacyScript,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub command: String,
    pub source: CommandSource,
}

/// Result of firing one hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    NoCommand,
    Succeeded(CommandSource),
    Failed(CommandSource),
}

impl Outcome {
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::NoCommand | Outcome::Succeeded(_) => 0,
            Outcome::Failed(_) => 1,
        }
    }

    /// Where the command that ran came from.
    pub fn source(self) -> Option<CommandSource> {
        match self {
            Outcome::NoCommand => None,
            Outcome::Succeeded(source) | Outcome::Failed(source) => Some(source),
        }
    }
}

/// Pick the command for `hook`. Settings win over legacy scripts.
pub fn resolve(settings: &Settings, manifest: &Manifest, hook: HookName) -> Option<Resolved> {
    if let Some(command) = settings.command_for(hook) {
        return Some(Resolved {
            command: command.to_string(),
            source: CommandSource::Hooks,
        });
    }
    manifest.legacy_script(hook).map(|command| Resolved {
        command: command.to_string(),
        source: CommandSource::LegacyScript,
    })
}

/// Fire `hook` in `cwd` and return the process exit status.
pub fn run(
    hook: HookName,
    cwd: &Path,
    git_params: Option<&str>,
    runner: &dyn CommandRunner,
    out: &mut impl Write,
) -> i32 {
    let outcome = dispatch(hook, cwd, git_params, runner, out);
    if let Some(source) = outcome.source() {
        tracing::debug!(hook = %hook, ?source, code = outcome.exit_code(), "hook finished");
    }
    outcome.exit_code()
}

/// Fire `hook` in `cwd`. Command failures are reported, never propagated.
pub fn dispatch(
    hook: HookName,
    cwd: &Path,
    git_params: Option<&str>,
    runner: &dyn CommandRunner,
    out: &mut impl Write,
) -> Outcome {
    let manifest = Manifest::load(cwd).unwrap_or_else(|e| {
        tracing::warn!("ignoring package.json: {e}");
        Manifest::default()
    });
    let settings = config::load(cwd).unwrap_or_else(|e| {
        tracing::warn!("ignoring settings: {e}");
        Settings::default()
    });

    let Some(resolved) = resolve(&settings, &manifest, hook) else {
        tracing::debug!(hook = %hook, "no command configured");
        return Outcome::NoCommand;
    };

    if resolved.source == CommandSource::LegacyScript {
        say(out, &deprecation_warning(hook));
    }
    say(
        out,
        &format!("hookline > {hook} (hookline v{})", env!("CARGO_PKG_VERSION")),
    );

    let env: Vec<(&str, &str)> = git_params
        .map(|params| vec![(GIT_PARAMS_VAR, params)])
        .unwrap_or_default();

    match runner.run(&resolved.command, cwd, &env) {
        Ok(()) => Outcome::Succeeded(resolved.source),
        Err(e) => {
            tracing::debug!(hook = %hook, "hook command failed: {e}");
            say(out, &failure_message(hook));
            Outcome::Failed(resolved.source)
        }
    }
}

/// Printed before running a command found under the legacy `scripts` key.
pub fn deprecation_warning(hook: HookName) -> String {
    let key = legacy_script_key(hook);
    format!(
        "\n\
         Warning: Setting {key} script in package.json > scripts will be deprecated in v1.0\n\
         Please move it to hookline.hooks in package.json or a hookline.toml file\n\
         Or run `hookline upgrade` for automatic update\n\
         \n\
         See `hookline --help` for usage\n"
    )
}

/// One-line failure report with the `--no-verify` hint that applies to `hook`.
pub fn failure_message(hook: HookName) -> String {
    let note = if hook.can_bypass() {
        "(add --no-verify to bypass)"
    } else {
        "(cannot be bypassed with --no-verify due to Git specs)"
    };
    format!("hookline > {hook} hook failed {note}")
}

fn say(out: &mut impl Write, message: &str) {
    if let Err(e) = writeln!(out, "{message}") {
        tracing::warn!("could not write hook output: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::shell::ExecError;
    use super::*;
    use std::cell::RefCell;
    use std::fs;
    use std::path::PathBuf;

    /// Records commands instead of running them.
    struct FakeRunner {
        calls: RefCell<Vec<(String, PathBuf, Vec<(String, String)>)>>,
        exit: Option<i32>,
    }

    impl FakeRunner {
        fn succeeding() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                exit: None,
            }
        }

        fn exiting(code: i32) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                exit: Some(code),
            }
        }

        fn commands(&self) -> Vec<String> {
            self.calls.borrow().iter().map(|c| c.0.clone()).collect()
        }
    }

    impl CommandRunner for FakeRunner {
        fn run(&self, command: &str, cwd: &Path, env: &[(&str, &str)]) -> Result<(), ExecError> {
            self.calls.borrow_mut().push((
                command.to_string(),
                cwd.to_path_buf(),
                env.iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ));
            match self.exit {
                None => Ok(()),
                Some(code) => Err(ExecError::Status(Some(code))),
            }
        }
    }

    struct SpawnFails;

    impl CommandRunner for SpawnFails {
        fn run(&self, _: &str, _: &Path, _: &[(&str, &str)]) -> Result<(), ExecError> {
            Err(ExecError::Spawn(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "sh not found",
            )))
        }
    }

    fn project(manifest: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("package.json"), manifest).unwrap();
        dir
    }

    fn fire(hook: HookName, dir: &Path, runner: &dyn CommandRunner) -> (Outcome, String) {
        let mut out = Vec::new();
        let outcome = dispatch(hook, dir, None, runner, &mut out);
        (outcome, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_runs_configured_command() {
        let dir = project(r#"{"hookline": {"hooks": {"pre-commit": "npm test"}}}"#);
        let runner = FakeRunner::succeeding();
        let (outcome, log) = fire(HookName::PreCommit, dir.path(), &runner);

        assert_eq!(outcome, Outcome::Succeeded(CommandSource::Hooks));
        assert_eq!(outcome.exit_code(), 0);
        assert_eq!(runner.commands(), vec!["npm test"]);
        assert_eq!(runner.calls.borrow()[0].1, dir.path());
        assert!(log.contains("hookline > pre-commit (hookline v"));
    }

    #[test]
    fn test_current_command_wins_over_legacy_script() {
        let dir = project(
            r#"{
  "scripts": {"precommit": "legacy"},
  "hookline": {"hooks": {"pre-commit": "current"}}
}"#,
        );
        let runner = FakeRunner::succeeding();
        let (outcome, log) = fire(HookName::PreCommit, dir.path(), &runner);

        assert_eq!(outcome, Outcome::Succeeded(CommandSource::Hooks));
        assert_eq!(runner.commands(), vec!["current"]);
        assert!(!log.contains("Warning"));
    }

    #[test]
    fn test_falls_back_to_legacy_script_with_warning() {
        let dir = project(r#"{"scripts": {"prepush": "npm run lint"}}"#);
        let runner = FakeRunner::succeeding();
        let (outcome, log) = fire(HookName::PrePush, dir.path(), &runner);

        assert_eq!(outcome, Outcome::Succeeded(CommandSource::LegacyScript));
        assert_eq!(outcome.exit_code(), 0);
        assert_eq!(runner.commands(), vec!["npm run lint"]);
        assert!(log.contains("Warning: Setting prepush script in package.json > scripts"));
        assert!(log.contains("hookline upgrade"));
        let warning_at = log.find("Warning").unwrap();
        let header_at = log.find("hookline > pre-push").unwrap();
        assert!(warning_at < header_at);
    }

    #[test]
    fn test_no_command_is_success_without_subprocess() {
        let dir = project(r#"{"hookline": {"hooks": {"pre-commit": "npm test"}}}"#);
        let runner = FakeRunner::succeeding();
        let (outcome, log) = fire(HookName::PostMerge, dir.path(), &runner);

        assert_eq!(outcome, Outcome::NoCommand);
        assert_eq!(outcome.exit_code(), 0);
        assert!(runner.commands().is_empty());
        assert!(log.is_empty());
    }

    #[test]
    fn test_no_manifest_is_no_command() {
        let dir = tempfile::tempdir().unwrap();
        let runner = FakeRunner::succeeding();
        assert_eq!(
            run(HookName::PreCommit, dir.path(), None, &runner, &mut Vec::<u8>::new()),
            0
        );
        assert!(runner.commands().is_empty());
    }

    #[test]
    fn test_failure_returns_one_with_bypass_hint() {
        let dir = project(r#"{"hookline": {"hooks": {"pre-push": "exit 2"}}}"#);
        let runner = FakeRunner::exiting(2);
        let (outcome, log) = fire(HookName::PrePush, dir.path(), &runner);

        assert_eq!(outcome, Outcome::Failed(CommandSource::Hooks));
        assert_eq!(outcome.exit_code(), 1);
        assert!(log.contains("hookline > pre-push hook failed (add --no-verify to bypass)"));
        assert!(!log.contains("cannot be bypassed"));
    }

    #[test]
    fn test_prepare_commit_msg_failure_cannot_be_bypassed() {
        let dir = project(r#"{"hookline": {"hooks": {"prepare-commit-msg": "exit 2"}}}"#);
        let runner = FakeRunner::exiting(2);
        let (outcome, log) = fire(HookName::PrepareCommitMsg, dir.path(), &runner);

        assert_eq!(outcome.exit_code(), 1);
        assert!(log.contains("cannot be bypassed with --no-verify due to Git specs"));
        assert!(!log.contains("add --no-verify"));
    }

    #[test]
    fn test_legacy_failure_returns_one() {
        let dir = project(r#"{"scripts": {"commitmsg": "exit 1"}}"#);
        let runner = FakeRunner::exiting(1);
        let (outcome, _) = fire(HookName::CommitMsg, dir.path(), &runner);
        assert_eq!(outcome, Outcome::Failed(CommandSource::LegacyScript));
    }

    #[test]
    fn test_spawn_error_is_failure() {
        let dir = project(r#"{"hookline": {"hooks": {"pre-commit": "npm test"}}}"#);
        let (outcome, log) = fire(HookName::PreCommit, dir.path(), &SpawnFails);
        assert_eq!(outcome.exit_code(), 1);
        assert!(log.contains("pre-commit hook failed"));
    }

    #[test]
    fn test_git_params_are_exported() {
        let dir = project(r#"{"hookline": {"hooks": {"commit-msg": "check"}}}"#);
        let runner = FakeRunner::succeeding();
        dispatch(
            HookName::CommitMsg,
            dir.path(),
            Some(".git/COMMIT_EDITMSG"),
            &runner,
            &mut Vec::<u8>::new(),
        );
        let calls = runner.calls.borrow();
        assert_eq!(
            calls[0].2,
            vec![(GIT_PARAMS_VAR.to_string(), ".git/COMMIT_EDITMSG".to_string())]
        );
    }

    #[test]
    fn test_invalid_manifest_is_ignored() {
        let dir = project("{ broken");
        fs::write(
            dir.path().join("hookline.toml"),
            "[hooks]\npre-commit = \"cargo test\"\n",
        )
        .unwrap();
        let runner = FakeRunner::succeeding();
        let (outcome, _) = fire(HookName::PreCommit, dir.path(), &runner);
        assert_eq!(outcome, Outcome::Succeeded(CommandSource::Hooks));
        assert_eq!(runner.commands(), vec!["cargo test"]);
    }

    #[test]
    fn test_outcome_source() {
        assert_eq!(Outcome::NoCommand.source(), None);
        assert_eq!(
            Outcome::Succeeded(CommandSource::Hooks).source(),
            Some(CommandSource::Hooks)
        );
        assert_eq!(
            Outcome::Failed(CommandSource::LegacyScript).source(),
            Some(CommandSource::LegacyScript)
        );
    }

    #[test]
    fn test_run_returns_exit_code() {
        let dir = project(r#"{"scripts": {"prepush": "npm test"}}"#);
        let runner = FakeRunner::exiting(3);
        let code = run(HookName::PrePush, dir.path(), None, &runner, &mut Vec::<u8>::new());
        assert_eq!(code, 1);
        assert_eq!(runner.commands(), vec!["npm test"]);
    }

    #[test]
    fn test_resolve_prefers_settings() {
        let mut settings = Settings::default();
        settings
            .hooks
            .insert("pre-commit".to_string(), "current".to_string());
        let mut manifest = Manifest::default();
        manifest
            .scripts
            .insert("precommit".to_string(), "legacy".to_string());

        let resolved = resolve(&settings, &manifest, HookName::PreCommit).unwrap();
        assert_eq!(resolved.command, "current");
        assert_eq!(resolved.source, CommandSource::Hooks);

        let resolved = resolve(&Settings::default(), &manifest, HookName::PreCommit).unwrap();
        assert_eq!(resolved.source, CommandSource::LegacyScript);
        assert!(resolve(&Settings::default(), &manifest, HookName::PrePush).is_none());
    }
}
