//! The fixed set of git hooks hookline manages.
//!
//! Every hook lives at `<git dir>/hooks/<name>`. The list is closed: hookline
//! never writes or removes any other file in the hooks directory.

pub mod ownership;
pub mod script;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A git lifecycle hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HookName {
    ApplypatchMsg,
    PreApplypatch,
    PostApplypatch,
    PreCommit,
    PrepareCommitMsg,
    CommitMsg,
    PostCommit,
    PreRebase,
    PostCheckout,
    PostMerge,
    PrePush,
    PreReceive,
    Update,
    PostReceive,
    PostUpdate,
    PushToCheckout,
    PreAutoGc,
    PostRewrite,
    SendemailValidate,
}

impl HookName {
    /// All hooks, in installation order.
    pub const ALL: [HookName; 19] = [
        HookName::ApplypatchMsg,
        HookName::PreApplypatch,
        HookName::PostApplypatch,
        HookName::PreCommit,
        HookName::PrepareCommitMsg,
        HookName::CommitMsg,
        HookName::PostCommit,
        HookName::PreRebase,
        HookName::PostCheckout,
        HookName::PostMerge,
        HookName::PrePush,
        HookName::PreReceive,
        HookName::Update,
        HookName::PostReceive,
        HookName::PostUpdate,
        HookName::PushToCheckout,
        HookName::PreAutoGc,
        HookName::PostRewrite,
        HookName::SendemailValidate,
    ];

    /// The file name git looks for.
    pub fn as_str(self) -> &'static str {
        match self {
            HookName::ApplypatchMsg => "applypatch-msg",
            HookName::PreApplypatch => "pre-applypatch",
            HookName::PostApplypatch => "post-applypatch",
            HookName::PreCommit => "pre-commit",
            HookName::PrepareCommitMsg => "prepare-commit-msg",
            HookName::CommitMsg => "commit-msg",
            HookName::PostCommit => "post-commit",
            HookName::PreRebase => "pre-rebase",
            HookName::PostCheckout => "post-checkout",
            HookName::PostMerge => "post-merge",
            HookName::PrePush => "pre-push",
            HookName::PreReceive => "pre-receive",
            HookName::Update => "update",
            HookName::PostReceive => "post-receive",
            HookName::PostUpdate => "post-update",
            HookName::PushToCheckout => "push-to-checkout",
            HookName::PreAutoGc => "pre-auto-gc",
            HookName::PostRewrite => "post-rewrite",
            HookName::SendemailValidate => "sendemail-validate",
        }
    }

    /// Whether `git commit --no-verify` skips this hook.
    ///
    /// Git runs `prepare-commit-msg` even with `--no-verify`.
    pub fn can_bypass(self) -> bool {
        self != HookName::PrepareCommitMsg
    }
}

impl fmt::Display for HookName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HookName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HookName::ALL
            .into_iter()
            .find(|hook| hook.as_str() == s)
            .ok_or_else(|| format!("Unknown hook: {s}"))
    }
}

/// Key under which older setups kept a hook command in `package.json` scripts.
///
/// All `-` separators are dropped: `pre-commit` becomes `precommit`.
pub fn legacy_script_key(hook: HookName) -> String {
    hook.as_str().replace('-', "")
}

/// Directory holding hook scripts for a git dir.
pub fn hooks_dir(git_dir: &Path) -> PathBuf {
    git_dir.join("hooks")
}

/// Path of one hook script.
pub fn hook_path(git_dir: &Path, hook: HookName) -> PathBuf {
    hooks_dir(git_dir).join(hook.as_str())
}

/// Paths of every managed hook, in [`HookName::ALL`] order.
pub fn hook_paths(git_dir: &Path) -> Vec<(HookName, PathBuf)> {
    HookName::ALL
        .into_iter()
        .map(|hook| (hook, hook_path(git_dir, hook)))
        .collect()
}
