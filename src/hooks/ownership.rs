//! Detects who wrote an existing hook file.

/// Written at the top of every ghooks script.
pub const GHOOKS_MARKER: &str = "// Generated by ghooks. Do not edit this file.";

/// Path the pre-commit package's scripts delegate to.
pub const PRE_COMMIT_MARKER: &str = "./node_modules/pre-commit/hook";

/// Comment line hookline puts in every script it generates.
pub const HOOKLINE_MARKER: &str = "# hookline: generated, do not edit";

/// Authorship of a hook file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// Written by the user or an unknown tool.
    Unmanaged,
    Ghooks,
    PreCommit,
    Hookline,
}

impl Ownership {
    /// Written by a tool hookline replaces.
    pub fn is_legacy(self) -> bool {
        matches!(self, Ownership::Ghooks | Ownership::PreCommit)
    }

    pub fn label(self) -> &'static str {
        match self {
            Ownership::Unmanaged => "user",
            Ownership::Ghooks => "ghooks",
            Ownership::PreCommit => "pre-commit",
            Ownership::Hookline => "hookline",
        }
    }
}

/// Classify hook file contents. First matching marker wins.
pub fn classify(content: &str) -> Ownership {
    if content.contains(GHOOKS_MARKER) {
        Ownership::Ghooks
    } else if content.contains(PRE_COMMIT_MARKER) {
        Ownership::PreCommit
    } else if content.contains(HOOKLINE_MARKER) {
        Ownership::Hookline
    } else {
        Ownership::Unmanaged
    }
}
