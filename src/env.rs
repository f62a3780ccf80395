//! Environment checks for install-time switches.

/// Set to `true` to skip hook installation entirely.
pub const SKIP_INSTALL_VAR: &str = "HOOKLINE_SKIP_INSTALL";

/// Variables CI services set.
const CI_VARS: &[&str] = &["CI", "CONTINUOUS_INTEGRATION", "BUILD_NUMBER", "RUN_ID"];

/// Whether the skip-install override is active in the process environment.
pub fn skip_install() -> bool {
    skip_install_from(|key| std::env::var(key).ok())
}

/// Whether the process appears to run under CI.
pub fn is_ci() -> bool {
    is_ci_from(|key| std::env::var(key).ok())
}

fn skip_install_from(lookup: impl Fn(&str) -> Option<String>) -> bool {
    lookup(SKIP_INSTALL_VAR).as_deref() == Some("true")
}

fn is_ci_from(lookup: impl Fn(&str) -> Option<String>) -> bool {
    if lookup("CI").as_deref() == Some("false") {
        return false;
    }
    CI_VARS.iter().any(|key| lookup(key).is_some())
}
