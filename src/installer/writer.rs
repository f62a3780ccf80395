//! Writes hook scripts to disk.

use std::fs;
use std::io;
use std::path::Path;

/// Write `content` as the whole file at `path` and make it executable.
///
/// The parent directory must already exist.
pub fn write_hook(path: &Path, content: &str) -> io::Result<()> {
    fs::write(path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    }

    Ok(())
}
