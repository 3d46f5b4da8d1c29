//! commit-msg hook installation

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Contents of the hook script
pub const COMMIT_MSG_HOOK: &str = "#!/bin/sh\ngit publish --message-file \"$1\"\n";

/// Outcome of [`install_commit_msg_hook`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStatus {
    /// Hook was written by this call
    Installed,
    /// Identical hook was already present
    AlreadyInstalled,
}

/// Install the commit-msg hook into `<git_dir>/hooks`
///
/// Refuses to overwrite a different existing hook.
pub fn install_commit_msg_hook(git_dir: &Path) -> Result<HookStatus> {
    let hooks_dir = git_dir.join("hooks");
    let hook_path = hooks_dir.join("commit-msg");

    if hook_path.exists() {
        let existing = fs::read_to_string(&hook_path)?;
        if existing == COMMIT_MSG_HOOK {
            return Ok(HookStatus::AlreadyInstalled);
        }
        return Err(Error::Config(format!(
            "commit-msg script {} must be removed first",
            hook_path.display()
        )));
    }

    fs::create_dir_all(&hooks_dir)?;
    fs::write(&hook_path, COMMIT_MSG_HOOK)?;
    make_executable(&hook_path)?;
    Ok(HookStatus::Installed)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o775))?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
