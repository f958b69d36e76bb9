//! Shared utilities: home expansion and process management helpers.

use std::path::PathBuf;

use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;

/// Expand a leading `~/` to the user's home directory.
///
/// Paths without the prefix are returned unchanged. If the home directory
/// cannot be determined the literal path is returned, which will simply fail
/// later with a clear "not found" error.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Path of the single-instance lock file.
///
/// Lives in the user's runtime directory so it disappears on logout; falls
/// back to /tmp when XDG_RUNTIME_DIR is unset.
pub fn lock_file_path() -> PathBuf {
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(runtime_dir).join("sundowner.lock")
}

/// Check whether a process with the given PID is currently running.
///
/// Sends signal 0, which performs permission and existence checks without
/// delivering a signal.
pub fn is_process_running(pid: u32) -> bool {
    kill(Pid::from_raw(pid as i32), None).is_ok()
}

/// Ask a process to terminate gracefully with SIGTERM.
///
/// Returns true if the signal was delivered.
pub fn terminate_process(pid: u32) -> bool {
    kill(Pid::from_raw(pid as i32), Signal::SIGTERM).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_tilde_leaves_absolute_paths_alone() {
        assert_eq!(
            expand_tilde("/usr/share/zoneinfo/zone1970.tab"),
            PathBuf::from("/usr/share/zoneinfo/zone1970.tab")
        );
    }

    #[test]
    fn expand_tilde_resolves_home_prefix() {
        let expanded = expand_tilde("~/.local/share/omarchy/themes");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home.join(".local/share/omarchy/themes"));
        } else {
            assert_eq!(expanded, PathBuf::from("~/.local/share/omarchy/themes"));
        }
    }

    #[test]
    fn current_process_is_running() {
        assert!(is_process_running(std::process::id()));
    }
}
