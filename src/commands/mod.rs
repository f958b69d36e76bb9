//! Command handlers for the service management subcommands.
//!
//! `install` and `uninstall` manage a systemd user unit so the daemon starts
//! with the session. systemctl failures are logged and reported, never
//! panicked on; a host without systemd simply sees the failures.

pub mod install;
pub mod uninstall;

use anyhow::{Context, Result, anyhow};
use std::path::PathBuf;
use std::process::Command;

use crate::constants::SERVICE_NAME;

/// Path of the systemd user unit file.
pub(crate) fn service_unit_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow!("Could not determine config directory (is $HOME set?)"))?;
    Ok(config_dir.join("systemd").join("user").join(SERVICE_NAME))
}

/// Run `systemctl --user` with the given arguments, logging failures.
///
/// Returns true when the command ran and exited successfully.
pub(crate) fn run_systemctl(args: &[&str]) -> bool {
    match Command::new("systemctl").arg("--user").args(args).status() {
        Ok(status) if status.success() => true,
        Ok(status) => {
            log_warning!("systemctl --user {} failed: {}", args.join(" "), status);
            false
        }
        Err(e) => {
            log_warning!("Could not run systemctl: {e}");
            false
        }
    }
}

/// The executable path baked into the unit file.
pub(crate) fn current_executable() -> Result<PathBuf> {
    std::env::current_exe().context("Failed to determine the path of the running executable")
}
