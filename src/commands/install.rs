//! Implementation of the install command.
//!
//! Writes a systemd user unit pointing at the current executable, then
//! reloads the daemon and enables the unit so theme switching starts
//! immediately and on every login.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::{current_executable, run_systemctl, service_unit_path};
use crate::constants::SERVICE_NAME;

/// Handle the install command.
pub fn handle_install_command() -> Result<()> {
    log_version!();

    let unit_path = service_unit_path()?;
    let executable = current_executable()?;

    log_block_start!("Installing systemd user service");
    log_indented!("{}", unit_path.display());

    if let Some(parent) = unit_path.parent() {
        fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create systemd user directory {}", parent.display())
        })?;
    }

    fs::write(&unit_path, unit_content(&executable))
        .with_context(|| format!("Failed to write service unit {}", unit_path.display()))?;

    log_block_start!("Reloading systemd user daemon...");
    run_systemctl(&["daemon-reload"]);

    log_decorated!("Enabling and starting {SERVICE_NAME}...");
    if run_systemctl(&["enable", "--now", SERVICE_NAME]) {
        log_block_start!("Service installed and started");
    } else {
        log_block_start!("Unit written, but systemctl could not enable it");
        log_indented!("Enable manually with: systemctl --user enable --now {SERVICE_NAME}");
    }
    log_end!();

    Ok(())
}

/// Render the unit file for the given executable path.
///
/// `--log` routes output to the log file; systemd would capture stdout, but
/// the file keeps behavior identical when launched outside the service too.
fn unit_content(executable: &Path) -> String {
    format!(
        "[Unit]\n\
         Description=Sundowner day/night theme switcher\n\
         After=graphical-session.target\n\
         \n\
         [Service]\n\
         ExecStart={} --log\n\
         Restart=on-failure\n\
         \n\
         [Install]\n\
         WantedBy=default.target\n",
        executable.display()
    )
}
