//! Implementation of the uninstall command.
//!
//! Stops and disables the systemd user unit, removes the unit file, and
//! terminates any daemon instance still holding the runtime lock.

use anyhow::Result;
use std::fs;

use super::{run_systemctl, service_unit_path};
use crate::constants::SERVICE_NAME;
use crate::utils::{is_process_running, lock_file_path, terminate_process};

/// Handle the uninstall command.
pub fn handle_uninstall_command() -> Result<()> {
    log_version!();

    log_block_start!("Stopping {SERVICE_NAME}...");
    run_systemctl(&["stop", SERVICE_NAME]);
    log_decorated!("Disabling {SERVICE_NAME}...");
    run_systemctl(&["disable", SERVICE_NAME]);

    let unit_path = service_unit_path()?;
    if unit_path.exists() {
        log_block_start!("Removing service unit");
        log_indented!("{}", unit_path.display());
        if let Err(e) = fs::remove_file(&unit_path) {
            log_warning!("Failed to remove unit file: {e}");
        }
        run_systemctl(&["daemon-reload"]);
    }

    stop_running_instance();

    log_block_start!("Service uninstalled");
    log_end!();
    Ok(())
}

/// Terminate a daemon that is still running outside the service.
///
/// The PID comes from the runtime lock file; a missing or stale lock means
/// there is nothing to do.
fn stop_running_instance() {
    let lock_path = lock_file_path();
    let Ok(content) = fs::read_to_string(&lock_path) else {
        return;
    };
    let Some(pid) = content.lines().next().and_then(|line| line.trim().parse::<u32>().ok())
    else {
        return;
    };

    if !is_process_running(pid) {
        return;
    }

    log_block_start!("Terminating running instance (PID: {pid})...");
    if !terminate_process(pid) {
        log_warning!("Failed to signal process {pid}");
        return;
    }

    // Give it a moment to exit cleanly
    for _ in 0..30 {
        if !is_process_running(pid) {
            log_decorated!("Process terminated");
            return;
        }
        std::thread::sleep(std::time::Duration::from_millis(100));
    }
    log_warning!("Process {pid} did not exit within 3 seconds");
}
