//! Main application entry point and high-level flow coordination.
//!
//! This module orchestrates the application lifecycle after command-line
//! argument parsing is complete. It coordinates between the modules:
//!
//! - `args`: Command-line argument parsing and help/version display
//! - `config`: Configuration loading and validation
//! - `geo`: One-time location resolution at startup
//! - `theme`: Theme catalog scan and the external set-theme command
//! - `scheduler`: The polling loop and per-tick supervision
//! - `signals`: Signal handling for graceful shutdown
//! - `commands`: Service install/uninstall
//! - `logger`: Centralized logging functionality
//!
//! The main flow consists of:
//! 1. Argument parsing and early exit for help/version/service commands
//! 2. Optional log-file redirection and lock file management
//! 3. Configuration loading and one-time location resolution
//! 4. Theme catalog scan
//! 5. Main polling loop with per-tick failure supervision
//! 6. Graceful cleanup on shutdown

use anyhow::{Context, Result, anyhow};
use chrono::{Local, Utc};
use fs2::FileExt;
use std::fs::File;
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use sundowner::args::{self, CliAction, ParsedArgs};
use sundowner::commands;
use sundowner::config::Config;
use sundowner::constants::EXIT_FAILURE;
use sundowner::geo::{self, GeoCoordinate};
use sundowner::logger::Log;
use sundowner::scheduler::{Scheduler, run_loop};
use sundowner::signals::setup_signal_handler;
use sundowner::solar::sun_times;
use sundowner::theme::{CommandThemeSetter, ThemeCatalog};
use sundowner::utils::{is_process_running, lock_file_path};
use sundowner::{
    log_block_start, log_debug, log_decorated, log_end, log_error, log_error_exit, log_indented,
    log_pipe, log_version, log_warning,
};

/// Run-time flags collected from the CLI.
struct RunFlags {
    debug_enabled: bool,
    dry_run: bool,
    one_shot: bool,
    no_ip: bool,
    log_to_file: bool,
}

fn main() -> Result<()> {
    let parsed_args = ParsedArgs::from_env();

    match parsed_args.action {
        CliAction::ShowVersion => {
            args::display_version_info();
            Ok(())
        }
        CliAction::ShowHelp | CliAction::ShowHelpDueToError => {
            args::display_help();
            Ok(())
        }
        CliAction::Install => commands::install::handle_install_command(),
        CliAction::Uninstall => commands::uninstall::handle_uninstall_command(),
        CliAction::Run {
            debug_enabled,
            dry_run,
            one_shot,
            no_ip,
            log_to_file,
        } => run_daemon(RunFlags {
            debug_enabled,
            dry_run,
            one_shot,
            no_ip,
            log_to_file,
        }),
    }
}

/// Core application flow for the daemon (and its one-shot variant).
fn run_daemon(flags: RunFlags) -> Result<()> {
    // Route output to the log file first so every subsequent line lands there
    let _log_guard = if flags.log_to_file {
        Some(Log::start_file_logging(default_log_path()?)?)
    } else {
        None
    };

    log_version!();
    if flags.log_to_file {
        log_pipe!();
        log_decorated!("Started at {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    }
    if flags.debug_enabled {
        log_pipe!();
        log_debug!("Debug mode enabled - showing detailed resolver output");
    }
    if flags.dry_run {
        log_pipe!();
        log_debug!("Dry-run mode - themes will be selected but not applied");
    }

    let signal_state = setup_signal_handler(flags.debug_enabled)?;

    let config = Config::load()?;
    config.log_config(flags.debug_enabled);

    // Single-instance lock. One-shot and dry-run probes skip it so they can
    // coexist with a running daemon.
    let lock = if flags.one_shot || flags.dry_run {
        None
    } else {
        Some(acquire_lock()?)
    };

    let coordinate = geo::resolve_location(&config, flags.no_ip);
    log_today_sun_times(coordinate);

    let catalog = ThemeCatalog::scan(&config.theme_dir());
    if catalog.is_empty() {
        log_pipe!();
        log_warning!("No themes found in {}", config.theme_dir().display());
        log_indented!("Theme switches will be skipped until themes exist");
    } else {
        log_block_start!(
            "Found {} light and {} dark themes",
            catalog.light.len(),
            catalog.dark.len()
        );
    }

    let setter = CommandThemeSetter::new(config.theme_command());
    let mut scheduler = Scheduler::new(coordinate, catalog, flags.dry_run, Box::new(setter));

    run_loop(
        &mut scheduler,
        &signal_state,
        config.check_interval(),
        flags.one_shot,
    )?;

    log_block_start!("Shutting down sundowner...");
    if let Some((lock_file, lock_path)) = lock {
        drop(lock_file);
        let _ = std::fs::remove_file(&lock_path);
    }
    log_end!();

    Ok(())
}

/// Show today's sunrise and sunset once at startup. Local conversion here is
/// display-only; all state decisions happen in UTC.
fn log_today_sun_times(coordinate: GeoCoordinate) {
    let today = Utc::now().date_naive();
    match sun_times(today, coordinate.latitude, coordinate.longitude) {
        Some(times) => {
            log_block_start!(
                "Today's sunrise: {}",
                times.sunrise.with_timezone(&Local).format("%H:%M:%S")
            );
            log_decorated!(
                "Today's sunset:  {}",
                times.sunset.with_timezone(&Local).format("%H:%M:%S")
            );
        }
        None => {
            log_block_start!("Sun does not cross the horizon here today (polar day/night)");
        }
    }
}

/// Acquire the single-instance lock, reclaiming stale locks once.
fn acquire_lock() -> Result<(File, PathBuf)> {
    let lock_path = lock_file_path();

    if let Some(lock_file) = try_acquire(&lock_path)? {
        log_block_start!("Lock acquired, starting sundowner...");
        return Ok((lock_file, lock_path));
    }

    handle_lock_conflict(&lock_path)?;

    // Stale lock removed - retry acquisition once
    if let Some(lock_file) = try_acquire(&lock_path)? {
        log_block_start!("Lock acquired after cleanup, starting sundowner...");
        return Ok((lock_file, lock_path));
    }

    log_error_exit!("Could not acquire lock at {}", lock_path.display());
    std::process::exit(EXIT_FAILURE);
}

/// Try to take the exclusive lock; on success the file holds our PID.
fn try_acquire(lock_path: &Path) -> Result<Option<File>> {
    // Open without truncating so an existing holder's PID is preserved while
    // we check whether the lock can be acquired
    let mut lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path)
        .with_context(|| format!("Failed to open lock file {}", lock_path.display()))?;

    if lock_file.try_lock_exclusive().is_err() {
        return Ok(None);
    }

    // Lock acquired - now safe to truncate and write our PID
    lock_file.set_len(0)?;
    lock_file.seek(SeekFrom::Start(0))?;
    writeln!(&lock_file, "{}", std::process::id())?;
    (&lock_file).flush()?;

    Ok(Some(lock_file))
}

/// Inspect a held lock: remove it if its owner is gone, otherwise refuse to
/// start a second instance.
fn handle_lock_conflict(lock_path: &Path) -> Result<()> {
    let content = match std::fs::read_to_string(lock_path) {
        Ok(content) => content,
        // Lock file vanished or is unreadable - assume it was cleaned up
        Err(_) => return Ok(()),
    };

    let pid = match content.lines().next().and_then(|line| line.trim().parse::<u32>().ok()) {
        Some(pid) => pid,
        None => {
            log_warning!("Lock file contains no valid PID, removing stale lock");
            let _ = std::fs::remove_file(lock_path);
            return Ok(());
        }
    };

    if !is_process_running(pid) {
        log_warning!("Removing stale lock file (process {pid} no longer running)");
        let _ = std::fs::remove_file(lock_path);
        return Ok(());
    }

    log_pipe!();
    log_error!("sundowner is already running (PID: {pid})");
    log_pipe!();
    log_decorated!("Did you mean to:");
    log_indented!("• Check the current state: sundowner --dry-run --one-shot");
    log_indented!("• Remove the service: sundowner uninstall");
    log_pipe!();
    anyhow::bail!("Cannot start - another sundowner instance is running")
}

/// Log file location under the user's state directory.
fn default_log_path() -> Result<PathBuf> {
    let state_dir = dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .ok_or_else(|| anyhow!("Could not determine state directory (is $HOME set?)"))?;
    let log_dir = state_dir.join("sundowner");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;
    Ok(log_dir.join("sundowner.log"))
}
