//! Signal handling for graceful shutdown.
//!
//! A dedicated thread watches SIGINT/SIGTERM/SIGHUP via signal-hook and
//! forwards a shutdown message over a channel. The main loop sleeps with
//! `recv_timeout` on that channel, so an interrupt cuts the inter-tick sleep
//! short instead of waiting it out.

use anyhow::{Context, Result};
use signal_hook::{
    consts::signal::{SIGHUP, SIGINT, SIGTERM},
    iterator::Signals,
};
use std::{
    sync::Arc,
    sync::atomic::{AtomicBool, Ordering},
    sync::mpsc,
    thread,
};

/// Messages delivered to the main loop by the signal watcher.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SignalMessage {
    /// Shutdown signal (SIGTERM, SIGINT, SIGHUP)
    Shutdown,
}

/// Signal handling state shared between threads.
pub struct SignalState {
    /// Atomic flag indicating if the application should keep running
    pub running: Arc<AtomicBool>,
    /// Channel receiver for signal messages
    pub signal_receiver: mpsc::Receiver<SignalMessage>,
}

/// Install the signal watcher thread and return the shared state.
pub fn setup_signal_handler(debug_enabled: bool) -> Result<SignalState> {
    let running = Arc::new(AtomicBool::new(true));
    let (sender, receiver) = mpsc::channel();

    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP])
        .context("Failed to install signal handlers")?;

    let running_flag = Arc::clone(&running);
    thread::spawn(move || {
        for signal in signals.forever() {
            if debug_enabled {
                log_pipe!();
                log_debug!("Received {} signal", signal_name(signal));
            }
            running_flag.store(false, Ordering::SeqCst);
            // The receiver may already be gone during shutdown
            if sender.send(SignalMessage::Shutdown).is_err() {
                break;
            }
        }
    });

    Ok(SignalState {
        running,
        signal_receiver: receiver,
    })
}

fn signal_name(signal: i32) -> &'static str {
    match signal {
        SIGINT => "SIGINT",
        SIGTERM => "SIGTERM",
        SIGHUP => "SIGHUP",
        _ => "unknown",
    }
}
