//! # Sundowner Library
//!
//! Internal library for the sundowner binary.
//!
//! This library exists to enable testing of the internals and provide clean
//! separation between CLI dispatch (main.rs) and application logic.
//!
//! ## Architecture
//!
//! - **Location**: `geo` resolves the host's approximate coordinate through
//!   a tiered fallback chain (config, IP geolocation, timezone table, UTC
//!   offset estimate)
//! - **Solar**: `solar` computes approximate UTC sunrise/sunset instants
//! - **State**: `state` classifies an instant as day or night
//! - **Scheduling**: `scheduler` ties the above together with the theme
//!   catalog and supervises the polling loop
//! - **Themes**: `theme` scans the theme directory and invokes the external
//!   theme-set command
//! - **Infrastructure**: configuration, CLI parsing, signal handling,
//!   service management, logging, and shared utilities

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

pub mod args;
pub mod commands;
pub mod config;
pub mod constants;
pub mod geo;
pub mod scheduler;
pub mod signals;
pub mod solar;
pub mod state;
pub mod theme;
pub mod utils;
