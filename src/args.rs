//! Command-line argument parsing and processing.
//!
//! This module handles parsing of command-line arguments and provides a clean
//! interface for the main application logic. It supports the service
//! management subcommands alongside the run-time flags while gracefully
//! handling unknown options.

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Run the day/night daemon with these settings
    Run {
        debug_enabled: bool,
        /// Select and log themes without invoking the external command
        dry_run: bool,
        /// Perform a single tick and exit without sleeping
        one_shot: bool,
        /// Skip the network geolocation tier
        no_ip: bool,
        /// Redirect all output to the log file
        log_to_file: bool,
    },
    /// Install and start the systemd user service
    Install,
    /// Stop and remove the systemd user service
    Uninstall,
    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// Subcommands (`install`, `uninstall` and their aliases) take precedence
    /// over run flags; `--help` and `--version` take precedence over
    /// everything else.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut debug_enabled = false;
        let mut dry_run = false;
        let mut one_shot = false;
        let mut no_ip = false;
        let mut log_to_file = false;
        let mut display_help = false;
        let mut display_version = false;
        let mut subcommand: Option<CliAction> = None;
        let mut unknown_arg_found = false;

        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        for arg in &args_vec {
            match arg.as_str() {
                "--help" | "-h" => display_help = true,
                "--version" | "-V" | "-v" => display_version = true,
                "--debug" | "-d" => debug_enabled = true,
                "--dry-run" => dry_run = true,
                "--one-shot" => one_shot = true,
                "--no-ip" => no_ip = true,
                "--log" => log_to_file = true,
                "install" | "enable" => {
                    if set_subcommand(&mut subcommand, CliAction::Install, arg).is_err() {
                        unknown_arg_found = true;
                    }
                }
                "uninstall" | "disable" | "remove" => {
                    if set_subcommand(&mut subcommand, CliAction::Uninstall, arg).is_err() {
                        unknown_arg_found = true;
                    }
                }
                other => {
                    if other.starts_with('-') {
                        log_warning!("Unknown option: {other}");
                    } else {
                        log_warning!("Unknown command: {other}");
                    }
                    unknown_arg_found = true;
                }
            }
        }

        let action = if display_version {
            CliAction::ShowVersion
        } else if display_help || unknown_arg_found {
            if unknown_arg_found {
                CliAction::ShowHelpDueToError
            } else {
                CliAction::ShowHelp
            }
        } else if let Some(subcommand) = subcommand {
            subcommand
        } else {
            CliAction::Run {
                debug_enabled,
                dry_run,
                one_shot,
                no_ip,
                log_to_file,
            }
        };

        ParsedArgs { action }
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

/// Record a subcommand, rejecting a second one.
fn set_subcommand(slot: &mut Option<CliAction>, action: CliAction, word: &str) -> Result<(), ()> {
    match slot {
        None => {
            *slot = Some(action);
            Ok(())
        }
        Some(existing) if *existing == action => Ok(()),
        Some(_) => {
            log_warning!("Cannot use multiple commands at once: '{word}'");
            Err(())
        }
    }
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    log_version!();
    log_pipe!();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    log_version!();
    log_block_start!(env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("sundowner [OPTIONS] [COMMAND]");
    log_block_start!("Options:");
    log_indented!("-d, --debug            Enable detailed debug output");
    log_indented!("    --dry-run          Select themes without switching them");
    log_indented!("    --one-shot         Apply the current state once and exit");
    log_indented!("    --no-ip            Skip IP geolocation, use the timezone fallback");
    log_indented!("    --log              Write output to the log file instead of stdout");
    log_indented!("-h, --help             Print help information");
    log_indented!("-V, --version          Print version information");
    log_block_start!("Commands:");
    log_indented!("install, enable        Install and start the systemd user service");
    log_indented!("uninstall, disable     Stop and remove the systemd user service");
    log_end!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_defaults() -> CliAction {
        CliAction::Run {
            debug_enabled: false,
            dry_run: false,
            one_shot: false,
            no_ip: false,
            log_to_file: false,
        }
    }

    #[test]
    fn test_parse_no_args() {
        let parsed = ParsedArgs::parse(vec!["sundowner"]);
        assert_eq!(parsed.action, run_defaults());
    }

    #[test]
    fn test_parse_debug_flag() {
        let parsed = ParsedArgs::parse(vec!["sundowner", "--debug"]);
        assert_eq!(
            parsed.action,
            CliAction::Run {
                debug_enabled: true,
                dry_run: false,
                one_shot: false,
                no_ip: false,
                log_to_file: false,
            }
        );
    }

    #[test]
    fn test_parse_run_flags_combined() {
        let parsed = ParsedArgs::parse(vec!["sundowner", "--dry-run", "--one-shot", "--no-ip"]);
        assert_eq!(
            parsed.action,
            CliAction::Run {
                debug_enabled: false,
                dry_run: true,
                one_shot: true,
                no_ip: true,
                log_to_file: false,
            }
        );
    }

    #[test]
    fn test_parse_help_flag() {
        let parsed = ParsedArgs::parse(vec!["sundowner", "--help"]);
        assert_eq!(parsed.action, CliAction::ShowHelp);
    }

    #[test]
    fn test_parse_version_short_flags() {
        let parsed1 = ParsedArgs::parse(vec!["sundowner", "-V"]);
        assert_eq!(parsed1.action, CliAction::ShowVersion);

        let parsed2 = ParsedArgs::parse(vec!["sundowner", "-v"]);
        assert_eq!(parsed2.action, CliAction::ShowVersion);
    }

    #[test]
    fn test_version_takes_precedence() {
        let parsed = ParsedArgs::parse(vec!["sundowner", "--version", "--help", "--debug"]);
        assert_eq!(parsed.action, CliAction::ShowVersion);
    }

    #[test]
    fn test_parse_install_subcommand() {
        let parsed = ParsedArgs::parse(vec!["sundowner", "install"]);
        assert_eq!(parsed.action, CliAction::Install);

        let parsed = ParsedArgs::parse(vec!["sundowner", "enable"]);
        assert_eq!(parsed.action, CliAction::Install);
    }

    #[test]
    fn test_parse_uninstall_aliases() {
        for alias in ["uninstall", "disable", "remove"] {
            let parsed = ParsedArgs::parse(vec!["sundowner", alias]);
            assert_eq!(parsed.action, CliAction::Uninstall, "alias {alias}");
        }
    }

    #[test]
    fn test_conflicting_subcommands_rejected() {
        let parsed = ParsedArgs::parse(vec!["sundowner", "install", "uninstall"]);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_repeated_subcommand_alias_accepted() {
        let parsed = ParsedArgs::parse(vec!["sundowner", "install", "enable"]);
        assert_eq!(parsed.action, CliAction::Install);
    }

    #[test]
    fn test_parse_unknown_flag() {
        let parsed = ParsedArgs::parse(vec!["sundowner", "--unknown"]);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_mixed_valid_and_invalid() {
        let parsed = ParsedArgs::parse(vec!["sundowner", "--debug", "--invalid"]);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_subcommand_with_debug_flag() {
        let parsed = ParsedArgs::parse(vec!["sundowner", "-d", "uninstall"]);
        assert_eq!(parsed.action, CliAction::Uninstall);
    }
}
