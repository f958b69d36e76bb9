//! Theme directory scanning and the external theme-set command.
//!
//! A theme is a subdirectory of the theme directory; its name is the opaque
//! identifier passed to the set command. A theme containing the
//! `light.mode` marker file belongs to the light bucket, everything else is
//! dark. The [`ThemeSetter`] trait is the seam the scheduler drives so tests
//! can observe switches without spawning processes.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::constants::LIGHT_MODE_MARKER;
use crate::state::DayState;

/// Theme identifiers grouped by appearance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeCatalog {
    pub light: Vec<String>,
    pub dark: Vec<String>,
}

impl ThemeCatalog {
    /// Scan a theme directory, classifying each subdirectory by its marker
    /// file.
    ///
    /// Non-directories are ignored. A missing or unreadable theme directory
    /// yields an empty catalog; the caller decides how loudly to complain.
    pub fn scan(theme_dir: &Path) -> Self {
        let mut catalog = Self::default();

        let entries = match fs::read_dir(theme_dir) {
            Ok(entries) => entries,
            Err(_) => return catalog,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(String::from) else {
                continue;
            };
            if path.join(LIGHT_MODE_MARKER).exists() {
                catalog.light.push(name);
            } else {
                catalog.dark.push(name);
            }
        }

        catalog.light.sort();
        catalog.dark.sort();
        catalog
    }

    /// The bucket matching a day/night state.
    pub fn bucket(&self, state: DayState) -> &[String] {
        match state {
            DayState::Day => &self.light,
            DayState::Night => &self.dark,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.light.is_empty() && self.dark.is_empty()
    }
}

/// Pick one identifier from a bucket, or None if the bucket is empty.
///
/// Uses the subsecond clock as the seed; none of the repos this tool grew
/// out of carry an RNG dependency for a once-a-day pick.
pub fn pick_theme(options: &[String]) -> Option<&str> {
    if options.is_empty() {
        return None;
    }
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    options.get(nanos as usize % options.len()).map(String::as_str)
}

/// The external action that applies a theme.
#[cfg_attr(test, mockall::automock)]
pub trait ThemeSetter {
    /// Apply the named theme. Errors are reported to the caller and must
    /// never take the daemon down.
    fn set_theme(&mut self, theme: &str) -> Result<()>;
}

/// Invokes the configured theme-set command with the theme name as its
/// single argument.
pub struct CommandThemeSetter {
    command: PathBuf,
}

impl CommandThemeSetter {
    pub fn new(command: PathBuf) -> Self {
        Self { command }
    }
}

impl ThemeSetter for CommandThemeSetter {
    fn set_theme(&mut self, theme: &str) -> Result<()> {
        let status = std::process::Command::new(&self.command)
            .arg(theme)
            .status()
            .with_context(|| {
                format!("Failed to run theme command {}", self.command.display())
            })?;

        if !status.success() {
            bail!(
                "Theme command {} exited with {} for theme '{}'",
                self.command.display(),
                status,
                theme
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_theme(root: &Path, name: &str, light: bool) {
        let dir = root.join(name);
        fs::create_dir(&dir).unwrap();
        if light {
            fs::write(dir.join(LIGHT_MODE_MARKER), "").unwrap();
        }
    }

    #[test]
    fn scan_classifies_by_marker_file() {
        let root = tempfile::tempdir().unwrap();
        make_theme(root.path(), "rose-pine-dawn", true);
        make_theme(root.path(), "solarized-light", true);
        make_theme(root.path(), "gruvbox", false);
        make_theme(root.path(), "tokyo-night", false);

        let catalog = ThemeCatalog::scan(root.path());
        assert_eq!(catalog.light, vec!["rose-pine-dawn", "solarized-light"]);
        assert_eq!(catalog.dark, vec!["gruvbox", "tokyo-night"]);
    }

    #[test]
    fn scan_ignores_plain_files() {
        let root = tempfile::tempdir().unwrap();
        make_theme(root.path(), "gruvbox", false);
        fs::write(root.path().join("README.md"), "not a theme").unwrap();

        let catalog = ThemeCatalog::scan(root.path());
        assert_eq!(catalog.dark, vec!["gruvbox"]);
        assert!(catalog.light.is_empty());
    }

    #[test]
    fn scan_of_missing_directory_is_empty() {
        let catalog = ThemeCatalog::scan(Path::new("/nonexistent/themes"));
        assert!(catalog.is_empty());
    }

    #[test]
    fn buckets_map_to_states() {
        let catalog = ThemeCatalog {
            light: vec!["light-a".into()],
            dark: vec!["dark-a".into()],
        };
        assert_eq!(catalog.bucket(DayState::Day), ["light-a".to_string()]);
        assert_eq!(catalog.bucket(DayState::Night), ["dark-a".to_string()]);
    }

    #[test]
    fn pick_theme_returns_member_or_none() {
        assert_eq!(pick_theme(&[]), None);

        let options = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        for _ in 0..32 {
            let choice = pick_theme(&options).unwrap();
            assert!(options.iter().any(|o| o == choice));
        }
    }

    #[test]
    fn missing_command_is_an_error_not_a_panic() {
        let mut setter = CommandThemeSetter::new(PathBuf::from("/nonexistent/theme-set"));
        assert!(setter.set_theme("gruvbox").is_err());
    }
}
