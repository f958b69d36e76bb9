//! Shared constants for sundowner.

use std::time::Duration;

/// IP geolocation endpoint queried by the network resolver tier.
pub const GEOLOCATION_URL: &str = "http://ip-api.com/json/";

/// Timeout for the geolocation request so an offline host never hangs startup.
pub const GEOLOCATION_TIMEOUT: Duration = Duration::from_secs(5);

/// System table mapping timezone names to representative coordinates.
pub const ZONE_TAB_PATH: &str = "/usr/share/zoneinfo/zone1970.tab";

/// Plain-text timezone name file, read when timedatectl is unavailable.
pub const ETC_TIMEZONE_PATH: &str = "/etc/timezone";

/// Marker file inside a theme directory that classifies it as a light theme.
pub const LIGHT_MODE_MARKER: &str = "light.mode";

/// Default theme directory (Omarchy convention), `~` expanded at load time.
pub const DEFAULT_THEME_DIR: &str = "~/.local/share/omarchy/themes";

/// Default external theme-set command, `~` expanded at load time.
pub const DEFAULT_THEME_COMMAND: &str = "~/.local/share/omarchy/bin/omarchy-theme-set";

/// Default seconds between day/night checks.
pub const DEFAULT_CHECK_INTERVAL_SECS: u64 = 60;

/// Valid range for the check interval in seconds.
pub const MIN_CHECK_INTERVAL_SECS: u64 = 10;
pub const MAX_CHECK_INTERVAL_SECS: u64 = 3600;

/// systemd user unit installed by `sundowner install`.
pub const SERVICE_NAME: &str = "sundowner.service";

/// Standard exit code for failures.
pub const EXIT_FAILURE: i32 = 1;
