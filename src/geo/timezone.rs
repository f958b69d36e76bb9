//! Timezone-derived location tiers.
//!
//! The zone-table tier maps the host's configured timezone name to the
//! representative coordinates shipped in `zone1970.tab`. The offset tier is
//! the terminal fallback: it derives a longitude from the UTC offset alone
//! (15 degrees per hour) at latitude 0.

use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};

use chrono::Local;

use super::GeoCoordinate;
use super::iso6709::parse_iso6709;
use crate::constants::{ETC_TIMEZONE_PATH, ZONE_TAB_PATH};

/// Determine the host's configured timezone name.
///
/// Queries `timedatectl` first and falls back to reading `/etc/timezone`.
/// Returns None when neither source yields a name.
pub fn system_timezone() -> Option<String> {
    if let Ok(output) = Command::new("timedatectl")
        .args(["show", "-p", "Timezone", "--value"])
        .stderr(Stdio::null())
        .output()
    {
        if output.status.success() {
            if let Ok(name) = String::from_utf8(output.stdout) {
                let name = name.trim();
                if !name.is_empty() {
                    return Some(name.to_string());
                }
            }
        }
    }

    if let Ok(content) = fs::read_to_string(ETC_TIMEZONE_PATH) {
        let name = content.trim();
        if !name.is_empty() {
            return Some(name.to_string());
        }
    }

    None
}

/// Look the system timezone up in the zone1970.tab coordinate table.
///
/// Returns the decoded coordinate and the matched zone name, or None on any
/// I/O or lookup failure.
pub fn zone_table_lookup() -> Option<(GeoCoordinate, String)> {
    let zone = system_timezone()?;
    let coordinate = lookup_in_table(Path::new(ZONE_TAB_PATH), &zone)?;
    Some((coordinate, zone))
}

/// Scan a tab-separated zone table for an exact zone-name match.
///
/// Rows are `codes \t coordinates \t zone \t comment`; comment lines starting
/// with `#` and blank lines are skipped. The first matching row wins.
pub fn lookup_in_table(table_path: &Path, zone: &str) -> Option<GeoCoordinate> {
    let content = fs::read_to_string(table_path).ok()?;

    for line in content.lines() {
        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }
        let columns: Vec<&str> = line.split('\t').collect();
        if columns.len() >= 3 && columns[2].trim() == zone {
            if let Some(coordinate) = parse_iso6709(columns[1]) {
                return Some(coordinate);
            }
        }
    }

    None
}

/// Estimate a coordinate from the host's UTC offset alone.
///
/// Returns the coordinate and the offset in hours for logging. This is the
/// terminal resolver tier and always succeeds.
pub fn offset_estimate() -> (GeoCoordinate, f64) {
    let offset_hours = f64::from(Local::now().offset().local_minus_utc()) / 3600.0;
    let longitude = longitude_for_utc_offset(offset_hours);

    // longitude_for_utc_offset keeps the value in range, so this never
    // actually falls back
    let coordinate = GeoCoordinate::new(0.0, longitude).unwrap_or(GeoCoordinate {
        latitude: 0.0,
        longitude: 0.0,
    });

    (coordinate, offset_hours)
}

/// Map a UTC offset in hours to an estimated longitude in [-180, 180).
///
/// 15 degrees of longitude per hour of offset, wrapped into range with a
/// Euclidean modulus.
pub fn longitude_for_utc_offset(offset_hours: f64) -> f64 {
    (offset_hours * 15.0 + 180.0).rem_euclid(360.0) - 180.0
}
