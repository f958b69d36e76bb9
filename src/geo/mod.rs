//! Geographic location resolution for sundowner.
//!
//! This module produces the best-effort coordinate the solar calculator runs
//! against. Resolution happens once at startup and falls through a chain of
//! tiers, each returning `Option<GeoCoordinate>`:
//!
//! 1. Coordinates configured in `sundowner.toml` (no detection at all)
//! 2. IP geolocation over HTTP ([`ipapi`]), skipped with `--no-ip`
//! 3. The system timezone looked up in the zone1970.tab coordinate table
//!    ([`timezone`]), decoded with the ISO 6709 parser ([`iso6709`])
//! 4. A coarse estimate from the UTC offset (15 degrees of longitude per
//!    hour, latitude 0) which always succeeds
//!
//! Tier failures are silent; only the winning tier is logged. Every tier
//! constructs coordinates through [`GeoCoordinate::new`], so the resolved
//! value is always within geodetic bounds.

pub mod ipapi;
pub mod iso6709;
pub mod timezone;


use crate::config::Config;

/// A coordinate in decimal degrees, validated to geodetic bounds.
///
/// Immutable once resolved; the scheduler and solar calculator receive it by
/// value for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCoordinate {
    /// Latitude in degrees, -90 to +90
    pub latitude: f64,
    /// Longitude in degrees, -180 to +180
    pub longitude: f64,
}

impl GeoCoordinate {
    /// Construct a coordinate, rejecting out-of-bounds or non-finite values.
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return None;
        }
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return None;
        }
        Some(Self {
            latitude,
            longitude,
        })
    }
}

impl std::fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Resolve the host's approximate location, never failing.
///
/// Tiers are tried in order; the first success wins and is logged. The
/// offset-based estimate at the end always produces a usable coordinate.
pub fn resolve_location(config: &Config, skip_network: bool) -> GeoCoordinate {
    if let Some(coordinate) = config.coordinates() {
        log_block_start!("Using configured location: {coordinate}");
        return coordinate;
    }

    if skip_network {
        log_block_start!("Skipping IP geolocation (--no-ip)");
    } else {
        log_block_start!("Detecting location via IP geolocation...");
        if let Some(lookup) = ipapi::detect() {
            log_decorated!(
                "Location detected: {} ({})",
                lookup.place,
                lookup.coordinate
            );
            return lookup.coordinate;
        }
        log_decorated!("IP geolocation unavailable, falling back to timezone lookup");
    }

    if let Some((coordinate, zone)) = timezone::zone_table_lookup() {
        log_decorated!("Found coordinates for timezone '{zone}': {coordinate}");
        return coordinate;
    }

    let (coordinate, offset_hours) = timezone::offset_estimate();
    log_decorated!("Using UTC offset estimate (UTC{offset_hours:+.1}): {coordinate}");
    coordinate
}
