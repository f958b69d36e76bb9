//! Approximate sunrise/sunset calculation.
//!
//! Implements the classic low-precision sunrise/sunset algorithm
//! (edwilliams.org): day-of-year -> mean anomaly -> true longitude -> right
//! ascension -> declination -> hour angle, with a zenith of 90.833 degrees to
//! account for atmospheric refraction and the solar disk radius. Good to a
//! few minutes, which is plenty for theme switching.
//!
//! Polar conditions are not an error: when the sun does not cross the horizon
//! on the requested date the whole result is absent.
//!
//! Note on ordering: both events are computed independently and normalized
//! into the same 0-24h UTC window on the requested date. For longitudes far
//! from the UTC meridian the sunrise *instant* can land after the sunset
//! instant (local morning is the previous UTC evening). Callers must not
//! assume `sunrise <= sunset`; see [`crate::state::classify`] for the
//! branch that handles both orders.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

/// Zenith angle in degrees defining the horizon crossing, adjusted for
/// refraction and solar disk size.
const ZENITH_DEG: f64 = 90.833;

/// UTC sunrise and sunset instants for one calendar date and coordinate.
///
/// Both instants lie within the date's 24-hour UTC span, but their order is
/// not guaranteed (see module docs).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunTimes {
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

#[derive(Clone, Copy)]
enum SolarEvent {
    Sunrise,
    Sunset,
}

/// Compute UTC sunrise and sunset for `date` at the given coordinate.
///
/// Returns None for polar day and polar night: if either event's hour angle
/// is undefined, the whole day is treated as the edge case.
pub fn sun_times(date: NaiveDate, latitude: f64, longitude: f64) -> Option<SunTimes> {
    let sunrise_ut = event_ut_hours(date, latitude, longitude, SolarEvent::Sunrise)?;
    let sunset_ut = event_ut_hours(date, latitude, longitude, SolarEvent::Sunset)?;

    let midnight = date.and_hms_opt(0, 0, 0)?.and_utc();
    Some(SunTimes {
        sunrise: midnight + Duration::milliseconds((sunrise_ut * 3_600_000.0).round() as i64),
        sunset: midnight + Duration::milliseconds((sunset_ut * 3_600_000.0).round() as i64),
    })
}

/// UTC time of one event as fractional hours in [0, 24).
fn event_ut_hours(
    date: NaiveDate,
    latitude: f64,
    longitude: f64,
    event: SolarEvent,
) -> Option<f64> {
    let day_of_year = f64::from(date.ordinal());
    let lng_hour = longitude / 15.0;

    // Approximate event time in fractional days
    let t = match event {
        SolarEvent::Sunrise => day_of_year + ((6.0 - lng_hour) / 24.0),
        SolarEvent::Sunset => day_of_year + ((18.0 - lng_hour) / 24.0),
    };

    // Sun's mean anomaly and true longitude (degrees)
    let mean_anomaly = (0.9856 * t) - 3.289;
    let true_longitude = force_range(
        mean_anomaly
            + (1.916 * mean_anomaly.to_radians().sin())
            + (0.020 * (2.0 * mean_anomaly).to_radians().sin())
            + 282.634,
        360.0,
    );

    // Right ascension, shifted into the same quadrant as the true longitude,
    // then converted to hours
    let mut right_ascension =
        force_range((0.91764 * true_longitude.to_radians().tan()).atan().to_degrees(), 360.0);
    let l_quadrant = (true_longitude / 90.0).floor() * 90.0;
    let ra_quadrant = (right_ascension / 90.0).floor() * 90.0;
    right_ascension = (right_ascension + (l_quadrant - ra_quadrant)) / 15.0;

    // Declination
    let sin_declination = 0.39782 * true_longitude.to_radians().sin();
    let cos_declination = sin_declination.asin().cos();

    // Local hour angle at the horizon crossing
    let cos_hour_angle = (ZENITH_DEG.to_radians().cos()
        - (sin_declination * latitude.to_radians().sin()))
        / (cos_declination * latitude.to_radians().cos());

    // The sun never rises (> 1) or never sets (< -1) on this date
    if !(-1.0..=1.0).contains(&cos_hour_angle) {
        return None;
    }

    let hour_angle = match event {
        SolarEvent::Sunrise => 360.0 - cos_hour_angle.acos().to_degrees(),
        SolarEvent::Sunset => cos_hour_angle.acos().to_degrees(),
    } / 15.0;

    // Local mean time of the event, adjusted back to UTC
    let local_mean_time = hour_angle + right_ascension - (0.06571 * t) - 6.622;
    Some(force_range(local_mean_time - lng_hour, 24.0))
}

/// Wrap a value into [0, max) by a single addition or subtraction.
fn force_range(value: f64, max: f64) -> f64 {
    if value < 0.0 {
        value + max
    } else if value >= max {
        value - max
    } else {
        value
    }
}
