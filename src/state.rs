//! Day/night classification.
//!
//! A pure function from a UTC instant and a day's sun times to a
//! [`DayState`]. No state is retained here; transition detection by
//! comparison with the previous tick belongs to the scheduler.

use chrono::{DateTime, Utc};

use crate::solar::SunTimes;

/// The two states a day can be in, mapping onto the theme buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayState {
    Day,
    Night,
}

impl DayState {
    /// Returns the display name for this state.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Day => "Day",
            Self::Night => "Night",
        }
    }

    /// Returns the theme bucket name this state selects from.
    pub fn theme_mode(&self) -> &'static str {
        match self {
            Self::Day => "light",
            Self::Night => "dark",
        }
    }
}

impl std::fmt::Display for DayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Classify an instant as day or night.
///
/// Absent sun times (polar day/night) classify as Day so a polar winter does
/// not pin the desktop to a dark theme indefinitely.
///
/// Both orderings of the computed instants are handled: in the normal order
/// the day is the closed interval [sunrise, sunset]; when the instants come
/// out inverted (see [`crate::solar`] module docs) the night is the closed
/// interval [sunset, sunrise]. Boundaries are inclusive in both cases.
pub fn classify(now: DateTime<Utc>, times: Option<&SunTimes>) -> DayState {
    let Some(times) = times else {
        return DayState::Day;
    };

    if times.sunrise <= times.sunset {
        if times.sunrise <= now && now <= times.sunset {
            DayState::Day
        } else {
            DayState::Night
        }
    } else if times.sunset <= now && now <= times.sunrise {
        DayState::Night
    } else {
        DayState::Day
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn instant(hour: u32, minute: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2024, 3, 20)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
            .and_utc()
    }

    fn normal_times() -> SunTimes {
        SunTimes {
            sunrise: instant(6, 0),
            sunset: instant(18, 0),
        }
    }

    fn inverted_times() -> SunTimes {
        SunTimes {
            sunrise: instant(18, 0),
            sunset: instant(6, 0),
        }
    }

    #[test]
    fn absent_times_always_classify_as_day() {
        assert_eq!(classify(instant(0, 0), None), DayState::Day);
        assert_eq!(classify(instant(12, 0), None), DayState::Day);
        assert_eq!(classify(instant(23, 59), None), DayState::Day);
    }

    #[test]
    fn normal_order_day_interval_is_inclusive() {
        let times = normal_times();
        assert_eq!(classify(times.sunrise, Some(&times)), DayState::Day);
        assert_eq!(classify(times.sunset, Some(&times)), DayState::Day);
        assert_eq!(classify(instant(12, 0), Some(&times)), DayState::Day);
    }

    #[test]
    fn one_second_before_sunrise_is_night() {
        let times = normal_times();
        let just_before = times.sunrise - Duration::seconds(1);
        assert_eq!(classify(just_before, Some(&times)), DayState::Night);
    }

    #[test]
    fn one_second_after_sunset_is_night() {
        let times = normal_times();
        let just_after = times.sunset + Duration::seconds(1);
        assert_eq!(classify(just_after, Some(&times)), DayState::Night);
    }

    #[test]
    fn inverted_order_night_interval_is_inclusive() {
        let times = inverted_times();
        assert_eq!(classify(times.sunset, Some(&times)), DayState::Night);
        assert_eq!(classify(times.sunrise, Some(&times)), DayState::Night);
        assert_eq!(classify(instant(12, 0), Some(&times)), DayState::Night);
    }

    #[test]
    fn inverted_order_outside_interval_is_day() {
        let times = inverted_times();
        assert_eq!(classify(instant(3, 0), Some(&times)), DayState::Day);
        assert_eq!(classify(instant(21, 0), Some(&times)), DayState::Day);
    }

    #[test]
    fn classification_is_pure() {
        let times = normal_times();
        let now = instant(7, 30);
        assert_eq!(
            classify(now, Some(&times)),
            classify(now, Some(&times))
        );
    }

    #[test]
    fn theme_modes_map_to_buckets() {
        assert_eq!(DayState::Day.theme_mode(), "light");
        assert_eq!(DayState::Night.theme_mode(), "dark");
    }
}
