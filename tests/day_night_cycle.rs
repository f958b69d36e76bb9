//! End-to-end day/night cycle against the public scheduler API.
//!
//! Drives a tick sequence across the sunset boundary and asserts that
//! exactly one theme switch happens per crossing, drawn from the right
//! bucket.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};

use sundowner::geo::GeoCoordinate;
use sundowner::scheduler::Scheduler;
use sundowner::state::DayState;
use sundowner::theme::{ThemeCatalog, ThemeSetter};

/// Records every switch the scheduler asks for.
#[derive(Default)]
struct RecordingSetter {
    switched_to: std::rc::Rc<std::cell::RefCell<Vec<String>>>,
}

impl ThemeSetter for RecordingSetter {
    fn set_theme(&mut self, theme: &str) -> Result<()> {
        self.switched_to.borrow_mut().push(theme.to_string());
        Ok(())
    }
}

fn catalog() -> ThemeCatalog {
    ThemeCatalog {
        light: vec!["catppuccin-latte".to_string(), "rose-pine-dawn".to_string()],
        dark: vec!["gruvbox".to_string(), "tokyo-night".to_string()],
    }
}

/// Equinox at the prime meridian: sunrise ~06:04 UTC, sunset ~18:10 UTC.
fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(2024, 3, 20)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
        .and_utc()
}

#[test]
fn sunset_crossing_switches_exactly_once_into_the_dark_bucket() {
    sundowner::logger::Log::set_enabled(false);

    let setter = RecordingSetter::default();
    let switched_to = std::rc::Rc::clone(&setter.switched_to);

    let coordinate = GeoCoordinate::new(0.0, 0.0).unwrap();
    let mut scheduler = Scheduler::new(coordinate, catalog(), false, Box::new(setter));

    // Daytime tick: the initial state is applied with a light theme
    assert_eq!(scheduler.tick(at(12, 0)).unwrap(), Some(DayState::Day));
    {
        let switches = switched_to.borrow();
        assert_eq!(switches.len(), 1);
        assert!(catalog().light.contains(&switches[0]), "got {:?}", switches);
    }

    // Stable daytime ticks change nothing
    assert_eq!(scheduler.tick(at(12, 1)).unwrap(), None);
    assert_eq!(scheduler.tick(at(17, 59)).unwrap(), None);
    assert_eq!(switched_to.borrow().len(), 1);

    // Crossing sunset: exactly one switch, drawn from the dark bucket
    assert_eq!(scheduler.tick(at(20, 0)).unwrap(), Some(DayState::Night));
    {
        let switches = switched_to.borrow();
        assert_eq!(switches.len(), 2);
        assert!(catalog().dark.contains(&switches[1]), "got {:?}", switches);
    }

    // No further boundary crossing: zero additional invocations
    assert_eq!(scheduler.tick(at(20, 1)).unwrap(), None);
    assert_eq!(scheduler.tick(at(23, 59)).unwrap(), None);
    assert_eq!(switched_to.borrow().len(), 2);
}

#[test]
fn dry_run_cycle_records_no_switches() {
    sundowner::logger::Log::set_enabled(false);

    let setter = RecordingSetter::default();
    let switched_to = std::rc::Rc::clone(&setter.switched_to);

    let coordinate = GeoCoordinate::new(0.0, 0.0).unwrap();
    let mut scheduler = Scheduler::new(coordinate, catalog(), true, Box::new(setter));

    assert_eq!(scheduler.tick(at(12, 0)).unwrap(), Some(DayState::Day));
    assert_eq!(scheduler.tick(at(20, 0)).unwrap(), Some(DayState::Night));
    assert!(switched_to.borrow().is_empty());
}
