//! The polling scheduler: tick logic and the supervised run loop.
//!
//! [`Scheduler::tick`] is the unit of work: recompute today's sun times,
//! classify the current instant, and switch themes when the state changed
//! since the previous tick. The retry-after-interval policy lives in
//! [`run_loop`], the outer driver: a failed tick is logged and the loop
//! simply continues, so no core failure can take the daemon down.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::sync::atomic::Ordering;
use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;

use crate::geo::GeoCoordinate;
use crate::signals::{SignalMessage, SignalState};
use crate::solar::sun_times;
use crate::state::{DayState, classify};
use crate::theme::{ThemeCatalog, ThemeSetter, pick_theme};

/// Holds the immutable resolved location plus the only piece of mutable
/// state in the process: the last observed [`DayState`].
pub struct Scheduler {
    coordinate: GeoCoordinate,
    catalog: ThemeCatalog,
    dry_run: bool,
    setter: Box<dyn ThemeSetter>,
    last_state: Option<DayState>,
}

impl Scheduler {
    pub fn new(
        coordinate: GeoCoordinate,
        catalog: ThemeCatalog,
        dry_run: bool,
        setter: Box<dyn ThemeSetter>,
    ) -> Self {
        Self {
            coordinate,
            catalog,
            dry_run,
            setter,
            last_state: None,
        }
    }

    /// The last state observed by a tick, None before the first tick.
    pub fn last_state(&self) -> Option<DayState> {
        self.last_state
    }

    /// Perform one scheduling tick at the given instant.
    ///
    /// Sun times are recomputed every tick; the calculation is cheap and
    /// recomputation sidesteps date-rollover bookkeeping. Returns the new
    /// state when a transition (including the initial one) was detected,
    /// None when nothing changed.
    ///
    /// The remembered state is updated before the external command runs, so
    /// a persistently failing command does not retrigger a switch attempt
    /// every tick - only at the next real transition.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Result<Option<DayState>> {
        let times = sun_times(
            now.date_naive(),
            self.coordinate.latitude,
            self.coordinate.longitude,
        );
        let state = classify(now, times.as_ref());

        if self.last_state == Some(state) {
            return Ok(None);
        }

        match self.last_state {
            Some(previous) => {
                log_block_start!("State change detected: {previous} -> {state}")
            }
            None => log_block_start!("Initial state: {state}"),
        }
        self.last_state = Some(state);

        let theme = match pick_theme(self.catalog.bucket(state)) {
            Some(theme) => theme.to_string(),
            None => {
                log_warning!("No {} themes available to switch to", state.theme_mode());
                return Ok(Some(state));
            }
        };

        log_decorated!("Switching to {} theme: {theme}", state.theme_mode());
        if self.dry_run {
            log_indented!("Dry run: not invoking the theme command");
            return Ok(Some(state));
        }

        self.setter
            .set_theme(&theme)
            .with_context(|| format!("Failed to switch to theme '{theme}'"))?;

        Ok(Some(state))
    }
}

/// Drive the scheduler until shutdown.
///
/// Each iteration runs one tick; a tick error is logged and the loop
/// continues after the standard interval. The inter-tick sleep is a
/// `recv_timeout` on the signal channel so an interrupt ends the loop
/// immediately. In one-shot mode the loop exits after the first tick
/// without sleeping.
pub fn run_loop(
    scheduler: &mut Scheduler,
    signal_state: &SignalState,
    interval: Duration,
    one_shot: bool,
) -> Result<()> {
    while signal_state.running.load(Ordering::SeqCst) {
        match scheduler.tick(Utc::now()) {
            Ok(_) => {}
            Err(e) => {
                log_pipe!();
                log_warning!("Tick failed: {e:#}");
                log_indented!("Retrying on the next cycle...");
            }
        }

        if one_shot {
            log_block_start!("One-shot mode, exiting after a single tick");
            break;
        }

        match signal_state.signal_receiver.recv_timeout(interval) {
            Ok(SignalMessage::Shutdown) => break,
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                if !signal_state.running.load(Ordering::SeqCst) {
                    break;
                }
                // Watcher thread died; fall back to plain sleeps rather than
                // spinning on a dead channel
                log_pipe!();
                log_warning!("Signal handler disconnected unexpectedly");
                log_indented!("Continuing without signal-aware sleeps");
                std::thread::sleep(interval);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::MockThemeSetter;
    use chrono::NaiveDate;

    fn equator() -> GeoCoordinate {
        GeoCoordinate::new(0.0, 0.0).unwrap()
    }

    fn catalog() -> ThemeCatalog {
        ThemeCatalog {
            light: vec!["solarized-light".to_string()],
            dark: vec!["tokyo-night".to_string()],
        }
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        // Equinox date: sunrise ~06:04 UTC, sunset ~18:10 UTC at (0, 0)
        NaiveDate::from_ymd_opt(2024, 3, 20)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn first_tick_applies_the_current_state() {
        let mut setter = MockThemeSetter::new();
        setter
            .expect_set_theme()
            .times(1)
            .withf(|theme| theme == "solarized-light")
            .returning(|_| Ok(()));

        let mut scheduler = Scheduler::new(equator(), catalog(), false, Box::new(setter));
        let result = scheduler.tick(at(12, 0)).unwrap();
        assert_eq!(result, Some(DayState::Day));
        assert_eq!(scheduler.last_state(), Some(DayState::Day));
    }

    #[test]
    fn unchanged_state_triggers_nothing() {
        let mut setter = MockThemeSetter::new();
        setter.expect_set_theme().times(1).returning(|_| Ok(()));

        let mut scheduler = Scheduler::new(equator(), catalog(), false, Box::new(setter));
        scheduler.tick(at(12, 0)).unwrap();
        assert_eq!(scheduler.tick(at(12, 1)).unwrap(), None);
        assert_eq!(scheduler.tick(at(12, 2)).unwrap(), None);
    }

    #[test]
    fn crossing_sunset_switches_to_a_dark_theme_once() {
        let mut setter = MockThemeSetter::new();
        setter
            .expect_set_theme()
            .times(1)
            .withf(|theme| theme == "solarized-light")
            .returning(|_| Ok(()));
        setter
            .expect_set_theme()
            .times(1)
            .withf(|theme| theme == "tokyo-night")
            .returning(|_| Ok(()));

        let mut scheduler = Scheduler::new(equator(), catalog(), false, Box::new(setter));
        assert_eq!(scheduler.tick(at(12, 0)).unwrap(), Some(DayState::Day));
        // Past sunset: exactly one switch into the dark bucket
        assert_eq!(scheduler.tick(at(20, 0)).unwrap(), Some(DayState::Night));
        // No boundary crossing: no further invocation
        assert_eq!(scheduler.tick(at(20, 1)).unwrap(), None);
    }

    #[test]
    fn dry_run_selects_but_never_invokes() {
        let mut setter = MockThemeSetter::new();
        setter.expect_set_theme().never();

        let mut scheduler = Scheduler::new(equator(), catalog(), true, Box::new(setter));
        assert_eq!(scheduler.tick(at(12, 0)).unwrap(), Some(DayState::Day));
        assert_eq!(scheduler.tick(at(20, 0)).unwrap(), Some(DayState::Night));
    }

    #[test]
    fn empty_bucket_is_not_fatal_and_state_still_advances() {
        let mut setter = MockThemeSetter::new();
        setter.expect_set_theme().never();

        let light_only = ThemeCatalog {
            light: vec!["solarized-light".to_string()],
            dark: vec![],
        };
        let mut scheduler = Scheduler::new(equator(), light_only, true, Box::new(setter));
        scheduler.tick(at(12, 0)).unwrap();

        // Night has no themes: the transition is still recorded
        assert_eq!(scheduler.tick(at(20, 0)).unwrap(), Some(DayState::Night));
        assert_eq!(scheduler.tick(at(20, 1)).unwrap(), None);
    }

    #[test]
    fn failed_switch_does_not_retrigger_next_tick() {
        let mut setter = MockThemeSetter::new();
        setter
            .expect_set_theme()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("command not found")));

        let mut scheduler = Scheduler::new(equator(), catalog(), false, Box::new(setter));
        assert!(scheduler.tick(at(12, 0)).is_err());

        // The state was remembered before the command ran, so the next tick
        // is quiet rather than retrying the switch
        assert_eq!(scheduler.last_state(), Some(DayState::Day));
        assert_eq!(scheduler.tick(at(12, 1)).unwrap(), None);
    }

    #[test]
    fn polar_night_classifies_as_day() {
        let mut setter = MockThemeSetter::new();
        setter
            .expect_set_theme()
            .times(1)
            .withf(|theme| theme == "solarized-light")
            .returning(|_| Ok(()));

        let arctic = GeoCoordinate::new(80.0, 0.0).unwrap();
        let midwinter = NaiveDate::from_ymd_opt(2024, 12, 21)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            .and_utc();

        let mut scheduler = Scheduler::new(arctic, catalog(), false, Box::new(setter));
        assert_eq!(scheduler.tick(midwinter).unwrap(), Some(DayState::Day));
    }
}
