//! Phase windows, cycles and schedules.
//!
//! A [`Cycle`] is the ordered template of phases; a [`Schedule`] lays the
//! template end to end until the run duration is used up, truncating the
//! final window so the windows sum to exactly the run duration.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::validation::{validate_non_negative, validate_positive};

/// Windows shorter than this are treated as empty, in seconds.
const MIN_WINDOW_SECONDS: f64 = 1e-9;

/// Protocol phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Nothing transmitting or listening.
    Idle,
    /// Mechanical transducer transmitting.
    MechTx,
    /// RF channel transmitting.
    RfTx,
    /// Listening for anomalies.
    MonitorRx,
}

impl Phase {
    /// Returns the upper-case phase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "IDLE",
            Phase::MechTx => "MECH_TX",
            Phase::RfTx => "RF_TX",
            Phase::MonitorRx => "MONITOR_RX",
        }
    }

    /// Returns true for the two transmit phases.
    pub fn is_transmit(&self) -> bool {
        matches!(self, Phase::MechTx | Phase::RfTx)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scheduled window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseWindow {
    /// Phase active during the window.
    pub phase: Phase,
    /// Offset from the session start, in seconds.
    pub start: f64,
    /// Length in seconds.
    pub duration: f64,
    /// Zero-based index of the cycle this window belongs to.
    pub cycle: usize,
}

impl PhaseWindow {
    /// Offset of the window end from the session start.
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Ordered phase template repeated by a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cycle {
    steps: Vec<(Phase, f64)>,
}

impl Cycle {
    /// Builds the beacon cycle MECH_TX, RF_TX, MONITOR_RX.
    ///
    /// A disabled RF channel has its window compressed to zero length, so the
    /// cycle holds only the mechanical and monitor phases.
    pub fn beacon(tx_duration: f64, rx_duration: f64, rf_enabled: bool) -> Result<Self, ValidationError> {
        let rf_duration = if rf_enabled { tx_duration } else { 0.0 };
        Self::new(vec![
            (Phase::MechTx, tx_duration),
            (Phase::RfTx, rf_duration),
            (Phase::MonitorRx, rx_duration),
        ])
    }

    /// Builds a cycle from explicit steps; zero-length steps are dropped.
    pub fn new(steps: Vec<(Phase, f64)>) -> Result<Self, ValidationError> {
        for (i, (_, duration)) in steps.iter().enumerate() {
            validate_non_negative("duration", *duration)
                .map_err(|e| ValidationError::invalid_param(format!("steps[{}]", i), e.message))?;
        }
        let steps: Vec<(Phase, f64)> = steps
            .into_iter()
            .filter(|(_, d)| *d > MIN_WINDOW_SECONDS)
            .collect();
        let cycle = Self { steps };
        if cycle.duration() <= 0.0 {
            return Err(ValidationError::invalid_param(
                "steps",
                "cycle must have a positive total duration",
            ));
        }
        Ok(cycle)
    }

    /// Returns the non-empty steps in order.
    pub fn steps(&self) -> &[(Phase, f64)] {
        &self.steps
    }

    /// Total length of one cycle in seconds.
    pub fn duration(&self) -> f64 {
        self.steps.iter().map(|(_, d)| d).sum()
    }

    /// Returns true if any step uses `phase`.
    pub fn contains(&self, phase: Phase) -> bool {
        self.steps.iter().any(|(p, _)| *p == phase)
    }
}

/// A cycle replayed over a run duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    windows: Vec<PhaseWindow>,
    total_duration: f64,
}

impl Schedule {
    /// Replays `cycle` until `total_duration` is met.
    ///
    /// # Example
    /// ```
    /// use hlb_spec::schedule::{Cycle, Phase, Schedule};
    ///
    /// let cycle = Cycle::beacon(60.0, 120.0, true).unwrap();
    /// let schedule = Schedule::new(&cycle, 3600.0).unwrap();
    /// assert_eq!(schedule.windows()[0].phase, Phase::MechTx);
    /// assert!((schedule.elapsed() - 3600.0).abs() < 1e-6);
    /// ```
    pub fn new(cycle: &Cycle, total_duration: f64) -> Result<Self, ValidationError> {
        validate_positive("total_duration", total_duration)
            .map_err(|e| ValidationError::invalid_param("total_duration", e.message))?;

        let cycle_length = cycle.duration();
        let mut windows = Vec::new();
        let mut cycle_index = 0usize;

        'outer: loop {
            let cycle_start = cycle_index as f64 * cycle_length;
            let mut offset = 0.0;
            for &(phase, duration) in cycle.steps() {
                let start = cycle_start + offset;
                let remaining = total_duration - start;
                if remaining <= MIN_WINDOW_SECONDS {
                    break 'outer;
                }
                windows.push(PhaseWindow {
                    phase,
                    start,
                    duration: duration.min(remaining),
                    cycle: cycle_index,
                });
                offset += duration;
            }
            cycle_index += 1;
        }

        Ok(Self {
            windows,
            total_duration,
        })
    }

    /// Returns the windows in execution order.
    pub fn windows(&self) -> &[PhaseWindow] {
        &self.windows
    }

    /// Returns the requested run duration.
    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    /// Sum of all window durations.
    pub fn elapsed(&self) -> f64 {
        self.windows.iter().map(|w| w.duration).sum()
    }

    /// Sum of window durations spent in `phase`.
    pub fn time_in(&self, phase: Phase) -> f64 {
        self.windows
            .iter()
            .filter(|w| w.phase == phase)
            .map(|w| w.duration)
            .sum()
    }

    /// Number of cycles started.
    pub fn cycle_count(&self) -> usize {
        self.windows.last().map_or(0, |w| w.cycle + 1)
    }

    /// Number of windows.
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Returns true if the schedule has no windows.
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beacon_schedule_conservation() {
        let cycle = Cycle::beacon(60.0, 120.0, true).unwrap();
        let schedule = Schedule::new(&cycle, 3600.0).unwrap();
        assert!((schedule.elapsed() - 3600.0).abs() < 1e-6);
        // 3600 / 240 = 15 full cycles
        assert_eq!(schedule.cycle_count(), 15);
        assert_eq!(schedule.len(), 45);
        let phases: Vec<Phase> = schedule.windows()[..3].iter().map(|w| w.phase).collect();
        assert_eq!(phases, vec![Phase::MechTx, Phase::RfTx, Phase::MonitorRx]);
    }

    #[test]
    fn test_final_window_truncated() {
        let cycle = Cycle::beacon(60.0, 120.0, true).unwrap();
        let schedule = Schedule::new(&cycle, 100.0).unwrap();
        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule.windows()[1].phase, Phase::RfTx);
        assert!((schedule.windows()[1].duration - 40.0).abs() < 1e-9);
        assert!((schedule.elapsed() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_disabled_rf_compresses_window() {
        let cycle = Cycle::beacon(60.0, 120.0, false).unwrap();
        assert!(!cycle.contains(Phase::RfTx));
        assert_eq!(cycle.duration(), 180.0);
        let schedule = Schedule::new(&cycle, 3600.0).unwrap();
        assert_eq!(schedule.time_in(Phase::RfTx), 0.0);
        assert!((schedule.elapsed() - 3600.0).abs() < 1e-6);
        assert_eq!(schedule.cycle_count(), 20);
    }

    #[test]
    fn test_windows_are_contiguous() {
        let cycle = Cycle::beacon(7.0, 11.0, true).unwrap();
        let schedule = Schedule::new(&cycle, 250.0).unwrap();
        for pair in schedule.windows().windows(2) {
            assert!((pair[0].end() - pair[1].start).abs() < 1e-9);
        }
    }

    #[test]
    fn test_empty_cycle_rejected() {
        assert!(Cycle::beacon(0.0, 0.0, true).is_err());
        assert!(Cycle::new(vec![(Phase::MechTx, -1.0)]).is_err());
    }

    #[test]
    fn test_phase_names() {
        assert_eq!(Phase::MonitorRx.to_string(), "MONITOR_RX");
        assert_eq!(
            serde_json::to_string(&Phase::MechTx).unwrap(),
            "\"MECH_TX\""
        );
    }
}
