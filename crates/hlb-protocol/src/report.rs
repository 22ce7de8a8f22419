//! Protocol events and session records.

use std::sync::{Arc, Mutex, PoisonError};

use hlb_spec::{AnomalyEvent, Phase};
use serde::Serialize;
use tracing::{info, warn};

/// Something the controller wants an operator to know about.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProtocolEvent {
    /// `run` or the first `step` began.
    SessionStarted {
        /// Seconds per cycle.
        cycle_duration: f64,
        /// Seconds in the whole session.
        total_duration: f64,
        /// Whether RF windows are scheduled.
        rf_enabled: bool,
    },
    /// A window began.
    PhaseEntered {
        /// Phase of the window.
        phase: Phase,
        /// Cycle index.
        cycle: usize,
        /// Planned start, session-relative seconds.
        scheduled_start: f64,
        /// Actual start, session-relative seconds.
        actual_start: f64,
    },
    /// A buffer was handed to its sink and accepted.
    TransmitComplete {
        /// Transmit phase.
        phase: Phase,
        /// Samples transmitted.
        samples: usize,
        /// BLAKE3 hash of the encoded buffer.
        content_hash: String,
    },
    /// A sink failed; the window fell back to idle.
    HardwareFault {
        /// Phase of the window.
        phase: Phase,
        /// Channel name.
        channel: String,
        /// Sink error message.
        message: String,
    },
    /// A window ran past its allotment.
    TimingFault {
        /// Phase of the window.
        phase: Phase,
        /// Cycle index.
        cycle: usize,
        /// Seconds past the planned end.
        overrun: f64,
    },
    /// The monitor flagged a sample.
    Anomaly(AnomalyEvent),
    /// The monitor could not capture or detect.
    MonitorError {
        /// Stable error code.
        code: String,
        /// Error message.
        message: String,
    },
    /// Every window of a cycle has run.
    CycleComplete {
        /// Cycle index.
        cycle: usize,
    },
    /// The last window has run.
    SessionFinished {
        /// Completed cycles, counting a truncated final cycle.
        cycles: usize,
        /// Session-relative seconds at the end.
        elapsed: f64,
    },
}

/// Receives protocol events.
pub trait Reporter: Send {
    /// Handles one event. Must not block for long.
    fn report(&self, event: &ProtocolEvent);
}

/// Logs events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: &ProtocolEvent) {
        match event {
            ProtocolEvent::HardwareFault {
                phase,
                channel,
                message,
            } => warn!(%phase, channel = %channel, message = %message, "hardware fault"),
            ProtocolEvent::TimingFault {
                phase,
                cycle,
                overrun,
            } => warn!(%phase, cycle, overrun, "timing fault"),
            ProtocolEvent::Anomaly(a) => warn!(
                timestamp = a.timestamp,
                observed = a.observed,
                sigma = a.deviation_sigma,
                "anomaly detected"
            ),
            ProtocolEvent::MonitorError { code, message } => {
                warn!(code = %code, message = %message, "monitor error")
            }
            other => match serde_json::to_string(other) {
                Ok(json) => info!(event = %json, "protocol event"),
                Err(_) => info!(?other, "protocol event"),
            },
        }
    }
}

/// Collects events in memory. Clones share one log.
#[derive(Debug, Clone, Default)]
pub struct MemoryReporter {
    events: Arc<Mutex<Vec<ProtocolEvent>>>,
}

impl MemoryReporter {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies the events received so far.
    pub fn events(&self) -> Vec<ProtocolEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of events received so far.
    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true if nothing has been reported.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, event: &ProtocolEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}

/// How a window ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowOutcome {
    /// The phase's work completed.
    Completed,
    /// A sink failed; the remainder of the window was idle.
    HardwareFault,
    /// The monitor could not produce a result.
    MonitorError,
}

/// Record of one executed window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutedWindow {
    /// Scheduled phase.
    pub phase: Phase,
    /// Cycle index.
    pub cycle: usize,
    /// Planned start, session-relative seconds.
    pub scheduled_start: f64,
    /// Planned length in seconds.
    pub scheduled_duration: f64,
    /// Actual start.
    pub actual_start: f64,
    /// Actual end.
    pub actual_end: f64,
    /// Outcome.
    pub outcome: WindowOutcome,
    /// Anomalies found in the window.
    pub anomalies: usize,
}

impl ExecutedWindow {
    /// Seconds the window ran past its planned end, if any.
    pub fn overrun(&self) -> f64 {
        (self.actual_end - (self.scheduled_start + self.scheduled_duration)).max(0.0)
    }
}

/// Serializable account of a session.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SessionSummary {
    /// Cycles started, counting a truncated final cycle.
    pub cycles: usize,
    /// Whether RF windows were scheduled.
    pub rf_enabled: bool,
    /// Every executed window, in order.
    pub windows: Vec<ExecutedWindow>,
    /// Events reported.
    pub events: usize,
    /// Anomalies reported.
    pub anomalies: usize,
    /// Anomaly with the largest deviation.
    pub strongest_anomaly: Option<AnomalyEvent>,
    /// Hardware faults during windows.
    pub hardware_faults: usize,
    /// Windows that overran.
    pub timing_faults: usize,
    /// Session-relative seconds at the end.
    pub elapsed: f64,
}

impl SessionSummary {
    /// Folds one event into the counters.
    pub fn record(&mut self, event: &ProtocolEvent) {
        self.events += 1;
        match event {
            ProtocolEvent::Anomaly(a) => {
                self.anomalies += 1;
                let stronger = self
                    .strongest_anomaly
                    .map_or(true, |s| a.deviation_sigma > s.deviation_sigma);
                if stronger {
                    self.strongest_anomaly = Some(*a);
                }
            }
            ProtocolEvent::HardwareFault { .. } => self.hardware_faults += 1,
            ProtocolEvent::TimingFault { .. } => self.timing_faults += 1,
            _ => {}
        }
    }

    /// Total time spent in `phase` windows.
    pub fn time_in(&self, phase: Phase) -> f64 {
        self.windows
            .iter()
            .filter(|w| w.phase == phase)
            .map(|w| w.actual_end - w.actual_start)
            .sum()
    }

    /// Serializes the summary as pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
