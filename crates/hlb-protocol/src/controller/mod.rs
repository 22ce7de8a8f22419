//! Protocol controller.
//!
//! An explicit state machine over the [`Schedule`]: each [`step`] executes one
//! window (MECH_TX, RF_TX or MONITOR_RX), driven only by the injected
//! [`Clock`]. Hardware and monitor problems are reported through the
//! [`Reporter`] and never stop the cycle; synthesis errors do. A mechanical
//! device that fails its probe keeps its windows and idles through them; a
//! missing RF device has its windows compressed out of the schedule.
//!
//! [`step`]: Controller::step

mod run;
mod state;


use std::sync::Arc;

use hlb_backend_synth::channel::{MechanicalChannel, RfChannel};
use hlb_backend_synth::{Composer, PresetDomain, PresetTable};
use hlb_spec::{BeaconConfig, Cycle, Phase, Schedule};
use tracing::info;

use crate::clock::{Clock, SystemClock};
use crate::error::ControllerResult;
use crate::monitor::{Monitor, MonitorSettings};
use crate::report::{ProtocolEvent, Reporter, SessionSummary, TracingReporter};
use crate::sensor::SensorSource;
use crate::sink::{MechanicalSink, RfSink};

pub use state::Lifecycle;

/// External parts the controller drives.
pub struct Collaborators {
    /// Audio output.
    pub mechanical_sink: Box<dyn MechanicalSink>,
    /// RF output; `None` runs without RF windows.
    pub rf_sink: Option<Box<dyn RfSink>>,
    /// Ambient sensor for the monitor.
    pub sensor: Box<dyn SensorSource>,
    /// Event destination.
    pub reporter: Box<dyn Reporter>,
    /// Time source.
    pub clock: Arc<dyn Clock>,
    /// Programme presets.
    pub presets: PresetTable,
}

impl Collaborators {
    /// Creates collaborators with no RF sink, a tracing reporter, the system
    /// clock and the standard presets.
    pub fn new(mechanical_sink: Box<dyn MechanicalSink>, sensor: Box<dyn SensorSource>) -> Self {
        Self {
            mechanical_sink,
            rf_sink: None,
            sensor,
            reporter: Box::new(TracingReporter),
            clock: Arc::new(SystemClock::new()),
            presets: PresetTable::standard(),
        }
    }

    /// Sets the RF sink.
    pub fn with_rf_sink(mut self, sink: Box<dyn RfSink>) -> Self {
        self.rf_sink = Some(sink);
        self
    }

    /// Sets the reporter.
    pub fn with_reporter(mut self, reporter: Box<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Sets the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Sets the preset table.
    pub fn with_presets(mut self, presets: PresetTable) -> Self {
        self.presets = presets;
        self
    }
}

/// Drives one beacon session.
pub struct Controller {
    config: BeaconConfig,
    mechanical: MechanicalChannel,
    rf: RfChannel,
    mechanical_sink: Box<dyn MechanicalSink>,
    rf_sink: Option<Box<dyn RfSink>>,
    monitor: Monitor,
    reporter: Box<dyn Reporter>,
    clock: Arc<dyn Clock>,
    schedule: Schedule,
    rf_enabled: bool,
    mechanical_fault: Option<String>,
    state: Phase,
    lifecycle: Lifecycle,
    cursor: usize,
    origin: f64,
    cycles_completed: usize,
    summary: SessionSummary,
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("state", &self.state)
            .field("lifecycle", &self.lifecycle)
            .field("cursor", &self.cursor)
            .field("rf_enabled", &self.rf_enabled)
            .field("windows", &self.schedule.len())
            .finish_non_exhaustive()
    }
}

impl Controller {
    /// Validates `config`, resolves both programmes and builds the schedule.
    ///
    /// # Returns
    /// * `ControllerError::Config` for out-of-range settings
    /// * `ControllerError::Synth` when a programme is not in the preset table or
    ///   cannot be rendered at the configured rate
    pub fn new(config: BeaconConfig, collaborators: Collaborators) -> ControllerResult<Self> {
        config.validate()?;

        let Collaborators {
            mechanical_sink,
            rf_sink,
            sensor,
            reporter,
            clock,
            presets,
        } = collaborators;

        let composer = Composer::new(presets);
        composer.programme(
            &config.mech_programme,
            PresetDomain::Mechanical,
            config.tx_duration,
            config.mech_sample_rate,
        )?;
        let rf_enabled = config.rf_enabled && rf_sink.is_some();
        if rf_enabled {
            composer.programme(
                &config.rf_programme,
                PresetDomain::Baseband,
                config.tx_duration,
                config.rf_sample_rate,
            )?;
        }

        let mechanical =
            MechanicalChannel::with_sample_rate(composer.clone(), config.mech_sample_rate);
        let rf = RfChannel::from_config(composer, &config);

        let monitor = Monitor::new(
            sensor,
            MonitorSettings {
                baseline_window: config.baseline_samples,
                batch_size: config.monitor_batch,
            },
            Arc::clone(&clock),
        );

        let schedule = build_schedule(&config, rf_enabled)?;
        info!(
            windows = schedule.len(),
            cycles = schedule.cycle_count(),
            rf_enabled,
            mech_programme = %config.mech_programme,
            "controller ready"
        );

        Ok(Self {
            config,
            mechanical,
            rf,
            mechanical_sink,
            rf_sink,
            monitor,
            reporter,
            clock,
            schedule,
            rf_enabled,
            mechanical_fault: None,
            state: Phase::Idle,
            lifecycle: Lifecycle::Created,
            cursor: 0,
            origin: 0.0,
            cycles_completed: 0,
            summary: SessionSummary {
                rf_enabled,
                ..SessionSummary::default()
            },
        })
    }

    /// Current phase. Idle before the first window, after the last, and for
    /// the rest of a window whose hardware failed.
    pub fn state(&self) -> Phase {
        self.state
    }

    /// Where the session is in its lifecycle.
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Cycles whose every window has run.
    pub fn cycle_count(&self) -> usize {
        self.cycles_completed
    }

    /// The planned windows.
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Whether the mechanical device answered the probe.
    pub fn mechanical_available(&self) -> bool {
        self.mechanical_fault.is_none()
    }

    /// Whether RF windows are scheduled.
    pub fn rf_enabled(&self) -> bool {
        self.rf_enabled
    }

    /// The session configuration.
    pub fn config(&self) -> &BeaconConfig {
        &self.config
    }

    /// The anomaly monitor.
    pub fn monitor(&self) -> &Monitor {
        &self.monitor
    }

    /// Account of the session so far.
    pub fn summary(&self) -> &SessionSummary {
        &self.summary
    }

    fn emit(&mut self, event: ProtocolEvent) {
        self.summary.record(&event);
        self.reporter.report(&event);
    }

    fn elapsed(&self) -> f64 {
        self.clock.now() - self.origin
    }
}

fn build_schedule(config: &BeaconConfig, rf_enabled: bool) -> ControllerResult<Schedule> {
    let cycle = Cycle::beacon(config.tx_duration, config.rx_duration, rf_enabled)?;
    Ok(Schedule::new(&cycle, config.total_duration)?)
}
