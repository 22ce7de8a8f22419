//! Window execution.

use hlb_backend_synth::channel::Channel;
use hlb_spec::{BackendError, Phase, PhaseWindow};
use tracing::{info, warn};

use super::state::Lifecycle;
use super::{build_schedule, Controller};
use crate::error::{ControllerError, ControllerResult};
use crate::report::{ExecutedWindow, ProtocolEvent, SessionSummary, WindowOutcome};
use crate::sink::{SinkError, TransmitRequest};

/// Overruns shorter than this are clock jitter, not faults.
const TIMING_TOLERANCE: f64 = 1e-3;

impl Controller {
    /// Probes the hardware and captures the baseline.
    ///
    /// A missing mechanical device is reported and its windows idle for their
    /// full length. A missing RF device disables the RF channel for the
    /// session. A failed baseline capture is reported and the session
    /// continues without one. Calling this again is a no-op.
    pub fn initialise(&mut self) -> ControllerResult<()> {
        if self.lifecycle != Lifecycle::Created {
            return Ok(());
        }

        let requirements = self.mechanical.describe_hardware_requirements();
        if let Err(e) = self.mechanical_sink.probe(&requirements) {
            let err = ControllerError::HardwareUnavailable {
                channel: requirements.channel.to_string(),
                message: e.to_string(),
            };
            warn!(error = %err, "mechanical hardware unavailable, idling its windows");
            self.emit(ProtocolEvent::HardwareFault {
                phase: Phase::MechTx,
                channel: requirements.channel.to_string(),
                message: err.to_string(),
            });
            self.mechanical_fault = Some(err.to_string());
        }

        if self.rf_enabled {
            let requirements = self.rf.describe_hardware_requirements();
            let probe = match self.rf_sink.as_mut() {
                Some(sink) => sink.probe(&requirements),
                None => Err(SinkError::Absent("no RF sink".to_string())),
            };
            if let Err(e) = probe {
                let err = ControllerError::HardwareUnavailable {
                    channel: requirements.channel.to_string(),
                    message: e.to_string(),
                };
                warn!(error = %err, "RF hardware unavailable, disabling RF channel");
                self.disable_rf()?;
                self.emit(ProtocolEvent::HardwareFault {
                    phase: Phase::RfTx,
                    channel: requirements.channel.to_string(),
                    message: err.to_string(),
                });
            }
        }

        self.origin = self.clock.now();
        self.monitor.mark_origin();
        self.lifecycle = Lifecycle::Running;
        self.emit(ProtocolEvent::SessionStarted {
            cycle_duration: self.cycle_duration(),
            total_duration: self.schedule.total_duration(),
            rf_enabled: self.rf_enabled,
        });

        if let Err(e) = self.monitor.capture_baseline(self.config.baseline_samples) {
            warn!(error = %e, "continuing without a baseline");
            self.emit(ProtocolEvent::MonitorError {
                code: e.code().to_string(),
                message: e.to_string(),
            });
        }
        Ok(())
    }

    /// Executes exactly one window.
    ///
    /// Initialises first if needed. Returns `None` once every window has run.
    pub fn step(&mut self) -> ControllerResult<Option<ExecutedWindow>> {
        self.initialise()?;

        let window = match self.schedule.windows().get(self.cursor).copied() {
            Some(window) => window,
            None => {
                self.finish();
                return Ok(None);
            }
        };

        // A late previous window pushes this one back; an early one waits.
        self.clock.wait_until(self.origin + window.start);
        let actual_start = self.elapsed();
        self.state = window.phase;
        info!(
            phase = %window.phase,
            cycle = window.cycle,
            scheduled_start = window.start,
            actual_start,
            "phase entered"
        );
        self.emit(ProtocolEvent::PhaseEntered {
            phase: window.phase,
            cycle: window.cycle,
            scheduled_start: window.start,
            actual_start,
        });

        let (outcome, anomalies) = self.execute(&window)?;

        let deadline = actual_start + window.duration;
        let now = self.elapsed();
        if now - deadline > TIMING_TOLERANCE {
            let overrun = now - deadline;
            warn!(phase = %window.phase, cycle = window.cycle, overrun, "window overran");
            self.emit(ProtocolEvent::TimingFault {
                phase: window.phase,
                cycle: window.cycle,
                overrun,
            });
        } else {
            self.clock.wait_until(self.origin + deadline);
        }

        let executed = ExecutedWindow {
            phase: window.phase,
            cycle: window.cycle,
            scheduled_start: window.start,
            scheduled_duration: window.duration,
            actual_start,
            actual_end: self.elapsed(),
            outcome,
            anomalies,
        };
        self.summary.windows.push(executed.clone());
        self.cursor += 1;

        let cycle_done = self
            .schedule
            .windows()
            .get(self.cursor)
            .map_or(true, |next| next.cycle != window.cycle);
        if cycle_done {
            self.cycles_completed += 1;
            self.emit(ProtocolEvent::CycleComplete {
                cycle: window.cycle,
            });
        }
        if self.cursor == self.schedule.len() {
            self.finish();
        }

        Ok(Some(executed))
    }

    /// Runs every remaining window and returns the session summary.
    pub fn run(&mut self) -> ControllerResult<SessionSummary> {
        while self.step()?.is_some() {}
        Ok(self.summary.clone())
    }

    fn execute(&mut self, window: &PhaseWindow) -> ControllerResult<(WindowOutcome, usize)> {
        match window.phase {
            Phase::MechTx => {
                if let Some(message) = self.mechanical_fault.clone() {
                    self.state = Phase::Idle;
                    self.emit(ProtocolEvent::HardwareFault {
                        phase: window.phase,
                        channel: "mechanical".to_string(),
                        message,
                    });
                    return Ok((WindowOutcome::HardwareFault, 0));
                }
                let buffer = self
                    .mechanical
                    .produce(&self.config.mech_programme, window.duration)?;
                let result = self.mechanical_sink.play(&buffer);
                let hash = buffer.content_hash();
                Ok((
                    self.finish_transmit(window.phase, "mechanical", buffer.len(), hash, result),
                    0,
                ))
            }
            Phase::RfTx => {
                let buffer = self.rf.produce(&self.config.rf_programme, window.duration)?;
                let request = TransmitRequest::new(self.rf.carrier(), self.rf.gain_db());
                let result = match self.rf_sink.as_mut() {
                    Some(sink) => sink.transmit(&buffer, &request),
                    None => Err(SinkError::Absent("no RF sink".to_string())),
                };
                let hash = buffer.content_hash();
                Ok((
                    self.finish_transmit(window.phase, "rf", buffer.len(), hash, result),
                    0,
                ))
            }
            Phase::MonitorRx => match self.monitor.detect_anomalies(self.config.anomaly_threshold) {
                Ok(events) => {
                    let count = events.len();
                    for event in events {
                        self.emit(ProtocolEvent::Anomaly(event));
                    }
                    Ok((WindowOutcome::Completed, count))
                }
                Err(e) => {
                    warn!(error = %e, "monitor window without result");
                    self.emit(ProtocolEvent::MonitorError {
                        code: e.code().to_string(),
                        message: e.to_string(),
                    });
                    Ok((WindowOutcome::MonitorError, 0))
                }
            },
            Phase::Idle => Ok((WindowOutcome::Completed, 0)),
        }
    }

    fn finish_transmit(
        &mut self,
        phase: Phase,
        channel: &str,
        samples: usize,
        content_hash: String,
        result: Result<(), SinkError>,
    ) -> WindowOutcome {
        match result {
            Ok(()) => {
                self.emit(ProtocolEvent::TransmitComplete {
                    phase,
                    samples,
                    content_hash,
                });
                WindowOutcome::Completed
            }
            Err(e) => {
                warn!(%phase, channel, error = %e, "sink failed, idling for the rest of the window");
                self.state = Phase::Idle;
                self.emit(ProtocolEvent::HardwareFault {
                    phase,
                    channel: channel.to_string(),
                    message: e.to_string(),
                });
                WindowOutcome::HardwareFault
            }
        }
    }

    fn finish(&mut self) {
        if self.lifecycle == Lifecycle::Finished {
            return;
        }
        self.state = Phase::Idle;
        self.lifecycle = Lifecycle::Finished;
        self.summary.cycles = self.schedule.cycle_count();
        self.summary.elapsed = self.elapsed();
        info!(
            cycles = self.summary.cycles,
            elapsed = self.summary.elapsed,
            anomalies = self.summary.anomalies,
            "session finished"
        );
        self.emit(ProtocolEvent::SessionFinished {
            cycles: self.summary.cycles,
            elapsed: self.summary.elapsed,
        });
    }

    fn disable_rf(&mut self) -> ControllerResult<()> {
        self.rf_enabled = false;
        self.summary.rf_enabled = false;
        self.schedule = build_schedule(&self.config, false)?;
        Ok(())
    }

    fn cycle_duration(&self) -> f64 {
        let rf = if self.rf_enabled {
            self.config.tx_duration
        } else {
            0.0
        };
        self.config.tx_duration + rf + self.config.rx_duration
    }
}
