//! Simulated collaborators and session configurations.
//!
//! Every double shares its log through an `Arc`, so a test keeps a clone and
//! inspects it after handing the original to the controller.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use hlb_backend_synth::HardwareRequirements;
use hlb_protocol::clock::ManualClock;
use hlb_protocol::sensor::{SensorError, SensorSource};
use hlb_protocol::sink::{MechanicalSink, RfSink, SinkError, TransmitRequest};
use hlb_protocol::{Collaborators, MemoryReporter};
use hlb_spec::{BeaconConfig, IqBuffer, ScalarBuffer};

/// What a sink received.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    /// Samples in the buffer.
    pub samples: usize,
    /// Buffer content hash.
    pub hash: String,
    /// Transmit request, for RF deliveries.
    pub request: Option<TransmitRequest>,
}

/// Sink that records every buffer and can simulate absence or slowness.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    deliveries: Arc<Mutex<Vec<Delivery>>>,
    absent: bool,
    fail_after: Option<usize>,
    stall: Option<(ManualClock, f64)>,
}

impl RecordingSink {
    /// Creates a working sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sink whose probe reports the device missing.
    pub fn absent() -> Self {
        Self {
            absent: true,
            ..Self::default()
        }
    }

    /// Fails every delivery after the first `n`.
    pub fn failing_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    /// Advances `clock` by `seconds` on every delivery.
    pub fn stalling(mut self, clock: &ManualClock, seconds: f64) -> Self {
        self.stall = Some((clock.clone(), seconds));
        self
    }

    /// Deliveries so far.
    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn check_probe(&self) -> Result<(), SinkError> {
        if self.absent {
            Err(SinkError::Absent("simulated device missing".to_string()))
        } else {
            Ok(())
        }
    }

    fn deliver(&mut self, delivery: Delivery) -> Result<(), SinkError> {
        let mut deliveries = self.deliveries.lock().unwrap_or_else(PoisonError::into_inner);
        let index = deliveries.len();
        deliveries.push(delivery);
        if let Some((clock, seconds)) = &self.stall {
            clock.advance(*seconds);
        }
        match self.fail_after {
            Some(n) if index >= n => Err(SinkError::Failed("simulated device fault".to_string())),
            _ => Ok(()),
        }
    }
}

impl MechanicalSink for RecordingSink {
    fn probe(&mut self, _requirements: &HardwareRequirements) -> Result<(), SinkError> {
        self.check_probe()
    }

    fn play(&mut self, buffer: &ScalarBuffer) -> Result<(), SinkError> {
        self.deliver(Delivery {
            samples: buffer.len(),
            hash: buffer.content_hash(),
            request: None,
        })
    }
}

impl RfSink for RecordingSink {
    fn probe(&mut self, _requirements: &HardwareRequirements) -> Result<(), SinkError> {
        self.check_probe()
    }

    fn transmit(&mut self, buffer: &IqBuffer, request: &TransmitRequest) -> Result<(), SinkError> {
        self.deliver(Delivery {
            samples: buffer.len(),
            hash: buffer.content_hash(),
            request: Some(*request),
        })
    }
}

/// Sensor that replays a baseline capture, then scripted batches, then a
/// quiet batch of the baseline mean.
#[derive(Debug, Clone)]
pub struct ScriptedSensor {
    baseline: Vec<f64>,
    batches: Arc<Mutex<VecDeque<Vec<f64>>>>,
    quiet: f64,
    captured: bool,
}

impl ScriptedSensor {
    /// A sensor whose baseline has mean 0 and population std-dev 1.
    pub fn unit_normal() -> Self {
        Self {
            baseline: vec![-1.0, 1.0],
            batches: Arc::default(),
            quiet: 0.0,
            captured: false,
        }
    }

    /// Queues a detection batch.
    pub fn then(self, batch: Vec<f64>) -> Self {
        self.batches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(batch);
        self
    }
}

impl SensorSource for ScriptedSensor {
    fn read(&mut self, n: usize) -> Result<Vec<f64>, SensorError> {
        if !self.captured {
            self.captured = true;
            return Ok(self.baseline.iter().copied().cycle().take(n).collect());
        }
        let next = self
            .batches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        Ok(next.unwrap_or_else(|| vec![self.quiet; n]))
    }
}

/// Default protocol timings (60 s transmit, 120 s receive, one hour) with
/// RF switched on, at rates low enough to render a full session quickly.
pub fn simulated_config() -> BeaconConfig {
    BeaconConfig {
        rf_enabled: true,
        mech_programme: "combined".to_string(),
        rf_programme: "schumann".to_string(),
        mech_sample_rate: 200,
        rf_sample_rate: 200,
        baseline_samples: 100,
        monitor_batch: 10,
        ..BeaconConfig::default()
    }
}

/// A simulated session: controller collaborators plus handles to inspect them.
pub struct SimulatedSession {
    /// Shared simulated clock.
    pub clock: ManualClock,
    /// Event log.
    pub reporter: MemoryReporter,
    /// Mechanical sink handle.
    pub mechanical: RecordingSink,
    /// RF sink handle.
    pub rf: RecordingSink,
}

impl SimulatedSession {
    /// Creates working sinks and a fresh clock.
    pub fn new() -> Self {
        Self {
            clock: ManualClock::new(),
            reporter: MemoryReporter::new(),
            mechanical: RecordingSink::new(),
            rf: RecordingSink::new(),
        }
    }

    /// Replaces the RF sink.
    pub fn with_rf(mut self, rf: RecordingSink) -> Self {
        self.rf = rf;
        self
    }

    /// Replaces the mechanical sink.
    pub fn with_mechanical(mut self, mechanical: RecordingSink) -> Self {
        self.mechanical = mechanical;
        self
    }

    /// Collaborators wired to this session's handles.
    pub fn collaborators(&self, sensor: ScriptedSensor) -> Collaborators {
        Collaborators::new(Box::new(self.mechanical.clone()), Box::new(sensor))
            .with_rf_sink(Box::new(self.rf.clone()))
            .with_reporter(Box::new(self.reporter.clone()))
            .with_clock(Arc::new(self.clock.clone()))
    }
}

impl Default for SimulatedSession {
    fn default() -> Self {
        Self::new()
    }
}
