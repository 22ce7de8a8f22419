//! Hydrogen Line Beacon protocol.
//!
//! The [`Controller`] walks a repeating MECH_TX, RF_TX, MONITOR_RX cycle:
//! it renders each transmit window through the synthesis channels, hands the
//! buffers to abstract sinks, and asks the [`Monitor`] for anomalies during
//! receive windows. Hardware, sensors, time and event output are all traits,
//! so a whole session can run against simulated collaborators.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use hlb_protocol::clock::ManualClock;
//! use hlb_protocol::sensor::AbsentSensor;
//! use hlb_protocol::sink::DiscardSink;
//! use hlb_protocol::{Collaborators, Controller};
//! use hlb_spec::BeaconConfig;
//!
//! let config = BeaconConfig {
//!     mech_programme: "fundamental".to_string(),
//!     mech_sample_rate: 1_000,
//!     tx_duration: 1.0,
//!     rx_duration: 2.0,
//!     total_duration: 6.0,
//!     ..BeaconConfig::default()
//! };
//! let collaborators = Collaborators::new(Box::new(DiscardSink), Box::new(AbsentSensor))
//!     .with_clock(Arc::new(ManualClock::new()));
//! let mut controller = Controller::new(config, collaborators).unwrap();
//! let summary = controller.run().unwrap();
//! assert_eq!(summary.cycles, 2);
//! ```

pub mod clock;
pub mod controller;
pub mod error;
pub mod monitor;
pub mod report;
pub mod sensor;
pub mod sink;

pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{Collaborators, Controller, Lifecycle};
pub use error::{ControllerError, ControllerResult, MonitorError, MonitorResult};
pub use monitor::{Monitor, MonitorSettings};
pub use report::{
    ExecutedWindow, MemoryReporter, ProtocolEvent, Reporter, SessionSummary, TracingReporter,
    WindowOutcome,
};
pub use sensor::{AbsentSensor, SensorError, SensorSource};
pub use sink::{DiscardSink, MechanicalSink, RfSink, SinkError, TransmitRequest};
