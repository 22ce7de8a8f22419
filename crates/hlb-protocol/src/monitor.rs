//! Baseline capture and anomaly detection.
//!
//! The monitor is the only component with shared mutable state: the current
//! [`Baseline`]. A capture computes the new statistics first and then swaps
//! the `Arc` under a write lock, so a reader always sees either the old or
//! the new baseline, never a mix. A failed capture leaves it untouched.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use hlb_spec::{AnomalyEvent, Baseline};
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::error::{MonitorError, MonitorResult};
use crate::sensor::{SensorError, SensorSource};

/// Capture and batch sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorSettings {
    /// Most recent samples a baseline is computed over.
    pub baseline_window: usize,
    /// Samples pulled per detection batch.
    pub batch_size: usize,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            baseline_window: 1_000,
            batch_size: 100,
        }
    }
}

/// Anomaly monitor over one sensor.
pub struct Monitor {
    sensor: Mutex<Box<dyn SensorSource>>,
    baseline: RwLock<Option<Arc<Baseline>>>,
    settings: MonitorSettings,
    clock: Arc<dyn Clock>,
    origin: Mutex<f64>,
}

impl std::fmt::Debug for Monitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monitor")
            .field("baseline", &self.baseline())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Monitor {
    /// Creates a monitor. Event timestamps are relative to the clock's
    /// current time until [`Monitor::mark_origin`] is called.
    pub fn new(sensor: Box<dyn SensorSource>, settings: MonitorSettings, clock: Arc<dyn Clock>) -> Self {
        let origin = clock.now();
        Self {
            sensor: Mutex::new(sensor),
            baseline: RwLock::new(None),
            settings,
            clock,
            origin: Mutex::new(origin),
        }
    }

    /// Capture and batch sizes.
    pub fn settings(&self) -> MonitorSettings {
        self.settings
    }

    /// Makes event timestamps relative to the current time.
    pub fn mark_origin(&self) {
        let now = self.clock.now();
        *self.origin.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    /// Pulls `n` samples and replaces the baseline.
    ///
    /// Statistics cover the last `baseline_window` samples of the capture.
    ///
    /// # Returns
    /// The new baseline, or `MonitorError::CaptureFailed` when `n` is zero,
    /// the sensor fails, the batch is short or holds non-finite values. The
    /// previous baseline is kept on every failure.
    pub fn capture_baseline(&self, n: usize) -> MonitorResult<Arc<Baseline>> {
        if n == 0 {
            return Err(MonitorError::capture_failed("capture size must be at least 1"));
        }

        let samples = self
            .read(n)
            .map_err(|e| MonitorError::capture_failed(e.to_string()))?;
        if samples.len() < n {
            warn!(requested = n, received = samples.len(), "short baseline capture");
            return Err(MonitorError::capture_failed(format!(
                "short batch: received {} of {} samples",
                samples.len(),
                n
            )));
        }

        let window = self.settings.baseline_window.clamp(1, samples.len());
        let recent = &samples[samples.len() - window..];
        let baseline = Baseline::from_samples(recent)
            .map(Arc::new)
            .ok_or_else(|| MonitorError::capture_failed("capture contains non-finite samples"))?;

        *self.baseline.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&baseline));
        info!(
            mean = baseline.mean,
            std_dev = baseline.std_dev,
            count = baseline.count,
            "baseline captured"
        );
        Ok(baseline)
    }

    /// Pulls one batch and returns the samples beyond `threshold_sigma`.
    ///
    /// Events are in sample order; `sample_index` is the position in the batch.
    pub fn detect_anomalies(&self, threshold_sigma: f64) -> MonitorResult<Vec<AnomalyEvent>> {
        if !threshold_sigma.is_finite() || threshold_sigma < 0.0 {
            return Err(MonitorError::invalid_param(
                "threshold_sigma",
                format!("threshold must be a non-negative number, got {}", threshold_sigma),
            ));
        }
        let baseline = self.baseline().ok_or(MonitorError::NoBaseline)?;

        let batch = self
            .read(self.settings.batch_size)
            .map_err(|e| MonitorError::SensorUnavailable {
                message: e.to_string(),
            })?;
        let origin = *self.origin.lock().unwrap_or_else(PoisonError::into_inner);
        let timestamp = self.clock.now() - origin;

        let events: Vec<AnomalyEvent> = batch
            .iter()
            .enumerate()
            .filter(|(_, observed)| baseline.is_anomalous(**observed, threshold_sigma))
            .map(|(sample_index, &observed)| AnomalyEvent {
                timestamp,
                sample_index,
                observed,
                deviation_sigma: baseline.sigma_of(observed),
                threshold_sigma,
            })
            .collect();

        debug!(batch = batch.len(), anomalies = events.len(), "batch checked");
        Ok(events)
    }

    /// Snapshot of the current baseline.
    pub fn baseline(&self) -> Option<Arc<Baseline>> {
        self.baseline
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Clears the baseline.
    pub fn reset_baseline(&self) {
        *self.baseline.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn read(&self, n: usize) -> Result<Vec<f64>, SensorError> {
        self.sensor
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .read(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::collections::VecDeque;

    /// Replays scripted batches, then reports the sensor absent.
    struct Script(VecDeque<Result<Vec<f64>, SensorError>>);

    impl SensorSource for Script {
        fn read(&mut self, _n: usize) -> Result<Vec<f64>, SensorError> {
            self.0
                .pop_front()
                .unwrap_or_else(|| Err(SensorError::Unavailable("script exhausted".to_string())))
        }
    }

    fn monitor(batches: Vec<Result<Vec<f64>, SensorError>>, settings: MonitorSettings) -> Monitor {
        Monitor::new(
            Box::new(Script(batches.into())),
            settings,
            Arc::new(ManualClock::new()),
        )
    }

    fn unit_normal_capture() -> Vec<f64> {
        // Mean 0, population std-dev 1.
        vec![-1.0, 1.0, -1.0, 1.0]
    }

    #[test]
    fn test_detect_threshold() {
        let m = monitor(
            vec![Ok(unit_normal_capture()), Ok(vec![4.0, 0.5]), Ok(vec![2.0])],
            MonitorSettings::default(),
        );
        m.capture_baseline(4).unwrap();

        let events = m.detect_anomalies(3.0).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].sample_index, 0);
        assert_eq!(events[0].observed, 4.0);
        assert_eq!(events[0].deviation_sigma, 4.0);

        assert!(m.detect_anomalies(3.0).unwrap().is_empty());
    }

    #[test]
    fn test_detect_before_capture() {
        let m = monitor(vec![Ok(vec![1.0])], MonitorSettings::default());
        assert!(matches!(m.detect_anomalies(3.0), Err(MonitorError::NoBaseline)));
    }

    #[test]
    fn test_invalid_threshold() {
        let m = monitor(vec![], MonitorSettings::default());
        for t in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                m.detect_anomalies(t),
                Err(MonitorError::InvalidParameter { .. })
            ));
        }
    }

    #[test]
    fn test_failed_capture_keeps_baseline() {
        let m = monitor(
            vec![
                Ok(unit_normal_capture()),
                Err(SensorError::ReadFailed("usb reset".to_string())),
                Ok(vec![1.0, 2.0]),
            ],
            MonitorSettings::default(),
        );
        let first = m.capture_baseline(4).unwrap();

        assert!(matches!(m.capture_baseline(4), Err(MonitorError::CaptureFailed { .. })));
        assert_eq!(m.baseline(), Some(Arc::clone(&first)));

        // Short batch.
        assert!(matches!(m.capture_baseline(4), Err(MonitorError::CaptureFailed { .. })));
        assert_eq!(*m.baseline().unwrap(), *first);
    }

    #[test]
    fn test_zero_capture_fails() {
        let m = monitor(vec![], MonitorSettings::default());
        assert!(matches!(m.capture_baseline(0), Err(MonitorError::CaptureFailed { .. })));
    }

    #[test]
    fn test_baseline_window_uses_latest_samples() {
        let settings = MonitorSettings {
            baseline_window: 2,
            batch_size: 10,
        };
        let m = monitor(vec![Ok(vec![100.0, 100.0, 1.0, 3.0])], settings);
        let baseline = m.capture_baseline(4).unwrap();
        assert_eq!(baseline.mean, 2.0);
        assert_eq!(baseline.std_dev, 1.0);
        assert_eq!(baseline.count, 2);
    }

    #[test]
    fn test_sensor_failure_during_detection() {
        let m = monitor(vec![Ok(unit_normal_capture())], MonitorSettings::default());
        m.capture_baseline(4).unwrap();
        assert!(matches!(
            m.detect_anomalies(3.0),
            Err(MonitorError::SensorUnavailable { .. })
        ));
    }

    #[test]
    fn test_reset_baseline() {
        let m = monitor(vec![Ok(unit_normal_capture())], MonitorSettings::default());
        m.capture_baseline(4).unwrap();
        m.reset_baseline();
        assert!(m.baseline().is_none());
    }

    #[test]
    fn test_timestamps_relative_to_origin() {
        let clock = ManualClock::new();
        clock.set(100.0);
        let m = Monitor::new(
            Box::new(Script(
                vec![Ok(unit_normal_capture()), Ok(vec![9.0])].into(),
            )),
            MonitorSettings::default(),
            Arc::new(clock.clone()),
        );
        m.mark_origin();
        m.capture_baseline(4).unwrap();
        clock.advance(12.5);
        let events = m.detect_anomalies(3.0).unwrap();
        assert_eq!(events[0].timestamp, 12.5);
    }
}
