//! Baseline statistics and anomaly events.

use serde::{Deserialize, Serialize};

/// Mean and population standard deviation of a sensor capture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    /// Sample mean.
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// Number of samples the statistics were computed over.
    pub count: usize,
}

impl Baseline {
    /// Computes statistics over `samples`, or `None` if empty or non-finite.
    ///
    /// # Example
    /// ```
    /// use hlb_spec::Baseline;
    ///
    /// let baseline = Baseline::from_samples(&[-1.0, 1.0, -1.0, 1.0]).unwrap();
    /// assert_eq!(baseline.mean, 0.0);
    /// assert_eq!(baseline.std_dev, 1.0);
    /// ```
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() || samples.iter().any(|s| !s.is_finite()) {
            return None;
        }
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let variance = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
        Some(Self {
            mean,
            std_dev: variance.sqrt(),
            count: samples.len(),
        })
    }

    /// Deviation of `observed` from the mean in standard deviations.
    ///
    /// Infinite for any deviation from a zero-variance baseline.
    pub fn sigma_of(&self, observed: f64) -> f64 {
        let deviation = (observed - self.mean).abs();
        if self.std_dev > 0.0 {
            deviation / self.std_dev
        } else if deviation > 0.0 {
            f64::INFINITY
        } else {
            0.0
        }
    }

    /// Returns true if `|observed - mean| > threshold_sigma * std_dev`.
    pub fn is_anomalous(&self, observed: f64, threshold_sigma: f64) -> bool {
        (observed - self.mean).abs() > threshold_sigma * self.std_dev
    }
}

/// One sample that deviated from the baseline beyond the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnomalyEvent {
    /// Session-relative time of the batch, in seconds.
    pub timestamp: f64,
    /// Position of the sample within its batch.
    pub sample_index: usize,
    /// Observed value.
    pub observed: f64,
    /// Deviation from the mean in standard deviations.
    ///
    /// Infinite against a zero-variance baseline; JSON carries that as `"inf"`.
    #[serde(with = "sigma")]
    pub deviation_sigma: f64,
    /// Threshold in force when the sample was tested.
    pub threshold_sigma: f64,
}

mod sigma {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    const INFINITE: &str = "inf";

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_str(INFINITE)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Sigma {
            Finite(f64),
            Label(String),
        }

        match Sigma::deserialize(deserializer)? {
            Sigma::Finite(value) => Ok(value),
            Sigma::Label(label) if label == INFINITE => Ok(f64::INFINITY),
            Sigma::Label(label) => Err(D::Error::custom(format!(
                "expected a number or \"{}\", got \"{}\"",
                INFINITE, label
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_samples() {
        assert!(Baseline::from_samples(&[]).is_none());
        assert!(Baseline::from_samples(&[1.0, f64::NAN]).is_none());
    }

    #[test]
    fn test_population_std_dev() {
        let baseline = Baseline::from_samples(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(baseline.mean, 5.0);
        assert_eq!(baseline.std_dev, 2.0);
        assert_eq!(baseline.count, 8);
    }

    #[test]
    fn test_threshold_is_strict() {
        let baseline = Baseline {
            mean: 0.0,
            std_dev: 1.0,
            count: 10,
        };
        assert!(baseline.is_anomalous(4.0, 3.0));
        assert!(!baseline.is_anomalous(3.0, 3.0));
        assert!(!baseline.is_anomalous(2.0, 3.0));
        assert!(baseline.is_anomalous(-3.5, 3.0));
    }

    #[test]
    fn test_zero_variance_baseline() {
        let baseline = Baseline::from_samples(&[1.0, 1.0, 1.0]).unwrap();
        assert_eq!(baseline.std_dev, 0.0);
        assert!(baseline.is_anomalous(1.001, 3.0));
        assert!(!baseline.is_anomalous(1.0, 3.0));
        assert_eq!(baseline.sigma_of(2.0), f64::INFINITY);
        assert_eq!(baseline.sigma_of(1.0), 0.0);
    }
    #[test]
    fn test_infinite_sigma_survives_json() {
        let baseline = Baseline::from_samples(&[1.0, 1.0]).unwrap();
        let event = AnomalyEvent {
            timestamp: 120.0,
            sample_index: 0,
            observed: 2.0,
            deviation_sigma: baseline.sigma_of(2.0),
            threshold_sigma: 3.0,
        };
        let json = serde_json::to_value(event).unwrap();
        assert_eq!(json["deviation_sigma"], "inf");
        let back: AnomalyEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_finite_sigma_stays_numeric() {
        let event = AnomalyEvent {
            timestamp: 0.0,
            sample_index: 3,
            observed: 4.0,
            deviation_sigma: 4.0,
            threshold_sigma: 3.0,
        };
        let json = serde_json::to_value(event).unwrap();
        assert_eq!(json["deviation_sigma"], 4.0);
        assert!(serde_json::from_str::<AnomalyEvent>(
            r#"{"timestamp":0,"sample_index":0,"observed":1,"deviation_sigma":"nan","threshold_sigma":3}"#
        )
        .is_err());
    }
}
