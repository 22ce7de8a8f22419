//! Named, validated collections of layers.

use serde::{Deserialize, Serialize};

use crate::constants::AMPLITUDE_BUDGET;
use crate::error::{ErrorCode, ValidationError};
use crate::signal::Layer;
use crate::validation::{validate_layer, validate_positive};

/// A named collection of layers rendered over one duration at one rate.
///
/// Construct through [`Programme::new`] or [`Programme::cyclic`]; both enforce
/// the duration, layer count, Nyquist and amplitude budget invariants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Programme {
    /// Programme name.
    pub name: String,
    /// Layers summed into the output.
    pub layers: Vec<Layer>,
    /// Duration in seconds.
    pub duration: f64,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Length of the repeating timeline that layer windows refer to, in seconds.
    ///
    /// When absent, windows are fractions of the full duration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle: Option<f64>,
}

impl Programme {
    /// Creates a validated programme whose windows span the whole duration.
    pub fn new(
        name: impl Into<String>,
        layers: Vec<Layer>,
        duration: f64,
        sample_rate: u32,
    ) -> Result<Self, ValidationError> {
        let programme = Self {
            name: name.into(),
            layers,
            duration,
            sample_rate,
            cycle: None,
        };
        programme.validate()?;
        Ok(programme)
    }

    /// Creates a validated programme whose windows repeat every `cycle` seconds.
    pub fn cyclic(
        name: impl Into<String>,
        layers: Vec<Layer>,
        duration: f64,
        sample_rate: u32,
        cycle: f64,
    ) -> Result<Self, ValidationError> {
        let programme = Self {
            name: name.into(),
            layers,
            duration,
            sample_rate,
            cycle: Some(cycle),
        };
        programme.validate()?;
        Ok(programme)
    }

    /// Checks every programme invariant.
    ///
    /// Deserialized programmes must be validated before composition.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_positive("duration", self.duration)
            .map_err(|e| ValidationError::invalid_param("duration", e.message))?;

        if let Some(cycle) = self.cycle {
            validate_positive("cycle", cycle)
                .map_err(|e| ValidationError::invalid_param("cycle", e.message))?;
        }

        if self.layers.is_empty() {
            return Err(ValidationError::invalid_param(
                "layers",
                "programme must have at least one layer",
            ));
        }

        for (i, layer) in self.layers.iter().enumerate() {
            validate_layer(layer, self.sample_rate).map_err(|e| e.nested(&format!("layers[{}]", i)))?;
        }

        let total = self.theoretical_peak();
        if total > AMPLITUDE_BUDGET {
            return Err(ValidationError::with_path(
                ErrorCode::InvalidParameter,
                format!(
                    "sum of layer amplitudes ({}) exceeds the budget of {}",
                    total, AMPLITUDE_BUDGET
                ),
                "layers",
            ));
        }

        Ok(())
    }

    /// Sum of layer amplitudes: the largest value the mix could reach.
    pub fn theoretical_peak(&self) -> f64 {
        self.layers.iter().map(Layer::amplitude).sum()
    }

    /// Number of samples the programme renders to.
    pub fn num_samples(&self) -> usize {
        (self.duration * self.sample_rate as f64).round() as usize
    }

    /// Length of the timeline that layer windows are fractions of.
    pub fn timeline(&self) -> f64 {
        self.cycle.unwrap_or(self.duration)
    }
}
