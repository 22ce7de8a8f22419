//! Mixer for combining programme layers.

use super::processing::normalize_to_ceiling;

/// One rendered layer and the largest value it can reach.
#[derive(Debug, Clone)]
pub struct MixLayer {
    /// Rendered samples.
    pub samples: Vec<f64>,
    /// Theoretical peak (the layer amplitude).
    pub peak: f64,
}

/// Mixer for combining programme layers.
#[derive(Debug)]
pub struct Mixer {
    /// Output sample length.
    num_samples: usize,
    /// Accumulated layers.
    layers: Vec<MixLayer>,
}

impl Mixer {
    /// Creates a new mixer.
    ///
    /// # Arguments
    /// * `num_samples` - Number of output samples
    pub fn new(num_samples: usize) -> Self {
        Self {
            num_samples,
            layers: Vec::new(),
        }
    }

    /// Adds a rendered layer.
    pub fn add_layer(&mut self, samples: Vec<f64>, peak: f64) {
        self.layers.push(MixLayer { samples, peak });
    }

    /// Number of layers added so far.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Sum of layer peaks: the largest value the mix could reach.
    pub fn theoretical_peak(&self) -> f64 {
        self.layers.iter().map(|l| l.peak).sum()
    }

    /// Sums all layers sample-wise without normalization.
    pub fn mix(&self) -> Vec<f64> {
        let mut output = vec![0.0; self.num_samples];
        for layer in &self.layers {
            for (out, &sample) in output.iter_mut().zip(&layer.samples) {
                *out += sample;
            }
        }
        output
    }

    /// Sums all layers and normalizes the result to `ceiling`.
    pub fn mix_normalized(&self, ceiling: f64) -> Vec<f64> {
        let mut output = self.mix();
        normalize_to_ceiling(&mut output, self.theoretical_peak(), ceiling);
        output
    }
}
