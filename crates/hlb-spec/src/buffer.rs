//! Sample buffers and their wire encodings.
//!
//! A buffer is produced whole by a channel and handed to a sink as-is; there
//! is no API for mutating a buffer in place once it has been built.

use byteorder::{ByteOrder, LittleEndian};
use num_complex::Complex32;
use serde::{Deserialize, Serialize};

use crate::constants::IQ_CEILING;
use crate::hash::blake3_hash;

/// Fixed-length samples at a declared sample rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleBuffer<S> {
    samples: Vec<S>,
    sample_rate: u32,
}

/// Real-valued buffer for the mechanical channel.
pub type ScalarBuffer = SampleBuffer<f64>;

/// Complex baseband buffer for the RF channel.
pub type IqBuffer = SampleBuffer<Complex32>;

/// Sample encoding understood by a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleEncoding {
    /// Signed 16-bit little-endian PCM, mono.
    Pcm16Le,
    /// Interleaved signed 8-bit I/Q.
    IqInt8,
}

impl<S> SampleBuffer<S> {
    /// Wraps samples generated at `sample_rate`.
    pub fn new(samples: Vec<S>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Returns the samples.
    pub fn samples(&self) -> &[S] {
        &self.samples
    }

    /// Returns the sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Returns the number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns the buffer length in seconds.
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Consumes the buffer and returns its samples.
    pub fn into_samples(self) -> Vec<S> {
        self.samples
    }
}

impl SampleBuffer<f64> {
    /// Returns the largest absolute sample value.
    pub fn peak(&self) -> f64 {
        self.samples.iter().fold(0.0f64, |acc, s| acc.max(s.abs()))
    }

    /// Encodes the samples as signed 16-bit little-endian PCM.
    ///
    /// Samples are clipped to [-1, 1] before scaling.
    pub fn to_pcm16(&self) -> Vec<u8> {
        let mut pcm = vec![0u8; self.samples.len() * 2];
        for (chunk, &sample) in pcm.chunks_exact_mut(2).zip(&self.samples) {
            let value = (sample.clamp(-1.0, 1.0) * 32767.0).round() as i16;
            LittleEndian::write_i16(chunk, value);
        }
        pcm
    }

    /// BLAKE3 hash of the PCM16 encoding.
    pub fn content_hash(&self) -> String {
        blake3_hash(&self.to_pcm16())
    }
}

impl SampleBuffer<Complex32> {
    /// Returns the largest sample magnitude.
    pub fn peak_magnitude(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |acc, s| acc.max(s.norm()))
    }

    /// Encodes the samples as interleaved signed 8-bit I/Q.
    ///
    /// Components are clipped to the I/Q ceiling before scaling to 127.
    pub fn to_iq_int8(&self) -> Vec<u8> {
        let ceiling = IQ_CEILING as f32;
        let mut out = Vec::with_capacity(self.samples.len() * 2);
        for sample in &self.samples {
            out.push(quantize_i8(sample.re, ceiling) as u8);
            out.push(quantize_i8(sample.im, ceiling) as u8);
        }
        out
    }

    /// BLAKE3 hash of the int8 I/Q encoding.
    pub fn content_hash(&self) -> String {
        blake3_hash(&self.to_iq_int8())
    }
}

fn quantize_i8(component: f32, ceiling: f32) -> i8 {
    (component.clamp(-ceiling, ceiling) * 127.0).round() as i8
}
