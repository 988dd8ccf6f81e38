//! Complex and real 3-D output tensors.
//!
//! Both tensors use the same flat layout: channel-major, then frame-major,
//! so each frame's column is one contiguous slice. The first dimension is
//! frequency bins for [`Spectrogram`] and arbitrary feature rows (power bins,
//! mel bands, cepstral coefficients) for [`FeatureTensor`].

use rustfft::num_complex::Complex;

/// Complex STFT output (bins x frames x channels).
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    data: Vec<Complex<f64>>,
    bins: usize,
    frames: usize,
    channels: usize,
}

impl Spectrogram {
    /// Creates a zero-filled spectrogram.
    pub(crate) fn zeros(bins: usize, frames: usize, channels: usize) -> Self {
        Self {
            data: vec![Complex::new(0.0, 0.0); bins * frames * channels],
            bins,
            frames,
            channels,
        }
    }

    /// Number of frequency bins (`floor(fft_length / 2) + 1`).
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Number of time frames.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Number of channels.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Borrows one frame's bin column.
    pub fn frame(&self, channel: usize, frame: usize) -> &[Complex<f64>] {
        let start = (channel * self.frames + frame) * self.bins;
        &self.data[start..start + self.bins]
    }

    pub(crate) fn frame_mut(&mut self, channel: usize, frame: usize) -> &mut [Complex<f64>] {
        let start = (channel * self.frames + frame) * self.bins;
        &mut self.data[start..start + self.bins]
    }

    /// Elementwise magnitude raised to `power`, as a real tensor.
    ///
    /// `power = 1.0` is the magnitude spectrum, `power = 2.0` the power
    /// spectrum; both take exact fast paths so that squaring a magnitude
    /// spectrum reproduces the power spectrum bit-for-bit.
    pub fn magnitude(&self, power: f64) -> FeatureTensor {
        let data = self
            .data
            .iter()
            .map(|c| {
                let m = c.norm();
                if power == 1.0 {
                    m
                } else if power == 2.0 {
                    m * m
                } else {
                    m.powf(power)
                }
            })
            .collect();
        FeatureTensor {
            data,
            rows: self.bins,
            frames: self.frames,
            channels: self.channels,
        }
    }
}

/// Real feature output (rows x frames x channels).
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTensor {
    data: Vec<f64>,
    rows: usize,
    frames: usize,
    channels: usize,
}

impl FeatureTensor {
    /// Creates a zero-filled tensor.
    pub fn zeros(rows: usize, frames: usize, channels: usize) -> Self {
        Self {
            data: vec![0.0; rows * frames * channels],
            rows,
            frames,
            channels,
        }
    }

    /// Number of feature rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of time frames.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Number of channels.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Borrows one frame's row column.
    pub fn frame(&self, channel: usize, frame: usize) -> &[f64] {
        let start = (channel * self.frames + frame) * self.rows;
        &self.data[start..start + self.rows]
    }

    pub(crate) fn frame_mut(&mut self, channel: usize, frame: usize) -> &mut [f64] {
        let start = (channel * self.frames + frame) * self.rows;
        &mut self.data[start..start + self.rows]
    }

    /// Returns a copy with `f` applied to every element.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            data: self.data.iter().map(|&v| f(v)).collect(),
            rows: self.rows,
            frames: self.frames,
            channels: self.channels,
        }
    }

    /// Largest element value, or negative infinity for an empty tensor.
    pub fn max_value(&self) -> f64 {
        self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Iterates over all elements in storage order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().copied()
    }
}
