//! Multichannel sample container.

use crate::error::{FeatureError, FeatureResult};

/// A multichannel time-domain signal (samples x channels).
///
/// Samples are stored channel-major: each channel is one contiguous plane of
/// `len()` samples. The container is immutable once constructed; transform
/// calls borrow it and produce fresh output buffers.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    data: Vec<f64>,
    samples: usize,
    channels: usize,
}

impl Signal {
    /// Creates a single-channel signal.
    ///
    /// Fails with a shape error if the sample vector is empty.
    pub fn mono(samples: Vec<f64>) -> FeatureResult<Self> {
        if samples.is_empty() {
            return Err(FeatureError::shape("signal has no samples"));
        }
        let len = samples.len();
        Ok(Self {
            data: samples,
            samples: len,
            channels: 1,
        })
    }

    /// Creates a signal from per-channel sample planes.
    ///
    /// Fails with a shape error if no channels are given, any channel is
    /// empty, or the channels have different lengths.
    pub fn from_channels(channels: Vec<Vec<f64>>) -> FeatureResult<Self> {
        if channels.is_empty() {
            return Err(FeatureError::shape("signal has no channels"));
        }
        let samples = channels[0].len();
        if samples == 0 {
            return Err(FeatureError::shape("signal has no samples"));
        }
        for (i, ch) in channels.iter().enumerate() {
            if ch.len() != samples {
                return Err(FeatureError::shape(format!(
                    "channel {} has {} samples, expected {}",
                    i,
                    ch.len(),
                    samples
                )));
            }
        }
        let num_channels = channels.len();
        let mut data = Vec::with_capacity(samples * num_channels);
        for ch in channels {
            data.extend_from_slice(&ch);
        }
        Ok(Self {
            data,
            samples,
            channels: num_channels,
        })
    }

    /// Creates a signal from interleaved frames (`[L0, R0, L1, R1, ...]`).
    ///
    /// Fails with a shape error if `channels` is zero or the sample count is
    /// not a multiple of the channel count.
    pub fn from_interleaved(interleaved: &[f64], channels: usize) -> FeatureResult<Self> {
        if channels == 0 {
            return Err(FeatureError::shape("signal has no channels"));
        }
        if interleaved.is_empty() {
            return Err(FeatureError::shape("signal has no samples"));
        }
        if interleaved.len() % channels != 0 {
            return Err(FeatureError::shape(format!(
                "{} interleaved samples do not divide into {} channels",
                interleaved.len(),
                channels
            )));
        }
        let samples = interleaved.len() / channels;
        let mut data = vec![0.0; interleaved.len()];
        for (i, &s) in interleaved.iter().enumerate() {
            let ch = i % channels;
            let t = i / channels;
            data[ch * samples + t] = s;
        }
        Ok(Self {
            data,
            samples,
            channels,
        })
    }

    /// Number of samples per channel.
    pub fn len(&self) -> usize {
        self.samples
    }

    /// True when the signal holds no samples. Construction rejects empty
    /// signals, so this is always false for a live value.
    pub fn is_empty(&self) -> bool {
        self.samples == 0
    }

    /// Number of channels.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Borrows one channel's sample plane.
    ///
    /// # Panics
    /// Panics if `channel` is out of range.
    pub fn channel(&self, channel: usize) -> &[f64] {
        let start = channel * self.samples;
        &self.data[start..start + self.samples]
    }
}
