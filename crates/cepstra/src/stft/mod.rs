//! Short-time Fourier transform: framing plus a one-sided forward FFT.

mod istft;

pub use istft::istft;

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{FeatureError, FeatureResult};
use crate::pad::{pad, PadMode};
use crate::signal::Signal;
use crate::tensor::Spectrogram;
use crate::trace::OperationRecord;
use crate::window::{pad_to_center, Window};

/// STFT/ISTFT parameters.
///
/// Shared by the forward and inverse transforms; the inverse must be called
/// with the same configuration the forward used for the round trip to hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StftConfig {
    /// Transform length N. Frequency bins = floor(N/2)+1.
    #[serde(default = "default_fft_length")]
    pub fft_length: usize,
    /// Frame advance H. Defaults to floor(window_length/4).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hop_length: Option<usize>,
    /// Window length before zero-padding to N. Defaults to N.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_length: Option<usize>,
    /// Analysis window curve or explicit coefficients.
    #[serde(default)]
    pub window: Window,
    /// Pad the signal by floor(N/2) on both sides before framing, so frames
    /// are centered on their timestamps.
    #[serde(default = "default_true")]
    pub center: bool,
    /// Boundary extension mode used when `center` is set.
    #[serde(default)]
    pub pad_mode: PadMode,
}

fn default_fft_length() -> usize {
    2048
}

fn default_true() -> bool {
    true
}

impl Default for StftConfig {
    fn default() -> Self {
        Self {
            fft_length: default_fft_length(),
            hop_length: None,
            window_length: None,
            window: Window::default(),
            center: true,
            pad_mode: PadMode::default(),
        }
    }
}

impl StftConfig {
    /// Resolved window length (defaults to the transform length).
    pub fn win_length(&self) -> usize {
        self.window_length.unwrap_or(self.fft_length)
    }

    /// Resolved hop length (defaults to floor(window_length/4)).
    pub fn hop(&self) -> usize {
        self.hop_length.unwrap_or(self.win_length() / 4)
    }

    /// Number of one-sided frequency bins, floor(N/2)+1.
    pub fn bins(&self) -> usize {
        self.fft_length / 2 + 1
    }

    /// Validates all parameters in one pass.
    pub fn validate(&self) -> FeatureResult<()> {
        if self.fft_length == 0 {
            return Err(FeatureError::config("fft_length", "must be at least 1"));
        }
        let win = self.win_length();
        if win == 0 {
            return Err(FeatureError::config("window_length", "must be at least 1"));
        }
        if win > self.fft_length {
            return Err(FeatureError::config(
                "window_length",
                format!("{} exceeds fft_length {}", win, self.fft_length),
            ));
        }
        if self.hop() == 0 {
            return Err(FeatureError::config("hop_length", "must be at least 1"));
        }
        Ok(())
    }

    /// Resolves the analysis window and centers it in a zero buffer of
    /// transform length.
    pub(crate) fn resolved_window(&self) -> FeatureResult<Vec<f64>> {
        let coeffs = self.window.coefficients(self.win_length())?;
        pad_to_center(&coeffs, self.fft_length)
    }

    /// Reports the resolved parameters as a trace record.
    pub fn record(&self) -> OperationRecord {
        OperationRecord::new(
            "stft",
            json!({
                "fft_length": self.fft_length,
                "hop_length": self.hop(),
                "window_length": self.win_length(),
                "window": self.window.name(),
                "center": self.center,
                "pad_mode": self.pad_mode.name(),
            }),
        )
    }
}

/// Computes the one-sided STFT of a signal.
///
/// Each channel is optionally center-padded, sliced into overlapping frames
/// of the transform length, multiplied by the analysis window, and passed
/// through a forward FFT. Only bins 0..=floor(N/2) are kept.
///
/// Output dimensions are bins x frames x channels with
/// frames = 1 + floor((padded_len - N) / H). Fails with a shape error when
/// the (padded) signal is shorter than the transform length.
pub fn stft(signal: &Signal, config: &StftConfig) -> FeatureResult<Spectrogram> {
    config.validate()?;

    let n = config.fft_length;
    let hop = config.hop();
    let window = config.resolved_window()?;

    let pad_len = if config.center { n / 2 } else { 0 };
    let padded_len = signal.len() + 2 * pad_len;
    if padded_len < n {
        return Err(FeatureError::shape(format!(
            "signal of {} samples is shorter than transform length {}",
            padded_len, n
        )));
    }
    let frames = 1 + (padded_len - n) / hop;

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);

    let mut out = Spectrogram::zeros(config.bins(), frames, signal.channels());
    let mut buffer = vec![Complex::new(0.0, 0.0); n];

    for ch in 0..signal.channels() {
        let padded = if config.center {
            pad(signal.channel(ch), pad_len, config.pad_mode)
        } else {
            signal.channel(ch).to_vec()
        };

        for frame in 0..frames {
            let start = frame * hop;
            for (i, slot) in buffer.iter_mut().enumerate() {
                *slot = Complex::new(padded[start + i] * window[i], 0.0);
            }
            fft.process(&mut buffer);
            out.frame_mut(ch, frame).copy_from_slice(&buffer[..config.bins()]);
        }
    }

    Ok(out)
}
