//! Inverse STFT via overlap-add.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::error::{FeatureError, FeatureResult};
use crate::signal::Signal;
use crate::tensor::Spectrogram;

use super::StftConfig;

/// Reconstructs a time-domain signal from a one-sided STFT.
///
/// Each frame's full spectrum is rebuilt by conjugate symmetry, inverse
/// transformed, multiplied by the synthesis window (the same center-padded
/// analysis window the forward pass used), and overlap-added at the hop.
/// The accumulated squared window is divided out wherever it is nonzero,
/// which inverts the forward windowing exactly when H <= window length.
///
/// With `length` given, only ceil((length + N*center) / H) frames are
/// consumed and the result is cut to exactly `length` samples, starting at
/// floor(N/2) when centered. Without it, a centered reconstruction drops
/// floor(N/2) samples from both ends, undoing the forward centering pad.
pub fn istft(
    spectrogram: &Spectrogram,
    config: &StftConfig,
    length: Option<usize>,
) -> FeatureResult<Signal> {
    config.validate()?;

    let n = config.fft_length;
    let hop = config.hop();
    if spectrogram.bins() != config.bins() {
        return Err(FeatureError::shape(format!(
            "expected {} frequency bins for fft_length {}, got {}",
            config.bins(),
            n,
            spectrogram.bins()
        )));
    }
    if spectrogram.frames() == 0 {
        return Err(FeatureError::shape("spectrogram has no frames"));
    }
    if length == Some(0) {
        return Err(FeatureError::config("length", "must be at least 1"));
    }

    let window = config.resolved_window()?;
    let frames = match length {
        Some(len) => {
            let padded = len + if config.center { n } else { 0 };
            spectrogram.frames().min(padded.div_ceil(hop))
        }
        None => spectrogram.frames(),
    };
    let total = n + hop * (frames - 1);

    let mut planner = FftPlanner::new();
    let ifft = planner.plan_fft_inverse(n);

    // The squared-window accumulator is channel-independent.
    let mut window_sum = vec![0.0; total];
    for frame in 0..frames {
        let start = frame * hop;
        for (i, &w) in window.iter().enumerate() {
            window_sum[start + i] += w * w;
        }
    }

    let mut channels = Vec::with_capacity(spectrogram.channels());
    let mut buffer = vec![Complex::new(0.0, 0.0); n];

    for ch in 0..spectrogram.channels() {
        let mut acc = vec![0.0; total];

        for frame in 0..frames {
            let column = spectrogram.frame(ch, frame);
            buffer[..column.len()].copy_from_slice(column);
            for k in 1..=(n - 1) / 2 {
                buffer[n - k] = buffer[k].conj();
            }
            ifft.process(&mut buffer);

            let start = frame * hop;
            for (i, c) in buffer.iter().enumerate() {
                acc[start + i] += c.re / n as f64 * window[i];
            }
        }

        for (sample, &wsum) in acc.iter_mut().zip(&window_sum) {
            if wsum > f64::MIN_POSITIVE {
                *sample /= wsum;
            }
        }

        channels.push(trim(acc, n, config.center, length));
    }

    Signal::from_channels(channels)
}

/// Cuts the overlap-added buffer down to the requested span.
fn trim(acc: Vec<f64>, n: usize, center: bool, length: Option<usize>) -> Vec<f64> {
    match length {
        Some(len) => {
            let start = if center { n / 2 } else { 0 };
            (0..len)
                .map(|i| acc.get(start + i).copied().unwrap_or(0.0))
                .collect()
        }
        None => {
            if center {
                let cut = n / 2;
                acc[cut..acc.len() - cut].to_vec()
            } else {
                acc
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pad::PadMode;
    use crate::stft::stft;
    use crate::window::Window;
    use pretty_assertions::assert_eq;
    use std::f64::consts::PI;

    fn chirp(len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| {
                let t = i as f64 / len as f64;
                (2.0 * PI * (200.0 + 1800.0 * t) * t).sin()
            })
            .collect()
    }

    fn max_abs_diff(a: &[f64], b: &[f64]) -> f64 {
        a.iter()
            .zip(b)
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, f64::max)
    }

    #[test]
    fn test_round_trip_centered_with_length() {
        let samples = chirp(16000);
        let signal = Signal::mono(samples.clone()).unwrap();
        let config = StftConfig {
            fft_length: 512,
            hop_length: Some(160),
            ..Default::default()
        };

        let spec = stft(&signal, &config).unwrap();
        let rebuilt = istft(&spec, &config, Some(16000)).unwrap();

        assert_eq!(rebuilt.len(), 16000);
        assert!(max_abs_diff(rebuilt.channel(0), &samples) < 1e-8);
    }

    #[test]
    fn test_round_trip_centered_without_length() {
        let samples = chirp(4096);
        let signal = Signal::mono(samples.clone()).unwrap();
        let config = StftConfig {
            fft_length: 256,
            hop_length: Some(64),
            ..Default::default()
        };

        let spec = stft(&signal, &config).unwrap();
        let rebuilt = istft(&spec, &config, None).unwrap();

        // untrimmed reconstruction covers hop * (frames - 1) samples
        let covered = rebuilt.len().min(samples.len());
        assert!(covered >= 4096 - 64);
        assert!(max_abs_diff(&rebuilt.channel(0)[..covered], &samples[..covered]) < 1e-8);
    }

    #[test]
    fn test_round_trip_uncentered_interior() {
        let samples = chirp(2048);
        let signal = Signal::mono(samples.clone()).unwrap();
        let config = StftConfig {
            fft_length: 256,
            hop_length: Some(64),
            center: false,
            ..Default::default()
        };

        let spec = stft(&signal, &config).unwrap();
        let rebuilt = istft(&spec, &config, None).unwrap();

        // without centering the first and last frames are under-weighted,
        // so compare the fully overlapped interior
        let lo = 256;
        let hi = rebuilt.len() - 256;
        assert!(max_abs_diff(&rebuilt.channel(0)[lo..hi], &samples[lo..hi]) < 1e-8);
    }

    #[test]
    fn test_round_trip_short_window() {
        let samples = chirp(4000);
        let signal = Signal::mono(samples.clone()).unwrap();
        let config = StftConfig {
            fft_length: 512,
            window_length: Some(400),
            hop_length: Some(100),
            ..Default::default()
        };

        let spec = stft(&signal, &config).unwrap();
        let rebuilt = istft(&spec, &config, Some(4000)).unwrap();
        assert!(max_abs_diff(rebuilt.channel(0), &samples) < 1e-8);
    }

    #[test]
    fn test_round_trip_every_pad_mode() {
        let samples = chirp(3000);
        let modes = [
            PadMode::Constant,
            PadMode::Edge,
            PadMode::LinearRamp,
            PadMode::Reflect,
            PadMode::Symmetric,
            PadMode::Wrap,
        ];
        for mode in modes {
            let signal = Signal::mono(samples.clone()).unwrap();
            let config = StftConfig {
                fft_length: 256,
                hop_length: Some(64),
                pad_mode: mode,
                ..Default::default()
            };
            let spec = stft(&signal, &config).unwrap();
            let rebuilt = istft(&spec, &config, Some(3000)).unwrap();
            assert!(
                max_abs_diff(rebuilt.channel(0), &samples) < 1e-8,
                "{:?}",
                mode
            );
        }
    }

    #[test]
    fn test_round_trip_stereo() {
        let left = chirp(2000);
        let right: Vec<f64> = chirp(2000).iter().map(|v| -v).collect();
        let signal = Signal::from_channels(vec![left.clone(), right.clone()]).unwrap();
        let config = StftConfig {
            fft_length: 128,
            hop_length: Some(32),
            ..Default::default()
        };

        let spec = stft(&signal, &config).unwrap();
        let rebuilt = istft(&spec, &config, Some(2000)).unwrap();

        assert_eq!(rebuilt.channels(), 2);
        assert!(max_abs_diff(rebuilt.channel(0), &left) < 1e-8);
        assert!(max_abs_diff(rebuilt.channel(1), &right) < 1e-8);
    }

    #[test]
    fn test_length_longer_than_coverage_zero_extends() {
        let signal = Signal::mono(chirp(1000)).unwrap();
        let config = StftConfig {
            fft_length: 256,
            hop_length: Some(64),
            ..Default::default()
        };
        let spec = stft(&signal, &config).unwrap();
        let rebuilt = istft(&spec, &config, Some(5000)).unwrap();

        assert_eq!(rebuilt.len(), 5000);
        assert_eq!(rebuilt.channel(0)[4999], 0.0);
    }

    #[test]
    fn test_bin_count_mismatch_rejected() {
        let signal = Signal::mono(chirp(2000)).unwrap();
        let config = StftConfig {
            fft_length: 256,
            hop_length: Some(64),
            ..Default::default()
        };
        let spec = stft(&signal, &config).unwrap();

        let wrong = StftConfig {
            fft_length: 512,
            hop_length: Some(64),
            ..Default::default()
        };
        let err = istft(&spec, &wrong, None).unwrap_err();
        assert!(err.to_string().contains("frequency bins"));
    }

    #[test]
    fn test_hamming_round_trip() {
        let samples = chirp(3000);
        let signal = Signal::mono(samples.clone()).unwrap();
        let config = StftConfig {
            fft_length: 256,
            hop_length: Some(64),
            window: Window::Hamming,
            ..Default::default()
        };
        let spec = stft(&signal, &config).unwrap();
        let rebuilt = istft(&spec, &config, Some(3000)).unwrap();
        assert!(max_abs_diff(rebuilt.channel(0), &samples) < 1e-8);
    }
}
