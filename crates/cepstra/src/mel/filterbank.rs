//! Mel filter-bank design.
//!
//! Triangular filters spaced uniformly in HTK mel space, evaluated at the
//! FFT bin center frequencies. Only the HTK warping formula is implemented;
//! requesting the Slaney variant fails with an unsupported-feature error.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{FeatureError, FeatureResult};
use crate::trace::OperationRecord;

/// Converts a frequency in Hz to HTK mels.
pub fn hz_to_mel(hz: f64) -> f64 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

/// Converts HTK mels back to Hz.
pub fn mel_to_hz(mel: f64) -> f64 {
    700.0 * (10.0_f64.powf(mel / 2595.0) - 1.0)
}

/// Center frequencies of the one-sided FFT bins, `k * sr / N`.
pub fn fft_frequencies(sample_rate: f64, fft_length: usize) -> Vec<f64> {
    (0..fft_length / 2 + 1)
        .map(|k| k as f64 * sample_rate / fft_length as f64)
        .collect()
}

/// `n` frequencies spaced uniformly in HTK mel space over `[fmin, fmax]`.
pub fn mel_frequencies(n: usize, fmin: f64, fmax: f64) -> Vec<f64> {
    let lo = hz_to_mel(fmin);
    let hi = hz_to_mel(fmax);
    if n == 1 {
        return vec![mel_to_hz(lo)];
    }
    (0..n)
        .map(|i| mel_to_hz(lo + (hi - lo) * i as f64 / (n - 1) as f64))
        .collect()
}

/// Per-row scaling applied after the triangles are built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterBankNorm {
    /// No scaling; every triangle peaks at 1.
    None,
    /// Divide each row by half its band's width, `2 / (f[i+2] - f[i])`, so
    /// each filter integrates to roughly unit area.
    #[serde(alias = "slaney")]
    Bandwidth,
    /// Divide each row by its p-norm. Finite p must be positive; positive
    /// infinity divides by the row maximum and negative infinity disables
    /// scaling.
    P(f64),
}

impl Default for FilterBankNorm {
    fn default() -> Self {
        Self::Bandwidth
    }
}

impl FilterBankNorm {
    fn validate(&self) -> FeatureResult<()> {
        if let Self::P(p) = self {
            if p.is_nan() || (p.is_finite() && *p <= 0.0) {
                return Err(FeatureError::config(
                    "norm",
                    format!("p-norm exponent must be positive or infinite, got {}", p),
                ));
            }
        }
        Ok(())
    }

    fn name(&self) -> String {
        match self {
            Self::None => "none".to_string(),
            Self::Bandwidth => "bandwidth".to_string(),
            Self::P(p) => format!("p={}", p),
        }
    }
}

/// Mel filter-bank parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterBankConfig {
    /// Sample rate the bin frequencies are derived from.
    pub sample_rate: f64,
    /// Transform length N; the bank has floor(N/2)+1 columns.
    pub fft_length: usize,
    /// Number of mel bands (rows).
    #[serde(default = "default_num_bands")]
    pub num_bands: usize,
    /// Lowest band-edge frequency in Hz.
    #[serde(default)]
    pub fmin: f64,
    /// Highest band-edge frequency in Hz; defaults to sample_rate/2 and is
    /// clamped not to exceed it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fmax: Option<f64>,
    /// HTK mel warping selector; only `true` is supported.
    #[serde(default = "default_true")]
    pub htk: bool,
    /// Row normalization.
    #[serde(default)]
    pub norm: FilterBankNorm,
}

pub(crate) fn default_num_bands() -> usize {
    128
}

fn default_true() -> bool {
    true
}

impl FilterBankConfig {
    /// Effective upper frequency: the configured fmax clamped to Nyquist.
    pub fn effective_fmax(&self) -> f64 {
        let nyquist = self.sample_rate / 2.0;
        self.fmax.map_or(nyquist, |f| f.min(nyquist))
    }

    /// Validates all parameters in one pass.
    pub fn validate(&self) -> FeatureResult<()> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(FeatureError::config(
                "sample_rate",
                format!("must be positive and finite, got {}", self.sample_rate),
            ));
        }
        if self.fft_length == 0 {
            return Err(FeatureError::config("fft_length", "must be at least 1"));
        }
        if self.num_bands == 0 {
            return Err(FeatureError::config("num_bands", "must be at least 1"));
        }
        if !self.htk {
            return Err(FeatureError::unsupported(
                "slaney mel warping is not implemented; set htk = true",
            ));
        }
        if !self.fmin.is_finite() || self.fmin < 0.0 {
            return Err(FeatureError::config(
                "fmin",
                format!("must be non-negative and finite, got {}", self.fmin),
            ));
        }
        if self.fmin >= self.effective_fmax() {
            return Err(FeatureError::config(
                "fmin",
                format!(
                    "{} is not below the effective fmax {}",
                    self.fmin,
                    self.effective_fmax()
                ),
            ));
        }
        self.norm.validate()
    }

    /// Reports the resolved parameters as a trace record.
    pub fn record(&self) -> OperationRecord {
        OperationRecord::new(
            "mel_filter_bank",
            json!({
                "sample_rate": self.sample_rate,
                "fft_length": self.fft_length,
                "num_bands": self.num_bands,
                "fmin": self.fmin,
                "fmax": self.effective_fmax(),
                "htk": self.htk,
                "norm": self.norm.name(),
            }),
        )
    }
}

/// A bands x bins matrix of triangular filters.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterBank {
    weights: Vec<f64>,
    bands: usize,
    bins: usize,
}

impl FilterBank {
    /// Designs a filter bank from a validated configuration.
    ///
    /// Band edges are `num_bands + 2` points spaced uniformly in mel space;
    /// filter i rises over `[f[i], f[i+1]]` and falls over
    /// `[f[i+1], f[i+2]]`, evaluated at the FFT bin frequencies.
    pub fn design(config: &FilterBankConfig) -> FeatureResult<Self> {
        config.validate()?;

        let bins = config.fft_length / 2 + 1;
        let bin_freqs = fft_frequencies(config.sample_rate, config.fft_length);
        let edges = mel_frequencies(config.num_bands + 2, config.fmin, config.effective_fmax());

        let mut weights = vec![0.0; config.num_bands * bins];
        for band in 0..config.num_bands {
            let (lo, mid, hi) = (edges[band], edges[band + 1], edges[band + 2]);
            let row = &mut weights[band * bins..(band + 1) * bins];
            for (k, w) in row.iter_mut().enumerate() {
                let rising = (bin_freqs[k] - lo) / (mid - lo);
                let falling = (hi - bin_freqs[k]) / (hi - mid);
                *w = rising.min(falling).max(0.0);
            }
            match config.norm {
                FilterBankNorm::None => {}
                FilterBankNorm::Bandwidth => {
                    let scale = 2.0 / (hi - lo);
                    for w in row.iter_mut() {
                        *w *= scale;
                    }
                }
                FilterBankNorm::P(p) => scale_by_p_norm(row, p),
            }
        }

        Ok(Self {
            weights,
            bands: config.num_bands,
            bins,
        })
    }

    /// Number of bands (rows).
    pub fn bands(&self) -> usize {
        self.bands
    }

    /// Number of frequency bins (columns).
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Borrows one band's weights.
    pub fn row(&self, band: usize) -> &[f64] {
        &self.weights[band * self.bins..(band + 1) * self.bins]
    }

    /// Multiplies the bank with one spectrum column, writing band energies
    /// into `out`.
    ///
    /// # Panics
    /// Panics if `spectrum` or `out` have the wrong length; callers validate
    /// shapes before looping over frames.
    pub fn apply(&self, spectrum: &[f64], out: &mut [f64]) {
        assert_eq!(spectrum.len(), self.bins);
        assert_eq!(out.len(), self.bands);
        for (band, slot) in out.iter_mut().enumerate() {
            *slot = self
                .row(band)
                .iter()
                .zip(spectrum)
                .map(|(w, s)| w * s)
                .sum();
        }
    }
}

/// Divides a row by its p-norm.
///
/// Positive infinity uses the max norm; negative infinity means no scaling.
/// Rows with vanishing norm are left unscaled rather than divided by zero.
fn scale_by_p_norm(row: &mut [f64], p: f64) {
    if p == f64::NEG_INFINITY {
        return;
    }
    let norm = if p == f64::INFINITY {
        row.iter().fold(0.0, |m: f64, &w| m.max(w.abs()))
    } else {
        row.iter()
            .map(|w| w.abs().powf(p))
            .sum::<f64>()
            .powf(1.0 / p)
    };
    if norm > f64::MIN_POSITIVE {
        for w in row.iter_mut() {
            *w /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config_16k() -> FilterBankConfig {
        FilterBankConfig {
            sample_rate: 16000.0,
            fft_length: 512,
            num_bands: 50,
            fmin: 0.0,
            fmax: None,
            htk: true,
            norm: FilterBankNorm::Bandwidth,
        }
    }

    #[test]
    fn test_htk_warping_reference_points() {
        assert_eq!(hz_to_mel(0.0), 0.0);
        // 1000 Hz is very close to 1000 mel by construction of the HTK formula
        assert!((hz_to_mel(1000.0) - 999.99).abs() < 0.01);
        assert!((mel_to_hz(hz_to_mel(440.0)) - 440.0).abs() < 1e-9);
    }

    #[test]
    fn test_shape() {
        let bank = FilterBank::design(&config_16k()).unwrap();
        assert_eq!(bank.bands(), 50);
        assert_eq!(bank.bins(), 257);
    }

    #[test]
    fn test_rows_are_triangles() {
        let config = FilterBankConfig {
            norm: FilterBankNorm::None,
            ..config_16k()
        };
        let bank = FilterBank::design(&config).unwrap();

        for band in 0..bank.bands() {
            let row = bank.row(band);
            assert!(row.iter().all(|&w| w >= 0.0));
            let peak = row.iter().cloned().fold(0.0, f64::max);
            assert!(peak > 0.0 && peak <= 1.0, "band {}", band);

            // unimodal: rises to the peak, then falls
            let argmax = row
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
                .map(|(i, _)| i)
                .unwrap();
            assert!(row[..argmax].windows(2).all(|w| w[0] <= w[1]));
            assert!(row[argmax..].windows(2).all(|w| w[0] >= w[1]));
        }
    }

    #[test]
    fn test_bandwidth_norm_scales_rows() {
        let unnormed = FilterBank::design(&FilterBankConfig {
            norm: FilterBankNorm::None,
            ..config_16k()
        })
        .unwrap();
        let normed = FilterBank::design(&config_16k()).unwrap();

        let edges = mel_frequencies(52, 0.0, 8000.0);
        for band in 0..50 {
            let scale = 2.0 / (edges[band + 2] - edges[band]);
            for k in 0..257 {
                let expected = unnormed.row(band)[k] * scale;
                assert!((normed.row(band)[k] - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_slaney_alias_means_bandwidth() {
        let norm: FilterBankNorm = serde_json::from_str("\"slaney\"").unwrap();
        assert_eq!(norm, FilterBankNorm::Bandwidth);
    }

    #[test]
    fn test_p_norm_unit_rows() {
        let config = FilterBankConfig {
            norm: FilterBankNorm::P(2.0),
            ..config_16k()
        };
        let bank = FilterBank::design(&config).unwrap();
        for band in 0..bank.bands() {
            let norm: f64 = bank.row(band).iter().map(|w| w * w).sum::<f64>().sqrt();
            // narrow low bands can miss every bin and stay all-zero
            if norm > 0.0 {
                assert!((norm - 1.0).abs() < 1e-9, "band {}", band);
            }
        }
    }

    #[test]
    fn test_p_norm_infinities() {
        let max_normed = FilterBank::design(&FilterBankConfig {
            norm: FilterBankNorm::P(f64::INFINITY),
            ..config_16k()
        })
        .unwrap();
        for band in 0..max_normed.bands() {
            let peak = max_normed.row(band).iter().cloned().fold(0.0, f64::max);
            if peak > 0.0 {
                assert!((peak - 1.0).abs() < 1e-12);
            }
        }

        let unscaled = FilterBank::design(&FilterBankConfig {
            norm: FilterBankNorm::P(f64::NEG_INFINITY),
            ..config_16k()
        })
        .unwrap();
        let none = FilterBank::design(&FilterBankConfig {
            norm: FilterBankNorm::None,
            ..config_16k()
        })
        .unwrap();
        assert_eq!(unscaled, none);
    }

    #[test]
    fn test_non_positive_p_rejected() {
        for p in [0.0, -2.0, f64::NAN] {
            let config = FilterBankConfig {
                norm: FilterBankNorm::P(p),
                ..config_16k()
            };
            assert!(FilterBank::design(&config).is_err(), "p = {}", p);
        }
    }

    #[test]
    fn test_slaney_warping_unsupported() {
        let config = FilterBankConfig {
            htk: false,
            ..config_16k()
        };
        let err = FilterBank::design(&config).unwrap_err();
        assert!(err.to_string().contains("slaney"));
    }

    #[test]
    fn test_fmax_clamped_to_nyquist() {
        let config = FilterBankConfig {
            fmax: Some(40000.0),
            ..config_16k()
        };
        assert_eq!(config.effective_fmax(), 8000.0);
        FilterBank::design(&config).unwrap();
    }

    #[test]
    fn test_fmin_above_fmax_rejected() {
        let config = FilterBankConfig {
            fmin: 9000.0,
            ..config_16k()
        };
        assert!(FilterBank::design(&config).is_err());
    }

    #[test]
    fn test_apply_matches_manual_dot_product() {
        let bank = FilterBank::design(&config_16k()).unwrap();
        let spectrum: Vec<f64> = (0..257).map(|k| (k as f64 * 0.1).sin().abs()).collect();
        let mut out = vec![0.0; 50];
        bank.apply(&spectrum, &mut out);

        let manual: f64 = bank
            .row(7)
            .iter()
            .zip(&spectrum)
            .map(|(w, s)| w * s)
            .sum();
        assert_eq!(out[7], manual);
    }
}
