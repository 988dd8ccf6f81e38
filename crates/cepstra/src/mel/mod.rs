//! Mel spectrogram computation and power compression helpers.

pub mod filterbank;

pub use filterbank::{FilterBank, FilterBankConfig, FilterBankNorm};

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{FeatureError, FeatureResult};
use crate::signal::Signal;
use crate::stft::{stft, StftConfig};
use crate::tensor::FeatureTensor;
use crate::trace::OperationRecord;

use filterbank::default_num_bands;

/// Mel spectrogram parameters: an STFT stage, a filter-bank stage, and the
/// magnitude exponent between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MelConfig {
    /// Sample rate used for filter-bank design.
    pub sample_rate: f64,
    /// Forward transform parameters.
    #[serde(default)]
    pub stft: StftConfig,
    /// Number of mel bands.
    #[serde(default = "default_num_bands")]
    pub num_bands: usize,
    /// Lowest band-edge frequency in Hz.
    #[serde(default)]
    pub fmin: f64,
    /// Highest band-edge frequency in Hz; defaults to sample_rate/2.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fmax: Option<f64>,
    /// HTK mel warping selector; only `true` is supported.
    #[serde(default = "default_true")]
    pub htk: bool,
    /// Filter-bank row normalization.
    #[serde(default)]
    pub norm: FilterBankNorm,
    /// Magnitude exponent: 1.0 for magnitude, 2.0 for power.
    #[serde(default = "default_power")]
    pub power: f64,
}

fn default_true() -> bool {
    true
}

fn default_power() -> f64 {
    2.0
}

impl MelConfig {
    /// Filter-bank configuration for a given transform length.
    fn filter_bank_config(&self, fft_length: usize) -> FilterBankConfig {
        FilterBankConfig {
            sample_rate: self.sample_rate,
            fft_length,
            num_bands: self.num_bands,
            fmin: self.fmin,
            fmax: self.fmax,
            htk: self.htk,
            norm: self.norm,
        }
    }

    /// Validates the mel-specific parameters; the STFT and filter-bank
    /// stages validate their own.
    pub fn validate(&self) -> FeatureResult<()> {
        if !self.power.is_finite() || self.power <= 0.0 {
            return Err(FeatureError::config(
                "power",
                format!("must be positive and finite, got {}", self.power),
            ));
        }
        Ok(())
    }

    /// Reports the resolved parameters as a trace record.
    pub fn record(&self) -> OperationRecord {
        OperationRecord::new(
            "mel_spectrogram",
            json!({
                "sample_rate": self.sample_rate,
                "stft": self.stft.record().params,
                "num_bands": self.num_bands,
                "fmin": self.fmin,
                "fmax": self.fmax.unwrap_or(self.sample_rate / 2.0),
                "htk": self.htk,
                "power": self.power,
            }),
        )
    }
}

/// Computes a mel spectrogram from a time-domain signal.
///
/// Pipeline: STFT, elementwise magnitude raised to `power`, then the filter
/// bank applied to every frame. Output is bands x frames x channels.
pub fn mel_spectrogram(signal: &Signal, config: &MelConfig) -> FeatureResult<FeatureTensor> {
    config.validate()?;
    let bank = FilterBank::design(&config.filter_bank_config(config.stft.fft_length))?;
    let spectrum = stft(signal, &config.stft)?.magnitude(config.power);
    apply_bank(&bank, &spectrum)
}

/// Computes a mel spectrogram from a precomputed one-sided spectrum.
///
/// The spectrum is used as supplied; it is expected to already carry the
/// desired magnitude exponent. Its bin count implies the transform length
/// used for filter-bank design, `2 * (bins - 1)`, so all STFT-only
/// parameters in the config are ignored.
pub fn mel_spectrogram_from_spectrum(
    spectrum: &FeatureTensor,
    config: &MelConfig,
) -> FeatureResult<FeatureTensor> {
    config.validate()?;
    if spectrum.rows() < 2 {
        return Err(FeatureError::shape(format!(
            "spectrum needs at least 2 frequency bins, got {}",
            spectrum.rows()
        )));
    }
    let implied_fft_length = 2 * (spectrum.rows() - 1);
    let bank = FilterBank::design(&config.filter_bank_config(implied_fft_length))?;
    apply_bank(&bank, spectrum)
}

/// Left-multiplies every frame column by the filter bank.
fn apply_bank(bank: &FilterBank, spectrum: &FeatureTensor) -> FeatureResult<FeatureTensor> {
    if spectrum.rows() != bank.bins() {
        return Err(FeatureError::shape(format!(
            "spectrum has {} bins but the filter bank expects {}",
            spectrum.rows(),
            bank.bins()
        )));
    }
    let mut out = FeatureTensor::zeros(bank.bands(), spectrum.frames(), spectrum.channels());
    for ch in 0..spectrum.channels() {
        for frame in 0..spectrum.frames() {
            bank.apply(spectrum.frame(ch, frame), out.frame_mut(ch, frame));
        }
    }
    Ok(out)
}

/// Converts a power tensor to decibels: `10 * log10(max(amin, z))`.
///
/// When `top_db` is given, the result is clamped from below to the tensor's
/// global maximum minus `top_db` (one maximum per call, not per frame).
pub fn power_to_db(
    tensor: &FeatureTensor,
    amin: f64,
    top_db: Option<f64>,
) -> FeatureResult<FeatureTensor> {
    if !amin.is_finite() || amin <= 0.0 {
        return Err(FeatureError::config(
            "amin",
            format!("must be positive and finite, got {}", amin),
        ));
    }
    if let Some(t) = top_db {
        if !t.is_finite() || t < 0.0 {
            return Err(FeatureError::config(
                "top_db",
                format!("must be non-negative and finite, got {}", t),
            ));
        }
    }

    let db = tensor.map(|z| 10.0 * z.max(amin).log10());
    Ok(match top_db {
        Some(t) => {
            let floor = db.max_value() - t;
            db.map(|v| v.max(floor))
        }
        None => db,
    })
}

/// Log compression for model input: `log10(z + offset)`.
///
/// This is the compression the downstream classifier consumes, distinct
/// from the dB conversion the MFCC pipeline applies internally.
pub fn log_compress(tensor: &FeatureTensor, offset: f64) -> FeatureTensor {
    tensor.map(|z| (z + offset).log10())
}
