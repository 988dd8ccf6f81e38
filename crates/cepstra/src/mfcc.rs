//! Mel-frequency cepstral coefficients.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::dct::{dct, DctType};
use crate::error::{FeatureError, FeatureResult};
use crate::mel::{mel_spectrogram, mel_spectrogram_from_spectrum, power_to_db, MelConfig};
use crate::signal::Signal;
use crate::tensor::FeatureTensor;
use crate::trace::OperationRecord;

/// Power floor applied before the dB conversion.
const AMIN: f64 = 1e-10;

/// Dynamic range of the dB conversion, clamped below the global maximum.
const TOP_DB: f64 = 80.0;

/// MFCC parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MfccConfig {
    /// Upstream mel spectrogram parameters.
    pub mel: MelConfig,
    /// Number of cepstral coefficients to retain.
    #[serde(default = "default_num_coeffs")]
    pub num_coeffs: usize,
    /// DCT variant applied along the band axis.
    #[serde(default)]
    pub dct_type: DctType,
    /// Liftering coefficient; 0 disables liftering.
    #[serde(default)]
    pub lifter: f64,
}

fn default_num_coeffs() -> usize {
    20
}

impl MfccConfig {
    /// Validates the MFCC-specific parameters against a band count.
    fn validate(&self, num_bands: usize) -> FeatureResult<()> {
        self.mel.validate()?;
        if self.num_coeffs == 0 {
            return Err(FeatureError::config("num_coeffs", "must be at least 1"));
        }
        if self.num_coeffs > num_bands {
            return Err(FeatureError::config(
                "num_coeffs",
                format!("{} exceeds the {} mel bands", self.num_coeffs, num_bands),
            ));
        }
        if self.dct_type == DctType::I && num_bands < 2 {
            return Err(FeatureError::config(
                "dct_type",
                "DCT-I needs at least two mel bands",
            ));
        }
        if !self.lifter.is_finite() || self.lifter < 0.0 {
            return Err(FeatureError::config(
                "lifter",
                format!("must be non-negative and finite, got {}", self.lifter),
            ));
        }
        Ok(())
    }

    /// Reports the resolved parameters as a trace record.
    pub fn record(&self) -> OperationRecord {
        OperationRecord::new(
            "mfcc",
            json!({
                "mel": self.mel.record().params,
                "num_coeffs": self.num_coeffs,
                "dct_type": u8::from(self.dct_type),
                "lifter": self.lifter,
            }),
        )
    }
}

/// Computes MFCCs from a time-domain signal.
///
/// Pipeline: mel spectrogram, dB conversion (power floor 1e-10, 80 dB
/// dynamic range below the call-global maximum), DCT along the band axis,
/// truncation to the first `num_coeffs` coefficients, optional liftering.
pub fn mfcc(signal: &Signal, config: &MfccConfig) -> FeatureResult<FeatureTensor> {
    config.validate(config.mel.num_bands)?;
    let mel = mel_spectrogram(signal, &config.mel)?;
    cepstrum(&mel, config)
}

/// Computes MFCCs from a precomputed mel spectrogram.
///
/// The tensor's row count is the band count; all upstream STFT and
/// filter-bank parameters in the config are ignored.
pub fn mfcc_from_mel(mel: &FeatureTensor, config: &MfccConfig) -> FeatureResult<FeatureTensor> {
    config.validate(mel.rows())?;
    cepstrum(mel, config)
}

/// Computes MFCCs from a precomputed one-sided spectrum, see
/// [`mel_spectrogram_from_spectrum`] for the implied transform length.
pub fn mfcc_from_spectrum(
    spectrum: &FeatureTensor,
    config: &MfccConfig,
) -> FeatureResult<FeatureTensor> {
    config.validate(config.mel.num_bands)?;
    let mel = mel_spectrogram_from_spectrum(spectrum, &config.mel)?;
    cepstrum(&mel, config)
}

/// Shared dB-DCT-truncate-lifter tail of the pipeline.
fn cepstrum(mel: &FeatureTensor, config: &MfccConfig) -> FeatureResult<FeatureTensor> {
    let db = power_to_db(mel, AMIN, Some(TOP_DB))?;

    let mut out = FeatureTensor::zeros(config.num_coeffs, db.frames(), db.channels());
    for ch in 0..db.channels() {
        for frame in 0..db.frames() {
            let coeffs = dct(db.frame(ch, frame), config.dct_type);
            out.frame_mut(ch, frame)
                .copy_from_slice(&coeffs[..config.num_coeffs]);
        }
    }

    if config.lifter > 0.0 {
        apply_lifter(&mut out, config.lifter);
    }
    Ok(out)
}

/// Scales coefficient i (1-indexed) by `1 + (L/2) * sin(pi * i / L)`.
fn apply_lifter(coeffs: &mut FeatureTensor, lifter: f64) {
    let weights: Vec<f64> = (1..=coeffs.rows())
        .map(|i| 1.0 + lifter / 2.0 * (std::f64::consts::PI * i as f64 / lifter).sin())
        .collect();
    for ch in 0..coeffs.channels() {
        for frame in 0..coeffs.frames() {
            for (c, w) in coeffs.frame_mut(ch, frame).iter_mut().zip(&weights) {
                *c *= w;
            }
        }
    }
}
