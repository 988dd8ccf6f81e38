//! Analysis window generation.
//!
//! Named curves are the *periodic* (fftbins) variants used for spectral
//! analysis, not the symmetric variants used for filter design. A length-1
//! window of any named curve is `[1.0]`.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::{FeatureError, FeatureResult};

/// Analysis window selector: a named periodic curve or an explicit
/// coefficient vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Window {
    /// Periodic Hann window.
    Hann,
    /// Periodic Hamming window.
    Hamming,
    /// Periodic Blackman window.
    Blackman,
    /// Caller-supplied coefficients; must match the resolved window length.
    Custom(Vec<f64>),
}

impl Default for Window {
    fn default() -> Self {
        Self::Hann
    }
}

impl Window {
    /// Resolves the window to exactly `length` coefficients.
    ///
    /// A custom vector whose length differs from `length` fails with a
    /// configuration error stating the expected and actual lengths.
    pub fn coefficients(&self, length: usize) -> FeatureResult<Vec<f64>> {
        if length == 0 {
            return Err(FeatureError::config("window_length", "must be at least 1"));
        }
        match self {
            Self::Hann => Ok(periodic(length, |x| 0.5 - 0.5 * x.cos())),
            Self::Hamming => Ok(periodic(length, |x| 0.54 - 0.46 * x.cos())),
            Self::Blackman => {
                Ok(periodic(length, |x| {
                    0.42 - 0.5 * x.cos() + 0.08 * (2.0 * x).cos()
                }))
            }
            Self::Custom(v) => {
                if v.len() != length {
                    return Err(FeatureError::config(
                        "window",
                        format!("window size mismatch: expected {}, got {}", length, v.len()),
                    ));
                }
                Ok(v.clone())
            }
        }
    }

    /// Name used when reporting resolved parameters.
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::Hann => "hann",
            Self::Hamming => "hamming",
            Self::Blackman => "blackman",
            Self::Custom(_) => "custom",
        }
    }
}

/// Evaluates a periodic cosine-sum curve at `2*pi*i/n`.
fn periodic(n: usize, f: impl Fn(f64) -> f64) -> Vec<f64> {
    if n == 1 {
        return vec![1.0];
    }
    (0..n)
        .map(|i| f(2.0 * PI * i as f64 / n as f64))
        .collect()
}

/// Centers a window inside a zero buffer of `size` coefficients.
///
/// The front pad is `floor((size - len) / 2)`, so an odd excess leaves one
/// extra zero at the back. Fails if the window is longer than `size`.
pub fn pad_to_center(window: &[f64], size: usize) -> FeatureResult<Vec<f64>> {
    if window.len() > size {
        return Err(FeatureError::config(
            "window_length",
            format!(
                "window of {} coefficients exceeds transform length {}",
                window.len(),
                size
            ),
        ));
    }
    let front = (size - window.len()) / 2;
    let mut padded = vec![0.0; size];
    padded[front..front + window.len()].copy_from_slice(window);
    Ok(padded)
}
