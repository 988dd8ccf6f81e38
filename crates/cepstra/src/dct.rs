//! Orthonormal discrete cosine transforms along a slice.
//!
//! Direct O(n^2) evaluation; cepstral band counts are small enough that an
//! FFT-based DCT would not pay for itself here.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::{FeatureError, FeatureResult};

/// DCT variant, serialized as its conventional number (1, 2 or 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DctType {
    /// DCT-I; requires at least two input points.
    I,
    /// DCT-II, the common "the DCT".
    II,
    /// DCT-III, the inverse of DCT-II.
    III,
}

impl Default for DctType {
    fn default() -> Self {
        Self::II
    }
}

impl TryFrom<u8> for DctType {
    type Error = FeatureError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::I),
            2 => Ok(Self::II),
            3 => Ok(Self::III),
            other => Err(FeatureError::config(
                "dct_type",
                format!("must be 1, 2 or 3, got {}", other),
            )),
        }
    }
}

impl From<DctType> for u8 {
    fn from(value: DctType) -> Self {
        match value {
            DctType::I => 1,
            DctType::II => 2,
            DctType::III => 3,
        }
    }
}

/// Computes the orthonormal DCT of `input`, all coefficients.
///
/// The definitions match the orthonormal scaling convention, so DCT-II and
/// DCT-III are mutual inverses and DCT-I is its own inverse.
///
/// # Panics
/// Panics on empty input, or single-point input for DCT-I; the MFCC layer
/// validates band counts before calling.
pub fn dct(input: &[f64], dct_type: DctType) -> Vec<f64> {
    let n = input.len();
    assert!(n > 0);
    match dct_type {
        DctType::I => {
            assert!(n > 1, "DCT-I needs at least two points");
            let m = (n - 1) as f64;
            (0..n)
                .map(|k| {
                    let ck = endpoint_scale(k, n);
                    let sum: f64 = input
                        .iter()
                        .enumerate()
                        .map(|(j, &x)| {
                            endpoint_scale(j, n) * x * (PI * k as f64 * j as f64 / m).cos()
                        })
                        .sum();
                    ck * (2.0 / m).sqrt() * sum
                })
                .collect()
        }
        DctType::II => {
            let nf = n as f64;
            (0..n)
                .map(|k| {
                    let ck = if k == 0 { (0.5f64).sqrt() } else { 1.0 };
                    let sum: f64 = input
                        .iter()
                        .enumerate()
                        .map(|(j, &x)| {
                            x * (PI * (2.0 * j as f64 + 1.0) * k as f64 / (2.0 * nf)).cos()
                        })
                        .sum();
                    ck * (2.0 / nf).sqrt() * sum
                })
                .collect()
        }
        DctType::III => {
            let nf = n as f64;
            (0..n)
                .map(|k| {
                    let sum: f64 = input
                        .iter()
                        .enumerate()
                        .skip(1)
                        .map(|(j, &x)| {
                            x * (PI * j as f64 * (2.0 * k as f64 + 1.0) / (2.0 * nf)).cos()
                        })
                        .sum();
                    input[0] / nf.sqrt() + (2.0 / nf).sqrt() * sum
                })
                .collect()
        }
    }
}

/// The 1/sqrt(2) endpoint weight of the orthonormal DCT-I.
fn endpoint_scale(j: usize, n: usize) -> f64 {
    if j == 0 || j == n - 1 {
        (0.5f64).sqrt()
    } else {
        1.0
    }
}
