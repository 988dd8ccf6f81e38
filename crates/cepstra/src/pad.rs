//! Boundary padding before framing.
//!
//! Reproduces numpy's `pad` semantics for the modes the STFT accepts,
//! including the cyclic continuation reflect/symmetric/wrap perform when the
//! pad is longer than the signal.

use serde::{Deserialize, Serialize};

/// Boundary extension mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PadMode {
    /// Zero fill on both sides.
    #[serde(alias = "empty")]
    Constant,
    /// Replicate the first/last sample.
    Edge,
    /// Linear ramp from zero up to (but excluding) the boundary sample, and
    /// back down to zero after it.
    LinearRamp,
    /// Mirror around the boundary sample, excluding it.
    Reflect,
    /// Mirror at the boundary, including the boundary sample.
    Symmetric,
    /// Circular wrap: the front pad is the signal's tail, the back pad its
    /// head.
    Wrap,
}

impl Default for PadMode {
    fn default() -> Self {
        Self::Constant
    }
}

impl PadMode {
    /// Name used when reporting resolved parameters.
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::Constant => "constant",
            Self::Edge => "edge",
            Self::LinearRamp => "linear_ramp",
            Self::Reflect => "reflect",
            Self::Symmetric => "symmetric",
            Self::Wrap => "wrap",
        }
    }
}

/// Pads one channel with `pad` extra samples on each side.
///
/// The output always has `signal.len() + 2 * pad` samples. The signal must
/// be non-empty; [`crate::Signal`] construction guarantees that.
pub fn pad(signal: &[f64], pad: usize, mode: PadMode) -> Vec<f64> {
    let n = signal.len();
    debug_assert!(n > 0);
    let total = n + 2 * pad;
    let mut out = Vec::with_capacity(total);

    for i in 0..total {
        let t = i as i64 - pad as i64;
        let v = if t >= 0 && (t as usize) < n {
            signal[t as usize]
        } else {
            match mode {
                PadMode::Constant => 0.0,
                PadMode::Edge => {
                    if t < 0 {
                        signal[0]
                    } else {
                        signal[n - 1]
                    }
                }
                PadMode::LinearRamp => linear_ramp(signal, pad, t),
                PadMode::Reflect => signal[reflect_index(t, n)],
                PadMode::Symmetric => signal[symmetric_index(t, n)],
                PadMode::Wrap => signal[wrap_index(t, n)],
            }
        };
        out.push(v);
    }
    out
}

/// Ramp value at virtual index `t` (negative in front, `>= n` behind).
///
/// Front: `x[0] * (pad + t) / pad`, rising from 0 and excluding the boundary.
/// Back: falls from the boundary sample to exactly 0 at the last pad sample.
fn linear_ramp(signal: &[f64], pad: usize, t: i64) -> f64 {
    let n = signal.len() as i64;
    let p = pad as f64;
    if t < 0 {
        signal[0] * (pad as i64 + t) as f64 / p
    } else {
        signal[signal.len() - 1] * (pad as i64 - (t - n) - 1) as f64 / p
    }
}

/// Maps a virtual index into `[0, n)` by mirroring around the endpoints,
/// boundary samples excluded (period `2(n - 1)`).
fn reflect_index(t: i64, n: usize) -> usize {
    if n == 1 {
        return 0;
    }
    let period = 2 * (n as i64 - 1);
    let r = t.rem_euclid(period);
    if r < n as i64 {
        r as usize
    } else {
        (period - r) as usize
    }
}

/// Maps a virtual index into `[0, n)` by mirroring at the endpoints,
/// boundary samples included (period `2n`).
fn symmetric_index(t: i64, n: usize) -> usize {
    let period = 2 * n as i64;
    let r = t.rem_euclid(period);
    if r < n as i64 {
        r as usize
    } else {
        (period - 1 - r) as usize
    }
}

/// Maps a virtual index into `[0, n)` modulo the signal length.
fn wrap_index(t: i64, n: usize) -> usize {
    t.rem_euclid(n as i64) as usize
}
