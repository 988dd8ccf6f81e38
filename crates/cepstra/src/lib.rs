//! Cepstra - deterministic audio feature extraction
//!
//! This crate reproduces the numeric conventions of the reference librosa
//! pipeline: short-time Fourier transform and its inverse, mel filter-bank
//! design with HTK frequency warping, mel spectrograms, and MFCCs. The
//! subtle parts are all convention, not mathematics - periodic windows,
//! centering and boundary-padding modes, the one-sided spectrum, filter-bank
//! normalization schemes, and orthonormal DCT plus liftering - and each is
//! matched to the reference within floating-point tolerance.
//!
//! # Determinism
//!
//! Every operation is a pure function over immutable input buffers: same
//! inputs, same output, on every run. There is no shared state, no caching,
//! and no I/O; all computation is in `f64`.
//!
//! # Example
//!
//! ```
//! use cepstra::{mfcc, DctType, FilterBankNorm, MelConfig, MfccConfig, Signal, StftConfig};
//!
//! let samples: Vec<f64> = (0..16000)
//!     .map(|i| (2.0 * std::f64::consts::PI * 440.0 * i as f64 / 16000.0).sin())
//!     .collect();
//! let signal = Signal::mono(samples)?;
//!
//! let config = MfccConfig {
//!     mel: MelConfig {
//!         sample_rate: 16000.0,
//!         stft: StftConfig {
//!             fft_length: 512,
//!             hop_length: Some(160),
//!             ..Default::default()
//!         },
//!         num_bands: 50,
//!         fmin: 0.0,
//!         fmax: None,
//!         htk: true,
//!         norm: FilterBankNorm::Bandwidth,
//!         power: 2.0,
//!     },
//!     num_coeffs: 20,
//!     dct_type: DctType::II,
//!     lifter: 0.2,
//! };
//!
//! let coeffs = mfcc(&signal, &config)?;
//! assert_eq!(coeffs.rows(), 20);
//! # Ok::<(), cepstra::FeatureError>(())
//! ```
//!
//! # Crate Structure
//!
//! - [`stft`]/[`istft`] - windowed one-sided FFT analysis and overlap-add
//!   resynthesis
//! - [`window`] - periodic analysis windows and center padding
//! - [`pad`] - boundary extension modes applied before framing
//! - [`mel`] - filter-bank design, mel spectrograms, dB and log compression
//! - [`mfcc`] - cepstral coefficients with selectable DCT and liftering
//! - [`trace`] - optional structured record of resolved parameters

pub mod dct;
pub mod error;
pub mod mel;
pub mod mfcc;
pub mod pad;
pub mod signal;
pub mod stft;
pub mod tensor;
pub mod trace;
pub mod window;

// Re-export main types at crate root
pub use dct::DctType;
pub use error::{FeatureError, FeatureResult};
pub use mel::{
    log_compress, mel_spectrogram, mel_spectrogram_from_spectrum, power_to_db, FilterBank,
    FilterBankConfig, FilterBankNorm, MelConfig,
};
pub use mfcc::{mfcc, mfcc_from_mel, mfcc_from_spectrum, MfccConfig};
pub use pad::PadMode;
pub use signal::Signal;
pub use stft::{istft, stft, StftConfig};
pub use tensor::{FeatureTensor, Spectrogram};
pub use trace::{OperationRecord, Trace};
pub use window::Window;
