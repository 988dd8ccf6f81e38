//! End-to-end demo: synthesize a tone, extract a mel spectrogram and MFCCs,
//! and print the resolved pipeline trace.

use cepstra::{
    log_compress, mel_spectrogram, mfcc, DctType, FeatureResult, FilterBankNorm, MelConfig,
    MfccConfig, Signal, StftConfig, Trace,
};

fn main() -> FeatureResult<()> {
    // one second of a 440 Hz tone at 16 kHz
    let samples: Vec<f64> = (0..16000)
        .map(|i| (2.0 * std::f64::consts::PI * 440.0 * i as f64 / 16000.0).sin())
        .collect();
    let signal = Signal::mono(samples)?;

    let config = MfccConfig {
        mel: MelConfig {
            sample_rate: 16000.0,
            stft: StftConfig {
                fft_length: 512,
                hop_length: Some(160),
                ..Default::default()
            },
            num_bands: 50,
            fmin: 0.0,
            fmax: None,
            htk: true,
            norm: FilterBankNorm::Bandwidth,
            power: 2.0,
        },
        num_coeffs: 20,
        dct_type: DctType::II,
        lifter: 0.2,
    };

    let mel = mel_spectrogram(&signal, &config.mel)?;
    println!(
        "mel spectrogram: {} bands x {} frames x {} channels",
        mel.rows(),
        mel.frames(),
        mel.channels()
    );

    // the compression a downstream classifier would consume
    let model_input = log_compress(&mel, 1e-6);
    println!(
        "model input range: [{:.3}, {:.3}]",
        model_input.values().fold(f64::INFINITY, f64::min),
        model_input.max_value()
    );

    let coeffs = mfcc(&signal, &config)?;
    println!(
        "mfcc: {} coefficients x {} frames",
        coeffs.rows(),
        coeffs.frames()
    );
    println!("first frame: {:?}", coeffs.frame(0, 0));

    let mut trace = Trace::new();
    trace.push(config.mel.stft.record());
    trace.push(config.mel.record());
    trace.push(config.record());
    println!("{}", trace.to_json());

    Ok(())
}
