//! Deterministic acoustic feature extraction.
//!
//! [`extract`] maps a waveform to a fixed 32-dimensional vector. The
//! positional layout is contractual — the classifier was fit against it
//! and aligns by position, not by name:
//!
//! | index  | feature |
//! |--------|---------|
//! | 0..13  | MFCC per-coefficient mean |
//! | 13..26 | MFCC per-coefficient variance |
//! | 26     | mean spectral centroid (Hz) |
//! | 27     | mean zero-crossing rate |
//! | 28     | mean RMS energy |
//! | 29     | mean spectral flatness |
//! | 30     | pitch variance (50-500 Hz band) |
//! | 31     | harmonic/percussive energy ratio |
//!
//! No feature may be renamed, reordered or added without retraining.

mod hpss;
mod mfcc;
mod pitch;
mod spectral;
pub(crate) mod stft;

use voxcheck_audio::Waveform;

pub use pitch::SILENCE_PEAK;

/// Length of the feature vector.
pub const FEATURE_DIM: usize = 32;

/// A fixed-order acoustic feature vector, created once per waveform.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector([f64; FEATURE_DIM]);

impl FeatureVector {
    pub fn from_array(values: [f64; FEATURE_DIM]) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Computes the 32-dimensional feature vector for a waveform.
///
/// Stateless and deterministic: the same waveform always produces the
/// same vector.
pub fn extract(wav: &Waveform) -> FeatureVector {
    let samples: Vec<f64> = wav.samples().iter().map(|&s| s as f64).collect();
    let sample_rate = wav.sample_rate();

    let frames = stft::stft(&samples);
    let power = stft::power_spectrum(&frames);

    let coeffs = mfcc::mfcc(&power, sample_rate, stft::FRAME_LEN);
    let (mfcc_mean, mfcc_var) = mfcc::mean_var(&coeffs);

    let mut v = [0.0f64; FEATURE_DIM];
    v[..13].copy_from_slice(&mfcc_mean);
    v[13..26].copy_from_slice(&mfcc_var);
    v[26] = spectral::centroid_mean(&power, sample_rate, stft::FRAME_LEN);
    v[27] = spectral::zcr_mean(&samples);
    v[28] = spectral::rms_mean(&samples);
    v[29] = spectral::flatness_mean(&power);
    v[30] = pitch::pitch_variance(wav);
    v[31] = hpss::harmonic_percussive_ratio(&samples);

    FeatureVector(v)
}
