use std::f64::consts::PI;

/// Number of cepstral coefficients kept per frame.
pub const NUM_COEFFS: usize = 13;

/// Number of triangular mel bands in the filterbank.
const NUM_MELS: usize = 40;

/// Floor for log energy, matches the filterbank energy floor used elsewhere.
const ENERGY_FLOOR: f64 = 1e-10;

/// Computes per-frame MFCCs from power spectra.
///
/// Power spectrum -> mel filterbank -> log -> orthonormal DCT-II,
/// keeping the first [`NUM_COEFFS`] coefficients.
pub fn mfcc(power_frames: &[Vec<f64>], sample_rate: u32, fft_size: usize) -> Vec<[f64; NUM_COEFFS]> {
    let high_freq = sample_rate as f64 / 2.0;
    let filterbank = mel_filterbank(NUM_MELS, fft_size, sample_rate as usize, 0.0, high_freq);

    let mut result = Vec::with_capacity(power_frames.len());
    let mut log_mel = [0.0f64; NUM_MELS];

    for power in power_frames {
        for (m, filter) in filterbank.iter().enumerate() {
            let mut energy: f64 = 0.0;
            for (k, &w) in filter.iter().enumerate() {
                energy += w * power[k];
            }
            log_mel[m] = energy.max(ENERGY_FLOOR).ln();
        }
        result.push(dct_ii_ortho(&log_mel));
    }
    result
}

/// Per-coefficient mean and population variance across frames.
pub fn mean_var(frames: &[[f64; NUM_COEFFS]]) -> ([f64; NUM_COEFFS], [f64; NUM_COEFFS]) {
    let mut mean = [0.0f64; NUM_COEFFS];
    let mut var = [0.0f64; NUM_COEFFS];
    if frames.is_empty() {
        return (mean, var);
    }
    let n = frames.len() as f64;

    for frame in frames {
        for (c, &v) in frame.iter().enumerate() {
            mean[c] += v;
        }
    }
    for m in &mut mean {
        *m /= n;
    }
    for frame in frames {
        for (c, &v) in frame.iter().enumerate() {
            let d = v - mean[c];
            var[c] += d * d;
        }
    }
    for v in &mut var {
        *v /= n;
    }
    (mean, var)
}

/// Orthonormal DCT-II of the log mel energies, truncated to NUM_COEFFS.
fn dct_ii_ortho(x: &[f64; NUM_MELS]) -> [f64; NUM_COEFFS] {
    let n = NUM_MELS as f64;
    let scale0 = (1.0 / n).sqrt();
    let scale = (2.0 / n).sqrt();

    let mut out = [0.0f64; NUM_COEFFS];
    for (k, o) in out.iter_mut().enumerate() {
        let mut sum = 0.0;
        for (i, &v) in x.iter().enumerate() {
            sum += v * (PI / n * (i as f64 + 0.5) * k as f64).cos();
        }
        *o = sum * if k == 0 { scale0 } else { scale };
    }
    out
}

fn hz_to_mel(hz: f64) -> f64 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

fn mel_to_hz(mel: f64) -> f64 {
    700.0 * (10.0_f64.powf(mel / 2595.0) - 1.0)
}

/// Computes triangular mel filterbank weights.
/// Returns `[num_mels][fft_size/2 + 1]` weights.
fn mel_filterbank(
    num_mels: usize,
    fft_size: usize,
    sample_rate: usize,
    low_freq: f64,
    high_freq: f64,
) -> Vec<Vec<f64>> {
    let half_fft = fft_size / 2 + 1;
    let mel_low = hz_to_mel(low_freq);
    let mel_high = hz_to_mel(high_freq);

    // Equally spaced mel points.
    let mel_points: Vec<f64> = (0..num_mels + 2)
        .map(|i| mel_low + i as f64 * (mel_high - mel_low) / (num_mels + 1) as f64)
        .collect();

    // Convert back to Hz and then to FFT bin indices.
    let bin_indices: Vec<usize> = mel_points
        .iter()
        .map(|&m| {
            let hz = mel_to_hz(m);
            let bin = (hz * fft_size as f64 / sample_rate as f64).floor() as isize;
            bin.max(0).min(half_fft as isize - 1) as usize
        })
        .collect();

    // Build triangular filters.
    let mut fb = Vec::with_capacity(num_mels);
    for m in 0..num_mels {
        let mut filter = vec![0.0f64; half_fft];
        let left = bin_indices[m];
        let center = bin_indices[m + 1];
        let right = bin_indices[m + 2];

        // Rising slope.
        if center > left {
            for k in left..=center {
                filter[k] = (k - left) as f64 / (center - left) as f64;
            }
        }
        // Falling slope.
        if right > center {
            for k in center..=right {
                filter[k] = (right - k) as f64 / (right - center) as f64;
            }
        }
        fb.push(filter);
    }
    fb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::stft::{power_spectrum, stft, FRAME_LEN};

    #[test]
    fn mel_hz_roundtrip() {
        for &hz in &[0.0, 100.0, 440.0, 1000.0, 8000.0] {
            let mel = hz_to_mel(hz);
            let back = mel_to_hz(mel);
            assert!((hz - back).abs() < 1e-6, "roundtrip failed for {hz}");
        }
    }

    #[test]
    fn dct_constant_input() {
        // DCT of a constant signal concentrates in coefficient 0.
        let x = [2.0f64; NUM_MELS];
        let out = dct_ii_ortho(&x);
        assert!(out[0].abs() > 1.0);
        for &c in &out[1..] {
            assert!(c.abs() < 1e-9, "higher coefficient should vanish, got {c}");
        }
    }

    #[test]
    fn mfcc_frame_shape() {
        let samples: Vec<f64> = (0..16000)
            .map(|i| (300.0 * 2.0 * PI * i as f64 / 16000.0).sin())
            .collect();
        let power = power_spectrum(&stft(&samples));
        let coeffs = mfcc(&power, 16000, FRAME_LEN);
        assert_eq!(coeffs.len(), power.len());
        assert!(coeffs.iter().all(|f| f.iter().all(|v| v.is_finite())));
    }

    #[test]
    fn mfcc_distinguishes_tone_from_noise() {
        // A pure tone and white-ish noise should produce different cepstra.
        let tone: Vec<f64> = (0..16000)
            .map(|i| (300.0 * 2.0 * PI * i as f64 / 16000.0).sin())
            .collect();
        // Deterministic pseudo-noise (LCG).
        let mut state = 1u64;
        let noise: Vec<f64> = (0..16000)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                (state >> 33) as f64 / (1u64 << 31) as f64 - 1.0
            })
            .collect();

        let tone_mfcc = mfcc(&power_spectrum(&stft(&tone)), 16000, FRAME_LEN);
        let noise_mfcc = mfcc(&power_spectrum(&stft(&noise)), 16000, FRAME_LEN);

        let (tone_mean, _) = mean_var(&tone_mfcc);
        let (noise_mean, _) = mean_var(&noise_mfcc);
        let dist: f64 = tone_mean
            .iter()
            .zip(noise_mean.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt();
        assert!(dist > 1.0, "cepstral distance too small: {dist}");
    }

    #[test]
    fn mean_var_empty() {
        let (mean, var) = mean_var(&[]);
        assert_eq!(mean, [0.0; NUM_COEFFS]);
        assert_eq!(var, [0.0; NUM_COEFFS]);
    }

    #[test]
    fn mean_var_basic() {
        let frames = vec![[1.0; NUM_COEFFS], [3.0; NUM_COEFFS]];
        let (mean, var) = mean_var(&frames);
        assert!((mean[0] - 2.0).abs() < 1e-12);
        assert!((var[0] - 1.0).abs() < 1e-12);
    }
}
