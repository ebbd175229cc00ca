use crate::features::stft::{num_frames, FRAME_LEN, HOP};

const EPS: f64 = 1e-10;

/// Mean spectral centroid across frames, in Hz.
///
/// Per frame: magnitude-weighted mean bin frequency. Frames with no
/// energy contribute 0.0.
pub fn centroid_mean(power_frames: &[Vec<f64>], sample_rate: u32, fft_size: usize) -> f64 {
    if power_frames.is_empty() {
        return 0.0;
    }
    let bin_hz = sample_rate as f64 / fft_size as f64;
    let mut total = 0.0;
    for power in power_frames {
        let mut weighted = 0.0;
        let mut mass = 0.0;
        for (k, &p) in power.iter().enumerate() {
            let mag = p.sqrt();
            weighted += k as f64 * bin_hz * mag;
            mass += mag;
        }
        if mass > EPS {
            total += weighted / mass;
        }
    }
    total / power_frames.len() as f64
}

/// Mean spectral flatness across frames.
///
/// Per frame: geometric mean over arithmetic mean of the power spectrum,
/// floored to keep the log defined. 1.0 is perfectly flat (noise-like),
/// values near 0 are tonal.
pub fn flatness_mean(power_frames: &[Vec<f64>]) -> f64 {
    if power_frames.is_empty() {
        return 0.0;
    }
    let mut total = 0.0;
    for power in power_frames {
        let n = power.len() as f64;
        let log_sum: f64 = power.iter().map(|&p| p.max(EPS).ln()).sum();
        let mean: f64 = power.iter().sum::<f64>() / n;
        total += (log_sum / n).exp() / mean.max(EPS);
    }
    total / power_frames.len() as f64
}

/// Mean zero-crossing rate across time-domain frames.
pub fn zcr_mean(samples: &[f64]) -> f64 {
    frame_mean(samples, |frame| {
        let crossings = frame
            .windows(2)
            .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
            .count();
        crossings as f64 / frame.len() as f64
    })
}

/// Mean root-mean-square energy across time-domain frames.
pub fn rms_mean(samples: &[f64]) -> f64 {
    frame_mean(samples, |frame| {
        let sq: f64 = frame.iter().map(|&s| s * s).sum();
        (sq / frame.len() as f64).sqrt()
    })
}

/// Applies `f` to each time-domain frame (same framing as the STFT,
/// zero-padding a signal shorter than one frame) and averages.
fn frame_mean(samples: &[f64], f: impl Fn(&[f64]) -> f64) -> f64 {
    let frames = num_frames(samples.len());
    let mut padded;
    let samples = if samples.len() < FRAME_LEN {
        padded = samples.to_vec();
        padded.resize(FRAME_LEN, 0.0);
        &padded[..]
    } else {
        samples
    };

    let mut total = 0.0;
    for i in 0..frames {
        let offset = i * HOP;
        total += f(&samples[offset..offset + FRAME_LEN]);
    }
    total / frames as f64
}
