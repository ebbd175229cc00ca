use tracing::debug;
use voxcheck_audio::Waveform;

/// Lower bound of the fundamental-frequency search band, Hz.
pub const FMIN: f64 = 50.0;

/// Upper bound of the fundamental-frequency search band, Hz.
pub const FMAX: f64 = 500.0;

/// Peak amplitude below which a clip is treated as silent and the
/// tracker is not run at all.
pub const SILENCE_PEAK: f32 = 0.01;

/// Analysis frame length in samples.
const FRAME: usize = 2048;

/// Correlation window within a frame; lags are measured against this span.
const WINDOW: usize = 1024;

/// Hop between analysis frames.
const HOP: usize = 512;

/// Absolute threshold on the cumulative-mean-normalized difference.
const THRESHOLD: f64 = 0.15;

/// Variance of the voiced fundamental-frequency contour of a clip.
///
/// Contract (all three fallbacks are deliberate policy, asserted in tests):
/// - near-silent clip (peak < [`SILENCE_PEAK`]) -> 0.0, tracker not invoked
/// - tracker failure on degenerate input -> 0.0
/// - no voiced frames -> 0.0
pub fn pitch_variance(wav: &Waveform) -> f64 {
    if wav.peak() < SILENCE_PEAK {
        return 0.0;
    }
    let Some(contour) = track(wav.samples(), wav.sample_rate()) else {
        debug!("pitch tracker declined input, substituting 0.0");
        return 0.0;
    };

    let voiced: Vec<f64> = contour.into_iter().flatten().collect();
    if voiced.is_empty() {
        return 0.0;
    }
    let n = voiced.len() as f64;
    let mean = voiced.iter().sum::<f64>() / n;
    voiced.iter().map(|f| (f - mean) * (f - mean)).sum::<f64>() / n
}

/// YIN-style fundamental-frequency tracking restricted to [FMIN, FMAX].
///
/// One `Option<f64>` per frame; `None` marks an unvoiced frame. Returns
/// `None` for input the tracker cannot analyze (too short for a single
/// frame, or a band that leaves no valid lag range).
pub fn track(samples: &[f32], sample_rate: u32) -> Option<Vec<Option<f64>>> {
    if samples.len() < FRAME {
        return None;
    }
    let sr = sample_rate as f64;
    let tau_min = (sr / FMAX).floor() as usize;
    let tau_max = (sr / FMIN).ceil() as usize;
    if tau_min < 1 || tau_max + WINDOW > FRAME || tau_min >= tau_max {
        return None;
    }

    let num_frames = (samples.len() - FRAME) / HOP + 1;
    let mut contour = Vec::with_capacity(num_frames);
    let mut diff = vec![0.0f64; tau_max + 1];
    let mut cmndf = vec![0.0f64; tau_max + 1];

    for f in 0..num_frames {
        let frame: Vec<f64> = samples[f * HOP..f * HOP + FRAME]
            .iter()
            .map(|&s| s as f64)
            .collect();
        contour.push(estimate_frame(&frame, sr, tau_min, tau_max, &mut diff, &mut cmndf));
    }
    Some(contour)
}

/// Single-frame YIN estimate: difference function, cumulative-mean
/// normalization, absolute threshold, parabolic refinement.
fn estimate_frame(
    frame: &[f64],
    sr: f64,
    tau_min: usize,
    tau_max: usize,
    diff: &mut [f64],
    cmndf: &mut [f64],
) -> Option<f64> {
    // Difference function d(tau) over the correlation window.
    diff[0] = 0.0;
    for tau in 1..=tau_max {
        let mut sum = 0.0;
        for j in 0..WINDOW {
            let d = frame[j] - frame[j + tau];
            sum += d * d;
        }
        diff[tau] = sum;
    }

    // Cumulative-mean-normalized difference function.
    cmndf[0] = 1.0;
    let mut running = 0.0;
    for tau in 1..=tau_max {
        running += diff[tau];
        cmndf[tau] = if running > 0.0 {
            diff[tau] * tau as f64 / running
        } else {
            1.0
        };
    }

    // First dip under the threshold, walked to its local minimum.
    let mut tau = tau_min;
    while tau <= tau_max {
        if cmndf[tau] < THRESHOLD {
            while tau + 1 <= tau_max && cmndf[tau + 1] < cmndf[tau] {
                tau += 1;
            }
            let refined = parabolic_refine(cmndf, tau, tau_min, tau_max);
            return Some(sr / refined);
        }
        tau += 1;
    }
    None
}

/// Parabolic interpolation around the selected lag for sub-sample accuracy.
fn parabolic_refine(cmndf: &[f64], tau: usize, tau_min: usize, tau_max: usize) -> f64 {
    if tau <= tau_min || tau >= tau_max {
        return tau as f64;
    }
    let (y0, y1, y2) = (cmndf[tau - 1], cmndf[tau], cmndf[tau + 1]);
    let denom = y0 - 2.0 * y1 + y2;
    if denom.abs() < 1e-12 {
        return tau as f64;
    }
    let delta = 0.5 * (y0 - y2) / denom;
    tau as f64 + delta.clamp(-1.0, 1.0)
}
