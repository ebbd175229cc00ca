use crate::features::stft::{istft, power_spectrum, stft, Complex};

/// Median filter kernel length, in frames (time axis) and bins
/// (frequency axis).
const KERNEL: usize = 31;

/// Guard added to the percussive mean to keep the ratio finite.
const RATIO_GUARD: f64 = 1e-6;

const EPS: f64 = 1e-10;

/// Harmonic-to-percussive mean-amplitude ratio of a clip.
///
/// Median-filtering source separation: the magnitude spectrogram is
/// median-filtered across time to estimate the harmonic layer and across
/// frequency for the percussive layer; soft Wiener masks (power 2) split
/// the complex STFT, both components are resynthesized, and the ratio of
/// their mean absolute amplitudes is returned.
///
/// Always finite and non-negative thanks to the guarded denominator.
pub fn harmonic_percussive_ratio(samples: &[f64]) -> f64 {
    let frames = stft(samples);
    let power = power_spectrum(&frames);
    let mag: Vec<Vec<f64>> = power
        .iter()
        .map(|f| f.iter().map(|&p| p.sqrt()).collect())
        .collect();

    let harm_est = median_across_time(&mag);
    let perc_est = median_across_freq(&mag);

    let num_frames = frames.len();
    let num_bins = frames[0].len();
    let mut harm_frames: Vec<Vec<Complex>> = Vec::with_capacity(num_frames);
    let mut perc_frames: Vec<Vec<Complex>> = Vec::with_capacity(num_frames);

    for t in 0..num_frames {
        let mut hf = Vec::with_capacity(num_bins);
        let mut pf = Vec::with_capacity(num_bins);
        for k in 0..num_bins {
            let h2 = harm_est[t][k] * harm_est[t][k];
            let p2 = perc_est[t][k] * perc_est[t][k];
            let denom = h2 + p2;
            let (hm, pm) = if denom > EPS {
                (h2 / denom, p2 / denom)
            } else {
                (0.0, 0.0)
            };
            let (re, im) = frames[t][k];
            hf.push((re * hm, im * hm));
            pf.push((re * pm, im * pm));
        }
        harm_frames.push(hf);
        perc_frames.push(pf);
    }

    let harmonic = istft(&harm_frames, samples.len());
    let percussive = istft(&perc_frames, samples.len());

    let harm_mean = mean_abs(&harmonic);
    let perc_mean = mean_abs(&percussive);
    harm_mean / (perc_mean + RATIO_GUARD)
}

fn mean_abs(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().map(|s| s.abs()).sum::<f64>() / samples.len() as f64
}

/// Median over a KERNEL-frame window per frequency bin; the window is
/// clipped at the spectrogram edges.
fn median_across_time(mag: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let num_frames = mag.len();
    let num_bins = mag[0].len();
    let half = KERNEL / 2;

    let mut out = vec![vec![0.0f64; num_bins]; num_frames];
    let mut window = Vec::with_capacity(KERNEL);
    for k in 0..num_bins {
        for t in 0..num_frames {
            let lo = t.saturating_sub(half);
            let hi = (t + half + 1).min(num_frames);
            window.clear();
            for row in &mag[lo..hi] {
                window.push(row[k]);
            }
            out[t][k] = median(&mut window);
        }
    }
    out
}

/// Median over a KERNEL-bin window within each frame.
fn median_across_freq(mag: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let num_bins = mag[0].len();
    let half = KERNEL / 2;

    let mut out = Vec::with_capacity(mag.len());
    let mut window = Vec::with_capacity(KERNEL);
    for frame in mag {
        let mut row = vec![0.0f64; num_bins];
        for (k, slot) in row.iter_mut().enumerate() {
            let lo = k.saturating_sub(half);
            let hi = (k + half + 1).min(num_bins);
            window.clear();
            window.extend_from_slice(&frame[lo..hi]);
            *slot = median(&mut window);
        }
        out.push(row);
    }
    out
}

fn median(values: &mut Vec<f64>) -> f64 {
    values.sort_by(|a, b| a.total_cmp(b));
    let n = values.len();
    if n == 0 {
        0.0
    } else if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    }
}
