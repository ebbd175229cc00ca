use std::f64::consts::PI;

/// Frame length in samples for spectral analysis (128ms @ 16kHz).
pub const FRAME_LEN: usize = 2048;

/// Hop between frames in samples (32ms @ 16kHz).
pub const HOP: usize = 512;

/// Complex value as (real, imag); no complex number type needed.
pub type Complex = (f64, f64);

/// Number of frames produced for a signal of the given length.
/// A signal shorter than one frame still yields one zero-padded frame.
pub fn num_frames(len: usize) -> usize {
    if len < FRAME_LEN {
        1
    } else {
        (len - FRAME_LEN) / HOP + 1
    }
}

/// Short-time Fourier transform with a Hann window.
///
/// Returns `[num_frames][FRAME_LEN/2 + 1]` half-spectra; the negative
/// frequencies are implied by conjugate symmetry of the real input.
pub fn stft(samples: &[f64]) -> Vec<Vec<Complex>> {
    let window = hann_window(FRAME_LEN);
    let half = FRAME_LEN / 2 + 1;
    let frames = num_frames(samples.len());

    let mut result = Vec::with_capacity(frames);
    let mut buf = vec![(0.0f64, 0.0f64); FRAME_LEN];

    for f in 0..frames {
        let offset = f * HOP;
        for (i, v) in buf.iter_mut().enumerate() {
            let s = samples.get(offset + i).copied().unwrap_or(0.0);
            *v = (s * window[i], 0.0);
        }
        fft(&mut buf);
        result.push(buf[..half].to_vec());
    }
    result
}

/// Power spectrum |X[k]|^2 of each half-spectrum frame.
pub fn power_spectrum(frames: &[Vec<Complex>]) -> Vec<Vec<f64>> {
    frames
        .iter()
        .map(|frame| frame.iter().map(|&(re, im)| re * re + im * im).collect())
        .collect()
}

/// Inverse STFT via overlap-add with Hann synthesis window.
///
/// `out_len` bounds the reconstruction to the original signal length.
pub fn istft(frames: &[Vec<Complex>], out_len: usize) -> Vec<f64> {
    let window = hann_window(FRAME_LEN);
    let total = (frames.len().saturating_sub(1)) * HOP + FRAME_LEN;
    let mut out = vec![0.0f64; total];
    let mut wsum = vec![0.0f64; total];
    let mut buf = vec![(0.0f64, 0.0f64); FRAME_LEN];

    for (f, frame) in frames.iter().enumerate() {
        // Rebuild the full spectrum from the half-spectrum by symmetry.
        for (k, &(re, im)) in frame.iter().enumerate() {
            buf[k] = (re, im);
        }
        for k in frame.len()..FRAME_LEN {
            let (re, im) = buf[FRAME_LEN - k];
            buf[k] = (re, -im);
        }
        ifft(&mut buf);

        let offset = f * HOP;
        for i in 0..FRAME_LEN {
            out[offset + i] += buf[i].0 * window[i];
            wsum[offset + i] += window[i] * window[i];
        }
    }

    for (v, &w) in out.iter_mut().zip(wsum.iter()) {
        if w > 1e-8 {
            *v /= w;
        }
    }
    out.truncate(out_len.min(total));
    out
}

pub fn hann_window(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f64 / n as f64).cos())
        .collect()
}

/// In-place Cooley-Tukey FFT.
/// Input length must be a power of 2.
pub fn fft(x: &mut [Complex]) {
    let n = x.len();
    if n <= 1 {
        return;
    }

    // Bit-reversal permutation.
    let mut j = 0usize;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j ^= bit;
        if i < j {
            x.swap(i, j);
        }
    }

    // Butterfly operations.
    let mut size = 2;
    while size <= n {
        let half = size / 2;
        let angle = -2.0 * PI / size as f64;
        let wn = (angle.cos(), angle.sin());
        let mut start = 0;
        while start < n {
            let mut w = (1.0, 0.0);
            for k in 0..half {
                let u = x[start + k];
                let t_re = w.0 * x[start + k + half].0 - w.1 * x[start + k + half].1;
                let t_im = w.0 * x[start + k + half].1 + w.1 * x[start + k + half].0;
                x[start + k] = (u.0 + t_re, u.1 + t_im);
                x[start + k + half] = (u.0 - t_re, u.1 - t_im);
                let new_w_re = w.0 * wn.0 - w.1 * wn.1;
                let new_w_im = w.0 * wn.1 + w.1 * wn.0;
                w = (new_w_re, new_w_im);
            }
            start += size;
        }
        size <<= 1;
    }
}

/// In-place inverse FFT: conjugate, forward FFT, conjugate, scale by 1/N.
pub fn ifft(x: &mut [Complex]) {
    let n = x.len();
    if n <= 1 {
        return;
    }
    for v in x.iter_mut() {
        v.1 = -v.1;
    }
    fft(x);
    let scale = 1.0 / n as f64;
    for v in x.iter_mut() {
        v.0 *= scale;
        v.1 = -v.1 * scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fft_impulse() {
        // FFT of [1,0,0,0] should be [1,1,1,1].
        let mut buf = vec![(1.0, 0.0), (0.0, 0.0), (0.0, 0.0), (0.0, 0.0)];
        fft(&mut buf);
        for (re, im) in &buf {
            assert!((re - 1.0).abs() < 1e-10);
            assert!(im.abs() < 1e-10);
        }
    }

    #[test]
    fn fft_parseval() {
        // sum |x[n]|^2 * N = sum |X[k]|^2
        let n = 8;
        let mut buf: Vec<Complex> = (0..n)
            .map(|i| ((2.0 * PI * i as f64 / n as f64).sin(), 0.0))
            .collect();
        let time_energy: f64 = buf.iter().map(|(r, im)| r * r + im * im).sum();
        fft(&mut buf);
        let freq_energy: f64 = buf.iter().map(|(r, im)| r * r + im * im).sum();
        assert!((time_energy * n as f64 - freq_energy).abs() < 1e-8);
    }

    #[test]
    fn ifft_roundtrip() {
        let n = 16;
        let original: Vec<Complex> = (0..n)
            .map(|i| ((i as f64 * 0.3).sin(), (i as f64 * 0.7).cos()))
            .collect();
        let mut buf = original.clone();
        fft(&mut buf);
        ifft(&mut buf);
        for (a, b) in original.iter().zip(buf.iter()) {
            assert!((a.0 - b.0).abs() < 1e-9);
            assert!((a.1 - b.1).abs() < 1e-9);
        }
    }

    #[test]
    fn num_frames_short_signal() {
        assert_eq!(num_frames(100), 1);
        assert_eq!(num_frames(FRAME_LEN), 1);
        assert_eq!(num_frames(FRAME_LEN + HOP), 2);
        assert_eq!(num_frames(64000), (64000 - FRAME_LEN) / HOP + 1);
    }

    #[test]
    fn stft_tone_peaks_at_bin() {
        // 1kHz tone at 16kHz: bin = 1000 * 2048 / 16000 = 128.
        let sr = 16000.0;
        let samples: Vec<f64> = (0..16000)
            .map(|i| (1000.0 * 2.0 * PI * i as f64 / sr).sin())
            .collect();
        let frames = stft(&samples);
        let power = power_spectrum(&frames);

        let frame = &power[1];
        let peak_bin = frame
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(k, _)| k)
            .unwrap();
        assert!((peak_bin as i64 - 128).abs() <= 1, "peak bin {peak_bin}");
    }

    #[test]
    fn istft_reconstructs_interior() {
        let sr = 16000.0;
        let samples: Vec<f64> = (0..8192)
            .map(|i| (440.0 * 2.0 * PI * i as f64 / sr).sin() * 0.5)
            .collect();
        let frames = stft(&samples);
        let rebuilt = istft(&frames, samples.len());

        // Interior samples (full window overlap) should match closely.
        for i in FRAME_LEN..rebuilt.len().saturating_sub(FRAME_LEN) {
            assert!(
                (samples[i] - rebuilt[i]).abs() < 1e-6,
                "sample {i}: {} vs {}",
                samples[i],
                rebuilt[i]
            );
        }
    }
}
