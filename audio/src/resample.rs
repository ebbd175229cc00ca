use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use tracing::debug;

use crate::AudioError;

/// Resamples mono f32 samples from `from_hz` to `to_hz`.
///
/// Sinc interpolation with a BlackmanHarris2 window, processed in a single
/// pass over the whole clip. Passthrough when the rates already match.
pub fn resample(samples: Vec<f32>, from_hz: u32, to_hz: u32) -> Result<Vec<f32>, AudioError> {
    if from_hz == to_hz || samples.is_empty() {
        return Ok(samples);
    }

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let ratio = to_hz as f64 / from_hz as f64;
    let num_frames = samples.len();

    // Chunk size = input length: one process call covers the clip.
    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, num_frames, 1)
        .map_err(|e| AudioError::Resample(e.to_string()))?;

    let output = resampler
        .process(&[samples], None)
        .map_err(|e| AudioError::Resample(e.to_string()))?;

    let out = output.into_iter().next().unwrap_or_default();
    debug!(
        "resampled {} frames ({} Hz) -> {} frames ({} Hz)",
        num_frames,
        from_hz,
        out.len(),
        to_hz
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resample_passthrough_same_rate() {
        let samples = vec![0.1f32, 0.2, 0.3];
        let out = resample(samples.clone(), 16000, 16000).unwrap();
        assert_eq!(out, samples);
    }

    #[test]
    fn resample_empty() {
        let out = resample(Vec::new(), 44100, 16000).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn resample_halves_length() {
        // 1 second at 32 kHz down to 16 kHz.
        let samples: Vec<f32> = (0..32000)
            .map(|i| (220.0 * 2.0 * std::f32::consts::PI * i as f32 / 32000.0).sin())
            .collect();
        let out = resample(samples, 32000, 16000).unwrap();
        // Output length should be close to 16000 (edge effects allowed).
        assert!(
            (out.len() as i64 - 16000).unsigned_abs() < 600,
            "got {} samples",
            out.len()
        );
    }

    #[test]
    fn resample_preserves_amplitude() {
        let samples: Vec<f32> = (0..44100)
            .map(|i| (440.0 * 2.0 * std::f32::consts::PI * i as f32 / 44100.0).sin() * 0.5)
            .collect();
        let out = resample(samples, 44100, 16000).unwrap();
        let peak = out.iter().fold(0.0f32, |m, &s| m.max(s.abs()));
        assert!((peak - 0.5).abs() < 0.05, "peak {peak}");
    }
}
