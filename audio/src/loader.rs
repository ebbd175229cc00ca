use tracing::debug;

use crate::{decode, resample, AudioError};

/// Configures the clip normalization policy.
#[derive(Debug, Clone)]
pub struct ClipConfig {
    /// Target sample rate in Hz (default: 16000).
    pub sample_rate: u32,
    /// Maximum clip duration in seconds; longer clips are truncated
    /// (default: 4.0).
    pub max_secs: f64,
    /// Minimum clip duration in seconds; shorter clips are rejected
    /// (default: 0.5).
    pub min_secs: f64,
}

impl Default for ClipConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            max_secs: 4.0,
            min_secs: 0.5,
        }
    }
}

/// A decoded speech clip: mono f32 samples at a fixed sample rate.
///
/// Immutable once produced; all downstream analysis reads it by reference.
#[derive(Debug, Clone)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    /// Wraps raw samples that are already mono at the given rate.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Peak absolute amplitude; 0.0 for an empty clip.
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |m, &s| m.max(s.abs()))
    }
}

/// Decodes, downmixes, resamples and duration-checks a clip.
///
/// Errors are kept distinct: [`AudioError::Undecodable`] for bytes that
/// cannot be parsed, [`AudioError::TooShort`] for clips below the minimum
/// duration after resampling.
pub fn load_clip(bytes: &[u8], cfg: &ClipConfig) -> Result<Waveform, AudioError> {
    let (native, native_rate) = decode(bytes)?;
    let mut samples = resample(native, native_rate, cfg.sample_rate)?;

    let max_samples = (cfg.max_secs * cfg.sample_rate as f64) as usize;
    if samples.len() > max_samples {
        samples.truncate(max_samples);
    }

    let min_samples = (cfg.min_secs * cfg.sample_rate as f64) as usize;
    if samples.len() < min_samples {
        return Err(AudioError::TooShort {
            min_samples,
            got_samples: samples.len(),
        });
    }

    debug!(
        "loaded clip: {} samples ({:.2}s) at {} Hz",
        samples.len(),
        samples.len() as f64 / cfg.sample_rate as f64,
        cfg.sample_rate
    );
    Ok(Waveform::new(samples, cfg.sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn wav_bytes(secs: f64, sample_rate: u32) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let n = (secs * sample_rate as f64) as usize;
        let mut cursor = Cursor::new(Vec::new());
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for i in 0..n {
            let t = i as f64 / sample_rate as f64;
            let s = ((220.0 * 2.0 * std::f64::consts::PI * t).sin() * 12000.0) as i16;
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
        cursor.into_inner()
    }

    #[test]
    fn load_clip_caps_duration() {
        let bytes = wav_bytes(6.0, 16000);
        let wav = load_clip(&bytes, &ClipConfig::default()).unwrap();
        assert_eq!(wav.samples().len(), 64000); // 4.0s at 16kHz
        assert_eq!(wav.sample_rate(), 16000);
    }

    #[test]
    fn load_clip_rejects_short() {
        let bytes = wav_bytes(0.3, 16000);
        let err = load_clip(&bytes, &ClipConfig::default()).unwrap_err();
        match err {
            AudioError::TooShort {
                min_samples,
                got_samples,
            } => {
                assert_eq!(min_samples, 8000);
                assert!(got_samples < 8000);
            }
            other => panic!("expected TooShort, got {other}"),
        }
    }

    #[test]
    fn load_clip_accepts_exact_minimum() {
        let bytes = wav_bytes(0.5, 16000);
        let wav = load_clip(&bytes, &ClipConfig::default()).unwrap();
        assert!(wav.samples().len() >= 8000);
    }

    #[test]
    fn load_clip_resamples_to_target() {
        let bytes = wav_bytes(2.0, 44100);
        let wav = load_clip(&bytes, &ClipConfig::default()).unwrap();
        assert_eq!(wav.sample_rate(), 16000);
        let dur = wav.duration_secs();
        assert!((dur - 2.0).abs() < 0.1, "duration {dur}");
    }

    #[test]
    fn load_clip_garbage_is_undecodable() {
        let err = load_clip(b"not audio at all", &ClipConfig::default()).unwrap_err();
        assert!(matches!(err, AudioError::Undecodable(_)));
    }

    #[test]
    fn waveform_peak() {
        let wav = Waveform::new(vec![0.1, -0.7, 0.3], 16000);
        assert!((wav.peak() - 0.7).abs() < 1e-6);
        assert_eq!(Waveform::new(Vec::new(), 16000).peak(), 0.0);
    }
}
