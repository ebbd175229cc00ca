use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tracing::{debug, warn};
use voxcheck_audio::{load_clip, ClipConfig, Waveform};

use crate::policy::{decide_simple, decide_strict, fail_soft, Language, Verdict};
use crate::{extract, DetectError, DetectorModel};

/// Runs the full detection pipeline over Base64 audio payloads.
///
/// Stateless per request; the only shared resource is the model handle,
/// which is read-only. Safe to share across concurrent requests.
#[derive(Clone)]
pub struct Analyzer {
    model: Arc<dyn DetectorModel>,
    clip: ClipConfig,
}

impl fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Analyzer")
            .field("clip", &self.clip)
            .finish_non_exhaustive()
    }
}

impl Analyzer {
    pub fn new(model: Arc<dyn DetectorModel>) -> Self {
        Self {
            model,
            clip: ClipConfig::default(),
        }
    }

    pub fn with_clip_config(model: Arc<dyn DetectorModel>, clip: ClipConfig) -> Self {
        Self { model, clip }
    }

    /// Base64 payload -> probability of synthetic speech.
    ///
    /// Every stage failure stays distinguishable:
    /// [`DetectError::InvalidEncoding`], the loader's
    /// [`voxcheck_audio::AudioError`] kinds, and model errors.
    pub fn probability(&self, audio_base64: &str) -> Result<f64, DetectError> {
        let bytes = BASE64.decode(audio_base64)?;
        let wav = load_clip(&bytes, &self.clip)?;
        self.probability_of_waveform(&wav)
    }

    /// Waveform -> probability, for callers that already hold decoded audio.
    pub fn probability_of_waveform(&self, wav: &Waveform) -> Result<f64, DetectError> {
        let features = extract(wav);
        let p = self.model.predict(&features)?;
        debug!("predicted synthetic probability {p:.4}");
        Ok(p)
    }

    /// Simple call site: errors propagate.
    pub fn detect_simple(&self, audio_base64: &str) -> Result<Verdict, DetectError> {
        Ok(decide_simple(self.probability(audio_base64)?))
    }

    /// Strict call site: any pipeline failure past validation collapses
    /// into the fail-soft verdict. The caller must have validated the
    /// language and format beforehand; this method never fails.
    pub fn detect_strict(&self, language: Language, audio_base64: &str) -> Verdict {
        match self.probability(audio_base64) {
            Ok(p) => decide_strict(p, language),
            Err(e) => {
                warn!("strict detection failed, returning fail-soft verdict: {e}");
                fail_soft()
            }
        }
    }
}
