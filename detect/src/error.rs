use thiserror::Error;
use voxcheck_audio::AudioError;

/// Errors returned by the detection pipeline.
///
/// Each kind stays distinguishable through the simple call site; the
/// strict call site collapses all of them into a fail-soft verdict.
#[derive(Debug, Error)]
pub enum DetectError {
    /// The classifier artifact is missing or unloadable. Surfaced as a
    /// "service unavailable" condition, never retried.
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// The audio payload is not valid Base64.
    #[error("invalid audio encoding: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),

    /// Decode, duration or resample failure from the clip loader.
    #[error(transparent)]
    Audio(#[from] AudioError),

    /// Prediction-time failure of a loaded model.
    #[error("model error: {0}")]
    Model(String),
}
