use thiserror::Error;

/// Errors returned by clip loading operations.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("undecodable audio: {0}")]
    Undecodable(String),

    #[error("clip too short: need at least {min_samples} samples, got {got_samples}")]
    TooShort {
        min_samples: usize,
        got_samples: usize,
    },

    #[error("resample error: {0}")]
    Resample(String),
}
