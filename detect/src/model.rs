use crate::{DetectError, FeatureVector};

/// Produces the probability that a clip is synthetic speech.
///
/// The model is an opaque trained artifact; this trait is its only
/// contract. Implementations read features strictly by position 0..31
/// (see [`crate::features`]) — the artifact was fit against that exact
/// positional convention and carries no column names.
///
/// # Thread Safety
///
/// Implementations must be safe for concurrent use; the process holds a
/// single instance for its whole lifetime.
pub trait DetectorModel: Send + Sync {
    /// Returns the probability, in [0, 1], that the features describe
    /// AI-generated speech.
    fn predict(&self, features: &FeatureVector) -> Result<f64, DetectError>;
}
