//! Synthetic-speech detection over short clips.
//!
//! # Architecture
//!
//! The pipeline processes a clip in four stages:
//!
//! 1. [`voxcheck_audio::load_clip`]: compressed bytes -> 16kHz mono waveform
//! 2. [`features::extract`]: waveform -> 32-dimensional acoustic feature vector
//! 3. [`DetectorModel::predict`]: feature vector -> probability of synthetic speech
//! 4. [`policy`]: probability (+ optional language) -> [`policy::Verdict`]
//!
//! # Feature Vector
//!
//! The 32 positions are contractual; the classifier was fit against this
//! exact order (see [`features`]):
//!
//! ```text
//!  0..13  MFCC per-coefficient mean
//! 13..26  MFCC per-coefficient variance
//! 26      mean spectral centroid
//! 27      mean zero-crossing rate
//! 28      mean RMS energy
//! 29      mean spectral flatness
//! 30      pitch variance (50-500 Hz band)
//! 31      harmonic/percussive energy ratio
//! ```
//!
//! # Decision Policies
//!
//! Two call sites, two distinct threshold tables, never merged:
//! [`policy::decide_simple`] (language-agnostic) and
//! [`policy::decide_strict`] (language-aware, fail-soft).

mod error;
pub mod features;
mod forest;
mod model;
mod pipeline;
pub mod policy;

pub use error::DetectError;
pub use features::{extract, FeatureVector, FEATURE_DIM};
pub use forest::RandomForest;
pub use model::DetectorModel;
pub use pipeline::Analyzer;
