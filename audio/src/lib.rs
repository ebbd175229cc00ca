//! Clip decoding and normalization for speech analysis.
//!
//! Turns compressed audio bytes (MP3, WAV, ...) into a [`Waveform`]:
//! mono f32 samples at a fixed rate, capped to a maximum duration and
//! rejected below a minimum duration.
//!
//! # Pipeline
//!
//! 1. [`decode`]: container/codec bytes -> mono samples at the native rate
//! 2. [`resample`]: native rate -> target rate (sinc interpolation)
//! 3. [`load_clip`]: the above plus the duration cap/floor policy

mod decode;
mod error;
mod loader;
mod resample;

pub use decode::decode;
pub use error::AudioError;
pub use loader::{load_clip, ClipConfig, Waveform};
pub use resample::resample;
