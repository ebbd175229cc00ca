//! Decision policies over the classifier's probability output.
//!
//! Two call sites, two threshold tables. They look near-identical but
//! diverge in cut lines, rounding and failure behavior, and are kept as
//! two named strategies on purpose — merging them would change at least
//! one endpoint's observable behavior.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Terminal classification of a clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Classification {
    #[serde(rename = "HUMAN")]
    Human,
    #[serde(rename = "AI_GENERATED")]
    AiGenerated,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Human => write!(f, "HUMAN"),
            Self::AiGenerated => write!(f, "AI_GENERATED"),
        }
    }
}

/// Languages the strict policy accepts. Affects thresholds only, never
/// feature extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Language {
    Tamil,
    English,
    Hindi,
    Malayalam,
    Telugu,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tamil => "Tamil",
            Self::English => "English",
            Self::Hindi => "Hindi",
            Self::Malayalam => "Malayalam",
            Self::Telugu => "Telugu",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = ValidationError;

    /// Case-sensitive exact match against the supported set.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Tamil" => Ok(Self::Tamil),
            "English" => Ok(Self::English),
            "Hindi" => Ok(Self::Hindi),
            "Malayalam" => Ok(Self::Malayalam),
            "Telugu" => Ok(Self::Telugu),
            _ => Err(ValidationError::UnsupportedLanguage),
        }
    }
}

/// Pre-processing validation failures of the strict call site. Checked
/// and rejected before any audio decode is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid API key")]
    InvalidApiKey,
    #[error("unsupported language")]
    UnsupportedLanguage,
    #[error("unsupported audio format")]
    UnsupportedFormat,
}

/// Validates the declared container format for the strict call site.
/// Case-insensitive; only "mp3" is accepted.
pub fn validate_format(format: &str) -> Result<(), ValidationError> {
    if format.eq_ignore_ascii_case("mp3") {
        Ok(())
    } else {
        Err(ValidationError::UnsupportedFormat)
    }
}

/// A classification with its reported confidence and explanation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    pub classification: Classification,
    pub confidence: f64,
    pub explanation: &'static str,
}

/// Explanation returned by the strict policy's fail-soft path.
pub const FAIL_SOFT_EXPLANATION: &str =
    "Unable to confidently detect AI characteristics from the provided audio";

/// Language-agnostic policy (simple variant).
///
/// p >= 0.70 -> AI_GENERATED; p <= 0.40 -> HUMAN; in between the 0.50
/// midpoint decides. Confidence is p rounded to 3 decimals.
pub fn decide_simple(p: f64) -> Verdict {
    let (classification, explanation) = if p >= 0.70 {
        (
            Classification::AiGenerated,
            "Unnatural pitch consistency and synthetic speech patterns detected.",
        )
    } else if p <= 0.40 {
        (
            Classification::Human,
            "Natural speech patterns and pitch variation detected.",
        )
    } else {
        (
            if p >= 0.50 {
                Classification::AiGenerated
            } else {
                Classification::Human
            },
            "Mixed speech characteristics detected.",
        )
    };
    Verdict {
        classification,
        confidence: round_to(p, 3),
        explanation,
    }
}

/// Language-aware policy (strict variant).
///
/// English uses a 0.70 cut, every other supported language 0.80. Inside
/// the (0.70, 0.80) band a non-English clip resolves purely on the
/// threshold — the probability magnitude is never blended in. Confidence
/// is p rounded to 2 decimals.
pub fn decide_strict(p: f64, language: Language) -> Verdict {
    let (classification, explanation) = if language == Language::English {
        if p >= 0.70 {
            (
                Classification::AiGenerated,
                "Unnatural pitch consistency and synthetic speech patterns detected",
            )
        } else {
            (
                Classification::Human,
                "Natural speech patterns and pitch variation detected",
            )
        }
    } else if p >= 0.80 {
        (
            Classification::AiGenerated,
            "Synthetic speech patterns detected across acoustic features",
        )
    } else {
        (
            Classification::Human,
            "No strong synthetic speech patterns detected",
        )
    };
    Verdict {
        classification,
        confidence: round_to(p, 2),
        explanation,
    }
}

/// The strict call site's universal fallback: any failure past
/// validation becomes this success-shaped verdict.
pub fn fail_soft() -> Verdict {
    Verdict {
        classification: Classification::Human,
        confidence: 0.50,
        explanation: FAIL_SOFT_EXPLANATION,
    }
}

fn round_to(p: f64, digits: u32) -> f64 {
    let scale = 10f64.powi(digits as i32);
    (p * scale).round() / scale
}
