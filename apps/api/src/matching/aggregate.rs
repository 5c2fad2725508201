//! Score aggregation: three sub-scores into one weighted decision metric.

use serde::{Deserialize, Serialize};

/// Content (semantic keyword match) weighs most: skill overlap is the
/// strongest fit signal.
pub const CONTENT_WEIGHT: f64 = 0.50;
pub const SIMILARITY_WEIGHT: f64 = 0.30;
pub const FORMAT_WEIGHT: f64 = 0.20;

pub const EXCELLENT_THRESHOLD: f64 = 85.0;
pub const GOOD_THRESHOLD: f64 = 65.0;

/// Rounds to 2 decimal places (half away from zero).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// The four scores shown to the user, each in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    #[serde(rename = "final")]
    pub final_score: f64,
    pub content: f64,
    pub similarity: f64,
    pub format: f64,
}

impl ScoreBreakdown {
    pub fn new(content: f64, similarity: f64, format: f64) -> Self {
        Self {
            final_score: aggregate(content, similarity, format),
            content,
            similarity,
            format,
        }
    }

    pub fn tier(&self) -> FitTier {
        FitTier::from_score(self.final_score)
    }
}

/// Weighted sum of the sub-scores, rounded to 2 decimals. Not clamped:
/// each sub-score is already clamped where it is produced.
pub fn aggregate(content: f64, similarity: f64, format: f64) -> f64 {
    round2(content * CONTENT_WEIGHT + similarity * SIMILARITY_WEIGHT + format * FORMAT_WEIGHT)
}

/// Qualitative fit label. Each tier includes its lower bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitTier {
    ExcellentFit,
    GoodFit,
    PoorFit,
}

impl FitTier {
    pub fn from_score(final_score: f64) -> Self {
        if final_score >= EXCELLENT_THRESHOLD {
            FitTier::ExcellentFit
        } else if final_score >= GOOD_THRESHOLD {
            FitTier::GoodFit
        } else {
            FitTier::PoorFit
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FitTier::ExcellentFit => "excellent fit",
            FitTier::GoodFit => "good fit",
            FitTier::PoorFit => "poor fit",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            FitTier::ExcellentFit => "Excellent Fit!",
            FitTier::GoodFit => "Good Fit. Check breakdown/advice to improve.",
            FitTier::PoorFit => "Poor Fit. See advice below.",
        }
    }
}
