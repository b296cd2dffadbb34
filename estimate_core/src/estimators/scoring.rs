//! # Composite Quality Score
//!
//! Aggregates a project's recorded field samples (temperature, compaction,
//! humidity readings each tagged with a rating tier) into a 0-100 score, a
//! letter grade, and a badge tier. The score-to-grade mapping is a fixed
//! step function, not interpolation, so band edges are exactly testable.

use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};

/// Which field measurement a sample belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Temperature,
    Compaction,
    Humidity,
}

impl MetricKind {
    /// Relative weight of this metric in the composite score.
    ///
    /// Compaction dominates because it is the strongest predictor of
    /// pavement life; humidity is the weakest signal.
    pub fn weight(&self) -> f64 {
        match self {
            MetricKind::Compaction => 0.5,
            MetricKind::Temperature => 0.3,
            MetricKind::Humidity => 0.2,
        }
    }
}

/// Rating tier assigned to a single field sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleRating {
    Optimal,
    Good,
    Acceptable,
    Poor,
    Critical,
}

impl SampleRating {
    /// Point value contributed to the composite score.
    pub fn points(&self) -> f64 {
        match self {
            SampleRating::Optimal => 100.0,
            SampleRating::Good => 85.0,
            SampleRating::Acceptable => 70.0,
            SampleRating::Poor => 40.0,
            SampleRating::Critical => 10.0,
        }
    }
}

/// One rated field sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualitySample {
    pub metric: MetricKind,
    pub rating: SampleRating,
}

/// Letter grade from the fixed score bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LetterGrade {
    A,
    B,
    C,
    D,
    F,
}

impl LetterGrade {
    /// Map a 0-100 score to a grade. Step function: >=90 A, >=80 B,
    /// >=70 C, >=60 D, else F.
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            LetterGrade::A
        } else if score >= 80.0 {
            LetterGrade::B
        } else if score >= 70.0 {
            LetterGrade::C
        } else if score >= 60.0 {
            LetterGrade::D
        } else {
            LetterGrade::F
        }
    }
}

/// Badge tier shown on compliance dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeTier {
    Excellent,
    Good,
    Adequate,
    Deficient,
}

impl BadgeTier {
    /// Map a 0-100 score to a badge tier (>=90, >=80, >=70, else lowest).
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            BadgeTier::Excellent
        } else if score >= 80.0 {
            BadgeTier::Good
        } else if score >= 70.0 {
            BadgeTier::Adequate
        } else {
            BadgeTier::Deficient
        }
    }
}

/// Input parameters for a composite quality score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityScoreInput {
    /// All rated samples for the project
    pub samples: Vec<QualitySample>,
}

impl QualityScoreInput {
    /// Validate input parameters.
    pub fn validate(&self) -> EstimateResult<()> {
        if self.samples.is_empty() {
            return Err(EstimateError::invalid_input(
                "samples",
                "[]",
                "At least one sample is required",
            ));
        }
        Ok(())
    }
}

/// Results from a composite quality score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityScoreOutput {
    /// Composite score, 0-100
    pub score: f64,
    /// Letter grade from the fixed bands
    pub grade: LetterGrade,
    /// Dashboard badge tier
    pub badge: BadgeTier,
    /// Number of samples aggregated
    pub sample_count: usize,
    /// Human-readable description for the history ledger
    pub formula_text: String,
}

/// Compute the composite quality score.
///
/// Each metric's samples are averaged, then the per-metric means are
/// combined by metric weight. Metrics with no samples contribute nothing
/// and their weight is redistributed across the metrics present.
pub fn calculate(input: &QualityScoreInput) -> EstimateResult<QualityScoreOutput> {
    input.validate()?;

    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;

    for metric in [
        MetricKind::Compaction,
        MetricKind::Temperature,
        MetricKind::Humidity,
    ] {
        let points: Vec<f64> = input
            .samples
            .iter()
            .filter(|s| s.metric == metric)
            .map(|s| s.rating.points())
            .collect();
        if points.is_empty() {
            continue;
        }
        let mean = points.iter().sum::<f64>() / points.len() as f64;
        weighted_sum += mean * metric.weight();
        weight_total += metric.weight();
    }

    // validate() guarantees at least one sample, so weight_total > 0.
    let score = weighted_sum / weight_total;

    Ok(QualityScoreOutput {
        score,
        grade: LetterGrade::from_score(score),
        badge: BadgeTier::from_score(score),
        sample_count: input.samples.len(),
        formula_text: format!(
            "weighted mean of {} samples (compaction 0.5, temperature 0.3, humidity 0.2)",
            input.samples.len()
        ),
    })
}
