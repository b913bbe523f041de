//! Composite health score: min-max normalized loyalty and lead score,
//! inverted churn risk, averaged and scaled to a 0-100 scalar.
//!
//! This path never fails. Missing records and unparsable fields
//! contribute 0 before normalization; degenerate population ranges
//! normalize to 0. The only way to not get a score is to match no
//! records at all, which the engine reports before scoring starts.

use serde::{Deserialize, Serialize};

use pulse_core::types::fields;
use pulse_core::CustomerRecord;
use pulse_stats::PopulationRange;

/// Raw per-customer feature values pulled from whichever dataset
/// records matched. Absent record or unparsable field means 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawFeatures {
    pub loyalty_score: f64,
    pub lead_score: f64,
    pub churn_risk: f64,
}

impl RawFeatures {
    pub fn extract(
        loyalty: Option<&CustomerRecord>,
        outreach: Option<&CustomerRecord>,
        churn: Option<&CustomerRecord>,
    ) -> Self {
        Self {
            loyalty_score: loyalty
                .map(|r| r.numeric_or_zero(fields::LOYALTY_SCORE))
                .unwrap_or(0.0),
            lead_score: outreach
                .map(|r| r.numeric_or_zero(fields::LEAD_SCORE))
                .unwrap_or(0.0),
            churn_risk: churn
                .map(|r| r.numeric_or_zero(fields::CHURN_RISK))
                .unwrap_or(0.0),
        }
    }
}

/// The customer's position in normalized feature space. This is also
/// the vector the cluster classifier operates on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFeatures {
    pub loyalty: f64,
    pub lead_score: f64,
    /// `1 - raw_churn_risk`, unscaled. Churn risk is assumed already
    /// in [0,1] by upstream convention; out-of-range inputs flow
    /// through unclamped and still participate in the average.
    pub churn_inverse: f64,
}

impl NormalizedFeatures {
    pub fn as_array(&self) -> [f64; 3] {
        [self.loyalty, self.lead_score, self.churn_inverse]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub raw: RawFeatures,
    pub normalized: NormalizedFeatures,
    /// Composite health score, rounded to one decimal place. Nominal
    /// range [0,100]; may leave it for out-of-bound inputs.
    pub health_score: f64,
}

/// Combine raw features into the composite health score using the
/// current population ranges for loyalty and lead score.
pub fn composite_score(
    raw: RawFeatures,
    loyalty_range: PopulationRange,
    lead_range: PopulationRange,
) -> ScoreBreakdown {
    let normalized = NormalizedFeatures {
        loyalty: loyalty_range.normalize(raw.loyalty_score),
        lead_score: lead_range.normalize(raw.lead_score),
        churn_inverse: 1.0 - raw.churn_risk,
    };

    let health = (normalized.loyalty + normalized.lead_score + normalized.churn_inverse) / 3.0
        * 100.0;

    ScoreBreakdown {
        raw,
        normalized,
        health_score: round_one_decimal(health),
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
