//! Per-feature aggregates over one dataset's records.
//!
//! Numeric aggregation uses the zero-substitution rule: a record whose
//! field is absent or unparsable contributes 0 to the sum and still
//! counts in the denominator. The churn histogram uses a stricter drop
//! rule instead; see [`crate::histogram`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use pulse_core::CustomerRecord;

/// Observed (min, max) bounds of a numeric feature across all records
/// of one dataset. Invariant: `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopulationRange {
    pub min: f64,
    pub max: f64,
}

impl PopulationRange {
    /// A collapsed range, also used for empty datasets.
    pub fn degenerate() -> Self {
        Self { min: 0.0, max: 0.0 }
    }

    /// A constant feature gives every record the same value; such a
    /// range normalizes everything to 0 instead of dividing by zero.
    pub fn is_degenerate(&self) -> bool {
        self.max <= self.min
    }

    /// Min-max scale a raw value into [0,1] relative to this range.
    /// Raw values outside the range extrapolate; degenerate ranges
    /// yield 0 for every input.
    pub fn normalize(&self, raw: f64) -> f64 {
        if self.is_degenerate() {
            0.0
        } else {
            (raw - self.min) / (self.max - self.min)
        }
    }
}

/// Arithmetic mean of `field` across all records, with absent or
/// unparsable values counting as 0. An empty dataset means 0.
pub fn mean(records: &[CustomerRecord], field: &str) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let sum: f64 = records.iter().map(|r| r.numeric_or_zero(field)).sum();
    sum / records.len() as f64
}

/// Observed (min, max) of `field` under the same zero-substitution rule
/// as [`mean`]. An empty dataset collapses to (0, 0).
pub fn range(records: &[CustomerRecord], field: &str) -> PopulationRange {
    let mut values = records.iter().map(|r| r.numeric_or_zero(field));
    let first = match values.next() {
        Some(v) => v,
        None => return PopulationRange::degenerate(),
    };

    let (min, max) = values.fold((first, first), |(min, max), v| {
        (min.min(v), max.max(v))
    });
    PopulationRange { min, max }
}

/// Mean and observed range of one numeric feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureStats {
    pub field: String,
    pub mean: f64,
    pub range: PopulationRange,
}

impl FeatureStats {
    pub fn compute(records: &[CustomerRecord], field: &str) -> Self {
        Self {
            field: field.to_string(),
            mean: mean(records, field),
            range: range(records, field),
        }
    }
}

/// Count for one categorical value (loyalty tier, outreach segment).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: u64,
}

/// Count records by a categorical field. Missing or empty values fall
/// under "Unknown". Ordered by descending count, then value, so the
/// output is deterministic.
pub fn category_counts(records: &[CustomerRecord], field: &str) -> Vec<CategoryCount> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for record in records {
        let value = match record.get(field) {
            Some(v) if !v.is_empty() => v,
            _ => "Unknown",
        };
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut out: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(value, count)| CategoryCount {
            value: value.to_string(),
            count,
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    out
}

/// One (credit risk, 12-month CLV) point from the outreach dataset,
/// with unparsable values coerced to 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskValuePoint {
    pub credit_risk: f64,
    pub clv_12m: f64,
}

pub fn risk_value_pairs(
    records: &[CustomerRecord],
    risk_field: &str,
    value_field: &str,
) -> Vec<RiskValuePoint> {
    records
        .iter()
        .map(|r| RiskValuePoint {
            credit_risk: r.numeric_or_zero(risk_field),
            clv_12m: r.numeric_or_zero(value_field),
        })
        .collect()
}
