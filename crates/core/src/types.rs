//! Shared record and feature-space types used across the engine.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Record field names — the case-sensitive contract with the upstream
/// CSV producers. Matched exactly, never fuzzily.
pub mod fields {
    pub const CUSTOMER_ID: &str = "customer_id";
    pub const LOYALTY_SCORE: &str = "predicted_loyalty_score";
    pub const LOYALTY_TIER: &str = "loyalty_tier";
    pub const LEAD_SCORE: &str = "LeadScore";
    pub const SEGMENT: &str = "segment";
    pub const CHURN_RISK: &str = "churn_risk_predicted";
    pub const CLV_12M: &str = "CLV_12m";
    pub const CREDIT_RISK: &str = "CreditRisk";
}

/// The three upstream datasets the engine reconciles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetName {
    Loyalty,
    Outreach,
    Churn,
}

impl DatasetName {
    pub const ALL: [DatasetName; 3] = [Self::Loyalty, Self::Outreach, Self::Churn];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loyalty => "loyalty",
            Self::Outreach => "outreach",
            Self::Churn => "churn",
        }
    }
}

impl fmt::Display for DatasetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One already-tokenized tabular row: field name to raw text value.
/// Numeric fields arrive as text; records are immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerRecord {
    fields: HashMap<String, String>,
}

impl CustomerRecord {
    pub fn new(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }

    /// Convenience constructor for literal field pairs.
    pub fn from_pairs<const N: usize>(pairs: [(&str, &str); N]) -> Self {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// The join key shared across datasets, if present.
    pub fn customer_id(&self) -> Option<&str> {
        self.get(fields::CUSTOMER_ID)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Parse a numeric field; `None` for absent, non-numeric, or
    /// non-finite values.
    pub fn numeric(&self, field: &str) -> Option<f64> {
        parse_numeric(self.get(field)?)
    }

    /// Parse a numeric field, silently coercing absent or unparsable
    /// values to 0. This is the engine-wide substitution rule; callers
    /// that need to distinguish (the histogram) use [`numeric`] instead.
    ///
    /// [`numeric`]: Self::numeric
    pub fn numeric_or_zero(&self, field: &str) -> f64 {
        self.numeric(field).unwrap_or(0.0)
    }
}

impl From<HashMap<String, String>> for CustomerRecord {
    fn from(fields: HashMap<String, String>) -> Self {
        Self::new(fields)
    }
}

/// Parse raw text as a finite float. NaN and infinities count as
/// unparsable so they cannot poison downstream aggregates.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// An externally supplied reference point in the normalized feature
/// space (normalized loyalty, normalized lead score, inverted churn).
/// Centroids are read-only configuration; the engine never fits or
/// mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    pub label: String,
    pub coords: [f64; 3],
}
