//! Read-only statistics snapshot for one dataset, rebuilt in full on
//! every reload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use pulse_core::types::fields;
use pulse_core::{CustomerRecord, DatasetName};

use crate::histogram::Histogram;
use crate::population::{
    category_counts, risk_value_pairs, CategoryCount, FeatureStats, RiskValuePoint,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationSnapshot {
    pub dataset: DatasetName,
    /// Version of the dataset load this snapshot was derived from.
    pub version: u64,
    pub record_count: usize,
    /// Mean/range per tracked numeric feature of this dataset.
    pub features: Vec<FeatureStats>,
    /// Churn-risk distribution; present for the churn dataset only.
    pub histogram: Option<Histogram>,
    /// Loyalty-tier or segment breakdown, where the dataset carries one.
    pub categories: Vec<CategoryCount>,
    /// (CreditRisk, CLV_12m) pairs; outreach dataset only.
    pub risk_value: Vec<RiskValuePoint>,
    pub computed_at: DateTime<Utc>,
}

impl PopulationSnapshot {
    /// Derive the full snapshot for one dataset. Synchronous and total:
    /// every tracked aggregate is recomputed from scratch.
    pub fn compute(
        dataset: DatasetName,
        version: u64,
        records: &[CustomerRecord],
        histogram_bins: usize,
    ) -> Self {
        let (features, histogram, categories, risk_value) = match dataset {
            DatasetName::Loyalty => (
                vec![FeatureStats::compute(records, fields::LOYALTY_SCORE)],
                None,
                category_counts(records, fields::LOYALTY_TIER),
                Vec::new(),
            ),
            DatasetName::Outreach => (
                vec![
                    FeatureStats::compute(records, fields::LEAD_SCORE),
                    FeatureStats::compute(records, fields::CLV_12M),
                    FeatureStats::compute(records, fields::CREDIT_RISK),
                ],
                None,
                category_counts(records, fields::SEGMENT),
                risk_value_pairs(records, fields::CREDIT_RISK, fields::CLV_12M),
            ),
            DatasetName::Churn => (
                vec![FeatureStats::compute(records, fields::CHURN_RISK)],
                Some(Histogram::compute(records, fields::CHURN_RISK, histogram_bins)),
                Vec::new(),
                Vec::new(),
            ),
        };

        debug!(
            dataset = %dataset,
            version,
            records = records.len(),
            "population snapshot recomputed"
        );

        Self {
            dataset,
            version,
            record_count: records.len(),
            features,
            histogram,
            categories,
            risk_value,
            computed_at: Utc::now(),
        }
    }

    /// Snapshot of a dataset that has never been loaded.
    pub fn empty(dataset: DatasetName, histogram_bins: usize) -> Self {
        Self::compute(dataset, 0, &[], histogram_bins)
    }

    pub fn feature(&self, field: &str) -> Option<&FeatureStats> {
        self.features.iter().find(|f| f.field == field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loyalty_snapshot_tracks_score_and_tiers() {
        let records = vec![
            CustomerRecord::from_pairs([
                ("customer_id", "C1"),
                ("predicted_loyalty_score", "4.0"),
                ("loyalty_tier", "Gold"),
            ]),
            CustomerRecord::from_pairs([
                ("customer_id", "C2"),
                ("predicted_loyalty_score", "2.0"),
                ("loyalty_tier", "Silver"),
            ]),
        ];

        let snap = PopulationSnapshot::compute(DatasetName::Loyalty, 1, &records, 10);
        let stats = snap.feature("predicted_loyalty_score").unwrap();
        assert_eq!(stats.mean, 3.0);
        assert_eq!(stats.range.min, 2.0);
        assert_eq!(stats.range.max, 4.0);
        assert!(snap.histogram.is_none());
        assert_eq!(snap.categories.len(), 2);
    }

    #[test]
    fn test_churn_snapshot_carries_histogram() {
        let records = vec![
            CustomerRecord::from_pairs([("customer_id", "C1"), ("churn_risk_predicted", "0.25")]),
            CustomerRecord::from_pairs([("customer_id", "C2"), ("churn_risk_predicted", "1.7")]),
        ];

        let snap = PopulationSnapshot::compute(DatasetName::Churn, 3, &records, 10);
        let hist = snap.histogram.as_ref().unwrap();
        // 1.7 is out of domain for the histogram but still feeds the
        // mean/range as-is.
        assert_eq!(hist.total(), 1);
        assert_eq!(snap.record_count, 2);
        assert_eq!(snap.version, 3);
    }

    #[test]
    fn test_empty_snapshot() {
        let snap = PopulationSnapshot::empty(DatasetName::Outreach, 10);
        assert_eq!(snap.record_count, 0);
        assert_eq!(snap.version, 0);
        let lead = snap.feature("LeadScore").unwrap();
        assert!(lead.range.is_degenerate());
        assert_eq!(lead.mean, 0.0);
    }
}
