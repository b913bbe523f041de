//! The analytics engine facade — owns the record store, the per-dataset
//! statistics snapshots, and the configured centroids, and answers the
//! four external operations: load, stats, lookup, tier.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use pulse_actions::{TierRecommendation, TierSelector};
use pulse_core::config::{ScoringConfig, TierConfig};
use pulse_core::types::fields;
use pulse_core::{AppConfig, CustomerRecord, DatasetName};
use pulse_scoring::{
    composite_score, ClusterAssignment, ClusterClassifier, RawFeatures, ScoreBreakdown,
};
use pulse_stats::{PopulationRange, PopulationSnapshot};
use pulse_store::{RecordStore, ResolvedRecords};

/// Per-lookup derived result. Ephemeral: created fresh per request,
/// never persisted, and deliberately free of timestamps so repeated
/// lookups over unchanged datasets are bit-identical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub customer_id: String,
    pub records: ResolvedRecords,
    pub score: ScoreBreakdown,
    pub cluster: Option<ClusterAssignment>,
    pub recommendation: TierRecommendation,
}

/// Outcome of a customer lookup. `NotFound` is a distinguished result,
/// not an error: it means no dataset had a matching record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LookupOutcome {
    Profile(Box<CustomerProfile>),
    NotFound,
}

/// Everything replaced atomically by a dataset load: the records and
/// the statistics derived from them. Guarded by one lock so a lookup
/// never observes a new dataset with stale ranges.
struct EngineState {
    store: RecordStore,
    snapshots: HashMap<DatasetName, PopulationSnapshot>,
}

pub struct AnalyticsEngine {
    state: RwLock<EngineState>,
    classifier: ClusterClassifier,
    selector: TierSelector,
    histogram_bins: usize,
}

impl AnalyticsEngine {
    pub fn new(scoring: &ScoringConfig, tiers: &TierConfig) -> Self {
        let histogram_bins = scoring.histogram_bins;
        let snapshots = DatasetName::ALL
            .into_iter()
            .map(|name| (name, PopulationSnapshot::empty(name, histogram_bins)))
            .collect();

        info!(
            centroids = scoring.centroids.len(),
            histogram_bins,
            "analytics engine initialized"
        );

        Self {
            state: RwLock::new(EngineState {
                store: RecordStore::new(),
                snapshots,
            }),
            classifier: ClusterClassifier::new(scoring.centroids.clone()),
            selector: TierSelector::new(tiers),
            histogram_bins,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.scoring, &config.tiers)
    }

    /// Replace the named dataset wholesale and recompute its statistics
    /// snapshot synchronously. No incremental merge path exists.
    pub fn load_dataset(&self, name: DatasetName, records: Vec<CustomerRecord>) {
        let mut state = self.state.write();
        state.store.load(name, records);

        let dataset = state.store.dataset(name);
        let snapshot = PopulationSnapshot::compute(
            name,
            dataset.version(),
            dataset.records(),
            self.histogram_bins,
        );
        state.snapshots.insert(name, snapshot);

        metrics::counter!("engine.dataset_loads", "dataset" => name.as_str()).increment(1);
    }

    /// Read-only snapshot of the named dataset's current statistics.
    /// For a never-loaded dataset this is the empty snapshot.
    pub fn population_stats(&self, name: DatasetName) -> PopulationSnapshot {
        let state = self.state.read();
        state.snapshots[&name].clone()
    }

    /// Resolve an identifier across the three datasets, then score and
    /// classify. Never fails: partial matches degrade to zeroed
    /// features and a total miss is reported as `NotFound`.
    pub fn lookup_customer(&self, id: &str) -> LookupOutcome {
        let state = self.state.read();
        let trimmed = id.trim();
        let records = state.store.resolve(trimmed);

        if !records.matched_any() {
            metrics::counter!("engine.lookups", "result" => "not_found").increment(1);
            debug!(customer_id = trimmed, "no dataset matched identifier");
            return LookupOutcome::NotFound;
        }

        let raw = RawFeatures::extract(
            records.loyalty.as_ref(),
            records.outreach.as_ref(),
            records.churn.as_ref(),
        );
        let loyalty_range = feature_range(&state, DatasetName::Loyalty, fields::LOYALTY_SCORE);
        let lead_range = feature_range(&state, DatasetName::Outreach, fields::LEAD_SCORE);

        let score = composite_score(raw, loyalty_range, lead_range);
        let cluster = self.classifier.classify(score.normalized.as_array());
        let recommendation = self.selector.recommend(score.health_score);

        metrics::counter!("engine.lookups", "result" => "profile").increment(1);
        debug!(
            customer_id = trimmed,
            health_score = score.health_score,
            tier = %recommendation.tier,
            "customer profile derived"
        );

        LookupOutcome::Profile(Box::new(CustomerProfile {
            customer_id: trimmed.to_string(),
            records,
            score,
            cluster,
            recommendation,
        }))
    }

    /// Tier and static action pair for a health score.
    pub fn action_tier(&self, health_score: f64) -> TierRecommendation {
        self.selector.recommend(health_score)
    }
}

fn feature_range(state: &EngineState, dataset: DatasetName, field: &str) -> PopulationRange {
    state.snapshots[&dataset]
        .feature(field)
        .map(|f| f.range)
        .unwrap_or_else(PopulationRange::degenerate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_actions::ActionTier;
    use pulse_core::Centroid;

    fn engine() -> AnalyticsEngine {
        AnalyticsEngine::new(&ScoringConfig::default(), &TierConfig::default())
    }

    fn engine_with_centroids(centroids: Vec<Centroid>) -> AnalyticsEngine {
        let scoring = ScoringConfig {
            centroids,
            ..ScoringConfig::default()
        };
        AnalyticsEngine::new(&scoring, &TierConfig::default())
    }

    fn loyalty_record(id: &str, score: &str) -> CustomerRecord {
        CustomerRecord::from_pairs([("customer_id", id), ("predicted_loyalty_score", score)])
    }

    fn outreach_record(id: &str, lead: &str) -> CustomerRecord {
        CustomerRecord::from_pairs([("customer_id", id), ("LeadScore", lead)])
    }

    fn churn_record(id: &str, risk: &str) -> CustomerRecord {
        CustomerRecord::from_pairs([("customer_id", id), ("churn_risk_predicted", risk)])
    }

    #[test]
    fn test_end_to_end_known_ranges() {
        let engine = engine();
        engine.load_dataset(
            DatasetName::Loyalty,
            vec![
                loyalty_record("C1", "10"),
                loyalty_record("C2", "50"),
                loyalty_record("C3", "90"),
            ],
        );
        engine.load_dataset(
            DatasetName::Outreach,
            vec![
                outreach_record("C1", "5"),
                outreach_record("C2", "45"),
                outreach_record("C3", "85"),
            ],
        );
        engine.load_dataset(DatasetName::Churn, vec![churn_record("C2", "0.2")]);

        let profile = match engine.lookup_customer("C2") {
            LookupOutcome::Profile(p) => p,
            LookupOutcome::NotFound => panic!("expected a profile"),
        };

        assert_eq!(profile.score.health_score, 60.0);
        assert_eq!(profile.recommendation.tier, ActionTier::Neutral);
    }

    #[test]
    fn test_lookup_not_found() {
        let engine = engine();
        engine.load_dataset(DatasetName::Loyalty, vec![loyalty_record("C1", "10")]);

        assert_eq!(engine.lookup_customer("missing"), LookupOutcome::NotFound);
    }

    #[test]
    fn test_partial_match_is_not_not_found() {
        let engine = engine();
        engine.load_dataset(
            DatasetName::Outreach,
            vec![outreach_record("C9", "40"), outreach_record("C8", "20")],
        );

        let profile = match engine.lookup_customer("C9") {
            LookupOutcome::Profile(p) => p,
            LookupOutcome::NotFound => panic!("outreach-only match must produce a profile"),
        };

        // Loyalty and churn contribute zeros, not errors.
        assert_eq!(profile.score.raw.loyalty_score, 0.0);
        assert_eq!(profile.score.raw.churn_risk, 0.0);
        assert!(profile.records.loyalty.is_none());
    }

    #[test]
    fn test_lookup_is_idempotent() {
        let engine = engine();
        engine.load_dataset(
            DatasetName::Loyalty,
            vec![loyalty_record("C1", "10"), loyalty_record("C2", "90")],
        );
        engine.load_dataset(DatasetName::Churn, vec![churn_record("C1", "0.4")]);

        let first = engine.lookup_customer("C1");
        let second = engine.lookup_customer("C1");
        assert_eq!(first, second);
    }

    #[test]
    fn test_unloaded_datasets_behave_as_empty() {
        let engine = engine();
        let stats = engine.population_stats(DatasetName::Churn);
        assert_eq!(stats.record_count, 0);
        assert_eq!(stats.version, 0);

        // Lookups before any load are simply NotFound.
        assert_eq!(engine.lookup_customer("C1"), LookupOutcome::NotFound);
    }

    #[test]
    fn test_reload_recomputes_stats() {
        let engine = engine();
        engine.load_dataset(
            DatasetName::Loyalty,
            vec![loyalty_record("C1", "10"), loyalty_record("C2", "30")],
        );

        let before = engine.population_stats(DatasetName::Loyalty);
        assert_eq!(before.feature("predicted_loyalty_score").unwrap().mean, 20.0);
        assert_eq!(before.version, 1);

        engine.load_dataset(DatasetName::Loyalty, vec![loyalty_record("C3", "80")]);

        let after = engine.population_stats(DatasetName::Loyalty);
        assert_eq!(after.feature("predicted_loyalty_score").unwrap().mean, 80.0);
        assert_eq!(after.version, 2);
        assert_eq!(after.record_count, 1);
    }

    #[test]
    fn test_cluster_assignment_through_lookup() {
        let engine = engine_with_centroids(vec![
            Centroid {
                label: "disengaged".to_string(),
                coords: [0.0, 0.0, 0.0],
            },
            Centroid {
                label: "engaged".to_string(),
                coords: [1.0, 1.0, 1.0],
            },
        ]);
        engine.load_dataset(
            DatasetName::Loyalty,
            vec![loyalty_record("C1", "0"), loyalty_record("C2", "100")],
        );
        engine.load_dataset(DatasetName::Churn, vec![churn_record("C2", "0.1")]);

        let profile = match engine.lookup_customer("C2") {
            LookupOutcome::Profile(p) => p,
            LookupOutcome::NotFound => panic!("expected a profile"),
        };

        let cluster = profile.cluster.expect("centroids are configured");
        assert_eq!(cluster.label, "engaged");
    }

    #[test]
    fn test_no_centroids_means_no_assignment() {
        let engine = engine();
        engine.load_dataset(DatasetName::Loyalty, vec![loyalty_record("C1", "42")]);

        let profile = match engine.lookup_customer("C1") {
            LookupOutcome::Profile(p) => p,
            LookupOutcome::NotFound => panic!("expected a profile"),
        };
        assert!(profile.cluster.is_none());
    }

    #[test]
    fn test_action_tier_boundaries() {
        let engine = engine();
        assert_eq!(engine.action_tier(33.0).tier, ActionTier::AtRisk);
        assert_eq!(engine.action_tier(33.1).tier, ActionTier::Neutral);
        assert_eq!(engine.action_tier(66.0).tier, ActionTier::Neutral);
        assert_eq!(engine.action_tier(66.1).tier, ActionTier::Healthy);
    }
}
