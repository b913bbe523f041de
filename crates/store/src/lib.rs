//! Record store and customer resolution — three versioned dataset
//! collections, each with a prebuilt `customer_id` index for
//! constant-time lookup.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use pulse_core::types::fields;
use pulse_core::{CustomerRecord, DatasetName};

/// One loaded dataset: the raw records in arrival order plus an index
/// from `customer_id` to record position. Replaced wholesale on reload;
/// there is no incremental merge path.
#[derive(Debug, Clone)]
pub struct Dataset {
    name: DatasetName,
    records: Vec<CustomerRecord>,
    /// customer_id → position of the first record carrying that id.
    index: HashMap<String, usize>,
    version: u64,
    loaded_at: Option<DateTime<Utc>>,
}

impl Dataset {
    pub fn new(name: DatasetName) -> Self {
        Self {
            name,
            records: Vec::new(),
            index: HashMap::new(),
            version: 0,
            loaded_at: None,
        }
    }

    /// Replace the dataset contents atomically and rebuild the id index.
    /// When several records share an id, the first occurrence wins.
    pub fn replace(&mut self, records: Vec<CustomerRecord>) {
        let mut index = HashMap::with_capacity(records.len());
        for (pos, record) in records.iter().enumerate() {
            if let Some(id) = record.get(fields::CUSTOMER_ID) {
                index.entry(id.to_string()).or_insert(pos);
            }
        }

        self.records = records;
        self.index = index;
        self.version += 1;
        self.loaded_at = Some(Utc::now());

        info!(
            dataset = %self.name,
            records = self.records.len(),
            indexed = self.index.len(),
            version = self.version,
            "dataset replaced"
        );
    }

    /// First record whose `customer_id` equals `id` exactly
    /// (case-sensitive). Constant time via the prebuilt index.
    pub fn find(&self, id: &str) -> Option<&CustomerRecord> {
        self.index.get(id).map(|&pos| &self.records[pos])
    }

    pub fn name(&self) -> DatasetName {
        self.name
    }

    pub fn records(&self) -> &[CustomerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Monotonic load counter; 0 means never loaded. An unloaded
    /// dataset behaves exactly like an empty one.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }
}

/// The per-dataset matches for one identifier. Absence in a dataset is
/// not an error; absence in all three is what [`RecordStore::resolve`]
/// reports as no match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRecords {
    pub loyalty: Option<CustomerRecord>,
    pub outreach: Option<CustomerRecord>,
    pub churn: Option<CustomerRecord>,
}

impl ResolvedRecords {
    pub fn matched_any(&self) -> bool {
        self.loyalty.is_some() || self.outreach.is_some() || self.churn.is_some()
    }
}

/// Owns the three dataset collections. Single logical caller; the
/// engine wraps this in its own state lock.
#[derive(Debug)]
pub struct RecordStore {
    loyalty: Dataset,
    outreach: Dataset,
    churn: Dataset,
}

impl RecordStore {
    pub fn new() -> Self {
        Self {
            loyalty: Dataset::new(DatasetName::Loyalty),
            outreach: Dataset::new(DatasetName::Outreach),
            churn: Dataset::new(DatasetName::Churn),
        }
    }

    pub fn load(&mut self, name: DatasetName, records: Vec<CustomerRecord>) {
        self.dataset_mut(name).replace(records);
    }

    pub fn dataset(&self, name: DatasetName) -> &Dataset {
        match name {
            DatasetName::Loyalty => &self.loyalty,
            DatasetName::Outreach => &self.outreach,
            DatasetName::Churn => &self.churn,
        }
    }

    fn dataset_mut(&mut self, name: DatasetName) -> &mut Dataset {
        match name {
            DatasetName::Loyalty => &mut self.loyalty,
            DatasetName::Outreach => &mut self.outreach,
            DatasetName::Churn => &mut self.churn,
        }
    }

    /// Resolve an identifier against all three datasets. The id is
    /// trimmed of surrounding whitespace; matching is exact beyond that.
    pub fn resolve(&self, id: &str) -> ResolvedRecords {
        let id = id.trim();
        ResolvedRecords {
            loyalty: self.loyalty.find(id).cloned(),
            outreach: self.outreach.find(id).cloned(),
            churn: self.churn.find(id).cloned(),
        }
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, extra: (&str, &str)) -> CustomerRecord {
        CustomerRecord::from_pairs([("customer_id", id), extra])
    }

    #[test]
    fn test_replace_rebuilds_index_and_bumps_version() {
        let mut dataset = Dataset::new(DatasetName::Loyalty);
        assert_eq!(dataset.version(), 0);

        dataset.replace(vec![record("C001", ("predicted_loyalty_score", "4.0"))]);
        assert_eq!(dataset.version(), 1);
        assert!(dataset.find("C001").is_some());

        dataset.replace(vec![record("C002", ("predicted_loyalty_score", "2.0"))]);
        assert_eq!(dataset.version(), 2);
        // Wholesale replace: the old contents are gone, not merged.
        assert!(dataset.find("C001").is_none());
        assert!(dataset.find("C002").is_some());
    }

    #[test]
    fn test_first_occurrence_wins_on_duplicate_ids() {
        let mut dataset = Dataset::new(DatasetName::Outreach);
        dataset.replace(vec![
            record("C001", ("LeadScore", "10")),
            record("C001", ("LeadScore", "99")),
        ]);

        let found = dataset.find("C001").unwrap();
        assert_eq!(found.get("LeadScore"), Some("10"));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let mut dataset = Dataset::new(DatasetName::Churn);
        dataset.replace(vec![record("c001", ("churn_risk_predicted", "0.5"))]);

        assert!(dataset.find("c001").is_some());
        assert!(dataset.find("C001").is_none());
    }

    #[test]
    fn test_resolve_trims_identifier() {
        let mut store = RecordStore::new();
        store.load(
            DatasetName::Loyalty,
            vec![record("C007", ("predicted_loyalty_score", "3.0"))],
        );

        let resolved = store.resolve("  C007  ");
        assert!(resolved.loyalty.is_some());
        assert!(resolved.outreach.is_none());
        assert!(resolved.matched_any());
    }

    #[test]
    fn test_resolve_against_unloaded_datasets() {
        let store = RecordStore::new();
        let resolved = store.resolve("C001");
        assert!(!resolved.matched_any());
    }

    #[test]
    fn test_records_without_id_are_unindexed_but_kept() {
        let mut dataset = Dataset::new(DatasetName::Loyalty);
        dataset.replace(vec![
            CustomerRecord::from_pairs([("predicted_loyalty_score", "1.5")]),
            record("C010", ("predicted_loyalty_score", "4.5")),
        ]);

        // Both records count toward population statistics...
        assert_eq!(dataset.len(), 2);
        // ...but only the identified one resolves.
        assert!(dataset.find("C010").is_some());
    }
}
