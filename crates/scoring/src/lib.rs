//! Composite health scoring and nearest-centroid segment classification.

pub mod cluster;
pub mod composite;

pub use cluster::{ClusterAssignment, ClusterClassifier};
pub use composite::{composite_score, NormalizedFeatures, RawFeatures, ScoreBreakdown};
