//! Population statistics — per-feature means and ranges, the churn-risk
//! distribution, and categorical breakdowns, recomputed in full whenever
//! the owning dataset is replaced.

pub mod histogram;
pub mod population;
pub mod snapshot;

pub use histogram::{Histogram, HistogramBin};
pub use population::{mean, range, CategoryCount, FeatureStats, PopulationRange, RiskValuePoint};
pub use snapshot::PopulationSnapshot;
