//! Intervention tiers and the workflow-dispatch seam.

pub mod dispatch;
pub mod tier;

pub use dispatch::{log_outcome, DispatchRequest, LoggingDispatcher, WorkflowDispatch};
pub use tier::{ActionName, ActionTier, TierRecommendation, TierSelector};
