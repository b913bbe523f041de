//! Fire-and-forget handoff to the downstream retention workflow.
//!
//! The engine only decides which actions apply; whatever sits behind
//! this trait owns delivery, retries, and timeouts. Success or failure
//! comes back as a bare boolean and is otherwise only logged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::tier::ActionName;

/// One action to run for one customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchRequest {
    pub id: Uuid,
    pub action: ActionName,
    pub customer_id: String,
    pub requested_at: DateTime<Utc>,
}

impl DispatchRequest {
    pub fn new(action: ActionName, customer_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            action,
            customer_id: customer_id.into(),
            requested_at: Utc::now(),
        }
    }
}

/// Workflow collaborator seam. Implementations must not block the
/// caller on downstream completion.
pub trait WorkflowDispatch: Send + Sync {
    fn dispatch(&self, request: &DispatchRequest) -> bool;
}

/// Default collaborator: records the handoff in the log and reports
/// success. Stands in for the external workflow system.
#[derive(Debug, Default)]
pub struct LoggingDispatcher;

impl WorkflowDispatch for LoggingDispatcher {
    fn dispatch(&self, request: &DispatchRequest) -> bool {
        metrics::counter!(
            "workflow.dispatched",
            "action" => request.action.as_str()
        )
        .increment(1);

        info!(
            request_id = %request.id,
            action = %request.action,
            customer_id = %request.customer_id,
            "workflow action dispatched"
        );
        true
    }
}

/// Log a dispatch outcome. The engine never retries; a failure is
/// visible only here.
pub fn log_outcome(request: &DispatchRequest, accepted: bool) {
    if accepted {
        info!(request_id = %request.id, action = %request.action, "dispatch accepted");
    } else {
        warn!(request_id = %request.id, action = %request.action, "dispatch rejected");
    }
}
