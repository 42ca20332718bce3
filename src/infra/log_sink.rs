use tracing::{info, warn};

use crate::domain::event::NormalizedChange;
use crate::domain::outcome::ActionOutcome;
use crate::services::OutcomeSink;

/// Writes outcomes as structured `tracing` events.
pub struct TracingOutcomeSink;

impl OutcomeSink for TracingOutcomeSink {
    fn record(&self, change: &NormalizedChange, outcome: &ActionOutcome) {
        if outcome.succeeded {
            info!(
                issue_key = %change.issue_key,
                branch = %outcome.branch,
                repository = %outcome.repository,
                action = %outcome.action,
                http_status = outcome.http_status,
                "branch protection applied"
            );
        } else {
            warn!(
                issue_key = %change.issue_key,
                branch = %outcome.branch,
                repository = %outcome.repository,
                action = %outcome.action,
                http_status = outcome.http_status,
                error = outcome.error_detail.as_deref().unwrap_or_default(),
                "branch protection failed"
            );
        }
    }
}
