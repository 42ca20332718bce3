use crate::domain::event::NormalizedChange;
use crate::domain::outcome::ActionOutcome;

/// Receives every per-repository outcome as soon as it is known.
pub trait OutcomeSink: Send + Sync {
    fn record(&self, change: &NormalizedChange, outcome: &ActionOutcome);
}
