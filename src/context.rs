use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{BranchProtectionService, OutcomeSink};

#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub branch_protection: Arc<dyn BranchProtectionService>,
    pub outcome_sink: Arc<dyn OutcomeSink>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        branch_protection: Arc<dyn BranchProtectionService>,
        outcome_sink: Arc<dyn OutcomeSink>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            branch_protection,
            outcome_sink,
        }
    }
}
