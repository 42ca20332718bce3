use serde::Serialize;

use crate::domain::action::Action;

/// Status recorded when the request never produced an HTTP response.
pub const TRANSPORT_FAILURE_STATUS: u16 = 0;

/// Result of applying one action to one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionOutcome {
    pub repository: String,
    pub branch: String,
    pub action: Action,
    pub succeeded: bool,
    pub http_status: u16,
    pub error_detail: Option<String>,
}

impl ActionOutcome {
    pub fn success(repository: &str, branch: &str, action: Action, http_status: u16) -> Self {
        Self {
            repository: repository.to_string(),
            branch: branch.to_string(),
            action,
            succeeded: true,
            http_status,
            error_detail: None,
        }
    }

    pub fn failure(
        repository: &str,
        branch: &str,
        action: Action,
        http_status: u16,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            repository: repository.to_string(),
            branch: branch.to_string(),
            action,
            succeeded: false,
            http_status,
            error_detail: Some(detail.into()),
        }
    }
}
