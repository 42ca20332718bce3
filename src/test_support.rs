//! Fakes for the service traits.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::event::NormalizedChange;
use crate::domain::outcome::ActionOutcome;
use crate::domain::protection::ProtectionSettings;
use crate::error::{AppError, AppResult};
use crate::services::{ApiResponse, BranchProtectionService, OutcomeSink};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Update {
        repository: String,
        branch: String,
        body: Vec<u8>,
    },
    Remove {
        repository: String,
        branch: String,
    },
}

#[derive(Debug, Clone)]
enum Scripted {
    Respond(ApiResponse),
    Transport(String),
}

/// Answers per repository with a scripted reply; unscripted repositories get 500.
pub struct FakeBranchProtection {
    configured: bool,
    replies: HashMap<String, Scripted>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeBranchProtection {
    pub fn new() -> Self {
        Self {
            configured: true,
            replies: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    pub fn respond(mut self, repository: &str, status: u16, body: &str) -> Self {
        self.replies.insert(
            repository.to_string(),
            Scripted::Respond(ApiResponse {
                status,
                body: body.to_string(),
            }),
        );
        self
    }

    pub fn fail_transport(mut self, repository: &str, message: &str) -> Self {
        self.replies.insert(
            repository.to_string(),
            Scripted::Transport(message.to_string()),
        );
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn reply(&self, repository: &str, call: RecordedCall) -> AppResult<ApiResponse> {
        self.calls.lock().unwrap().push(call);
        match self.replies.get(repository) {
            Some(Scripted::Respond(response)) => Ok(response.clone()),
            Some(Scripted::Transport(message)) => Err(AppError::Transport(message.clone())),
            None => Ok(ApiResponse {
                status: 500,
                body: "unscripted repository".to_string(),
            }),
        }
    }
}

#[async_trait]
impl BranchProtectionService for FakeBranchProtection {
    fn ensure_configured(&self) -> AppResult<()> {
        if self.configured {
            Ok(())
        } else {
            Err(AppError::Configuration(
                "GitHub token not configured".to_string(),
            ))
        }
    }

    async fn update_protection(
        &self,
        repository: &str,
        branch: &str,
        settings: &ProtectionSettings,
    ) -> AppResult<ApiResponse> {
        let body = serde_json::to_vec(settings).unwrap();
        self.reply(
            repository,
            RecordedCall::Update {
                repository: repository.to_string(),
                branch: branch.to_string(),
                body,
            },
        )
    }

    async fn remove_protection(&self, repository: &str, branch: &str) -> AppResult<ApiResponse> {
        self.reply(
            repository,
            RecordedCall::Remove {
                repository: repository.to_string(),
                branch: branch.to_string(),
            },
        )
    }
}

#[derive(Default)]
pub struct RecordingSink {
    records: Mutex<Vec<(String, ActionOutcome)>>,
}

impl RecordingSink {
    pub fn records(&self) -> Vec<(String, ActionOutcome)> {
        self.records.lock().unwrap().clone()
    }
}

impl OutcomeSink for RecordingSink {
    fn record(&self, change: &NormalizedChange, outcome: &ActionOutcome) {
        self.records
            .lock()
            .unwrap()
            .push((change.issue_key.clone(), outcome.clone()));
    }
}
