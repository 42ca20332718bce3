use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    ProtectStrict,
    ProtectRelaxed,
    Unprotect,
    None,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::ProtectStrict => "protect-strict",
            Action::ProtectRelaxed => "protect-relaxed",
            Action::Unprotect => "unprotect",
            Action::None => "none",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status-to-action mapping, keyed by the lowercased status name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: HashMap<String, Action>,
}

impl RuleSet {
    pub fn new<I, S>(rules: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = (S, Action)>,
        S: AsRef<str>,
    {
        let mut normalized = HashMap::new();
        for (status, action) in rules {
            let status = status.as_ref().trim();
            if status.is_empty() {
                return Err(AppError::Configuration(
                    "rule status must not be empty".to_string(),
                ));
            }
            if normalized.insert(normalize(status), action).is_some() {
                return Err(AppError::Configuration(format!(
                    "status '{status}' is configured more than once"
                )));
            }
        }
        Ok(Self { rules: normalized })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn decide(&self, status: &str) -> Action {
        self.rules
            .get(&normalize(status))
            .copied()
            .unwrap_or(Action::None)
    }
}

fn normalize(status: &str) -> String {
    status.trim().to_lowercase()
}
