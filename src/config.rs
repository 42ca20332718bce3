use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::domain::action::{Action, RuleSet};
use crate::error::{AppError, AppResult};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_USER_AGENT: &str = "bloqueo-webhook-jira";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const TOKEN_ENV: &str = "GITHUB_TOKEN";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub github_token: Option<String>,
    /// Fully qualified `owner/name` entries, in configured order.
    pub repositories: Vec<String>,
    pub rules: RuleSet,
    pub log_path: Option<PathBuf>,
    pub port: u16,
    pub request_timeout: Duration,
    pub api_base_url: String,
    pub user_agent: String,
    pub missing_protection: MissingProtectionPolicy,
}

/// How an unprotect answered with 404 (no protection to remove) is reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingProtectionPolicy {
    #[default]
    Satisfied,
    Failure,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    github_token: Option<String>,
    organization: Option<String>,
    #[serde(default)]
    repositories: Vec<String>,
    #[serde(default)]
    rules: BTreeMap<String, Action>,
    log_path: Option<PathBuf>,
    port: Option<u16>,
    request_timeout_secs: Option<u64>,
    api_base_url: Option<String>,
    user_agent: Option<String>,
    #[serde(default)]
    missing_protection: MissingProtectionPolicy,
}

impl AppConfig {
    /// Reads the JSON config file when given; `GITHUB_TOKEN` overrides the
    /// token either way.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let token_override = env::var(TOKEN_ENV).ok().filter(|t| !t.trim().is_empty());
        match path {
            Some(path) => {
                let contents = fs::read_to_string(path).map_err(|err| {
                    AppError::Configuration(format!(
                        "failed to read config file {}: {err}",
                        path.display()
                    ))
                })?;
                Self::from_json(&contents, token_override)
            }
            None => Self::from_file(ConfigFile::default(), token_override),
        }
    }

    pub fn from_json(contents: &str, token_override: Option<String>) -> AppResult<Self> {
        let file = serde_json::from_str::<ConfigFile>(contents)
            .map_err(|err| AppError::Configuration(format!("invalid config file: {err}")))?;
        Self::from_file(file, token_override)
    }

    fn from_file(file: ConfigFile, token_override: Option<String>) -> AppResult<Self> {
        let organization = file
            .organization
            .as_deref()
            .map(str::trim)
            .filter(|org| !org.is_empty());
        let repositories = file
            .repositories
            .iter()
            .map(|repo| qualify_repository(repo, organization))
            .collect::<AppResult<Vec<_>>>()?;

        let timeout_secs = file.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(AppError::Configuration(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            github_token: token_override
                .or(file.github_token)
                .filter(|t| !t.trim().is_empty()),
            repositories,
            rules: RuleSet::new(file.rules)?,
            log_path: file.log_path,
            port: file.port.unwrap_or(DEFAULT_PORT),
            request_timeout: Duration::from_secs(timeout_secs),
            api_base_url: file
                .api_base_url
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            user_agent: file
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            missing_protection: file.missing_protection,
        })
    }

    pub fn masked_token(&self) -> String {
        mask_secret(self.github_token.as_deref())
    }
}

fn qualify_repository(entry: &str, organization: Option<&str>) -> AppResult<String> {
    let entry = entry.trim();
    if entry.is_empty() {
        return Err(AppError::Configuration(
            "repository entries must not be empty".to_string(),
        ));
    }
    if let Some((owner, name)) = entry.split_once('/') {
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(AppError::Configuration(format!(
                "repository '{entry}' must be 'name' or 'owner/name'"
            )));
        }
        return Ok(entry.to_string());
    }
    match organization {
        Some(org) => Ok(format!("{org}/{entry}")),
        None => Err(AppError::Configuration(format!(
            "repository '{entry}' has no owner and no organization is configured"
        ))),
    }
}

fn mask_secret(value: Option<&str>) -> String {
    match value {
        Some(token) if token.chars().count() > 6 => {
            let prefix: String = token.chars().take(3).collect();
            let suffix: String = token.chars().skip(token.chars().count() - 3).collect();
            format!("{prefix}***{suffix}")
        }
        Some(token) if !token.is_empty() => "***".to_string(),
        _ => "<not set>".to_string(),
    }
}
