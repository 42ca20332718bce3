use serde::Deserialize;
use serde_json::Value;

use crate::domain::branch::BranchName;
use crate::error::InterpretError;

/// Issue-update event as delivered by the tracker webhook.
///
/// Every field is optional so that absence can be reported precisely
/// instead of surfacing as a generic deserialization failure.
#[derive(Debug, Deserialize)]
pub struct IssueEvent {
    pub issue: Option<Issue>,
    pub changelog: Option<Changelog>,
}

#[derive(Debug, Deserialize)]
pub struct Issue {
    pub key: Option<String>,
    pub fields: Option<IssueFields>,
}

#[derive(Debug, Deserialize)]
pub struct IssueFields {
    pub status: Option<IssueStatus>,
    pub summary: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IssueStatus {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Changelog {
    pub items: Option<Vec<ChangelogItem>>,
}

#[derive(Debug, Deserialize)]
pub struct ChangelogItem {
    pub field: Option<String>,
    #[serde(rename = "toString")]
    pub to_string: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedChange {
    pub issue_key: String,
    pub branch: BranchName,
    pub new_status: String,
}

/// Result of reading a well-formed event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interpretation {
    Change(NormalizedChange),
    /// The event carries no status transition.
    NoStatusChange { issue_key: String },
}

/// Parses a raw request body, then interprets it.
pub fn interpret_bytes(body: &[u8]) -> Result<Interpretation, InterpretError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(InterpretError::EmptyPayload);
    }
    let value: Value =
        serde_json::from_slice(body).map_err(|err| InterpretError::InvalidJson(err.to_string()))?;
    interpret(value)
}

pub fn interpret(payload: Value) -> Result<Interpretation, InterpretError> {
    if !payload.is_object() {
        return Err(InterpretError::MalformedPayload("issue"));
    }
    let event: IssueEvent = serde_json::from_value(payload)
        .map_err(|err| InterpretError::UnexpectedShape(err.to_string()))?;

    let issue = event
        .issue
        .ok_or(InterpretError::MalformedPayload("issue"))?;
    let changelog = event
        .changelog
        .ok_or(InterpretError::MalformedPayload("changelog"))?;

    let issue_key = non_empty(issue.key.map(|key| key.trim().to_string()))
        .ok_or(InterpretError::MissingField("issue.key"))?;
    let fields = issue
        .fields
        .ok_or(InterpretError::MissingField("issue.fields"))?;
    let status_name = fields
        .status
        .and_then(|status| non_empty(status.name))
        .ok_or(InterpretError::MissingField("issue.fields.status.name"))?;

    // Only the first status item counts if the tracker ever sends several.
    let Some(item) = changelog
        .items
        .unwrap_or_default()
        .into_iter()
        .find(|item| item.field.as_deref() == Some("status"))
    else {
        return Ok(Interpretation::NoStatusChange { issue_key });
    };

    let summary = fields
        .summary
        .ok_or(InterpretError::MissingField("issue.fields.summary"))?;
    let new_status = non_empty(item.to_string)
        .or_else(|| non_empty(item.to))
        .unwrap_or(status_name);

    Ok(Interpretation::Change(NormalizedChange {
        branch: BranchName::for_issue(&issue_key, &summary),
        issue_key,
        new_status,
    }))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
