use serde::Serialize;
use tracing::info;

use crate::context::AppContext;
use crate::domain::action::Action;
use crate::domain::event::NormalizedChange;
use crate::domain::outcome::ActionOutcome;
use crate::error::AppResult;
use crate::workflow::actuator;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventReport {
    pub issue_key: String,
    pub branch: String,
    pub new_status: String,
    pub action: Action,
    pub outcomes: Vec<ActionOutcome>,
}

impl EventReport {
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.succeeded).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// The new status has no configured rule.
    NoMatchingRule { issue_key: String, status: String },
    Applied(EventReport),
}

/// Applies the rule for `change.new_status` to every configured repository.
///
/// Only a fault detected before the first repository call is returned as
/// `Err`; per-repository failures are reported inside the `EventReport`.
pub async fn process_change(
    ctx: &AppContext,
    change: NormalizedChange,
) -> AppResult<ChangeOutcome> {
    let action = ctx.config.rules.decide(&change.new_status);
    if action == Action::None {
        return Ok(ChangeOutcome::NoMatchingRule {
            issue_key: change.issue_key,
            status: change.new_status,
        });
    }

    ctx.branch_protection.ensure_configured()?;

    info!(
        issue_key = %change.issue_key,
        branch = %change.branch,
        status = %change.new_status,
        action = %action,
        repositories = ctx.config.repositories.len(),
        "applying branch protection"
    );

    let mut outcomes = Vec::with_capacity(ctx.config.repositories.len());
    for repository in &ctx.config.repositories {
        let outcome = actuator::apply(
            ctx.branch_protection.as_ref(),
            repository,
            change.branch.as_str(),
            action,
            ctx.config.missing_protection,
        )
        .await;
        ctx.outcome_sink.record(&change, &outcome);
        outcomes.push(outcome);
    }

    Ok(ChangeOutcome::Applied(EventReport {
        issue_key: change.issue_key,
        branch: change.branch.0,
        new_status: change.new_status,
        action,
        outcomes,
    }))
}
