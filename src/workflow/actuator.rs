use crate::config::MissingProtectionPolicy;
use crate::domain::action::Action;
use crate::domain::outcome::{ActionOutcome, TRANSPORT_FAILURE_STATUS};
use crate::domain::protection::ProtectionSettings;
use crate::error::AppResult;
use crate::services::{ApiResponse, BranchProtectionService};

const PROTECTED_STATUS: u16 = 200;
const UNPROTECTED_STATUS: u16 = 204;
const NOT_FOUND_STATUS: u16 = 404;

/// Applies `action` to one branch of one repository.
///
/// Never fails: transport errors and unexpected statuses are folded into
/// the returned outcome.
pub async fn apply(
    service: &dyn BranchProtectionService,
    repository: &str,
    branch: &str,
    action: Action,
    missing_protection: MissingProtectionPolicy,
) -> ActionOutcome {
    let response = match action {
        Action::None => return ActionOutcome::success(repository, branch, action, 0),
        Action::ProtectStrict => {
            service
                .update_protection(repository, branch, &ProtectionSettings::strict())
                .await
        }
        Action::ProtectRelaxed => {
            service
                .update_protection(repository, branch, &ProtectionSettings::relaxed())
                .await
        }
        Action::Unprotect => service.remove_protection(repository, branch).await,
    };
    into_outcome(response, repository, branch, action, missing_protection)
}

fn into_outcome(
    response: AppResult<ApiResponse>,
    repository: &str,
    branch: &str,
    action: Action,
    missing_protection: MissingProtectionPolicy,
) -> ActionOutcome {
    let response = match response {
        Ok(response) => response,
        Err(err) => {
            return ActionOutcome::failure(
                repository,
                branch,
                action,
                TRANSPORT_FAILURE_STATUS,
                err.to_string(),
            );
        }
    };

    let expected = match action {
        Action::Unprotect => UNPROTECTED_STATUS,
        _ => PROTECTED_STATUS,
    };
    let already_unprotected = action == Action::Unprotect
        && response.status == NOT_FOUND_STATUS
        && missing_protection == MissingProtectionPolicy::Satisfied;

    if response.status == expected || already_unprotected {
        ActionOutcome::success(repository, branch, action, response.status)
    } else {
        let detail = if response.body.trim().is_empty() {
            format!("unexpected status {}", response.status)
        } else {
            response.body
        };
        ActionOutcome::failure(repository, branch, action, response.status, detail)
    }
}
