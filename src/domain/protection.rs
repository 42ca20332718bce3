use serde::Serialize;

/// Body of `PUT /repos/{owner}/{repo}/branches/{branch}/protection`.
///
/// `Option` fields serialize as `null`; the API requires every key to be
/// present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProtectionSettings {
    pub required_status_checks: Option<RequiredStatusChecks>,
    pub enforce_admins: bool,
    pub required_pull_request_reviews: Option<RequiredReviews>,
    pub restrictions: Option<Restrictions>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequiredStatusChecks {
    pub strict: bool,
    pub contexts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequiredReviews {
    pub dismiss_stale_reviews: bool,
    pub require_code_owner_reviews: bool,
    pub required_approving_review_count: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Restrictions {
    pub users: Vec<String>,
    pub teams: Vec<String>,
}

impl ProtectionSettings {
    pub fn strict() -> Self {
        Self {
            required_status_checks: Some(RequiredStatusChecks {
                strict: true,
                contexts: Vec::new(),
            }),
            enforce_admins: true,
            required_pull_request_reviews: Some(RequiredReviews {
                dismiss_stale_reviews: true,
                require_code_owner_reviews: true,
                required_approving_review_count: 1,
            }),
            restrictions: None,
        }
    }

    pub fn relaxed() -> Self {
        Self {
            required_status_checks: None,
            enforce_admins: false,
            required_pull_request_reviews: None,
            restrictions: Some(Restrictions {
                users: Vec::new(),
                teams: Vec::new(),
            }),
        }
    }
}
