use async_trait::async_trait;

use crate::domain::protection::ProtectionSettings;
use crate::error::AppResult;

/// Status and raw body of a hosting API reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

/// Branch-protection endpoints of the source-control host.
///
/// `Err` is reserved for requests that never got a response (timeout, DNS,
/// TLS); any HTTP status, including failures, comes back as `Ok`.
#[async_trait]
pub trait BranchProtectionService: Send + Sync {
    /// Fails when credentials are missing, before any request is attempted.
    fn ensure_configured(&self) -> AppResult<()>;

    async fn update_protection(
        &self,
        repository: &str,
        branch: &str,
        settings: &ProtectionSettings,
    ) -> AppResult<ApiResponse>;

    async fn remove_protection(&self, repository: &str, branch: &str) -> AppResult<ApiResponse>;
}
