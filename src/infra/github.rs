use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client, RequestBuilder,
    header::{ACCEPT, AUTHORIZATION, USER_AGENT},
};

use crate::domain::protection::ProtectionSettings;
use crate::error::{AppError, AppResult};
use crate::services::{ApiResponse, BranchProtectionService};

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

pub struct GitHubClient {
    http: Client,
    base_url: String,
    token: Option<String>,
    user_agent: String,
}

impl GitHubClient {
    pub fn new(
        base_url: String,
        token: Option<String>,
        user_agent: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AppError::Configuration(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            http,
            base_url,
            token,
            user_agent,
        })
    }

    fn token(&self) -> AppResult<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| AppError::Configuration("GitHub token not configured".to_string()))
    }

    fn protection_endpoint(base_url: &str, repository: &str, branch: &str) -> String {
        format!(
            "{}/repos/{}/branches/{}/protection",
            base_url.trim_end_matches('/'),
            repository,
            branch
        )
    }

    fn authorized(&self, request: RequestBuilder) -> AppResult<RequestBuilder> {
        Ok(request
            .header(AUTHORIZATION, format!("Bearer {}", self.token()?))
            .header(ACCEPT, GITHUB_MEDIA_TYPE)
            .header(USER_AGENT, &self.user_agent))
    }

    async fn execute(request: RequestBuilder) -> AppResult<ApiResponse> {
        let response = request
            .send()
            .await
            .map_err(|err| AppError::Transport(format!("failed to call GitHub: {err}")))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|err| format!("<unable to read response: {err}>"));
        Ok(ApiResponse { status, body })
    }
}

#[async_trait]
impl BranchProtectionService for GitHubClient {
    fn ensure_configured(&self) -> AppResult<()> {
        self.token().map(|_| ())
    }

    async fn update_protection(
        &self,
        repository: &str,
        branch: &str,
        settings: &ProtectionSettings,
    ) -> AppResult<ApiResponse> {
        let url = Self::protection_endpoint(&self.base_url, repository, branch);
        let request = self.authorized(self.http.put(url))?.json(settings);
        Self::execute(request).await
    }

    async fn remove_protection(&self, repository: &str, branch: &str) -> AppResult<ApiResponse> {
        let url = Self::protection_endpoint(&self.base_url, repository, branch);
        let request = self.authorized(self.http.delete(url))?;
        Self::execute(request).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::Router;
    use axum::body::Bytes;
    use axum::extract::State;
    use axum::http::{HeaderMap, Method, StatusCode, Uri};

    use super::*;
    use crate::config::MissingProtectionPolicy;
    use crate::domain::action::Action;
    use crate::domain::outcome::TRANSPORT_FAILURE_STATUS;
    use crate::workflow::actuator;

    #[derive(Debug, Clone)]
    struct Captured {
        method: Method,
        path: String,
        authorization: Option<String>,
        accept: Option<String>,
        user_agent: Option<String>,
        body: Vec<u8>,
    }

    type Log = Arc<Mutex<Vec<Captured>>>;

    async fn record(
        State(log): State<Log>,
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: Bytes,
    ) -> StatusCode {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let status = if method == Method::DELETE {
            StatusCode::NO_CONTENT
        } else {
            StatusCode::OK
        };
        log.lock().unwrap().push(Captured {
            method,
            path: uri.path().to_string(),
            authorization: header("authorization"),
            accept: header("accept"),
            user_agent: header("user-agent"),
            body: body.to_vec(),
        });
        status
    }

    async fn spawn_fake_github() -> (String, Log) {
        let log: Log = Arc::default();
        let app = Router::new()
            .fallback(record)
            .with_state(log.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}"), log)
    }

    fn client(base_url: String, token: Option<&str>) -> GitHubClient {
        client_with_timeout(base_url, token, Duration::from_secs(5))
    }

    fn client_with_timeout(
        base_url: String,
        token: Option<&str>,
        timeout: Duration,
    ) -> GitHubClient {
        GitHubClient::new(
            base_url,
            token.map(str::to_string),
            "branch-lock-test".to_string(),
            timeout,
        )
        .unwrap()
    }

    /// Accepts connections and never answers.
    async fn spawn_stalled_host() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut open = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                open.push(socket);
            }
        });
        format!("http://{addr}")
    }

    #[test]
    fn builds_protection_endpoint() {
        assert_eq!(
            GitHubClient::protection_endpoint(
                "https://api.github.com/",
                "org/Backend",
                "feature/DEV-13"
            ),
            "https://api.github.com/repos/org/Backend/branches/feature/DEV-13/protection"
        );
    }

    #[test]
    fn missing_token_is_a_configuration_error() {
        let client = client("http://localhost".to_string(), None);
        assert!(matches!(
            client.ensure_configured(),
            Err(AppError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn sends_authorized_put_with_settings_body() {
        let (base_url, log) = spawn_fake_github().await;
        let client = client(base_url, Some("secret-token"));

        let response = client
            .update_protection("org/Backend", "bugfix/DEV-13", &ProtectionSettings::strict())
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        let captured = log.lock().unwrap()[0].clone();
        assert_eq!(captured.method, Method::PUT);
        assert_eq!(captured.path, "/repos/org/Backend/branches/bugfix/DEV-13/protection");
        assert_eq!(captured.authorization.as_deref(), Some("Bearer secret-token"));
        assert_eq!(captured.accept.as_deref(), Some(GITHUB_MEDIA_TYPE));
        assert_eq!(captured.user_agent.as_deref(), Some("branch-lock-test"));
        assert_eq!(
            captured.body,
            serde_json::to_vec(&ProtectionSettings::strict()).unwrap()
        );
    }

    #[tokio::test]
    async fn sends_delete_without_body() {
        let (base_url, log) = spawn_fake_github().await;
        let client = client(base_url, Some("secret-token"));

        let response = client
            .remove_protection("org/Backend", "feature/DEV-13")
            .await
            .unwrap();

        assert_eq!(response.status, 204);
        let captured = log.lock().unwrap()[0].clone();
        assert_eq!(captured.method, Method::DELETE);
        assert!(captured.body.is_empty());
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client(format!("http://{addr}"), Some("secret-token"));
        let err = client
            .remove_protection("org/Backend", "feature/DEV-13")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Transport(_)));
    }

    #[tokio::test]
    async fn stalled_host_times_out_as_transport_error() {
        let base_url = spawn_stalled_host().await;
        let client =
            client_with_timeout(base_url, Some("secret-token"), Duration::from_millis(300));

        let started = std::time::Instant::now();
        let err = client
            .update_protection("org/Backend", "feature/DEV-13", &ProtectionSettings::strict())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Transport(_)));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn timed_out_call_becomes_failed_outcome() {
        let base_url = spawn_stalled_host().await;
        let client =
            client_with_timeout(base_url, Some("secret-token"), Duration::from_millis(300));

        let outcome = actuator::apply(
            &client,
            "org/Backend",
            "feature/DEV-13",
            Action::ProtectStrict,
            MissingProtectionPolicy::Satisfied,
        )
        .await;

        assert!(!outcome.succeeded);
        assert_eq!(outcome.http_status, TRANSPORT_FAILURE_STATUS);
        assert!(outcome.error_detail.is_some());
    }
}
