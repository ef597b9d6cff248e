//! REST client for the signup service
//!
//! One method per endpoint. Mutating and identity-checking requests carry
//! the session token as a bearer credential; the activity listing is
//! public. Activity names and emails are user-supplied and URL-encoded
//! before they reach a path or query position.

mod types;

pub use types::{ActionReply, Activity, AuthCheck, ErrorReply, LoginReply, Roster};

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors surfaced by the API client
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never completed or the body was unreadable
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("{}", .detail.as_deref().unwrap_or("request rejected by server"))]
    Rejected { status: u16, detail: Option<String> },
}

impl ApiError {
    /// Server-provided error text, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { detail, .. } => detail.as_deref(),
            ApiError::Transport(_) => None,
        }
    }

    /// HTTP status of a rejection
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            ApiError::Transport(_) => None,
        }
    }

    /// True when the server rejected the bearer credential
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Rejected { status: 401, .. })
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// HTTP client bound to one service base URL
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_bearer(
        &self,
        request: reqwest::RequestBuilder,
        token: &str,
    ) -> reqwest::RequestBuilder {
        request.header("Authorization", format!("Bearer {}", token))
    }

    /// `GET /activities` - the full roster snapshot
    pub async fn activities(&self) -> ApiResult<Roster> {
        let response = self.http.get(self.url("/activities")).send().await?;
        read_json(response).await
    }

    /// `POST /login`
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<LoginReply> {
        let body = serde_json::json!({ "username": username, "password": password });
        let response = self.http.post(self.url("/login")).json(&body).send().await?;
        read_json(response).await
    }

    /// `POST /logout` - best-effort; callers decide what a failure means
    pub async fn logout(&self, token: &str) -> ApiResult<()> {
        let request = self.with_bearer(self.http.post(self.url("/logout")), token);
        let response = request.send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(rejection(response).await)
        }
    }

    /// `GET /check-auth` - validate the stored credential
    pub async fn check_auth(&self, token: &str) -> ApiResult<AuthCheck> {
        let request = self.with_bearer(self.http.get(self.url("/check-auth")), token);
        read_json(request.send().await?).await
    }

    /// `POST /activities/{name}/signup?email={email}`
    pub async fn signup(&self, token: &str, activity: &str, email: &str) -> ApiResult<ActionReply> {
        let path = action_path(activity, "signup", email);
        let request = self.with_bearer(self.http.post(self.url(&path)), token);
        read_json(request.send().await?).await
    }

    /// `DELETE /activities/{name}/unregister?email={email}`
    pub async fn unregister(
        &self,
        token: &str,
        activity: &str,
        email: &str,
    ) -> ApiResult<ActionReply> {
        let path = action_path(activity, "unregister", email);
        let request = self.with_bearer(self.http.delete(self.url(&path)), token);
        read_json(request.send().await?).await
    }
}

/// Build a mutation path, encoding the user-supplied pieces
fn action_path(activity: &str, verb: &str, email: &str) -> String {
    format!(
        "/activities/{}/{}?email={}",
        urlencoding::encode(activity),
        verb,
        urlencoding::encode(email)
    )
}

/// Decode a success body, or turn a non-success status into `Rejected`
/// with whatever detail the server attached.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
    if response.status().is_success() {
        Ok(response.json().await?)
    } else {
        Err(rejection(response).await)
    }
}

async fn rejection(response: reqwest::Response) -> ApiError {
    let status = response.status().as_u16();
    let detail = response
        .json::<ErrorReply>()
        .await
        .ok()
        .map(|reply| reply.detail);
    ApiError::Rejected { status, detail }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_path_encodes_reserved_characters() {
        let path = action_path("Chess Club", "signup", "kai+chess@mergington.edu");
        assert_eq!(
            path,
            "/activities/Chess%20Club/signup?email=kai%2Bchess%40mergington.edu"
        );
    }

    #[test]
    fn rejection_displays_server_detail() {
        let err = ApiError::Rejected {
            status: 404,
            detail: Some("Participant not found".to_string()),
        };
        assert_eq!(err.to_string(), "Participant not found");
        assert_eq!(err.status(), Some(404));
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn rejection_without_detail_uses_fallback_text() {
        let err = ApiError::Rejected {
            status: 500,
            detail: None,
        };
        assert_eq!(err.to_string(), "request rejected by server");
        assert_eq!(err.detail(), None);
    }

    #[test]
    fn unauthorized_is_detected_by_status() {
        let err = ApiError::Rejected {
            status: 401,
            detail: Some("Invalid or expired token".to_string()),
        };
        assert!(err.is_unauthorized());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let api = ApiClient::new("http://localhost:8000/");
        assert_eq!(api.base_url(), "http://localhost:8000");
    }
}
