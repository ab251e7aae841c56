use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;

const API_PREFIX: &str = "api/1.0";

/// Bearer token returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiSession {
    pub access_token: String,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// A user as the REST API reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiUser {
    pub name: String,
    pub username: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub email_notifications: bool,
}

/// Blocking client of the console's REST API.
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    /// `base_url` is the server root, e.g. `http://console.example.com`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}/{}", self.base_url, API_PREFIX, path.trim_start_matches('/'))
    }

    pub fn login(&self, username: &str, password: &str) -> Result<ApiSession, ApiError> {
        let url = self.url("login");
        tracing::debug!(%url, username, "api login");
        let response = self.send(&url, self.client.post(&url).json(&LoginRequest { username, password }))?;
        let response = check_status(&url, response)?;
        response
            .json()
            .map_err(|e| ApiError::Decode { url, source: e })
    }

    /// Look a user up by login name. `None` when the API answers 404.
    pub fn get_user(&self, session: &ApiSession, username: &str) -> Result<Option<ApiUser>, ApiError> {
        let url = self.url(&format!("users/{}", username));
        let response = self.send(&url, self.authorized(self.client.get(&url), session))?;
        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!(username, "api user not found");
            return Ok(None);
        }
        let response = check_status(&url, response)?;
        response
            .json()
            .map(Some)
            .map_err(|e| ApiError::Decode { url, source: e })
    }

    pub fn logout(&self, session: &ApiSession) -> Result<(), ApiError> {
        let url = self.url("logout");
        let response = self.send(&url, self.authorized(self.client.delete(&url), session))?;
        check_status(&url, response)?;
        Ok(())
    }

    fn authorized(&self, request: RequestBuilder, session: &ApiSession) -> RequestBuilder {
        request.bearer_auth(&session.access_token)
    }

    fn send(&self, url: &str, request: RequestBuilder) -> Result<Response, ApiError> {
        request.send().map_err(|e| ApiError::Request {
            url: url.to_string(),
            source: e,
        })
    }
}

fn check_status(url: &str, response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(ApiError::Status {
        url: url.to_string(),
        status: status.as_u16(),
        body,
    })
}
