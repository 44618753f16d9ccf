//! HTTP client for the remote notes service.
//!
//! This module wraps the six REST endpoints the client uses:
//! - `register` / `login`: exchange credentials for a session token
//! - `list_notes` / `create_note` / `update_note` / `delete_note`
//!
//! Error policy: any non-2xx response or transport failure maps to a
//! single error carrying the server-supplied `message` when one parses.
//! Requests are never retried; a 401 on a note operation surfaces like
//! any other failure and does not force a logout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Note, local_fallback_id};
use crate::{Error, Result};

/// Default base URL of the notes service.
pub const DEFAULT_API_BASE: &str = "https://note-api-osvu.onrender.com/api";

/// User-Agent header sent with every request.
const USER_AGENT: &str = concat!("jot/", env!("CARGO_PKG_VERSION"));

/// Registration request body.
#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    email: &'a str,
    password: &'a str,
    name: &'a str,
}

/// Login request body.
#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Response from the auth endpoints. The token field is optional so a
/// malformed success response can be rejected explicitly instead of
/// failing deserialization with an opaque message.
#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(default)]
    token: Option<String>,
}

/// Note create/update request body.
#[derive(Debug, Serialize)]
struct NotePayload<'a> {
    title: &'a str,
    content: &'a str,
}

/// Response from POST /notes. The server is only trusted for the id;
/// anything it omits is filled in client-side.
#[derive(Debug, Deserialize)]
struct CreateNoteResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "createdAt")]
    created_at: Option<DateTime<Utc>>,
}

/// Error body the server attaches to non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Client for the remote notes service.
///
/// Holds the base URL and the bearer token for the current session. The
/// token is set after login/register and cleared on logout; the store in
/// [`crate::session`] owns its persistence.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl ApiClient {
    /// Create a client against the given base URL with no session token.
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();
        Self {
            base_url: base_url.into(),
            token: None,
            http,
        }
    }

    /// Attach a session token to subsequent requests.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Drop the session token.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Register a new account, returning the session token.
    pub async fn register(&self, email: &str, password: &str, name: &str) -> Result<String> {
        let url = format!("{}/auth/register", self.base_url);
        debug!(%url, "register");
        let response = self
            .http
            .post(&url)
            .json(&RegisterRequest {
                email,
                password,
                name,
            })
            .send()
            .await
            .map_err(transport_error)?;
        auth_token(response).await
    }

    /// Log in with existing credentials, returning the session token.
    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let url = format!("{}/auth/login", self.base_url);
        debug!(%url, "login");
        let response = self
            .http
            .post(&url)
            .json(&LoginRequest { email, password })
            .send()
            .await
            .map_err(transport_error)?;
        auth_token(response).await
    }

    /// Fetch all notes for the current session.
    pub async fn list_notes(&self) -> Result<Vec<Note>> {
        let url = format!("{}/notes", self.base_url);
        debug!(%url, "list notes");
        let response = self
            .authorized(self.http.get(&url))
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response).await?;
        response
            .json::<Vec<Note>>()
            .await
            .map_err(|e| Error::RequestFailed(format!("Malformed note list: {}", e)))
    }

    /// Create a note and construct the full record client-side.
    ///
    /// The server is expected to return the new note's id; if it omits
    /// one, a local timestamp-derived id is used. `createdAt` likewise
    /// falls back to now.
    pub async fn create_note(&self, title: &str, content: &str) -> Result<Note> {
        let url = format!("{}/notes", self.base_url);
        debug!(%url, "create note");
        let response = self
            .authorized(self.http.post(&url))
            .json(&NotePayload { title, content })
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response).await?;
        let created: CreateNoteResponse = response
            .json()
            .await
            .map_err(|e| Error::RequestFailed(format!("Malformed create response: {}", e)))?;

        Ok(Note {
            id: created.id.unwrap_or_else(local_fallback_id),
            title: title.to_string(),
            content: content.to_string(),
            created_at: created.created_at.unwrap_or_else(Utc::now),
        })
    }

    /// Update a note in place. The response body is not trusted; the
    /// caller mirrors the mutation into its own list.
    pub async fn update_note(&self, id: &str, title: &str, content: &str) -> Result<()> {
        let url = format!("{}/notes/{}", self.base_url, id);
        debug!(%url, "update note");
        let response = self
            .authorized(self.http.put(&url))
            .json(&NotePayload { title, content })
            .send()
            .await
            .map_err(transport_error)?;
        check_status(response).await?;
        Ok(())
    }

    /// Delete a note by id.
    pub async fn delete_note(&self, id: &str) -> Result<()> {
        let url = format!("{}/notes/{}", self.base_url, id);
        debug!(%url, "delete note");
        let response = self
            .authorized(self.http.delete(&url))
            .send()
            .await
            .map_err(transport_error)?;
        check_status(response).await?;
        Ok(())
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Map a transport-level failure (DNS, TLS, connection reset) to the
/// client error type.
fn transport_error(e: reqwest::Error) -> Error {
    Error::RequestFailed(e.to_string())
}

/// Extract the session token from an auth response.
///
/// A 4xx here means the server rejected the credentials; a 2xx without a
/// token field is treated the same way rather than fabricating a
/// placeholder token.
async fn auth_token(response: reqwest::Response) -> Result<String> {
    let status = response.status();
    if status.is_client_error() {
        let message = error_message(response).await;
        return Err(Error::Auth(message));
    }
    if !status.is_success() {
        let message = error_message(response).await;
        return Err(Error::RequestFailed(format!("HTTP {}: {}", status.as_u16(), message)));
    }

    let body: AuthResponse = response
        .json()
        .await
        .map_err(|e| Error::Auth(format!("Malformed auth response: {}", e)))?;
    match body.token {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(Error::Auth(
            "Server response did not include a session token".to_string(),
        )),
    }
}

/// Pass a 2xx response through, otherwise map it to a request failure
/// carrying the server message when one is present.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = error_message(response).await;
    Err(Error::RequestFailed(format!(
        "HTTP {}: {}",
        status.as_u16(),
        message
    )))
}

/// Best-effort extraction of the server's `message` field from an error
/// body; falls back to the raw body or a generic text.
async fn error_message(response: reqwest::Response) -> String {
    let body = response.text().await.unwrap_or_default();
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(&body) {
        if let Some(message) = parsed.message {
            return message;
        }
    }
    if body.trim().is_empty() {
        "no details from server".to_string()
    } else {
        body
    }
}
