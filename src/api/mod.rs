use crate::config::EnvConfig;
use crate::models::{string_or_number, Note, User};
use crate::storage;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ApiError {
    /// No response reached us (offline, CORS rejection, DNS...).
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx response. `message` is the service's human-readable `message`, if any.
    #[error("request failed ({status})")]
    Service {
        status: u16,
        message: Option<String>,
    },

    /// 2xx response whose body does not match the expected contract.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// A sign-out happened while the request was in flight; its result was discarded.
    #[error("superseded by a sign-out")]
    Superseded,
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }

    fn decode(e: impl fmt::Display) -> Self {
        Self::Decode(e.to_string())
    }

    pub(crate) fn from_response(status: StatusCode, body: &str) -> Self {
        Self::Service {
            status: status.as_u16(),
            message: service_message(body),
        }
    }

    /// Text to show the user: the service's own message, or `fallback`.
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            Self::Service {
                message: Some(m), ..
            } => m.clone(),
            _ => fallback.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Service { status: 401, .. })
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

#[derive(Deserialize)]
struct ErrorBody {
    // flask-jwt-extended reports auth failures under `msg`.
    #[serde(alias = "msg")]
    message: Option<String>,
}

fn service_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
}

/// Bearer credential for the notes service.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct Session {
    token: String,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    fn authorization(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").field("token", &"<redacted>").finish()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct LoginResponse {
    pub access_token: String,
    pub user: User,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Body of both `POST /notes` and `PUT /notes/:id`.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct NoteRequest {
    pub title: String,
    pub content: String,
}

#[derive(Deserialize, Clone, Debug)]
pub(crate) struct NoteListResponse {
    pub notes: Vec<Note>,
}

#[derive(Deserialize, Clone, Debug)]
pub(crate) struct CreateNoteResponse {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
}

pub(crate) fn note_path(id: &str) -> String {
    format!("/notes/{}", urlencoding::encode(id))
}

#[derive(Clone, Debug)]
pub(crate) struct ApiClient {
    base_url: String,
    session: Option<Session>,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            session: None,
            http: reqwest::Client::new(),
        }
    }

    /// Client for the configured service, resuming the session persisted by a previous login.
    pub fn from_env(config: &EnvConfig) -> Self {
        let client = Self::new(config.api_url.clone());
        match storage::load_token() {
            Some(token) => client.with_session(Session::new(token)),
            None => client,
        }
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    pub fn set_session(&mut self, session: Session) {
        self.session = Some(session);
    }

    pub fn clear_session(&mut self) {
        self.session = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl Serialize>,
    ) -> ApiResult<reqwest::Response> {
        log::debug!("{} {}", method, path);

        let mut req = self.http.request(method, self.url(path));
        if let Some(session) = &self.session {
            req = req.header("Authorization", session.authorization());
        }
        if let Some(b) = body {
            req = req.json(b);
        }

        let res = req.send().await.map_err(ApiError::network)?;
        if res.status().is_success() {
            Ok(res)
        } else {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::from_response(status, &body))
        }
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl Serialize>,
    ) -> ApiResult<T> {
        let res = self.send(method, path, body).await?;
        res.json().await.map_err(ApiError::decode)
    }

    /// Like `request`, for endpoints whose success body carries nothing we need.
    async fn request_unit(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl Serialize>,
    ) -> ApiResult<()> {
        self.send(method, path, body).await.map(|_| ())
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        self.request(
            Method::POST,
            "/login",
            Some(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            }),
        )
        .await
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> ApiResult<()> {
        self.request_unit(
            Method::POST,
            "/register",
            Some(&RegisterRequest {
                username: username.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            }),
        )
        .await
    }

    pub async fn list_notes(&self) -> ApiResult<Vec<Note>> {
        let data: NoteListResponse = self.request(Method::GET, "/notes", None::<&()>).await?;
        Ok(data.notes)
    }

    /// Returns the service-assigned id of the new note.
    pub async fn create_note(&self, title: &str, content: &str) -> ApiResult<String> {
        let data: CreateNoteResponse = self
            .request(
                Method::POST,
                "/notes",
                Some(&NoteRequest {
                    title: title.to_string(),
                    content: content.to_string(),
                }),
            )
            .await?;

        if data.id.trim().is_empty() {
            return Err(ApiError::Decode(
                "create note response is missing the note id".to_string(),
            ));
        }
        Ok(data.id)
    }

    pub async fn update_note(&self, id: &str, title: &str, content: &str) -> ApiResult<()> {
        self.request_unit(
            Method::PUT,
            &note_path(id),
            Some(&NoteRequest {
                title: title.to_string(),
                content: content.to_string(),
            }),
        )
        .await
    }

    pub async fn delete_note(&self, id: &str) -> ApiResult<()> {
        self.request_unit(Method::DELETE, &note_path(id), None::<&()>)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_contract_deserialize() {
        let json = r#"{
            "access_token": "jwt-token",
            "user": {"id": "u-1", "username": "ada", "email": "ada@example.com"}
        }"#;
        let parsed: LoginResponse =
            serde_json::from_str(json).expect("login response should parse");
        assert_eq!(parsed.access_token, "jwt-token");
        assert_eq!(parsed.user.username, "ada");
    }

    #[test]
    fn test_note_list_contract_deserialize() {
        let json = r#"{"notes": [{"id": 1, "title": "A", "content": "x"}]}"#;
        let parsed: NoteListResponse = serde_json::from_str(json).expect("list should parse");
        assert_eq!(parsed.notes, vec![Note::new("1", "A", "x")]);
    }

    #[test]
    fn test_create_note_response_ignores_message() {
        let json = r#"{"message": "Note created successfully", "id": "abc"}"#;
        let parsed: CreateNoteResponse = serde_json::from_str(json).expect("should parse");
        assert_eq!(parsed.id, "abc");
    }

    #[test]
    fn test_register_request_serialization() {
        let req = RegisterRequest {
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "pass".to_string(),
        };
        let v = serde_json::to_value(req).expect("should serialize");
        assert_eq!(v["username"], "ada");
        assert_eq!(v["email"], "ada@example.com");
        assert_eq!(v["password"], "pass");
    }

    #[test]
    fn test_service_message_is_surfaced() {
        let e = ApiError::from_response(
            StatusCode::UNAUTHORIZED,
            r#"{"message": "Invalid credentials"}"#,
        );
        assert_eq!(e.message_or("Login failed"), "Invalid credentials");
        assert!(e.is_unauthorized());
    }

    #[test]
    fn test_jwt_msg_field_is_surfaced() {
        let e = ApiError::from_response(
            StatusCode::UNAUTHORIZED,
            r#"{"msg": "Token has expired"}"#,
        );
        assert_eq!(e.message_or("Failed to fetch notes"), "Token has expired");
    }

    #[test]
    fn test_fallback_without_message() {
        let plain = ApiError::from_response(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert_eq!(plain.message_or("Failed to add note"), "Failed to add note");
        assert!(!plain.is_unauthorized());

        let blank = ApiError::from_response(StatusCode::BAD_REQUEST, r#"{"message": " "}"#);
        assert_eq!(blank.message_or("Registration failed"), "Registration failed");

        let net = ApiError::Network("connection refused".to_string());
        assert_eq!(net.message_or("Login failed"), "Login failed");

        let decode = ApiError::Decode("missing field `id`".to_string());
        assert_eq!(decode.message_or("Failed to add note"), "Failed to add note");
    }

    #[test]
    fn test_note_path_encodes_id() {
        assert_eq!(note_path("abc-123"), "/notes/abc-123");
        assert_eq!(note_path("a/b c"), "/notes/a%2Fb%20c");
    }

    #[test]
    fn test_api_client_new() {
        let client = ApiClient::new("http://localhost:5000");
        assert_eq!(client.url("/notes"), "http://localhost:5000/notes");
        assert!(!client.is_authenticated());
    }

    #[test]
    fn test_api_client_session_lifecycle() {
        let mut client = ApiClient::new("http://localhost:5000").with_session(Session::new("t1"));
        assert!(client.is_authenticated());
        assert_eq!(client.session, Some(Session::new("t1")));

        client.set_session(Session::new("t2"));
        assert_eq!(client.session.as_ref().map(Session::authorization), Some("Bearer t2".to_string()));

        client.clear_session();
        assert!(client.session.is_none());
        assert!(!client.is_authenticated());
    }

    #[test]
    fn test_session_debug_redacts_token() {
        let s = format!("{:?}", Session::new("secret-jwt"));
        assert!(!s.contains("secret-jwt"));
    }
}
