use crate::api::{ApiClient, ApiError, ApiResult, LoginResponse, Session};
use crate::models::User;
use crate::storage;
use leptos::prelude::*;

pub(crate) const LOGIN_FALLBACK: &str = "Login failed";
pub(crate) const REGISTER_FALLBACK: &str = "Registration failed";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct AuthState {
    pub user: Option<User>,
    pub authenticated: bool,
    pub error: Option<String>,

    in_flight: usize,
    /// Bumped by `logout`; completions started under an older epoch are dropped.
    epoch: u64,
}

impl AuthState {
    pub fn new(authenticated: bool) -> Self {
        Self {
            authenticated,
            ..Self::default()
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Marks an operation as started and returns the epoch it belongs to.
    pub(crate) fn begin(&mut self) -> u64 {
        self.in_flight += 1;
        self.error = None;
        self.epoch
    }

    fn settle(&mut self, epoch: u64) -> bool {
        if epoch != self.epoch {
            return false;
        }
        self.in_flight = self.in_flight.saturating_sub(1);
        true
    }

    /// Returns `false` when the result was dropped because a logout happened meanwhile.
    pub(crate) fn complete_login(&mut self, epoch: u64, outcome: Result<User, String>) -> bool {
        if !self.settle(epoch) {
            return false;
        }
        match outcome {
            Ok(user) => {
                self.user = Some(user);
                self.authenticated = true;
            }
            Err(message) => self.error = Some(message),
        }
        true
    }

    pub(crate) fn complete_register(&mut self, epoch: u64, outcome: Result<(), String>) -> bool {
        if !self.settle(epoch) {
            return false;
        }
        if let Err(message) = outcome {
            self.error = Some(message);
        }
        true
    }

    pub(crate) fn logout(&mut self) {
        *self = Self {
            epoch: self.epoch + 1,
            ..Self::default()
        };
    }

    pub(crate) fn clear_error(&mut self) {
        self.error = None;
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AuthStore {
    state: RwSignal<AuthState>,
    client: RwSignal<ApiClient>,
}

impl AuthStore {
    pub fn new(client: RwSignal<ApiClient>) -> Self {
        let authenticated = client.with_untracked(ApiClient::is_authenticated);
        Self {
            state: RwSignal::new(AuthState::new(authenticated)),
            client,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.with(|s| s.authenticated)
    }

    pub fn is_loading(&self) -> bool {
        self.state.with(AuthState::is_loading)
    }

    pub fn error(&self) -> Option<String> {
        self.state.with(|s| s.error.clone())
    }

    pub fn user(&self) -> Option<User> {
        self.state.with(|s| s.user.clone())
    }

    pub fn clear_error(&self) {
        self.state.update(AuthState::clear_error);
    }

    pub async fn login(self, email: String, password: String) -> ApiResult<User> {
        let epoch = begin(self.state);
        let api = self.client.get_untracked();
        let result = api.login(&email, &password).await;

        let outcome = match &result {
            Ok(res) => Ok(res.user.clone()),
            Err(e) => {
                log::warn!("login failed: {e}");
                Err(e.message_or(LOGIN_FALLBACK))
            }
        };

        let mut applied = false;
        self.state
            .update(|s| applied = s.complete_login(epoch, outcome));

        let (token, result) = settle_login(applied, result);
        if let Some(token) = token {
            storage::save_token(&token);
            self.client.update(|c| c.set_session(Session::new(token)));
        }
        match &result {
            Ok(user) => log::info!("signed in as {}", user.username),
            Err(ApiError::Superseded) => log::info!("dropping login response received after logout"),
            Err(_) => {}
        }
        result
    }

    /// Creates the account; does not sign in.
    pub async fn register(self, username: String, email: String, password: String) -> ApiResult<()> {
        let epoch = begin(self.state);
        let api = self.client.get_untracked();
        let result = api.register(&username, &email, &password).await;

        let outcome = result.as_ref().map(|_| ()).map_err(|e| {
            log::warn!("registration failed: {e}");
            e.message_or(REGISTER_FALLBACK)
        });
        self.state.update(|s| {
            s.complete_register(epoch, outcome);
        });

        result
    }

    pub fn logout(&self) {
        self.state.update(AuthState::logout);
        self.client.update(ApiClient::clear_session);
        storage::clear_token();
        log::info!("signed out");
    }
}

/// Splits a finished login into the token to persist and the result for the caller.
/// Only an applied success yields a token; one dropped by a logout is reported as superseded.
fn settle_login(applied: bool, result: ApiResult<LoginResponse>) -> (Option<String>, ApiResult<User>) {
    match result {
        Ok(res) if applied => (Some(res.access_token), Ok(res.user)),
        Ok(_) => (None, Err(ApiError::Superseded)),
        Err(e) => (None, Err(e)),
    }
}

fn begin(state: RwSignal<AuthState>) -> u64 {
    let mut epoch = 0;
    state.update(|s| epoch = s.begin());
    epoch
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> User {
        User {
            id: "u-1".to_string(),
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    #[test]
    fn test_login_success_authenticates() {
        let mut s = AuthState::default();
        let epoch = s.begin();
        assert!(s.is_loading());

        assert!(s.complete_login(epoch, Ok(ada())));
        assert!(s.authenticated);
        assert!(!s.is_loading());
        assert_eq!(s.user.as_ref().map(|u| u.username.as_str()), Some("ada"));
        assert!(s.error.is_none());
    }

    #[test]
    fn test_login_invalid_credentials() {
        let mut s = AuthState::default();
        let epoch = s.begin();

        s.complete_login(epoch, Err("Invalid credentials".to_string()));
        assert_eq!(s.error.as_deref(), Some("Invalid credentials"));
        assert!(!s.authenticated);
        assert!(s.user.is_none());
        assert!(!s.is_loading());
    }

    #[test]
    fn test_begin_clears_previous_error() {
        let mut s = AuthState::default();
        let epoch = s.begin();
        s.complete_register(epoch, Err("User already exists".to_string()));
        assert!(s.error.is_some());

        s.begin();
        assert!(s.error.is_none());
    }

    #[test]
    fn test_register_success_does_not_authenticate() {
        let mut s = AuthState::default();
        let epoch = s.begin();
        s.complete_register(epoch, Ok(()));
        assert!(!s.authenticated);
        assert!(s.user.is_none());
        assert!(!s.is_loading());
    }

    #[test]
    fn test_logout_is_idempotent() {
        let mut s = AuthState::new(true);
        s.logout();
        let once = s.clone();
        s.logout();

        assert!(!s.authenticated);
        assert!(s.user.is_none());
        assert!(s.error.is_none());
        assert_eq!(once.user, s.user);
        assert_eq!(once.authenticated, s.authenticated);
    }

    #[test]
    fn test_logout_while_login_pending_drops_late_response() {
        let mut s = AuthState::default();
        let epoch = s.begin();

        s.logout();
        assert!(!s.is_loading());

        assert!(!s.complete_login(epoch, Ok(ada())));
        assert!(!s.authenticated);
        assert!(s.user.is_none());
        assert!(!s.is_loading());
    }

    #[test]
    fn test_overlapping_logins_keep_loading_until_last() {
        let mut s = AuthState::default();
        let first = s.begin();
        let second = s.begin();

        s.complete_login(first, Err("Login failed".to_string()));
        assert!(s.is_loading());

        s.complete_login(second, Ok(ada()));
        assert!(!s.is_loading());
        assert!(s.authenticated);
    }

    fn login_response() -> LoginResponse {
        LoginResponse {
            access_token: "jwt-1".to_string(),
            user: ada(),
        }
    }

    #[test]
    fn test_applied_login_yields_token_and_user() {
        let (token, result) = settle_login(true, Ok(login_response()));
        assert_eq!(token.as_deref(), Some("jwt-1"));
        assert_eq!(result, Ok(ada()));
    }

    #[test]
    fn test_failed_login_persists_no_token() {
        let err = ApiError::Service {
            status: 401,
            message: Some("Invalid credentials".to_string()),
        };
        let (token, result) = settle_login(true, Err(err.clone()));
        assert!(token.is_none());
        assert_eq!(result, Err(err));
    }

    #[test]
    fn test_login_dropped_by_logout_is_superseded() {
        let (token, result) = settle_login(false, Ok(login_response()));
        assert!(token.is_none());
        assert_eq!(result, Err(ApiError::Superseded));
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_logout_clears_token_and_session() {
        storage::save_token("jwt-1");
        let client = RwSignal::new(ApiClient::new("http://localhost:5000").with_session(Session::new("jwt-1")));
        let auth = AuthStore::new(client);
        assert!(auth.is_authenticated());

        for _ in 0..2 {
            auth.logout();
            assert!(storage::load_token().is_none());
            assert!(!client.with_untracked(ApiClient::is_authenticated));
            assert!(!auth.is_authenticated());
            assert!(auth.user().is_none());
        }
    }
}
