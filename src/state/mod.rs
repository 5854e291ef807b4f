mod auth;
mod notes;

pub(crate) use auth::{AuthStore, REGISTER_FALLBACK};
pub(crate) use notes::NotesStore;

use crate::api::ApiClient;
use crate::config::EnvConfig;
use leptos::prelude::*;

#[derive(Clone)]
pub(crate) struct AppState {
    pub auth: AuthStore,
    pub notes: NotesStore,
}

impl AppState {
    pub fn new(config: &EnvConfig) -> Self {
        // Both stores share one client so a login is visible to note requests.
        let api_client = RwSignal::new(ApiClient::from_env(config));
        Self {
            auth: AuthStore::new(api_client),
            notes: NotesStore::new(api_client),
        }
    }
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);
