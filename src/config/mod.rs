use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

pub(crate) const DEFAULT_API_URL: &str = "http://localhost:5000";
pub(crate) const DEFAULT_LOG_LEVEL: &str = "info";

/// Runtime configuration injected by the hosting page through `window.ENV`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct EnvConfig {
    pub api_url: String,
    pub log_level: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        // Both `API_URL` and `api_url` spellings are accepted (same for the log level).
        let env = web_sys::window()
            .and_then(|w| w.get("ENV"))
            .map(JsValue::from)
            .filter(|env| !env.is_undefined() && env.is_object());

        match env {
            Some(env) => Self::from_values(
                read_string(&env, &["API_URL", "api_url"]),
                read_string(&env, &["LOG_LEVEL", "log_level"]),
            ),
            None => Self::from_values(None, None),
        }
    }

    pub(crate) fn from_values(api_url: Option<String>, log_level: Option<String>) -> Self {
        let api_url = api_url
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let log_level = log_level
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Self { api_url, log_level }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn read_string(env: &JsValue, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        js_sys::Reflect::get(env, &JsValue::from_str(key))
            .ok()
            .and_then(|v| v.as_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_env_missing() {
        let cfg = EnvConfig::from_values(None, None);
        assert_eq!(cfg.api_url, "http://localhost:5000");
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let cfg = EnvConfig::from_values(Some("https://notes.example.com/api/".to_string()), None);
        assert_eq!(cfg.api_url, "https://notes.example.com/api");
    }

    #[test]
    fn test_blank_values_fall_back() {
        let cfg = EnvConfig::from_values(Some("  ".to_string()), Some("".to_string()));
        assert_eq!(cfg, EnvConfig::from_values(None, None));
    }
}
