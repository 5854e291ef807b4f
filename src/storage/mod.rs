pub(crate) const TOKEN_KEY: &str = "keep_notes_token";

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

pub(crate) fn load_token() -> Option<String> {
    local_storage()
        .and_then(|s| s.get_item(TOKEN_KEY).ok().flatten())
        .filter(|t| !t.trim().is_empty())
}

pub(crate) fn save_token(token: &str) {
    if let Some(storage) = local_storage() {
        if storage.set_item(TOKEN_KEY, token).is_err() {
            log::warn!("failed to persist session token");
        }
    }
}

pub(crate) fn clear_token() {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(TOKEN_KEY);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_token_roundtrip() {
        clear_token();
        assert!(load_token().is_none());

        save_token("t1");
        assert_eq!(load_token().as_deref(), Some("t1"));

        clear_token();
        assert!(load_token().is_none());
    }

    #[wasm_bindgen_test]
    fn test_blank_token_is_ignored() {
        save_token("  ");
        assert!(load_token().is_none());
        clear_token();
    }
}
