//! Session state lives in the browser's local storage so it survives
//! reloads and is visible across tabs. Same-tab listeners cannot observe
//! storage writes natively, so every mutating call here also fires a
//! synthetic `session-changed` event on `window`.

use wasm_bindgen::UnwrapThrowExt;

use crate::utils::{local_storage, window};

pub const TOKEN_KEY: &str = "token";
pub const USERNAME_KEY: &str = "username";
pub const ROLE_KEY: &str = "userRole";
pub const FULL_NAME_KEY: &str = "full_name";

pub const CHANGED_EVENT: &str = "session-changed";

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_CANDIDATE: &str = "candidate";

/// UI vocabulary to backend vocabulary. Unknown roles pass through.
pub fn map_ui_role_to_api(role: &str) -> &str {
    if role == ROLE_CANDIDATE {
        "user"
    } else {
        role
    }
}

/// Backend vocabulary to UI vocabulary. Unknown roles pass through.
pub fn map_api_role_to_ui(role: &str) -> &str {
    if role == "user" {
        ROLE_CANDIDATE
    } else {
        role
    }
}

pub fn token() -> Option<String> {
    local_storage().get(TOKEN_KEY).unwrap_throw()
}

pub fn username() -> Option<String> {
    local_storage().get(USERNAME_KEY).unwrap_throw()
}

/// Backend-vocabulary role of the logged-in account, as cached at login.
/// A UI hint only, never an authorization decision the backend relies on.
pub fn role() -> Option<String> {
    local_storage().get(ROLE_KEY).unwrap_throw()
}

pub fn full_name() -> Option<String> {
    local_storage().get(FULL_NAME_KEY).unwrap_throw()
}

pub fn is_logged_in() -> bool {
    username().is_some()
}

pub fn set_token(token: &str) {
    local_storage().set(TOKEN_KEY, token).unwrap_throw();
    notify_changed();
}

pub fn set_username(username: &str) {
    local_storage().set(USERNAME_KEY, username).unwrap_throw();
    notify_changed();
}

pub fn set_role(role: &str) {
    local_storage().set(ROLE_KEY, role).unwrap_throw();
    notify_changed();
}

pub fn set_full_name(full_name: &str) {
    local_storage().set(FULL_NAME_KEY, full_name).unwrap_throw();
    notify_changed();
}

pub fn clear() {
    for key in [TOKEN_KEY, USERNAME_KEY, ROLE_KEY, FULL_NAME_KEY] {
        local_storage().delete(key).unwrap_throw();
    }
    notify_changed();
}

fn notify_changed() {
    let event = web_sys::CustomEvent::new(CHANGED_EVENT).unwrap_throw();
    let _ = window().dispatch_event(&event);
}

/// Name shown in the sidebar: the stored full name when present, otherwise
/// the username's local part title-cased on `.`, `_` and `-` separators.
pub fn display_name_of(username: Option<&str>, full_name: Option<&str>) -> String {
    if let Some(full) = full_name.map(str::trim).filter(|s| !s.is_empty()) {
        return full.to_string();
    }

    let Some(username) = username.filter(|s| !s.is_empty()) else {
        return "User".to_string();
    };

    if !username.contains('@') {
        return username.to_string();
    }

    let base = username.split('@').next().unwrap_or_default();
    base.split(['.', '_', '-'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn display_name() -> String {
    display_name_of(username().as_deref(), full_name().as_deref())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_role_mapping_is_bijective_on_known_values() {
        assert_eq!(map_ui_role_to_api("candidate"), "user");
        assert_eq!(map_api_role_to_ui("user"), "candidate");
        assert_eq!(map_ui_role_to_api("admin"), "admin");
        assert_eq!(map_api_role_to_ui("admin"), "admin");

        for role in ["candidate", "admin"] {
            assert_eq!(map_api_role_to_ui(map_ui_role_to_api(role)), role);
        }
    }

    #[test]
    fn test_unknown_roles_pass_through() {
        assert_eq!(map_ui_role_to_api("moderator"), "moderator");
        assert_eq!(map_api_role_to_ui("moderator"), "moderator");
    }

    #[test]
    fn test_display_name_prefers_full_name() {
        assert_eq!(
            display_name_of(Some("a@b.com"), Some("Ada Lovelace")),
            "Ada Lovelace"
        );
    }

    #[test]
    fn test_display_name_formats_email_local_part() {
        assert_eq!(
            display_name_of(Some("jane.doe-smith@example.com"), None),
            "Jane Doe Smith"
        );
    }

    #[test]
    fn test_display_name_fallbacks() {
        assert_eq!(display_name_of(Some("+919812345678"), None), "+919812345678");
        assert_eq!(display_name_of(None, None), "User");
        assert_eq!(display_name_of(Some(""), Some("  ")), "User");
    }
}
