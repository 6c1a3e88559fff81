use dominator::traits::StaticEvent;
use wasm_bindgen::JsCast;

pub use dominator::events::*;

use crate::session;

/// Fired on `window` by the session module after every storage mutation, so
/// same-tab components can re-read the session without a reload.
pub struct SessionChanged {
    #[allow(dead_code)]
    event: web_sys::CustomEvent,
}

impl StaticEvent for SessionChanged {
    const EVENT_TYPE: &'static str = session::CHANGED_EVENT;

    #[inline]
    fn unchecked_from_event(event: web_sys::Event) -> Self {
        Self {
            event: event.unchecked_into(),
        }
    }
}

/// Cross-tab counterpart of [`SessionChanged`], delivered by the browser for
/// storage writes made in other tabs.
pub struct Storage {
    #[allow(dead_code)]
    event: web_sys::StorageEvent,
}

impl StaticEvent for Storage {
    const EVENT_TYPE: &'static str = "storage";

    #[inline]
    fn unchecked_from_event(event: web_sys::Event) -> Self {
        Self {
            event: event.unchecked_into(),
        }
    }
}
