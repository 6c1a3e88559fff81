use std::sync::atomic::{AtomicUsize, Ordering};

use futures::{
    future::{abortable, AbortHandle},
    Future,
};
use futures_signals::signal::{Mutable, Signal};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, History, HtmlElement, Storage, Window};

thread_local! {
    static WINDOW: Window = web_sys::window().unwrap_throw();
    static DOCUMENT: Document = WINDOW.with(|w| w.document().unwrap_throw());
    static BODY: HtmlElement = DOCUMENT.with(|d| d.body().unwrap_throw());
    static LOCAL_STORAGE: Storage = WINDOW.with(|w| w.local_storage().unwrap_throw().unwrap_throw());
    static HISTORY: History = WINDOW.with(|w| w.history().unwrap_throw());
    static API_HOST: std::cell::RefCell<String> = const { std::cell::RefCell::new(String::new()) };
}

pub struct AsyncState {
    id: usize,
    handle: AbortHandle,
}

impl AsyncState {
    fn new(handle: AbortHandle) -> Self {
        static ID: AtomicUsize = AtomicUsize::new(0);
        let id = ID.fetch_add(1, Ordering::SeqCst);

        Self { id, handle }
    }
}

pub struct AsyncLoader {
    loading: Mutable<Option<AsyncState>>,
}

impl Default for AsyncLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl AsyncLoader {
    pub fn new() -> Self {
        Self {
            loading: Mutable::new(None),
        }
    }

    pub fn cancel(&self) {
        self.replace(None)
    }

    pub fn replace(&self, value: Option<AsyncState>) {
        let mut loading = self.loading.lock_mut();
        if let Some(state) = loading.as_mut() {
            state.handle.abort();
        }
        *loading = value;
    }

    pub fn load<F>(&self, fut: F)
    where
        F: Future<Output = ()> + 'static,
    {
        let (fut, handle) = abortable(fut);

        let state = AsyncState::new(handle);
        let id = state.id;

        self.replace(Some(state));

        let loading = self.loading.clone();

        spawn_local(async move {
            match fut.await {
                Ok(()) => {
                    let mut loading = loading.lock_mut();

                    if let Some(current_id) = loading.as_ref().map(|x| x.id) {
                        if current_id == id {
                            *loading = None;
                        }
                    }
                }
                Err(e) => {
                    error!("failed to spawn task: {}", e);
                }
            }
        });
    }

    pub fn is_loading(&self) -> impl Signal<Item = bool> {
        self.loading.signal_ref(|x| x.is_some())
    }
}

/// Resolve the API base once at startup. A `window.__JOBDESK_API__` global
/// set by the hosting page wins (local dev against a non-proxied backend),
/// otherwise requests go through the same-origin `/api/v1` prefix that the
/// dev proxy or the deployment reverse proxy forwards.
pub fn initialize_urls() {
    let api_host = match js_sys::eval("window.__JOBDESK_API__") {
        Ok(val) if !val.is_undefined() => val.as_string().unwrap_or_default(),
        _ => "/api/v1".to_string(),
    };

    API_HOST.with(|s| *s.borrow_mut() = api_host);
}

pub fn api_host() -> String {
    API_HOST.with(|v| v.borrow().clone())
}

pub fn apply_theme(theme: Option<String>) {
    match theme {
        Some(theme) if theme == "dark" => {
            body().class_list().add_1("dark").unwrap_throw();
        }
        _ => {
            body().class_list().remove_1("dark").unwrap_throw();
        }
    }
}

/// Relative "posted ..." label for a backend timestamp.
pub fn format_posted_at(created_at: Option<&str>) -> String {
    let Some(posted) = created_at
        .and_then(|at| chrono::NaiveDateTime::parse_from_str(at, "%Y-%m-%dT%H:%M:%S%.f").ok())
    else {
        return "Recently".to_string();
    };

    let days = (chrono::Utc::now().naive_utc() - posted).num_days();
    match days {
        d if d <= 0 => "Today".to_string(),
        1 => "1 day ago".to_string(),
        d if d < 7 => format!("{} days ago", d),
        d if d < 30 => format!("{} weeks ago", (d + 6) / 7),
        d => format!("{} months ago", (d + 29) / 30),
    }
}

pub fn format_salary(min: Option<f64>, max: Option<f64>, salary_type: Option<&str>) -> String {
    let salary_type = salary_type.unwrap_or("per month");
    match (min, max) {
        (Some(min), Some(max)) => format!("₹{} - ₹{} {}", min, max, salary_type),
        (Some(min), None) => format!("₹{}+ {}", min, salary_type),
        (None, Some(max)) => format!("Up to ₹{} {}", max, salary_type),
        (None, None) => "Salary not specified".to_string(),
    }
}

pub fn window() -> Window {
    WINDOW.with(|s| s.clone())
}

pub fn local_storage() -> Storage {
    LOCAL_STORAGE.with(|s| s.clone())
}

pub fn history() -> History {
    HISTORY.with(|h| h.clone())
}

pub fn document() -> Document {
    DOCUMENT.with(|d| d.clone())
}

pub fn body() -> HtmlElement {
    BODY.with(|d| d.clone())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_format_salary_both_bounds() {
        assert_eq!(
            format_salary(Some(50000.0), Some(80000.0), Some("monthly")),
            "₹50000 - ₹80000 monthly"
        );
    }

    #[test]
    fn test_format_salary_missing_bounds() {
        assert_eq!(format_salary(None, None, None), "Salary not specified");
        assert_eq!(
            format_salary(Some(50000.0), None, None),
            "₹50000+ per month"
        );
        assert_eq!(
            format_salary(None, Some(80000.0), Some("yearly")),
            "Up to ₹80000 yearly"
        );
    }

    #[test]
    fn test_format_posted_at_unparseable() {
        assert_eq!(format_posted_at(None), "Recently");
        assert_eq!(format_posted_at(Some("not a date")), "Recently");
    }

    #[test]
    fn test_format_posted_at_rounds_weeks_and_months_up() {
        let at = |days: i64| {
            (chrono::Utc::now() - chrono::Duration::days(days))
                .format("%Y-%m-%dT%H:%M:%S%.f")
                .to_string()
        };

        assert_eq!(format_posted_at(Some(&at(0))), "Today");
        assert_eq!(format_posted_at(Some(&at(1))), "1 day ago");
        assert_eq!(format_posted_at(Some(&at(3))), "3 days ago");
        assert_eq!(format_posted_at(Some(&at(8))), "2 weeks ago");
        assert_eq!(format_posted_at(Some(&at(14))), "2 weeks ago");
        assert_eq!(format_posted_at(Some(&at(31))), "2 months ago");
    }
}
