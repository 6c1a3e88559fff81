use dominator::routing;
use futures_signals::signal::{Signal, SignalExt};
use wasm_bindgen::prelude::*;
use web_sys::Url;

use crate::session;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Jobs,
    AddJob,
    Profile,
    AdminProfiles,
    AdminProfileDetail(i64),
    AdminSupport,
    NotFound,
}

impl Route {
    pub fn from_pathname(pathname: &str) -> Self {
        let mut paths = pathname.split('/').collect::<Vec<_>>();
        paths.retain(|path| !path.is_empty());

        match paths.as_slice() {
            [] => Route::Login,
            ["register"] => Route::Register,
            ["app"] | ["app", "jobs"] => Route::Jobs,
            ["app", "jobs", "new"] => Route::AddJob,
            ["app", "profile"] => Route::Profile,
            ["app", "admin", "profiles"] => Route::AdminProfiles,
            ["app", "admin", "profiles", id] => {
                if let Ok(id) = id.parse() {
                    Route::AdminProfileDetail(id)
                } else {
                    Route::NotFound
                }
            }
            ["app", "admin", "support"] => Route::AdminSupport,
            _ => Route::NotFound,
        }
    }

    pub fn signal() -> impl Signal<Item = Self> {
        routing::url()
            .signal_ref(|url| Url::new(url).unwrap_throw())
            .map(|url| Route::from_pathname(&url.pathname()))
    }

    pub fn url(&self) -> String {
        match self {
            Route::Login => "/".to_string(),
            Route::Register => "/register".to_string(),
            Route::Jobs => "/app/jobs".to_string(),
            Route::AddJob => "/app/jobs/new".to_string(),
            Route::Profile => "/app/profile".to_string(),
            Route::AdminProfiles => "/app/admin/profiles".to_string(),
            Route::AdminProfileDetail(id) => format!("/app/admin/profiles/{}", id),
            Route::AdminSupport => "/app/admin/support".to_string(),
            Route::NotFound => "/notfound".to_string(),
        }
    }

    pub fn requires_session(&self) -> bool {
        !matches!(self, Route::Login | Route::Register)
    }

    /// UI-vocabulary roles allowed on the route. Empty means any logged-in
    /// account.
    pub fn allowed_roles(&self) -> &'static [&'static str] {
        match self {
            Route::AddJob
            | Route::AdminProfiles
            | Route::AdminProfileDetail(_)
            | Route::AdminSupport => &[session::ROLE_ADMIN],
            _ => &[],
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_pathname() {
        assert_eq!(Route::from_pathname("/"), Route::Login);
        assert_eq!(Route::from_pathname("/register"), Route::Register);
        assert_eq!(Route::from_pathname("/app"), Route::Jobs);
        assert_eq!(Route::from_pathname("/app/jobs"), Route::Jobs);
        assert_eq!(Route::from_pathname("/app/jobs/"), Route::Jobs);
        assert_eq!(Route::from_pathname("/app/jobs/new"), Route::AddJob);
        assert_eq!(Route::from_pathname("/app/profile"), Route::Profile);
        assert_eq!(
            Route::from_pathname("/app/admin/profiles"),
            Route::AdminProfiles
        );
        assert_eq!(
            Route::from_pathname("/app/admin/profiles/42"),
            Route::AdminProfileDetail(42)
        );
        assert_eq!(
            Route::from_pathname("/app/admin/support"),
            Route::AdminSupport
        );
        assert_eq!(Route::from_pathname("/app/admin/profiles/x"), Route::NotFound);
        assert_eq!(Route::from_pathname("/nope"), Route::NotFound);
    }

    #[test]
    fn test_url_round_trips() {
        for route in [
            Route::Login,
            Route::Register,
            Route::Jobs,
            Route::AddJob,
            Route::Profile,
            Route::AdminProfiles,
            Route::AdminProfileDetail(7),
            Route::AdminSupport,
        ] {
            assert_eq!(Route::from_pathname(&route.url()), route);
        }
    }

    #[test]
    fn test_admin_routes_are_restricted() {
        assert!(Route::Jobs.allowed_roles().is_empty());
        assert!(Route::Profile.allowed_roles().is_empty());
        assert_eq!(Route::AddJob.allowed_roles(), ["admin"]);
        assert_eq!(Route::AdminProfiles.allowed_roles(), ["admin"]);
        assert_eq!(Route::AdminSupport.allowed_roles(), ["admin"]);
    }

    #[test]
    fn test_public_routes_skip_session() {
        assert!(!Route::Login.requires_session());
        assert!(!Route::Register.requires_session());
        assert!(Route::Jobs.requires_session());
        assert!(Route::AdminProfiles.requires_session());
    }
}
