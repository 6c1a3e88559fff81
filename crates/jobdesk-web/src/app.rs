use std::rc::Rc;

use dominator::{html, routing, Dom};
use futures_signals::signal::SignalExt;

use crate::add_job::AddJob;
use crate::admin_profile_detail::AdminProfileDetail;
use crate::admin_profiles::AdminProfiles;
use crate::common::{snackbar, Route, Sidebar};
use crate::jobs::Jobs;
use crate::login::Login;
use crate::profile::Profile;
use crate::register::Register;
use crate::session;
use crate::{admin_support::AdminSupport, query, utils::AsyncLoader};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GuardOutcome {
    Render,
    RedirectLogin,
    RedirectHome,
}

/// The routing guard is a UI convenience, the backend still authorizes
/// every request. No session sends the visitor to the login page; a role
/// outside a route's non-empty allow-list lands on the job board.
pub(crate) fn decide(session_present: bool, ui_role: Option<&str>, allowed: &[&str]) -> GuardOutcome {
    if !session_present {
        return GuardOutcome::RedirectLogin;
    }
    if allowed.is_empty() {
        return GuardOutcome::Render;
    }
    match ui_role {
        Some(role) if allowed.contains(&role) => GuardOutcome::Render,
        _ => GuardOutcome::RedirectHome,
    }
}

pub struct App {
    pub loader: AsyncLoader,
}

impl App {
    pub fn new() -> Rc<Self> {
        Rc::new(App {
            loader: AsyncLoader::new(),
        })
    }

    /// A stored token may have expired since the last visit. Any failure
    /// answering `auth/me` drops the session.
    fn validate_session(app: Rc<Self>) {
        if session::token().is_none() {
            return;
        }
        app.loader.load(async move {
            if let Err(err) = query::fetch_me().await {
                error!("session check failed: {}", err);
                snackbar::show_error("Session expired, log in again".to_string());
                session::clear();
                routing::go_to_url(&Route::Login.url());
            }
        });
    }

    fn render_protected(content: Dom) -> Dom {
        html!("div", {
            .class("app-layout")
            .children(&mut [
                Sidebar::render(Sidebar::new()),
                content,
            ])
        })
    }

    fn render_route(route: Route) -> Option<Dom> {
        let ui_role = session::role();
        let ui_role = ui_role.as_deref().map(session::map_api_role_to_ui);

        if route.requires_session() {
            match decide(session::is_logged_in(), ui_role, route.allowed_roles()) {
                GuardOutcome::RedirectLogin => {
                    routing::go_to_url(&Route::Login.url());
                    return None;
                }
                GuardOutcome::RedirectHome => {
                    routing::go_to_url(&Route::Jobs.url());
                    return None;
                }
                GuardOutcome::Render => {}
            }
        }

        match route {
            Route::Login => Some(Login::render(Login::new())),
            Route::Register => Some(Register::render(Register::new())),
            Route::Jobs => Some(Self::render_protected(Jobs::render(Jobs::new()))),
            Route::AddJob => Some(Self::render_protected(AddJob::render(AddJob::new()))),
            Route::Profile => Some(Self::render_protected(Profile::render(Profile::new()))),
            Route::AdminProfiles => Some(Self::render_protected(AdminProfiles::render(
                AdminProfiles::new(),
            ))),
            Route::AdminProfileDetail(user_id) => Some(Self::render_protected(
                AdminProfileDetail::render(AdminProfileDetail::new(user_id)),
            )),
            Route::AdminSupport => Some(Self::render_protected(AdminSupport::render(
                AdminSupport::new(),
            ))),
            Route::NotFound => Some(html!("div", {
                .class("not-found")
                .text("Page not found")
            })),
        }
    }

    pub fn render(app: Rc<Self>) -> Dom {
        Self::validate_session(app.clone());

        html!("div", {
            .child_signal(Route::signal().map(Self::render_route))
            .children(&mut [
                snackbar::render(),
            ])
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_no_session_always_redirects_to_login() {
        for (role, allowed) in [
            (None, &[][..]),
            (Some("admin"), &[][..]),
            (Some("candidate"), &["admin"][..]),
        ] {
            assert_eq!(decide(false, role, allowed), GuardOutcome::RedirectLogin);
        }
    }

    #[test]
    fn test_open_allow_list_admits_any_role() {
        assert_eq!(decide(true, Some("candidate"), &[]), GuardOutcome::Render);
        assert_eq!(decide(true, Some("admin"), &[]), GuardOutcome::Render);
        assert_eq!(decide(true, None, &[]), GuardOutcome::Render);
    }

    #[test]
    fn test_restricted_route_checks_role() {
        assert_eq!(decide(true, Some("admin"), &["admin"]), GuardOutcome::Render);
        assert_eq!(
            decide(true, Some("candidate"), &["admin"]),
            GuardOutcome::RedirectHome
        );
        assert_eq!(decide(true, None, &["admin"]), GuardOutcome::RedirectHome);
    }
}
