use std::rc::Rc;

use dominator::{clone, html, link, routing, svg, Dom};
use futures_signals::signal::{Mutable, SignalExt};

use crate::common::{events, NotificationList, Route};
use crate::session;

pub struct Sidebar {
    display_name: Mutable<String>,
    role: Mutable<Option<String>>,
    notifications: Rc<NotificationList>,
}

impl Sidebar {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            display_name: Mutable::new(session::display_name()),
            role: Mutable::new(session::role()),
            notifications: NotificationList::new(),
        })
    }

    fn refresh(&self) {
        self.display_name.set(session::display_name());
        self.role.set(session::role());
    }

    fn is_admin(&self) -> impl futures_signals::signal::Signal<Item = bool> + use<> {
        self.role
            .signal_cloned()
            .map(|role| role.as_deref() == Some("admin"))
    }

    fn render_link(route: Route, label: &str, icon_path: &str) -> Dom {
        link!(route.url(), {
            .class_signal("active", Route::signal().map(clone!(route => move |x| x == route)))
            .children(&mut [
                svg!("svg", {
                    .attribute("xmlns", "http://www.w3.org/2000/svg")
                    .attribute("viewBox", "0 0 24 24")
                    .attribute("stroke", "currentColor")
                    .attribute("fill", "none")
                    .children(&mut [
                        svg!("path", {
                            .attribute("stroke-linecap", "round")
                            .attribute("stroke-linejoin", "round")
                            .attribute("stroke-width", "1")
                            .attribute("d", icon_path)
                        })
                    ])
                }),
                html!("span", {
                    .text(label)
                })
            ])
        })
    }

    pub fn render(sidebar: Rc<Self>) -> Dom {
        html!("div", {
            .class("sidebar")
            .global_event(clone!(sidebar => move |_: events::SessionChanged| {
                sidebar.refresh();
            }))
            .global_event(clone!(sidebar => move |_: events::Storage| {
                sidebar.refresh();
            }))
            .children(&mut [
                html!("div", {
                    .class("sidebar-header")
                    .children(&mut [
                        html!("span", {
                            .class("brand")
                            .text("Jobdesk")
                        }),
                        html!("span", {
                            .class("user-name")
                            .text_signal(sidebar.display_name.signal_cloned())
                        }),
                        html!("span", {
                            .class("user-role")
                            .text_signal(sidebar.role.signal_cloned().map(|role| {
                                role.as_deref().map(session::map_api_role_to_ui).unwrap_or_default().to_string()
                            }))
                        }),
                    ])
                }),
                html!("nav", {
                    .children(&mut [
                        Self::render_link(
                            Route::Jobs,
                            "Jobs",
                            "M21 13.255A23.931 23.931 0 0112 15c-3.183 0-6.22-.62-9-1.745M16 6V4a2 2 0 00-2-2h-4a2 2 0 00-2 2v2m4 6h.01M5 20h14a2 2 0 002-2V8a2 2 0 00-2-2H5a2 2 0 00-2 2v10a2 2 0 002 2z",
                        ),
                        html!("div", {
                            .visible_signal(sidebar.is_admin().map(|admin| !admin))
                            .children(&mut [
                                Self::render_link(
                                    Route::Profile,
                                    "My Profile",
                                    "M16 7a4 4 0 11-8 0 4 4 0 018 0zM12 14a7 7 0 00-7 7h14a7 7 0 00-7-7z",
                                ),
                            ])
                        }),
                        html!("div", {
                            .visible_signal(sidebar.is_admin())
                            .children(&mut [
                                Self::render_link(
                                    Route::AddJob,
                                    "Post Job",
                                    "M12 9v3m0 0v3m0-3h3m-3 0H9m12 0a9 9 0 11-18 0 9 9 0 0118 0z",
                                ),
                                Self::render_link(
                                    Route::AdminProfiles,
                                    "Profiles",
                                    "M17 20h5v-2a3 3 0 00-5.356-1.857M17 20H7m10 0v-2c0-.656-.126-1.283-.356-1.857M7 20H2v-2a3 3 0 015.356-1.857M7 20v-2c0-.656.126-1.283.356-1.857m0 0a5.002 5.002 0 019.288 0M15 7a3 3 0 11-6 0 3 3 0 016 0zm6 3a2 2 0 11-4 0 2 2 0 014 0zM7 10a2 2 0 11-4 0 2 2 0 014 0z",
                                ),
                                Self::render_link(
                                    Route::AdminSupport,
                                    "Support",
                                    "M18.364 5.636l-3.536 3.536m0 5.656l3.536 3.536M9.172 9.172L5.636 5.636m3.536 9.192l-3.536 3.536M21 12a9 9 0 11-18 0 9 9 0 0118 0zm-5 0a4 4 0 11-8 0 4 4 0 018 0z",
                                ),
                            ])
                        }),
                    ])
                }),
                NotificationList::render(sidebar.notifications.clone()),
                html!("button", {
                    .class("logout")
                    .text("Logout")
                    .event(|_: events::Click| {
                        session::clear();
                        routing::go_to_url(&Route::Login.url());
                    })
                }),
            ])
        })
    }
}
