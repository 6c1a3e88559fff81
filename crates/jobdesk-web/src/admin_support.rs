use std::rc::Rc;

use dominator::{clone, html, with_node, Dom};
use futures_signals::signal::{Mutable, SignalExt};
use futures_signals::signal_vec::{MutableVec, SignalVecExt};
use serde_json::json;
use web_sys::{HtmlInputElement, HtmlSelectElement};

use jobdesk_schema::User;

use crate::common::{events, snackbar, Modal, Spinner};
use crate::query;
use crate::session;
use crate::utils::AsyncLoader;

const USER_FETCH_LIMIT: i64 = 100;

pub struct AdminSupport {
    users: MutableVec<User>,
    search: Mutable<String>,
    editing: Mutable<Option<User>>,
    edit_full_name: Mutable<String>,
    edit_role: Mutable<String>,
    edit_active: Mutable<bool>,
    edit_modal: Rc<Modal>,
    pending_delete: Mutable<Option<i64>>,
    delete_modal: Rc<Modal>,
    spinner: Rc<Spinner>,
    loader: AsyncLoader,
}

impl AdminSupport {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            users: MutableVec::new(),
            search: Mutable::new("".to_string()),
            editing: Mutable::new(None),
            edit_full_name: Mutable::new("".to_string()),
            edit_role: Mutable::new("user".to_string()),
            edit_active: Mutable::new(true),
            edit_modal: Modal::new(),
            pending_delete: Mutable::new(None),
            delete_modal: Modal::new(),
            spinner: Spinner::new(),
            loader: AsyncLoader::new(),
        })
    }

    pub fn fetch(page: Rc<Self>) {
        let search = page.search.get_cloned();
        page.spinner.set_active(true);
        page.loader.load(clone!(page => async move {
            let result = query::fetch_users(0, USER_FETCH_LIMIT, &search).await;
            page.spinner.set_active(false);

            match result {
                Ok(users) => page.users.lock_mut().replace_cloned(users),
                Err(err) => snackbar::show_error(err.message()),
            }
        }));
    }

    fn open_edit(page: Rc<Self>, user: User) {
        page.edit_full_name.set(user.full_name.clone().unwrap_or_default());
        page.edit_role.set(user.role.clone().unwrap_or_else(|| "user".to_string()));
        page.edit_active.set(user.is_active.unwrap_or(true));
        page.editing.set(Some(user));
        page.edit_modal.open();
    }

    fn save_edit(page: Rc<Self>) {
        let Some(user) = page.editing.get_cloned() else {
            return;
        };
        let patch = json!({
            "full_name": page.edit_full_name.get_cloned(),
            "role": page.edit_role.get_cloned(),
            "is_active": page.edit_active.get(),
        });

        page.edit_modal.close();
        page.loader.load(clone!(page => async move {
            match query::update_user(user.id, &patch).await {
                Ok(_) => {
                    snackbar::show("User updated".to_string());
                    page.editing.set(None);
                    Self::fetch(page);
                }
                Err(err) => snackbar::show_error(err.message()),
            }
        }));
    }

    fn delete_confirmed(page: Rc<Self>) {
        let Some(id) = page.pending_delete.get() else {
            return;
        };
        page.delete_modal.close();
        page.loader.load(clone!(page => async move {
            match query::delete_user(id).await {
                Ok(()) => {
                    page.pending_delete.set(None);
                    snackbar::show("User deleted".to_string());
                    Self::fetch(page);
                }
                Err(err) => snackbar::show_error(err.message()),
            }
        }));
    }

    fn render_user(page: Rc<Self>, user: User) -> Dom {
        let id = user.id;
        html!("div", {
            .class("user-row")
            .children(&mut [
                html!("span", {
                    .class("name")
                    .text(user.full_name.as_deref()
                        .or(user.username.as_deref())
                        .unwrap_or("Unnamed account"))
                }),
                html!("span", {
                    .class("email")
                    .text(user.email.as_deref().unwrap_or(""))
                }),
                html!("span", {
                    .class("role")
                    .text(user.role.as_deref().map(session::map_api_role_to_ui).unwrap_or(""))
                }),
                html!("span", {
                    .class("status")
                    .text(if user.is_active.unwrap_or(true) { "active" } else { "disabled" })
                }),
                html!("button", {
                    .text("Edit")
                    .event(clone!(page, user => move |_: events::Click| {
                        Self::open_edit(page.clone(), user.clone());
                    }))
                }),
                html!("button", {
                    .class("danger")
                    .text("Delete")
                    .event(clone!(page => move |_: events::Click| {
                        page.pending_delete.set(Some(id));
                        page.delete_modal.open();
                    }))
                }),
            ])
        })
    }

    fn render_edit_modal(page: Rc<Self>) -> Dom {
        Modal::render(page.edit_modal.clone(), html!("div", {
            .class("edit-user")
            .children(&mut [
                html!("h2", { .text("Edit user") }),
                html!("input" => HtmlInputElement, {
                    .attribute("type", "text")
                    .attribute("placeholder", "Full name")
                    .property_signal("value", page.edit_full_name.signal_cloned())
                    .with_node!(input => {
                        .event(clone!(page => move |_: events::Input| {
                            page.edit_full_name.set(input.value());
                        }))
                    })
                }),
                html!("select" => HtmlSelectElement, {
                    .children(&mut [
                        html!("option", {
                            .attribute("value", "user")
                            .text("Candidate")
                        }),
                        html!("option", {
                            .attribute("value", "admin")
                            .text("Admin")
                        }),
                    ])
                    .property_signal("value", page.edit_role.signal_cloned())
                    .with_node!(select => {
                        .event(clone!(page => move |_: events::Change| {
                            page.edit_role.set(select.value());
                        }))
                    })
                }),
                html!("label", {
                    .children(&mut [
                        html!("input" => HtmlInputElement, {
                            .attribute("type", "checkbox")
                            .property_signal("checked", page.edit_active.signal())
                            .with_node!(input => {
                                .event(clone!(page => move |_: events::Change| {
                                    page.edit_active.set(input.checked());
                                }))
                            })
                        }),
                        html!("span", { .text("Active") }),
                    ])
                }),
                html!("button", {
                    .text("Save")
                    .event(clone!(page => move |_: events::Click| {
                        Self::save_edit(page.clone());
                    }))
                }),
                html!("button", {
                    .text("Cancel")
                    .event(clone!(page => move |_: events::Click| {
                        page.edit_modal.close();
                    }))
                }),
            ])
        }))
    }

    fn render_delete_modal(page: Rc<Self>) -> Dom {
        Modal::render(page.delete_modal.clone(), html!("div", {
            .class("confirm-dialog")
            .children(&mut [
                html!("p", {
                    .text("Delete this account and its profile? This cannot be undone.")
                }),
                html!("button", {
                    .class("danger")
                    .text("Delete")
                    .event(clone!(page => move |_: events::Click| {
                        Self::delete_confirmed(page.clone());
                    }))
                }),
                html!("button", {
                    .text("Cancel")
                    .event(clone!(page => move |_: events::Click| {
                        page.delete_modal.close();
                    }))
                }),
            ])
        }))
    }

    pub fn render(page: Rc<Self>) -> Dom {
        Self::fetch(page.clone());

        html!("div", {
            .class("content")
            .children(&mut [
                html!("h1", { .text("Support") }),
                html!("div", {
                    .class("support-search")
                    .children(&mut [
                        html!("input" => HtmlInputElement, {
                            .attribute("type", "search")
                            .attribute("placeholder", "Search accounts")
                            .property_signal("value", page.search.signal_cloned())
                            .with_node!(input => {
                                .event(clone!(page => move |_: events::Input| {
                                    page.search.set(input.value());
                                }))
                            })
                        }),
                        html!("button", {
                            .text("Search")
                            .event(clone!(page => move |_: events::Click| {
                                Self::fetch(page.clone());
                            }))
                        }),
                    ])
                }),
                Spinner::render(page.spinner.clone()),
                html!("div", {
                    .class("user-list")
                    .children_signal_vec(page.users.signal_vec_cloned().map(clone!(page => move |user| {
                        Self::render_user(page.clone(), user)
                    })))
                }),
                Self::render_edit_modal(page.clone()),
                Self::render_delete_modal(page),
            ])
        })
    }
}
