use std::rc::Rc;

use dominator::{clone, html, Dom};
use futures_signals::signal::{Mutable, SignalExt};
use futures_signals::signal_vec::{MutableVec, SignalVecExt};

use jobdesk_schema::Notification;

use crate::common::{events, snackbar};
use crate::query;
use crate::utils::AsyncLoader;

const PAGE_LIMIT: i64 = 20;

pub struct NotificationList {
    open: Mutable<bool>,
    notifications: MutableVec<Notification>,
    unread_count: Mutable<i64>,
    loader: AsyncLoader,
}

impl NotificationList {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            open: Mutable::new(false),
            notifications: MutableVec::new(),
            unread_count: Mutable::new(0),
            loader: AsyncLoader::new(),
        })
    }

    pub fn fetch(list: Rc<Self>) {
        list.loader.load(clone!(list => async move {
            match query::fetch_notifications(0, PAGE_LIMIT).await {
                Ok(page) => {
                    list.unread_count.set_neq(page.unread_count);
                    list.notifications.lock_mut().replace_cloned(page.notifications);
                }
                Err(err) => {
                    snackbar::show_error(err.message());
                }
            }
        }));
    }

    fn mark_read(list: Rc<Self>, id: i64) {
        list.loader.load(clone!(list => async move {
            match query::mark_notification_read(id).await {
                Ok(()) => Self::fetch(list),
                Err(err) => snackbar::show_error(err.message()),
            }
        }));
    }

    fn mark_all_read(list: Rc<Self>) {
        list.loader.load(clone!(list => async move {
            match query::mark_all_notifications_read().await {
                Ok(()) => Self::fetch(list),
                Err(err) => snackbar::show_error(err.message()),
            }
        }));
    }

    fn render_item(list: Rc<Self>, notification: Notification) -> Dom {
        html!("div", {
            .class("notification")
            .class_signal("unread", futures_signals::signal::always(!notification.is_read))
            .children(&mut [
                html!("span", {
                    .class("title")
                    .text(&notification.title)
                }),
                html!("p", {
                    .text(&notification.message)
                }),
            ])
            .apply_if(!notification.is_read, |dom| {
                let id = notification.id;
                dom.children(&mut [
                    html!("button", {
                        .text("Mark read")
                        .event(clone!(list => move |_: events::Click| {
                            Self::mark_read(list.clone(), id);
                        }))
                    })
                ])
            })
        })
    }

    pub fn render(list: Rc<Self>) -> Dom {
        html!("div", {
            .class("notifications")
            .children(&mut [
                html!("button", {
                    .class("bell")
                    .event(clone!(list => move |_: events::Click| {
                        let open = !list.open.get();
                        list.open.set(open);
                        if open {
                            Self::fetch(list.clone());
                        }
                    }))
                    .children(&mut [
                        html!("span", {
                            .text("Notifications")
                        }),
                        html!("span", {
                            .class("badge")
                            .visible_signal(list.unread_count.signal().map(|count| count > 0))
                            .text_signal(list.unread_count.signal().map(|count| count.to_string()))
                        }),
                    ])
                }),
                html!("div", {
                    .class("notification-panel")
                    .visible_signal(list.open.signal())
                    .children(&mut [
                        html!("button", {
                            .text("Mark all as read")
                            .event(clone!(list => move |_: events::Click| {
                                Self::mark_all_read(list.clone());
                            }))
                        }),
                    ])
                    .children_signal_vec(list.notifications.signal_vec_cloned().map(clone!(list => move |notification| {
                        Self::render_item(list.clone(), notification)
                    })))
                    .child_signal(list.notifications.signal_vec_cloned().is_empty().map(|empty| {
                        empty.then(|| html!("span", {
                            .class("empty")
                            .text("No notifications yet")
                        }))
                    }))
                }),
            ])
        })
    }
}
