use std::cell::Cell;
use std::rc::Rc;

use dominator::{clone, html, svg, Dom};
use futures_signals::signal::{Mutable, SignalExt};
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen_futures::spawn_local;

use crate::common::events;

const DISMISS_AFTER_MS: u32 = 4_000;

thread_local! {
    static SNACKBAR: std::cell::RefCell<Rc<Snackbar>> = std::cell::RefCell::new(Snackbar::new());
}

pub fn show(message: String) {
    SNACKBAR.with(|s| Snackbar::show(s.borrow().clone(), message, "info"));
}

pub fn show_error(message: String) {
    SNACKBAR.with(|s| Snackbar::show(s.borrow().clone(), message, "error"));
}

pub fn render() -> Dom {
    SNACKBAR.with(|s| Snackbar::render(s.borrow().clone()))
}

pub struct Snackbar {
    message: Mutable<Option<String>>,
    level: Mutable<&'static str>,
    epoch: Cell<u64>,
}

impl Snackbar {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            message: Mutable::new(None),
            level: Mutable::new("info"),
            epoch: Cell::new(0),
        })
    }

    /// Replaces whatever is showing and rearms the dismiss timer. The epoch
    /// check keeps a stale timer from closing a newer message.
    pub fn show(snackbar: Rc<Self>, message: String, level: &'static str) {
        let epoch = snackbar.epoch.get() + 1;
        snackbar.epoch.set(epoch);
        snackbar.level.set(level);
        snackbar.message.set(Some(message));

        spawn_local(clone!(snackbar => async move {
            TimeoutFuture::new(DISMISS_AFTER_MS).await;
            if snackbar.epoch.get() == epoch {
                snackbar.message.set(None);
            }
        }));
    }

    pub fn render(snackbar: Rc<Self>) -> Dom {
        html!("div", {
            .class("snackbar")
            .class_signal("error", snackbar.level.signal().map(|level| level == "error"))
            .visible_signal(snackbar.message.signal_cloned().map(|message| message.is_some()))
            .children(&mut [
                html!("div", {
                    .child_signal(snackbar.message.signal_cloned().map(|message| message.map(|msg| html!("span", {
                            .text(msg.as_str())
                        })
                    )))
                    .children(&mut [
                        html!("button", {
                            .event(clone!(snackbar => move |_: events::Click| snackbar.message.set(None)))
                            .children(&mut [
                                svg!("svg", {
                                    .attribute("xmlns", "http://www.w3.org/2000/svg")
                                    .attribute("viewBox", "0 0 24 24")
                                    .attribute("stroke", "currentColor")
                                    .attribute("fill", "none")
                                    .class("icon")
                                    .children(&mut [
                                        svg!("path", {
                                            .attribute("stroke-linecap", "round")
                                            .attribute("stroke-linejoin", "round")
                                            .attribute("stroke-width", "2")
                                            .attribute("d", "M6 18L18 6M6 6l12 12")
                                        }),
                                    ])
                                })
                            ])
                        })
                    ])
                })
            ])
        })
    }
}
