#[macro_use]
extern crate log;

mod add_job;
mod admin_profile_detail;
mod admin_profiles;
mod admin_support;
mod app;
mod common;
mod jobs;
mod login;
mod profile;
#[allow(dead_code)]
mod query;
mod register;
mod request;
mod session;
mod utils;

use utils::{local_storage, window};
use wasm_bindgen::{prelude::*, JsCast};
use web_sys::MediaQueryListEvent;

use app::App;

#[wasm_bindgen(start)]
pub async fn main_js() -> Result<(), JsValue> {
    #[cfg(debug_assertions)]
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());

    utils::initialize_urls();
    utils::apply_theme(local_storage().get("theme").unwrap_throw());

    let closure = Closure::wrap(Box::new(|e: MediaQueryListEvent| {
        if e.matches() {
            utils::body().class_list().add_1("dark").unwrap_throw();
        } else {
            utils::body().class_list().remove_1("dark").unwrap_throw();
        }
    }) as Box<dyn FnMut(_)>);

    if let Ok(Some(media_query_list)) = window().match_media("(prefers-color-scheme: dark)") {
        media_query_list.set_onchange(Some(closure.as_ref().unchecked_ref()))
    }

    closure.forget();

    dominator::append_dom(&dominator::body(), App::render(App::new()));

    Ok(())
}
