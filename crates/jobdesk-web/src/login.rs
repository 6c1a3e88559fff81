use std::rc::Rc;

use dominator::{clone, html, routing, with_node, Dom, EventOptions};
use futures_signals::signal::{Mutable, SignalExt};
use web_sys::{HtmlInputElement, HtmlSelectElement};

use crate::common::{events, snackbar, Modal, Route};
use crate::query;
use crate::session;
use crate::utils::AsyncLoader;

pub(crate) fn is_valid_otp(otp: &str) -> bool {
    otp.len() == 6 && otp.chars().all(|c| c.is_ascii_digit())
}

pub struct Login {
    username: Mutable<String>,
    password: Mutable<String>,
    role: Mutable<String>,
    verify_modal: Rc<Modal>,
    verify_email: Mutable<String>,
    verify_otp: Mutable<String>,
    verify_sent: Mutable<bool>,
    forgot_modal: Rc<Modal>,
    forgot_email: Mutable<String>,
    forgot_otp: Mutable<String>,
    new_password: Mutable<String>,
    forgot_sent: Mutable<bool>,
    loader: AsyncLoader,
}

impl Login {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            username: Mutable::new("".to_string()),
            password: Mutable::new("".to_string()),
            role: Mutable::new(session::ROLE_CANDIDATE.to_string()),
            verify_modal: Modal::new(),
            verify_email: Mutable::new("".to_string()),
            verify_otp: Mutable::new("".to_string()),
            verify_sent: Mutable::new(false),
            forgot_modal: Modal::new(),
            forgot_email: Mutable::new("".to_string()),
            forgot_otp: Mutable::new("".to_string()),
            new_password: Mutable::new("".to_string()),
            forgot_sent: Mutable::new(false),
            loader: AsyncLoader::new(),
        })
    }

    pub fn login(login: Rc<Self>) {
        let username = login.username.get_cloned();
        let password = login.password.get_cloned();
        let selected_role = login.role.get_cloned();

        if username.trim().is_empty() || password.is_empty() {
            snackbar::show_error("Enter your username and password".to_string());
            return;
        }

        login.loader.load(async move {
            let token = match query::user_login(username.clone(), password).await {
                Ok(token) => token,
                Err(err) => {
                    snackbar::show_error(format!("Login failed: {}", err.message()));
                    return;
                }
            };

            session::set_token(&token);

            let resolved = match query::resolve_current_user().await {
                Ok(user) => user,
                Err(err) => {
                    session::clear();
                    snackbar::show_error(format!("Login failed: {}", err.message()));
                    return;
                }
            };

            let Some(api_role) = resolved.role else {
                session::clear();
                snackbar::show_error("Login failed: could not determine account role".to_string());
                return;
            };

            let ui_role = session::map_api_role_to_ui(&api_role).to_string();
            if ui_role != selected_role {
                session::clear();
                snackbar::show_error(format!(
                    "This account is registered as {}, not {}",
                    ui_role, selected_role
                ));
                return;
            }

            session::set_username(&username);
            session::set_role(&api_role);
            if let Some(full_name) = resolved.full_name.as_deref() {
                session::set_full_name(full_name);
            }

            let target = if ui_role == session::ROLE_ADMIN {
                Route::AdminProfiles
            } else {
                Route::Jobs
            };
            routing::go_to_url(&target.url());
        });
    }

    fn send_verification_otp(login: Rc<Self>) {
        let email = login.verify_email.get_cloned();
        if email.trim().is_empty() {
            snackbar::show_error("Enter your email first".to_string());
            return;
        }
        login.loader.load(clone!(login => async move {
            match query::resend_otp(email.trim()).await {
                Ok(()) => {
                    login.verify_sent.set(true);
                    snackbar::show("Verification code sent".to_string());
                }
                Err(err) => snackbar::show_error(err.message()),
            }
        }));
    }

    fn confirm_verification(login: Rc<Self>) {
        let email = login.verify_email.get_cloned();
        let otp = login.verify_otp.get_cloned();
        if !is_valid_otp(&otp) {
            snackbar::show_error("Enter the 6-digit code".to_string());
            return;
        }
        login.loader.load(clone!(login => async move {
            match query::verify_email_or_mobile(email.trim(), &otp, None).await {
                Ok(()) => {
                    login.verify_modal.close();
                    login.verify_otp.set("".to_string());
                    login.verify_sent.set(false);
                    snackbar::show("Email verified, you can log in now".to_string());
                }
                Err(err) => snackbar::show_error(err.message()),
            }
        }));
    }

    fn send_reset_otp(login: Rc<Self>) {
        let email = login.forgot_email.get_cloned();
        if email.trim().is_empty() {
            snackbar::show_error("Enter your email first".to_string());
            return;
        }
        login.loader.load(clone!(login => async move {
            match query::forgot_password(email.trim()).await {
                Ok(()) => {
                    login.forgot_sent.set(true);
                    snackbar::show("Password reset code sent".to_string());
                }
                Err(err) => snackbar::show_error(err.message()),
            }
        }));
    }

    fn confirm_reset(login: Rc<Self>) {
        let email = login.forgot_email.get_cloned();
        let otp = login.forgot_otp.get_cloned();
        let new_password = login.new_password.get_cloned();
        if !is_valid_otp(&otp) {
            snackbar::show_error("Enter the 6-digit code".to_string());
            return;
        }
        if new_password.len() < 8 {
            snackbar::show_error("Password must be at least 8 characters".to_string());
            return;
        }
        login.loader.load(clone!(login => async move {
            match query::reset_password(email.trim(), &otp, &new_password).await {
                Ok(()) => {
                    login.forgot_modal.close();
                    login.forgot_otp.set("".to_string());
                    login.new_password.set("".to_string());
                    login.forgot_sent.set(false);
                    snackbar::show("Password updated, log in with the new one".to_string());
                }
                Err(err) => snackbar::show_error(err.message()),
            }
        }));
    }

    fn render_input(value: &Mutable<String>, input_type: &str, placeholder: &str) -> Dom {
        html!("input" => HtmlInputElement, {
            .attribute("type", input_type)
            .attribute("placeholder", placeholder)
            .property_signal("value", value.signal_cloned())
            .with_node!(input => {
                .event(clone!(value => move |_: events::Input| {
                    value.set(input.value());
                }))
            })
        })
    }

    fn render_verify_modal(login: Rc<Self>) -> Dom {
        Modal::render(login.verify_modal.clone(), html!("div", {
            .class("auth-modal")
            .children(&mut [
                html!("h2", {
                    .text("Verify your email")
                }),
                Self::render_input(&login.verify_email, "email", "Email"),
                html!("button", {
                    .text("Send code")
                    .event(clone!(login => move |_: events::Click| {
                        Self::send_verification_otp(login.clone());
                    }))
                }),
                html!("div", {
                    .visible_signal(login.verify_sent.signal())
                    .children(&mut [
                        Self::render_input(&login.verify_otp, "text", "6-digit code"),
                        html!("button", {
                            .text("Verify")
                            .event(clone!(login => move |_: events::Click| {
                                Self::confirm_verification(login.clone());
                            }))
                        }),
                    ])
                }),
            ])
        }))
    }

    fn render_forgot_modal(login: Rc<Self>) -> Dom {
        Modal::render(login.forgot_modal.clone(), html!("div", {
            .class("auth-modal")
            .children(&mut [
                html!("h2", {
                    .text("Reset password")
                }),
                Self::render_input(&login.forgot_email, "email", "Email"),
                html!("button", {
                    .text("Send code")
                    .event(clone!(login => move |_: events::Click| {
                        Self::send_reset_otp(login.clone());
                    }))
                }),
                html!("div", {
                    .visible_signal(login.forgot_sent.signal())
                    .children(&mut [
                        Self::render_input(&login.forgot_otp, "text", "6-digit code"),
                        Self::render_input(&login.new_password, "password", "New password"),
                        html!("button", {
                            .text("Reset password")
                            .event(clone!(login => move |_: events::Click| {
                                Self::confirm_reset(login.clone());
                            }))
                        }),
                    ])
                }),
            ])
        }))
    }

    pub fn render(login: Rc<Self>) -> Dom {
        html!("div", {
            .class("main")
            .children(&mut [
                html!("div", {
                    .class("auth-card")
                    .children(&mut [
                        html!("h1", {
                            .text("Jobdesk")
                        }),
                        html!("form", {
                            .style("display", "flex")
                            .style("flex-direction", "column")
                            .event_with_options(&EventOptions::preventable(), |e: events::KeyDown| {
                                if e.key() == "Enter" {
                                    e.prevent_default();
                                }
                            })
                            .children(&mut [
                                Self::render_input(&login.username, "text", "Email or mobile number"),
                                Self::render_input(&login.password, "password", "Password"),
                                html!("select" => HtmlSelectElement, {
                                    .children(&mut [
                                        html!("option", {
                                            .attribute("value", session::ROLE_CANDIDATE)
                                            .text("Candidate")
                                        }),
                                        html!("option", {
                                            .attribute("value", session::ROLE_ADMIN)
                                            .text("Admin")
                                        }),
                                    ])
                                    .property_signal("value", login.role.signal_cloned())
                                    .with_node!(select => {
                                        .event(clone!(login => move |_: events::Change| {
                                            login.role.set(select.value());
                                        }))
                                    })
                                }),
                                html!("button", {
                                    .text("Login")
                                    .event_with_options(&EventOptions::preventable(), clone!(login => move |e: events::Click| {
                                        e.prevent_default();
                                        Self::login(login.clone());
                                    }))
                                }),
                            ])
                        }),
                        html!("div", {
                            .class("auth-links")
                            .children(&mut [
                                html!("button", {
                                    .class("link")
                                    .text("Verify email")
                                    .event(clone!(login => move |_: events::Click| {
                                        login.verify_modal.open();
                                    }))
                                }),
                                html!("button", {
                                    .class("link")
                                    .text("Forgot password?")
                                    .event(clone!(login => move |_: events::Click| {
                                        login.forgot_modal.open();
                                    }))
                                }),
                                dominator::link!(Route::Register.url(), {
                                    .text("Create an account")
                                }),
                            ])
                        }),
                    ])
                }),
                Self::render_verify_modal(login.clone()),
                Self::render_forgot_modal(login),
            ])
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_otp_must_be_six_digits() {
        assert!(is_valid_otp("123456"));
        assert!(!is_valid_otp("12345"));
        assert!(!is_valid_otp("1234567"));
        assert!(!is_valid_otp("12345a"));
        assert!(!is_valid_otp(""));
    }
}
