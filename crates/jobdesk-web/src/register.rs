use std::rc::Rc;

use dominator::{clone, html, routing, with_node, Dom, EventOptions};
use futures_signals::signal::{Mutable, SignalExt};
use web_sys::{HtmlInputElement, HtmlSelectElement};

use jobdesk_schema::RegisterUser;

use crate::common::{events, snackbar, Modal, Route};
use crate::login::is_valid_otp;
use crate::query;
use crate::session;
use crate::utils::AsyncLoader;

/// The account username doubles as the contact handle. Only the field for
/// the chosen verification channel is populated.
pub(crate) fn build_register_payload(
    full_name: &str,
    contact: &str,
    password: &str,
    ui_role: &str,
    verification_method: &str,
) -> RegisterUser {
    let contact = contact.trim().to_string();
    let (email, mobile_number) = if verification_method == "mobile" {
        (None, Some(contact.clone()))
    } else {
        (Some(contact.clone()), None)
    };

    RegisterUser {
        email,
        username: contact,
        password: password.to_string(),
        full_name: Some(full_name.trim().to_string()).filter(|s| !s.is_empty()),
        role: session::map_ui_role_to_api(ui_role).to_string(),
        mobile_number,
        verification_method: verification_method.to_string(),
    }
}

pub struct Register {
    full_name: Mutable<String>,
    contact: Mutable<String>,
    password: Mutable<String>,
    role: Mutable<String>,
    verification_method: Mutable<String>,
    otp: Mutable<String>,
    otp_modal: Rc<Modal>,
    loader: AsyncLoader,
}

impl Register {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            full_name: Mutable::new("".to_string()),
            contact: Mutable::new("".to_string()),
            password: Mutable::new("".to_string()),
            role: Mutable::new(session::ROLE_CANDIDATE.to_string()),
            verification_method: Mutable::new("email".to_string()),
            otp: Mutable::new("".to_string()),
            otp_modal: Modal::new(),
            loader: AsyncLoader::new(),
        })
    }

    pub fn register(register: Rc<Self>) {
        let contact = register.contact.get_cloned();
        let password = register.password.get_cloned();

        if contact.trim().is_empty() {
            snackbar::show_error("Enter your email or mobile number".to_string());
            return;
        }
        if password.len() < 8 {
            snackbar::show_error("Password must be at least 8 characters".to_string());
            return;
        }

        let payload = build_register_payload(
            &register.full_name.get_cloned(),
            &contact,
            &password,
            &register.role.get_cloned(),
            &register.verification_method.get_cloned(),
        );

        register.loader.load(clone!(register => async move {
            match query::register_user(&payload).await {
                Ok(()) => {
                    snackbar::show("Account created, check for your verification code".to_string());
                    register.otp_modal.open();
                }
                Err(err) => snackbar::show_error(format!("Registration failed: {}", err.message())),
            }
        }));
    }

    fn verify(register: Rc<Self>) {
        let contact = register.contact.get_cloned();
        let otp = register.otp.get_cloned();
        if !is_valid_otp(&otp) {
            snackbar::show_error("Enter the 6-digit code".to_string());
            return;
        }
        register.loader.load(clone!(register => async move {
            match query::verify_email_or_mobile(contact.trim(), &otp, None).await {
                Ok(()) => {
                    register.otp_modal.close();
                    snackbar::show("Verified, you can log in now".to_string());
                    routing::go_to_url(&Route::Login.url());
                }
                Err(err) => snackbar::show_error(err.message()),
            }
        }));
    }

    fn resend(register: Rc<Self>) {
        let contact = register.contact.get_cloned();
        register.loader.load(async move {
            match query::resend_otp(contact.trim()).await {
                Ok(()) => snackbar::show("Code resent".to_string()),
                Err(err) => snackbar::show_error(err.message()),
            }
        });
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

    fn render_otp_modal(register: Rc<Self>) -> Dom {
        Modal::render(register.otp_modal.clone(), html!("div", {
            .class("auth-modal")
            .children(&mut [
                html!("h2", {
                    .text("Enter verification code")
                }),
                html!("p", {
                    .text_signal(register.verification_method.signal_cloned().map(|method| {
                        if method == "mobile" {
                            "We sent a 6-digit code to your mobile number".to_string()
                        } else {
                            "We sent a 6-digit code to your email".to_string()
                        }
                    }))
                }),
                Self::render_input(&register.otp, "text", "6-digit code"),
                html!("button", {
                    .text("Verify")
                    .event(clone!(register => move |_: events::Click| {
                        Self::verify(register.clone());
                    }))
                }),
                html!("button", {
                    .class("link")
                    .text("Resend code")
                    .event(clone!(register => move |_: events::Click| {
                        Self::resend(register.clone());
                    }))
                }),
            ])
        }))
    }

    pub fn render(register: Rc<Self>) -> Dom {
        html!("div", {
            .class("main")
            .children(&mut [
                html!("div", {
                    .class("auth-card")
                    .children(&mut [
                        html!("h1", {
                            .text("Create account")
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
                                Self::render_input(&register.full_name, "text", "Full name"),
                                html!("select" => HtmlSelectElement, {
                                    .children(&mut [
                                        html!("option", {
                                            .attribute("value", "email")
                                            .text("Verify by email")
                                        }),
                                        html!("option", {
                                            .attribute("value", "mobile")
                                            .text("Verify by mobile")
                                        }),
                                    ])
                                    .property_signal("value", register.verification_method.signal_cloned())
                                    .with_node!(select => {
                                        .event(clone!(register => move |_: events::Change| {
                                            register.verification_method.set(select.value());
                                        }))
                                    })
                                }),
                                Self::render_input(&register.contact, "text", "Email or mobile number"),
                                Self::render_input(&register.password, "password", "Password"),
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
                                    .property_signal("value", register.role.signal_cloned())
                                    .with_node!(select => {
                                        .event(clone!(register => move |_: events::Change| {
                                            register.role.set(select.value());
                                        }))
                                    })
                                }),
                                html!("button", {
                                    .text("Sign up")
                                    .event_with_options(&EventOptions::preventable(), clone!(register => move |e: events::Click| {
                                        e.prevent_default();
                                        Self::register(register.clone());
                                    }))
                                }),
                            ])
                        }),
                        html!("div", {
                            .class("auth-links")
                            .children(&mut [
                                dominator::link!(Route::Login.url(), {
                                    .text("Already have an account? Log in")
                                }),
                            ])
                        }),
                    ])
                }),
                Self::render_otp_modal(register),
            ])
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_email_registration_payload() {
        let payload =
            build_register_payload("Ada Lovelace", " ada@example.com ", "s3cretpass", "candidate", "email");

        assert_eq!(payload.email.as_deref(), Some("ada@example.com"));
        assert_eq!(payload.mobile_number, None);
        assert_eq!(payload.username, "ada@example.com");
        assert_eq!(payload.role, "user");
        assert_eq!(payload.verification_method, "email");
        assert_eq!(payload.full_name.as_deref(), Some("Ada Lovelace"));
    }

    #[test]
    fn test_mobile_registration_payload() {
        let payload =
            build_register_payload("", "+919812345678", "s3cretpass", "admin", "mobile");

        assert_eq!(payload.email, None);
        assert_eq!(payload.mobile_number.as_deref(), Some("+919812345678"));
        assert_eq!(payload.username, "+919812345678");
        assert_eq!(payload.role, "admin");
        assert_eq!(payload.full_name, None);
    }
}
