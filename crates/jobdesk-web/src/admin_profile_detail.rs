use std::rc::Rc;

use dominator::{clone, html, link, Dom};
use futures_signals::signal::{Mutable, SignalExt};

use jobdesk_schema::FullProfile;

use crate::common::{snackbar, Route, Spinner};
use crate::query;
use crate::utils::AsyncLoader;

pub struct AdminProfileDetail {
    user_id: i64,
    profile: Mutable<Option<FullProfile>>,
    spinner: Rc<Spinner>,
    loader: AsyncLoader,
}

impl AdminProfileDetail {
    pub fn new(user_id: i64) -> Rc<Self> {
        Rc::new(Self {
            user_id,
            profile: Mutable::new(None),
            spinner: Spinner::new(),
            loader: AsyncLoader::new(),
        })
    }

    pub fn fetch(page: Rc<Self>) {
        let user_id = page.user_id;
        page.spinner.set_active(true);
        page.loader.load(clone!(page => async move {
            let result = query::fetch_profile(Some(user_id)).await;
            page.spinner.set_active(false);

            match result {
                Ok(full) => page.profile.set(Some(full)),
                Err(err) => snackbar::show_error(err.message()),
            }
        }));
    }

    fn render_detail(full: &FullProfile) -> Dom {
        let user = full.user.clone().unwrap_or_default();
        let profile = full.profile.clone().unwrap_or_default();

        let name = profile
            .full_name
            .clone()
            .or_else(|| user.full_name.clone())
            .or_else(|| user.username.clone())
            .unwrap_or_else(|| "Unnamed candidate".to_string());

        let location = [profile.city.as_deref(), profile.state.as_deref(), profile.country.as_deref()]
            .iter()
            .flatten()
            .copied()
            .collect::<Vec<_>>()
            .join(", ");

        html!("div", {
            .class("profile-detail")
            .children(&mut [
                html!("h1", { .text(&name) }),
                html!("span", {
                    .class("headline")
                    .text(profile.headline.as_deref().unwrap_or(""))
                }),
                html!("span", {
                    .class("contact")
                    .text(user.email.as_deref().unwrap_or(""))
                }),
                html!("span", {
                    .class("location")
                    .text(&location)
                }),
                html!("h2", { .text("Experience") }),
                html!("p", {
                    .text(&match (profile.current_job_title.as_deref(), profile.company.as_deref()) {
                        (Some(title), Some(company)) => format!("{} at {}", title, company),
                        (Some(title), None) => title.to_string(),
                        (None, Some(company)) => company.to_string(),
                        (None, None) => "Not provided".to_string(),
                    })
                }),
                html!("h2", { .text("Education") }),
                html!("div", {
                    .children(profile.education.clone().unwrap_or_default().into_iter().map(|entry| {
                        html!("p", {
                            .text(&format!(
                                "{}, {}{}",
                                entry.degree_qualification,
                                entry.institution,
                                entry.field_of_study.map(|f| format!(" ({})", f)).unwrap_or_default(),
                            ))
                        })
                    }))
                }),
                html!("h2", { .text("Skills") }),
                html!("p", {
                    .text(&profile.skills.clone().unwrap_or_default().join(", "))
                }),
                html!("h2", { .text("Projects") }),
                html!("div", {
                    .children(profile.projects.clone().unwrap_or_default().into_iter().map(|project| {
                        html!("p", {
                            .text(&format!(
                                "{}{}",
                                project.project_title,
                                project.live_github_link.map(|l| format!(" - {}", l)).unwrap_or_default(),
                            ))
                        })
                    }))
                }),
            ])
        })
    }

    pub fn render(page: Rc<Self>) -> Dom {
        Self::fetch(page.clone());

        html!("div", {
            .class("content")
            .children(&mut [
                link!(Route::AdminProfiles.url(), {
                    .class("back")
                    .text("Back to profiles")
                }),
                Spinner::render(page.spinner.clone()),
            ])
            .child_signal(page.profile.signal_cloned().map(|profile| {
                profile.as_ref().map(Self::render_detail)
            }))
        })
    }
}
