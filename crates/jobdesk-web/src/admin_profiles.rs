use std::rc::Rc;

use dominator::{clone, html, link, with_node, Dom};
use futures::future::join_all;
use futures_signals::signal::{Mutable, SignalExt};
use futures_signals::signal_vec::{MutableVec, SignalVecExt};
use web_sys::HtmlInputElement;

use jobdesk_schema::{ProfileData, User};

use crate::common::{events, snackbar, Route, Spinner};
use crate::query;
use crate::utils::AsyncLoader;

const USER_FETCH_LIMIT: i64 = 100;

#[derive(Clone)]
pub struct ProfileRow {
    pub user: User,
    pub profile: Option<ProfileData>,
}

impl ProfileRow {
    fn display_name(&self) -> String {
        self.profile
            .as_ref()
            .and_then(|p| p.full_name.clone())
            .or_else(|| self.user.full_name.clone())
            .or_else(|| self.user.username.clone())
            .unwrap_or_else(|| format!("User #{}", self.user.id))
    }
}

/// Case-insensitive match over name, email, headline and skills. An empty
/// needle matches everything.
pub(crate) fn matches_filter(row: &ProfileRow, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    let mut haystack = vec![
        row.user.username.clone(),
        row.user.email.clone(),
        row.user.full_name.clone(),
    ];
    if let Some(profile) = &row.profile {
        haystack.push(profile.full_name.clone());
        haystack.push(profile.headline.clone());
        haystack.push(profile.current_job_title.clone());
        if let Some(skills) = &profile.skills {
            haystack.extend(skills.iter().cloned().map(Some));
        }
    }

    haystack
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
}

pub struct AdminProfiles {
    rows: MutableVec<ProfileRow>,
    filter: Mutable<String>,
    spinner: Rc<Spinner>,
    loader: AsyncLoader,
}

impl AdminProfiles {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            rows: MutableVec::new(),
            filter: Mutable::new("".to_string()),
            spinner: Spinner::new(),
            loader: AsyncLoader::new(),
        })
    }

    /// One profile request per user. A failed profile fetch still shows the
    /// account row, it just has no profile details.
    pub fn fetch(page: Rc<Self>) {
        page.spinner.set_active(true);
        page.loader.load(clone!(page => async move {
            let users = match query::fetch_users(0, USER_FETCH_LIMIT, "").await {
                Ok(users) => users,
                Err(err) => {
                    page.spinner.set_active(false);
                    snackbar::show_error(err.message());
                    return;
                }
            };

            let profiles = join_all(users.iter().map(|user| query::fetch_profile(Some(user.id)))).await;

            let rows = users
                .into_iter()
                .zip(profiles)
                .map(|(user, result)| ProfileRow {
                    user,
                    profile: result.ok().and_then(|full| full.profile),
                })
                .collect();

            page.spinner.set_active(false);
            page.rows.lock_mut().replace_cloned(rows);
        }));
    }

    fn render_row(row: ProfileRow) -> Dom {
        let skills = row
            .profile
            .as_ref()
            .and_then(|p| p.skills.clone())
            .unwrap_or_default()
            .join(", ");

        link!(Route::AdminProfileDetail(row.user.id).url(), {
            .class("profile-row")
            .children(&mut [
                html!("span", {
                    .class("name")
                    .text(&row.display_name())
                }),
                html!("span", {
                    .class("headline")
                    .text(row.profile.as_ref().and_then(|p| p.headline.as_deref()).unwrap_or(""))
                }),
                html!("span", {
                    .class("skills")
                    .text(&skills)
                }),
            ])
        })
    }

    pub fn render(page: Rc<Self>) -> Dom {
        Self::fetch(page.clone());

        html!("div", {
            .class("content")
            .children(&mut [
                html!("h1", { .text("Candidate profiles") }),
                html!("input" => HtmlInputElement, {
                    .attribute("type", "search")
                    .attribute("placeholder", "Filter by name, headline or skill")
                    .property_signal("value", page.filter.signal_cloned())
                    .with_node!(input => {
                        .event(clone!(page => move |_: events::Input| {
                            page.filter.set(input.value());
                        }))
                    })
                }),
                Spinner::render(page.spinner.clone()),
                html!("div", {
                    .class("profile-list")
                    .children_signal_vec(page.rows.signal_vec_cloned()
                        .filter_signal_cloned(clone!(page => move |row| {
                            let row = row.clone();
                            page.filter.signal_cloned().map(move |needle| matches_filter(&row, &needle))
                        }))
                        .map(Self::render_row))
                }),
            ])
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn row(username: &str, headline: Option<&str>, skills: Vec<&str>) -> ProfileRow {
        ProfileRow {
            user: User {
                id: 1,
                username: Some(username.to_string()),
                ..Default::default()
            },
            profile: Some(ProfileData {
                headline: headline.map(str::to_string),
                skills: Some(skills.into_iter().map(str::to_string).collect()),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let r = row("ada@example.com", None, vec![]);
        assert!(matches_filter(&r, ""));
        assert!(matches_filter(&r, "   "));
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let r = row("ada@example.com", Some("Systems Engineer"), vec!["Rust"]);
        assert!(matches_filter(&r, "ADA"));
        assert!(matches_filter(&r, "systems"));
        assert!(matches_filter(&r, "rust"));
        assert!(!matches_filter(&r, "python"));
    }

    #[test]
    fn test_filter_without_profile() {
        let r = ProfileRow {
            user: User {
                id: 2,
                email: Some("bob@example.com".to_string()),
                ..Default::default()
            },
            profile: None,
        };
        assert!(matches_filter(&r, "bob"));
        assert!(!matches_filter(&r, "rust"));
    }
}
