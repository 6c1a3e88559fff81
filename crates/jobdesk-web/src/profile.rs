use std::rc::Rc;

use dominator::{clone, html, with_node, Dom, EventOptions};
use futures_signals::signal::{Mutable, SignalExt};
use futures_signals::signal_vec::{MutableVec, SignalVecExt};
use web_sys::HtmlInputElement;

use jobdesk_schema::{Education, JobPreferences, ProfileData, Project};

use crate::common::{events, snackbar, Spinner};
use crate::query;
use crate::session;
use crate::utils::AsyncLoader;

fn trimmed(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Empty strings, empty lists and an all-empty preferences block are
/// dropped before saving so the backend never stores placeholder values.
pub(crate) fn sanitize_profile(profile: ProfileData) -> ProfileData {
    let job_preferences = profile
        .job_preferences
        .map(|prefs| JobPreferences {
            preferred_job_title: prefs.preferred_job_title.as_deref().and_then(trimmed),
            job_location_preferences: prefs.job_location_preferences.as_deref().and_then(trimmed),
            employment_type: prefs.employment_type.as_deref().and_then(trimmed),
            expected_salary_ctc: prefs.expected_salary_ctc.as_deref().and_then(trimmed),
            notice_period: prefs.notice_period.as_deref().and_then(trimmed),
        })
        .filter(|prefs| !prefs.is_empty());

    ProfileData {
        full_name: profile.full_name.as_deref().and_then(trimmed),
        email: profile.email.as_deref().and_then(trimmed),
        headline: profile.headline.as_deref().and_then(trimmed),
        current_job_title: profile.current_job_title.as_deref().and_then(trimmed),
        company: profile.company.as_deref().and_then(trimmed),
        country: profile.country.as_deref().and_then(trimmed),
        state: profile.state.as_deref().and_then(trimmed),
        city: profile.city.as_deref().and_then(trimmed),
        job_preferences,
        education: profile.education.filter(|list| !list.is_empty()),
        skills: profile
            .skills
            .map(|skills| {
                skills
                    .into_iter()
                    .filter_map(|s| trimmed(&s))
                    .collect::<Vec<_>>()
            })
            .filter(|list| !list.is_empty()),
        projects: profile.projects.filter(|list| !list.is_empty()),
        resume_url: profile.resume_url.as_deref().and_then(trimmed),
        cover_letter_url: profile.cover_letter_url.as_deref().and_then(trimmed),
        is_approved: profile.is_approved,
        is_rejected: profile.is_rejected,
        is_deactivated: profile.is_deactivated,
    }
}

/// Share of the seven profile sections that have any content.
pub(crate) fn completion_percent(profile: &ProfileData) -> u8 {
    let has = |value: &Option<String>| value.as_deref().map(str::trim).is_some_and(|s| !s.is_empty());

    let sections = [
        has(&profile.full_name) || has(&profile.headline),
        has(&profile.current_job_title) || has(&profile.company),
        has(&profile.city) || has(&profile.state) || has(&profile.country),
        profile.job_preferences.as_ref().is_some_and(|p| !p.is_empty()),
        profile.education.as_ref().is_some_and(|e| !e.is_empty()),
        profile.skills.as_ref().is_some_and(|s| !s.is_empty())
            || profile.projects.as_ref().is_some_and(|p| !p.is_empty()),
        has(&profile.resume_url) || has(&profile.cover_letter_url),
    ];

    let filled = sections.iter().filter(|&&s| s).count();
    (filled * 100 / sections.len()) as u8
}

pub struct Profile {
    full_name: Mutable<String>,
    headline: Mutable<String>,
    current_job_title: Mutable<String>,
    company: Mutable<String>,
    country: Mutable<String>,
    state: Mutable<String>,
    city: Mutable<String>,
    preferred_job_title: Mutable<String>,
    job_location_preferences: Mutable<String>,
    pref_employment_type: Mutable<String>,
    expected_salary_ctc: Mutable<String>,
    notice_period: Mutable<String>,
    education: MutableVec<Education>,
    new_degree: Mutable<String>,
    new_institution: Mutable<String>,
    new_field_of_study: Mutable<String>,
    projects: MutableVec<Project>,
    new_project_title: Mutable<String>,
    new_project_link: Mutable<String>,
    skills: MutableVec<String>,
    new_skill: Mutable<String>,
    resume_url: Mutable<String>,
    cover_letter_url: Mutable<String>,
    completion: Mutable<u8>,
    spinner: Rc<Spinner>,
    loader: AsyncLoader,
}

impl Profile {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            full_name: Mutable::new("".to_string()),
            headline: Mutable::new("".to_string()),
            current_job_title: Mutable::new("".to_string()),
            company: Mutable::new("".to_string()),
            country: Mutable::new("".to_string()),
            state: Mutable::new("".to_string()),
            city: Mutable::new("".to_string()),
            preferred_job_title: Mutable::new("".to_string()),
            job_location_preferences: Mutable::new("".to_string()),
            pref_employment_type: Mutable::new("".to_string()),
            expected_salary_ctc: Mutable::new("".to_string()),
            notice_period: Mutable::new("".to_string()),
            education: MutableVec::new(),
            new_degree: Mutable::new("".to_string()),
            new_institution: Mutable::new("".to_string()),
            new_field_of_study: Mutable::new("".to_string()),
            projects: MutableVec::new(),
            new_project_title: Mutable::new("".to_string()),
            new_project_link: Mutable::new("".to_string()),
            skills: MutableVec::new(),
            new_skill: Mutable::new("".to_string()),
            resume_url: Mutable::new("".to_string()),
            cover_letter_url: Mutable::new("".to_string()),
            completion: Mutable::new(0),
            spinner: Spinner::new(),
            loader: AsyncLoader::new(),
        })
    }

    fn apply(&self, data: ProfileData) {
        let set = |target: &Mutable<String>, value: Option<String>| {
            target.set(value.unwrap_or_default());
        };

        self.completion.set(completion_percent(&data));

        set(&self.full_name, data.full_name);
        set(&self.headline, data.headline);
        set(&self.current_job_title, data.current_job_title);
        set(&self.company, data.company);
        set(&self.country, data.country);
        set(&self.state, data.state);
        set(&self.city, data.city);

        let prefs = data.job_preferences.unwrap_or_default();
        set(&self.preferred_job_title, prefs.preferred_job_title);
        set(&self.job_location_preferences, prefs.job_location_preferences);
        set(&self.pref_employment_type, prefs.employment_type);
        set(&self.expected_salary_ctc, prefs.expected_salary_ctc);
        set(&self.notice_period, prefs.notice_period);

        set(&self.resume_url, data.resume_url);
        set(&self.cover_letter_url, data.cover_letter_url);

        self.education
            .lock_mut()
            .replace_cloned(data.education.unwrap_or_default());
        self.projects
            .lock_mut()
            .replace_cloned(data.projects.unwrap_or_default());
        self.skills
            .lock_mut()
            .replace_cloned(data.skills.unwrap_or_default());
    }

    fn collect(&self) -> ProfileData {
        sanitize_profile(ProfileData {
            full_name: Some(self.full_name.get_cloned()),
            email: None,
            headline: Some(self.headline.get_cloned()),
            current_job_title: Some(self.current_job_title.get_cloned()),
            company: Some(self.company.get_cloned()),
            country: Some(self.country.get_cloned()),
            state: Some(self.state.get_cloned()),
            city: Some(self.city.get_cloned()),
            job_preferences: Some(JobPreferences {
                preferred_job_title: Some(self.preferred_job_title.get_cloned()),
                job_location_preferences: Some(self.job_location_preferences.get_cloned()),
                employment_type: Some(self.pref_employment_type.get_cloned()),
                expected_salary_ctc: Some(self.expected_salary_ctc.get_cloned()),
                notice_period: Some(self.notice_period.get_cloned()),
            }),
            education: Some(self.education.lock_ref().to_vec()),
            skills: Some(self.skills.lock_ref().to_vec()),
            projects: Some(self.projects.lock_ref().to_vec()),
            resume_url: Some(self.resume_url.get_cloned()),
            cover_letter_url: Some(self.cover_letter_url.get_cloned()),
            is_approved: None,
            is_rejected: None,
            is_deactivated: None,
        })
    }

    pub fn fetch(profile: Rc<Self>) {
        profile.spinner.set_active(true);
        profile.loader.load(clone!(profile => async move {
            let result = query::fetch_profile(None).await;
            profile.spinner.set_active(false);

            match result {
                Ok(full) => {
                    profile.apply(full.profile.unwrap_or_default());
                }
                Err(err) => snackbar::show_error(err.message()),
            }
        }));
    }

    fn save(profile: Rc<Self>) {
        let data = profile.collect();
        profile.loader.load(clone!(profile => async move {
            match query::save_profile(&data).await {
                Ok(()) => {
                    if let Some(full_name) = data.full_name.as_deref() {
                        session::set_full_name(full_name);
                    }
                    profile.completion.set(completion_percent(&data));
                    snackbar::show("Profile saved".to_string());
                }
                Err(err) => snackbar::show_error(err.message()),
            }
        }));
    }

    fn add_education(&self) {
        let degree = self.new_degree.get_cloned().trim().to_string();
        let institution = self.new_institution.get_cloned().trim().to_string();
        if degree.is_empty() || institution.is_empty() {
            snackbar::show_error("Degree and institution are required".to_string());
            return;
        }
        self.education.lock_mut().push_cloned(Education {
            degree_qualification: degree,
            institution,
            field_of_study: trimmed(&self.new_field_of_study.get_cloned()),
            start_year: None,
            end_year: None,
        });
        self.new_degree.set("".to_string());
        self.new_institution.set("".to_string());
        self.new_field_of_study.set("".to_string());
    }

    fn add_project(&self) {
        let title = self.new_project_title.get_cloned().trim().to_string();
        if title.is_empty() {
            snackbar::show_error("Project title is required".to_string());
            return;
        }
        self.projects.lock_mut().push_cloned(Project {
            project_title: title,
            live_github_link: trimmed(&self.new_project_link.get_cloned()),
            description: None,
        });
        self.new_project_title.set("".to_string());
        self.new_project_link.set("".to_string());
    }

    fn add_skill(&self) {
        let Some(skill) = trimmed(&self.new_skill.get_cloned()) else {
            return;
        };
        let mut skills = self.skills.lock_mut();
        if !skills.iter().any(|s| s.eq_ignore_ascii_case(&skill)) {
            skills.push_cloned(skill);
        }
        drop(skills);
        self.new_skill.set("".to_string());
    }

    fn render_input(value: &Mutable<String>, placeholder: &str) -> Dom {
        html!("input" => HtmlInputElement, {
            .attribute("type", "text")
            .attribute("placeholder", placeholder)
            .property_signal("value", value.signal_cloned())
            .with_node!(input => {
                .event(clone!(value => move |_: events::Input| {
                    value.set(input.value());
                }))
            })
        })
    }

    fn render_education(profile: Rc<Self>) -> Dom {
        html!("section", {
            .class("profile-section")
            .children(&mut [
                html!("h2", { .text("Education") }),
            ])
            .children_signal_vec(profile.education.signal_vec_cloned().enumerate().map(clone!(profile => move |(index, entry)| {
                html!("div", {
                    .class("profile-entry")
                    .children(&mut [
                        html!("span", {
                            .text(&format!("{}, {}", entry.degree_qualification, entry.institution))
                        }),
                        html!("button", {
                            .text("Remove")
                            .event(clone!(profile, index => move |_: events::Click| {
                                if let Some(index) = index.get() {
                                    profile.education.lock_mut().remove(index);
                                }
                            }))
                        }),
                    ])
                })
            })))
            .children(&mut [
                html!("div", {
                    .class("profile-entry-form")
                    .children(&mut [
                        Self::render_input(&profile.new_degree, "Degree or qualification"),
                        Self::render_input(&profile.new_institution, "Institution"),
                        Self::render_input(&profile.new_field_of_study, "Field of study"),
                        html!("button", {
                            .text("Add education")
                            .event(clone!(profile => move |_: events::Click| {
                                profile.add_education();
                            }))
                        }),
                    ])
                }),
            ])
        })
    }

    fn render_projects(profile: Rc<Self>) -> Dom {
        html!("section", {
            .class("profile-section")
            .children(&mut [
                html!("h2", { .text("Projects") }),
            ])
            .children_signal_vec(profile.projects.signal_vec_cloned().enumerate().map(clone!(profile => move |(index, project)| {
                html!("div", {
                    .class("profile-entry")
                    .children(&mut [
                        html!("span", {
                            .text(&project.project_title)
                        }),
                        html!("button", {
                            .text("Remove")
                            .event(clone!(profile, index => move |_: events::Click| {
                                if let Some(index) = index.get() {
                                    profile.projects.lock_mut().remove(index);
                                }
                            }))
                        }),
                    ])
                })
            })))
            .children(&mut [
                html!("div", {
                    .class("profile-entry-form")
                    .children(&mut [
                        Self::render_input(&profile.new_project_title, "Project title"),
                        Self::render_input(&profile.new_project_link, "Live or GitHub link"),
                        html!("button", {
                            .text("Add project")
                            .event(clone!(profile => move |_: events::Click| {
                                profile.add_project();
                            }))
                        }),
                    ])
                }),
            ])
        })
    }

    fn render_skills(profile: Rc<Self>) -> Dom {
        html!("section", {
            .class("profile-section")
            .children(&mut [
                html!("h2", { .text("Skills") }),
                html!("div", {
                    .class("skills")
                    .children_signal_vec(profile.skills.signal_vec_cloned().enumerate().map(clone!(profile => move |(index, skill)| {
                        html!("span", {
                            .class("chip")
                            .text(&skill)
                            .event(clone!(profile, index => move |_: events::Click| {
                                if let Some(index) = index.get() {
                                    profile.skills.lock_mut().remove(index);
                                }
                            }))
                        })
                    })))
                }),
                html!("div", {
                    .class("profile-entry-form")
                    .children(&mut [
                        Self::render_input(&profile.new_skill, "Add a skill"),
                        html!("button", {
                            .text("Add")
                            .event(clone!(profile => move |_: events::Click| {
                                profile.add_skill();
                            }))
                        }),
                    ])
                }),
            ])
        })
    }

    pub fn render(profile: Rc<Self>) -> Dom {
        Self::fetch(profile.clone());

        html!("div", {
            .class("content")
            .children(&mut [
                html!("h1", { .text("My profile") }),
                html!("div", {
                    .class("completion")
                    .text_signal(profile.completion.signal().map(|percent| {
                        format!("Profile {}% complete", percent)
                    }))
                }),
                Spinner::render(profile.spinner.clone()),
                html!("form", {
                    .class("profile-form")
                    .event_with_options(&EventOptions::preventable(), |e: events::KeyDown| {
                        if e.key() == "Enter" {
                            e.prevent_default();
                        }
                    })
                    .children(&mut [
                        html!("section", {
                            .class("profile-section")
                            .children(&mut [
                                html!("h2", { .text("Basics") }),
                                Self::render_input(&profile.full_name, "Full name"),
                                Self::render_input(&profile.headline, "Headline"),
                                Self::render_input(&profile.current_job_title, "Current job title"),
                                Self::render_input(&profile.company, "Company"),
                                Self::render_input(&profile.city, "City"),
                                Self::render_input(&profile.state, "State"),
                                Self::render_input(&profile.country, "Country"),
                            ])
                        }),
                        html!("section", {
                            .class("profile-section")
                            .children(&mut [
                                html!("h2", { .text("Job preferences") }),
                                Self::render_input(&profile.preferred_job_title, "Preferred job title"),
                                Self::render_input(&profile.job_location_preferences, "Preferred locations"),
                                Self::render_input(&profile.pref_employment_type, "Employment type"),
                                Self::render_input(&profile.expected_salary_ctc, "Expected salary (CTC)"),
                                Self::render_input(&profile.notice_period, "Notice period"),
                            ])
                        }),
                        Self::render_education(profile.clone()),
                        Self::render_projects(profile.clone()),
                        Self::render_skills(profile.clone()),
                        html!("section", {
                            .class("profile-section")
                            .children(&mut [
                                html!("h2", { .text("Documents") }),
                                Self::render_input(&profile.resume_url, "Resume URL"),
                                Self::render_input(&profile.cover_letter_url, "Cover letter URL"),
                            ])
                        }),
                        html!("button", {
                            .text("Save profile")
                            .event_with_options(&EventOptions::preventable(), clone!(profile => move |e: events::Click| {
                                e.prevent_default();
                                Self::save(profile.clone());
                            }))
                        }),
                    ])
                }),
            ])
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_sanitize_drops_empty_values() {
        let sanitized = sanitize_profile(ProfileData {
            full_name: Some("  Ada Lovelace ".to_string()),
            headline: Some("   ".to_string()),
            skills: Some(vec!["Rust".to_string(), "  ".to_string()]),
            education: Some(vec![]),
            job_preferences: Some(JobPreferences {
                preferred_job_title: Some("".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        });

        assert_eq!(sanitized.full_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(sanitized.headline, None);
        assert_eq!(sanitized.skills, Some(vec!["Rust".to_string()]));
        assert_eq!(sanitized.education, None);
        assert!(sanitized.job_preferences.is_none());
    }

    #[test]
    fn test_completion_percent() {
        assert_eq!(completion_percent(&ProfileData::default()), 0);

        let partial = ProfileData {
            full_name: Some("Ada".to_string()),
            city: Some("Pune".to_string()),
            skills: Some(vec!["Rust".to_string()]),
            ..Default::default()
        };
        assert_eq!(completion_percent(&partial), 42);

        let full = ProfileData {
            full_name: Some("Ada".to_string()),
            current_job_title: Some("Engineer".to_string()),
            city: Some("Pune".to_string()),
            job_preferences: Some(JobPreferences {
                notice_period: Some("30 days".to_string()),
                ..Default::default()
            }),
            education: Some(vec![Education {
                degree_qualification: "BSc".to_string(),
                institution: "University".to_string(),
                ..Default::default()
            }]),
            skills: Some(vec!["Rust".to_string()]),
            resume_url: Some("https://example.com/resume.pdf".to_string()),
            ..Default::default()
        };
        assert_eq!(completion_percent(&full), 100);
    }

    #[test]
    fn test_documents_survive_apply_and_collect() {
        let profile = Profile::new();
        profile.apply(ProfileData {
            full_name: Some("Ada".to_string()),
            resume_url: Some("https://example.com/resume.pdf".to_string()),
            cover_letter_url: Some("https://example.com/cover.pdf".to_string()),
            ..Default::default()
        });

        let collected = profile.collect();
        assert_eq!(
            collected.resume_url.as_deref(),
            Some("https://example.com/resume.pdf")
        );
        assert_eq!(
            collected.cover_letter_url.as_deref(),
            Some("https://example.com/cover.pdf")
        );
    }
}
