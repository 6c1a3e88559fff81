use std::rc::Rc;

use dominator::{clone, html, with_node, Dom, EventOptions};
use futures_signals::map_ref;
use futures_signals::signal::{Mutable, SignalExt};
use futures_signals::signal_vec::{MutableVec, SignalVecExt};
use web_sys::HtmlInputElement;

use jobdesk_schema::Job;

use crate::common::{events, snackbar, Modal, Spinner};
use crate::query::{self, backend_choice, JobFilter};
use crate::session;
use crate::utils::{format_posted_at, format_salary, AsyncLoader};

pub const PAGE_SIZE: i64 = 10;

const QUICK_FILTERS: &[&str] = &["Full-time", "Part-time", "Contract", "Internship"];

/// Clicking the active chip clears it.
pub(crate) fn toggle_quick_filter(current: &str, clicked: &str) -> String {
    if current == clicked {
        String::new()
    } else {
        clicked.to_string()
    }
}

pub(crate) fn showing_label(shown: usize, total: i64) -> String {
    format!("Showing {} of {} jobs", shown, total)
}

pub struct Jobs {
    search: Mutable<String>,
    location: Mutable<String>,
    job_type: Mutable<String>,
    experience: Mutable<String>,
    industry: Mutable<String>,
    salary_min: Mutable<String>,
    salary_max: Mutable<String>,
    page: Mutable<i64>,
    total_pages: Mutable<i64>,
    total: Mutable<i64>,
    jobs: MutableVec<Job>,
    selected: Mutable<Option<Job>>,
    detail_modal: Rc<Modal>,
    spinner: Rc<Spinner>,
    loader: AsyncLoader,
}

impl Jobs {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            search: Mutable::new("".to_string()),
            location: Mutable::new("".to_string()),
            job_type: Mutable::new("".to_string()),
            experience: Mutable::new("".to_string()),
            industry: Mutable::new("".to_string()),
            salary_min: Mutable::new("".to_string()),
            salary_max: Mutable::new("".to_string()),
            page: Mutable::new(1),
            total_pages: Mutable::new(1),
            total: Mutable::new(0),
            jobs: MutableVec::new(),
            selected: Mutable::new(None),
            detail_modal: Modal::new(),
            spinner: Spinner::new(),
            loader: AsyncLoader::new(),
        })
    }

    fn current_filter(&self) -> JobFilter {
        JobFilter {
            search: self.search.get_cloned(),
            location: self.location.get_cloned(),
            // Chips carry display casing, the backend filters on its own
            // vocabulary.
            job_type: backend_choice(&self.job_type.get_cloned()),
            experience: self.experience.get_cloned(),
            industry: self.industry.get_cloned(),
            salary_min: self.salary_min.get_cloned(),
            salary_max: self.salary_max.get_cloned(),
            ..JobFilter::for_page(self.page.get(), PAGE_SIZE)
        }
    }

    pub fn fetch(jobs: Rc<Self>) {
        let filter = jobs.current_filter();
        // Admins see their own postings, candidates the public board.
        let mine = session::role().as_deref() == Some("admin");

        jobs.spinner.set_active(true);
        jobs.loader.load(clone!(jobs => async move {
            let result = if mine {
                query::fetch_my_jobs(&filter).await
            } else {
                query::fetch_jobs(&filter).await
            };
            jobs.spinner.set_active(false);

            match result {
                Ok(page) => {
                    jobs.total.set_neq(page.total);
                    jobs.total_pages.set_neq(page.total_pages(PAGE_SIZE));
                    jobs.jobs.lock_mut().replace_cloned(page.jobs);
                }
                Err(err) => snackbar::show_error(err.message()),
            }
        }));
    }

    fn apply_filters(jobs: Rc<Self>) {
        jobs.page.set(1);
        Self::fetch(jobs);
    }

    fn go_to_page(jobs: Rc<Self>, page: i64) {
        let clamped = page.clamp(1, jobs.total_pages.get());
        if clamped != jobs.page.get() {
            jobs.page.set(clamped);
            Self::fetch(jobs);
        }
    }

    fn location_of(job: &Job) -> String {
        let parts = [job.city.as_deref(), job.state.as_deref(), job.country.as_deref()];
        let joined = parts.iter().flatten().copied().collect::<Vec<_>>().join(", ");
        if joined.is_empty() {
            "Location not specified".to_string()
        } else {
            joined
        }
    }

    fn render_card(jobs: Rc<Self>, job: Job) -> Dom {
        html!("div", {
            .class("job-card")
            .event(clone!(jobs, job => move |_: events::Click| {
                jobs.selected.set(Some(job.clone()));
                jobs.detail_modal.open();
            }))
            .children(&mut [
                html!("h3", {
                    .text(job.job_title.as_deref().unwrap_or("Untitled role"))
                }),
                html!("span", {
                    .class("company")
                    .text(job.company_name.as_deref().unwrap_or("Unknown company"))
                }),
                html!("span", {
                    .class("location")
                    .text(&Self::location_of(&job))
                }),
                html!("span", {
                    .class("salary")
                    .text(&format_salary(job.salary_min, job.salary_max, job.salary_type.as_deref()))
                }),
                html!("span", {
                    .class("posted")
                    .text(&format_posted_at(job.created_at.as_deref()))
                }),
            ])
        })
    }

    fn render_detail(jobs: Rc<Self>) -> Dom {
        Modal::render(jobs.detail_modal.clone(), html!("div", {
            .class("job-detail")
            .child_signal(jobs.selected.signal_cloned().map(|selected| selected.map(|job| {
                html!("div", {
                    .children(&mut [
                        html!("h2", {
                            .text(job.job_title.as_deref().unwrap_or("Untitled role"))
                        }),
                        html!("span", {
                            .class("company")
                            .text(job.company_name.as_deref().unwrap_or("Unknown company"))
                        }),
                        html!("span", {
                            .class("meta")
                            .text(&format!(
                                "{} · {} · {}",
                                job.employment_type.as_deref().unwrap_or("Not specified"),
                                job.work_mode.as_deref().unwrap_or("Not specified"),
                                Self::location_of(&job),
                            ))
                        }),
                        html!("span", {
                            .class("salary")
                            .text(&format_salary(job.salary_min, job.salary_max, job.salary_type.as_deref()))
                        }),
                        html!("h4", { .text("Summary") }),
                        html!("p", {
                            .text(job.job_summary.as_deref().unwrap_or("No summary provided"))
                        }),
                        html!("h4", { .text("Roles and responsibilities") }),
                        html!("p", {
                            .text(job.roles_responsibilities.as_deref().unwrap_or("Not specified"))
                        }),
                        html!("h4", { .text("Key requirements") }),
                        html!("p", {
                            .text(job.key_requirements.as_deref().unwrap_or("Not specified"))
                        }),
                        html!("h4", { .text("How to apply") }),
                        html!("p", {
                            .text(job.how_to_apply.as_deref().unwrap_or("Not specified"))
                        }),
                    ])
                })
            })))
        }))
    }

    fn render_filter_input(field: Mutable<String>, kind: &str, placeholder: &str) -> Dom {
        html!("input" => HtmlInputElement, {
            .attribute("type", kind)
            .attribute("placeholder", placeholder)
            .property_signal("value", field.signal_cloned())
            .with_node!(input => {
                .event(move |_: events::Input| {
                    field.set(input.value());
                })
            })
        })
    }

    fn render_filters(jobs: Rc<Self>) -> Dom {
        html!("div", {
            .class("job-filters")
            .children(&mut [
                Self::render_filter_input(jobs.search.clone(), "search", "Search title, company or skills"),
                Self::render_filter_input(jobs.location.clone(), "text", "Location"),
                Self::render_filter_input(jobs.experience.clone(), "text", "Experience"),
                Self::render_filter_input(jobs.industry.clone(), "text", "Industry"),
                Self::render_filter_input(jobs.salary_min.clone(), "number", "Min salary"),
                Self::render_filter_input(jobs.salary_max.clone(), "number", "Max salary"),
                html!("button", {
                    .text("Search")
                    .event_with_options(&EventOptions::preventable(), clone!(jobs => move |e: events::Click| {
                        e.prevent_default();
                        Self::apply_filters(jobs.clone());
                    }))
                }),
            ])
            .children(QUICK_FILTERS.iter().copied().map(|label| {
                html!("button", {
                    .class("chip")
                    .class_signal("active", jobs.job_type.signal_cloned().map(move |current| current == label))
                    .text(label)
                    .event(clone!(jobs => move |_: events::Click| {
                        let next = toggle_quick_filter(&jobs.job_type.get_cloned(), label);
                        jobs.job_type.set(next);
                        Self::apply_filters(jobs.clone());
                    }))
                })
            }))
        })
    }

    fn render_pagination(jobs: Rc<Self>) -> Dom {
        html!("div", {
            .class("pagination")
            .children(&mut [
                html!("button", {
                    .text("Previous")
                    .attribute_signal("disabled", jobs.page.signal().map(|page| (page <= 1).then_some("true")))
                    .event(clone!(jobs => move |_: events::Click| {
                        Self::go_to_page(jobs.clone(), jobs.page.get() - 1);
                    }))
                }),
                html!("span", {
                    .text_signal(jobs.page.signal().map(clone!(jobs => move |page| {
                        format!("Page {} of {}", page, jobs.total_pages.get())
                    })))
                }),
                html!("button", {
                    .text("Next")
                    .attribute_signal("disabled", jobs.page.signal().map(clone!(jobs => move |page| {
                        (page >= jobs.total_pages.get()).then_some("true")
                    })))
                    .event(clone!(jobs => move |_: events::Click| {
                        Self::go_to_page(jobs.clone(), jobs.page.get() + 1);
                    }))
                }),
            ])
        })
    }

    pub fn render(jobs: Rc<Self>) -> Dom {
        Self::fetch(jobs.clone());

        html!("div", {
            .class("content")
            .children(&mut [
                html!("h1", {
                    .text("Jobs")
                }),
                Self::render_filters(jobs.clone()),
                html!("span", {
                    .class("showing")
                    .text_signal(map_ref! {
                        let shown = jobs.jobs.signal_vec_cloned().len(),
                        let total = jobs.total.signal() =>
                        showing_label(*shown, *total)
                    })
                }),
                Spinner::render(jobs.spinner.clone()),
                html!("div", {
                    .class("job-list")
                    .children_signal_vec(jobs.jobs.signal_vec_cloned().map(clone!(jobs => move |job| {
                        Self::render_card(jobs.clone(), job)
                    })))
                }),
                Self::render_pagination(jobs.clone()),
                Self::render_detail(jobs),
            ])
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_quick_filter_toggles_off() {
        assert_eq!(toggle_quick_filter("", "Full-time"), "Full-time");
        assert_eq!(toggle_quick_filter("Full-time", "Full-time"), "");
        assert_eq!(toggle_quick_filter("Full-time", "Contract"), "Contract");
    }

    #[test]
    fn test_showing_label() {
        assert_eq!(showing_label(10, 37), "Showing 10 of 37 jobs");
        assert_eq!(showing_label(0, 0), "Showing 0 of 0 jobs");
    }

    #[test]
    fn test_current_filter_normalizes_job_type() {
        let jobs = Jobs::new();
        jobs.job_type.set("Full-time".to_string());

        let pairs = jobs.current_filter().to_pairs();
        assert!(pairs.contains(&("job_type", "full_time".to_string())));
    }

    #[test]
    fn test_current_filter_carries_advanced_fields() {
        let jobs = Jobs::new();
        jobs.experience.set("3".to_string());
        jobs.industry.set("Software".to_string());
        jobs.salary_min.set("50000".to_string());
        jobs.salary_max.set("80000".to_string());

        let pairs = jobs.current_filter().to_pairs();
        assert!(pairs.contains(&("experience", "3".to_string())));
        assert!(pairs.contains(&("industry", "Software".to_string())));
        assert!(pairs.contains(&("salary_min", "50000".to_string())));
        assert!(pairs.contains(&("salary_max", "80000".to_string())));
    }
}
