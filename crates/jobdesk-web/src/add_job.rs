use std::collections::BTreeMap;
use std::rc::Rc;

use dominator::{clone, html, with_node, Dom, EventOptions};
use futures_signals::signal::{Mutable, SignalExt};
use futures_signals::signal_vec::{MutableVec, SignalVecExt};
use serde_json::json;
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};

use jobdesk_schema::{Job, NewJob};

use crate::common::{events, snackbar, Modal};
use crate::jobs::PAGE_SIZE;
use crate::query::{self, backend_choice, JobFilter};
use crate::utils::AsyncLoader;

const EMPLOYMENT_TYPES: &[&str] = &["Full-time", "Part-time", "Contract", "Internship"];
const WORK_MODES: &[&str] = &["On-site", "Remote", "Hybrid"];
const SALARY_TYPES: &[&str] = &["per month", "per year"];
const VISIBILITIES: &[&str] = &["public", "private"];

/// Form labels become payload keys: lowercased, word runs joined by
/// underscores.
pub(crate) fn snake_case_key(label: &str) -> String {
    label
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

fn parse_salary(value: &str, label: &str) -> Result<f64, String> {
    if value.is_empty() {
        return Err(format!("{} is required", label));
    }
    value
        .parse()
        .map_err(|_| format!("{} must be a number", label))
}

pub(crate) fn build_new_job<F>(value_of: F, status: &str) -> Result<NewJob, String>
where
    F: Fn(&str) -> String,
{
    let get = |key: &str| value_of(key).trim().to_string();

    let job_title = get("job_title");
    if job_title.is_empty() {
        return Err("Job title is required".to_string());
    }
    let company_name = get("company_name");
    if company_name.is_empty() {
        return Err("Company name is required".to_string());
    }

    let salary_min = parse_salary(&get("salary_min"), "Minimum salary")?;
    let salary_max = parse_salary(&get("salary_max"), "Maximum salary")?;
    if salary_max < salary_min {
        return Err("Maximum salary is below the minimum".to_string());
    }

    let openings = get("number_of_openings");
    let number_of_openings = if openings.is_empty() {
        1
    } else {
        openings
            .parse()
            .map_err(|_| "Number of openings must be a whole number".to_string())?
    };

    Ok(NewJob {
        job_title,
        company_name,
        industry: get("industry"),
        employment_type: backend_choice(&get("employment_type")),
        work_mode: backend_choice(&get("work_mode")),
        city: get("city"),
        state: get("state"),
        country: get("country"),
        experience_required: get("experience_required"),
        education_required: get("education_required"),
        skills_required: get("skills_required"),
        salary_type: get("salary_type"),
        salary_min,
        salary_max,
        job_summary: get("job_summary"),
        roles_responsibilities: get("roles_responsibilities"),
        key_requirements: get("key_requirements"),
        application_deadline: Some(get("application_deadline")).filter(|s| !s.is_empty()),
        how_to_apply: get("how_to_apply"),
        number_of_openings,
        hiring_manager: get("hiring_manager"),
        recruiter_contact: get("recruiter_contact"),
        job_status: status.to_lowercase(),
        visibility: get("visibility"),
        tags: get("tags"),
    })
}

pub struct AddJob {
    values: BTreeMap<String, Mutable<String>>,
    published: MutableVec<Job>,
    pending_delete: Mutable<Option<i64>>,
    delete_modal: Rc<Modal>,
    loader: AsyncLoader,
}

impl AddJob {
    pub fn new() -> Rc<Self> {
        let mut values: BTreeMap<String, Mutable<String>> = BTreeMap::new();
        for key in [
            "job_title",
            "company_name",
            "industry",
            "city",
            "state",
            "country",
            "experience_required",
            "education_required",
            "skills_required",
            "salary_min",
            "salary_max",
            "job_summary",
            "roles_responsibilities",
            "key_requirements",
            "application_deadline",
            "how_to_apply",
            "number_of_openings",
            "hiring_manager",
            "recruiter_contact",
            "tags",
        ] {
            values.insert(key.to_string(), Mutable::new("".to_string()));
        }
        values.insert("employment_type".to_string(), Mutable::new(EMPLOYMENT_TYPES[0].to_string()));
        values.insert("work_mode".to_string(), Mutable::new(WORK_MODES[0].to_string()));
        values.insert("salary_type".to_string(), Mutable::new(SALARY_TYPES[0].to_string()));
        values.insert("visibility".to_string(), Mutable::new(VISIBILITIES[0].to_string()));

        Rc::new(Self {
            values,
            published: MutableVec::new(),
            pending_delete: Mutable::new(None),
            delete_modal: Modal::new(),
            loader: AsyncLoader::new(),
        })
    }

    fn value(&self, key: &str) -> &Mutable<String> {
        // Every key is inserted in new().
        &self.values[key]
    }

    fn submit(add_job: Rc<Self>, status: &'static str) {
        let job = match build_new_job(|key| add_job.value(key).get_cloned(), status) {
            Ok(job) => job,
            Err(msg) => {
                snackbar::show_error(msg);
                return;
            }
        };

        add_job.loader.load(clone!(add_job => async move {
            match query::create_job(&job).await {
                Ok(_) => {
                    snackbar::show(if job.job_status == "draft" {
                        "Draft saved".to_string()
                    } else {
                        "Job published".to_string()
                    });
                    for value in add_job.values.values() {
                        value.set("".to_string());
                    }
                    add_job.value("employment_type").set(EMPLOYMENT_TYPES[0].to_string());
                    add_job.value("work_mode").set(WORK_MODES[0].to_string());
                    add_job.value("salary_type").set(SALARY_TYPES[0].to_string());
                    add_job.value("visibility").set(VISIBILITIES[0].to_string());
                    Self::fetch_published(add_job);
                }
                Err(err) => snackbar::show_error(err.message()),
            }
        }));
    }

    pub fn fetch_published(add_job: Rc<Self>) {
        add_job.loader.load(clone!(add_job => async move {
            match query::fetch_my_jobs(&JobFilter::for_page(1, PAGE_SIZE)).await {
                Ok(page) => add_job.published.lock_mut().replace_cloned(page.jobs),
                Err(err) => snackbar::show_error(err.message()),
            }
        }));
    }

    fn unpublish(add_job: Rc<Self>, id: i64) {
        add_job.loader.load(clone!(add_job => async move {
            match query::update_job(id, &json!({"job_status": "draft"})).await {
                Ok(_) => {
                    snackbar::show("Job unpublished".to_string());
                    Self::fetch_published(add_job);
                }
                Err(err) => snackbar::show_error(err.message()),
            }
        }));
    }

    fn delete_confirmed(add_job: Rc<Self>) {
        let Some(id) = add_job.pending_delete.get() else {
            return;
        };
        add_job.delete_modal.close();
        add_job.loader.load(clone!(add_job => async move {
            match query::delete_job(id).await {
                Ok(()) => {
                    add_job.pending_delete.set(None);
                    snackbar::show("Job deleted".to_string());
                    Self::fetch_published(add_job);
                }
                Err(err) => snackbar::show_error(err.message()),
            }
        }));
    }

    fn render_text_input(&self, label: &str, input_type: &str) -> Dom {
        let value = self.value(&snake_case_key(label)).clone();
        html!("label", {
            .class("field")
            .children(&mut [
                html!("span", { .text(label) }),
                html!("input" => HtmlInputElement, {
                    .attribute("type", input_type)
                    .property_signal("value", value.signal_cloned())
                    .with_node!(input => {
                        .event(clone!(value => move |_: events::Input| {
                            value.set(input.value());
                        }))
                    })
                }),
            ])
        })
    }

    fn render_textarea(&self, label: &str) -> Dom {
        let value = self.value(&snake_case_key(label)).clone();
        html!("label", {
            .class("field")
            .children(&mut [
                html!("span", { .text(label) }),
                html!("textarea" => HtmlTextAreaElement, {
                    .property_signal("value", value.signal_cloned())
                    .with_node!(area => {
                        .event(clone!(value => move |_: events::Input| {
                            value.set(area.value());
                        }))
                    })
                }),
            ])
        })
    }

    fn render_select(&self, label: &str, options: &'static [&'static str]) -> Dom {
        let value = self.value(&snake_case_key(label)).clone();
        html!("label", {
            .class("field")
            .children(&mut [
                html!("span", { .text(label) }),
                html!("select" => HtmlSelectElement, {
                    .children(options.iter().copied().map(|option| html!("option", {
                        .attribute("value", option)
                        .text(option)
                    })))
                    .property_signal("value", value.signal_cloned())
                    .with_node!(select => {
                        .event(clone!(value => move |_: events::Change| {
                            value.set(select.value());
                        }))
                    })
                }),
            ])
        })
    }

    fn render_published(add_job: Rc<Self>) -> Dom {
        html!("div", {
            .class("published-jobs")
            .children(&mut [
                html!("h2", { .text("Your postings") }),
            ])
            .children_signal_vec(add_job.published.signal_vec_cloned().map(clone!(add_job => move |job| {
                let id = job.id;
                html!("div", {
                    .class("published-job")
                    .children(&mut [
                        html!("span", {
                            .text(job.job_title.as_deref().unwrap_or("Untitled role"))
                        }),
                        html!("span", {
                            .class("status")
                            .text(job.job_status.as_deref().unwrap_or("active"))
                        }),
                        html!("button", {
                            .text("Unpublish")
                            .event(clone!(add_job => move |_: events::Click| {
                                Self::unpublish(add_job.clone(), id);
                            }))
                        }),
                        html!("button", {
                            .class("danger")
                            .text("Delete")
                            .event(clone!(add_job => move |_: events::Click| {
                                add_job.pending_delete.set(Some(id));
                                add_job.delete_modal.open();
                            }))
                        }),
                    ])
                })
            })))
        })
    }

    fn render_delete_modal(add_job: Rc<Self>) -> Dom {
        Modal::render(add_job.delete_modal.clone(), html!("div", {
            .class("confirm-dialog")
            .children(&mut [
                html!("p", {
                    .text("Delete this job posting? This cannot be undone.")
                }),
                html!("button", {
                    .class("danger")
                    .text("Delete")
                    .event(clone!(add_job => move |_: events::Click| {
                        Self::delete_confirmed(add_job.clone());
                    }))
                }),
                html!("button", {
                    .text("Cancel")
                    .event(clone!(add_job => move |_: events::Click| {
                        add_job.delete_modal.close();
                    }))
                }),
            ])
        }))
    }

    pub fn render(add_job: Rc<Self>) -> Dom {
        Self::fetch_published(add_job.clone());

        html!("div", {
            .class("content")
            .children(&mut [
                html!("h1", { .text("Post a job") }),
                html!("form", {
                    .class("job-form")
                    .event_with_options(&EventOptions::preventable(), |e: events::KeyDown| {
                        if e.key() == "Enter" {
                            e.prevent_default();
                        }
                    })
                    .children(&mut [
                        add_job.render_text_input("Job Title", "text"),
                        add_job.render_text_input("Company Name", "text"),
                        add_job.render_text_input("Industry", "text"),
                        add_job.render_select("Employment Type", EMPLOYMENT_TYPES),
                        add_job.render_select("Work Mode", WORK_MODES),
                        add_job.render_text_input("City", "text"),
                        add_job.render_text_input("State", "text"),
                        add_job.render_text_input("Country", "text"),
                        add_job.render_text_input("Experience Required", "text"),
                        add_job.render_text_input("Education Required", "text"),
                        add_job.render_text_input("Skills Required", "text"),
                        add_job.render_select("Salary Type", SALARY_TYPES),
                        add_job.render_text_input("Salary Min", "number"),
                        add_job.render_text_input("Salary Max", "number"),
                        add_job.render_textarea("Job Summary"),
                        add_job.render_textarea("Roles & Responsibilities"),
                        add_job.render_textarea("Key Requirements"),
                        add_job.render_text_input("Application Deadline", "date"),
                        add_job.render_text_input("How to Apply", "text"),
                        add_job.render_text_input("Number of Openings", "number"),
                        add_job.render_text_input("Hiring Manager", "text"),
                        add_job.render_text_input("Recruiter Contact", "text"),
                        add_job.render_select("Visibility", VISIBILITIES),
                        add_job.render_text_input("Tags", "text"),
                        html!("div", {
                            .class("form-actions")
                            .children(&mut [
                                html!("button", {
                                    .text("Save draft")
                                    .event_with_options(&EventOptions::preventable(), clone!(add_job => move |e: events::Click| {
                                        e.prevent_default();
                                        Self::submit(add_job.clone(), "draft");
                                    }))
                                }),
                                html!("button", {
                                    .text("Publish")
                                    .event_with_options(&EventOptions::preventable(), clone!(add_job => move |e: events::Click| {
                                        e.prevent_default();
                                        Self::submit(add_job.clone(), "active");
                                    }))
                                }),
                            ])
                        }),
                    ])
                }),
                Self::render_published(add_job.clone()),
                Self::render_delete_modal(add_job),
            ])
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;

    fn values(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_snake_case_key() {
        assert_eq!(snake_case_key("Job Title"), "job_title");
        assert_eq!(snake_case_key("Salary (Min)"), "salary_min");
        assert_eq!(snake_case_key("Roles & Responsibilities"), "roles_responsibilities");
        assert_eq!(snake_case_key("  Tags "), "tags");
    }

    #[test]
    fn test_build_new_job_requires_title_and_company() {
        let map = values(&[("salary_min", "100"), ("salary_max", "200")]);
        let err = build_new_job(|k| map.get(k).cloned().unwrap_or_default(), "active")
            .unwrap_err();
        assert_eq!(err, "Job title is required");

        let map = values(&[
            ("job_title", "Engineer"),
            ("salary_min", "100"),
            ("salary_max", "200"),
        ]);
        let err = build_new_job(|k| map.get(k).cloned().unwrap_or_default(), "active")
            .unwrap_err();
        assert_eq!(err, "Company name is required");
    }

    #[test]
    fn test_build_new_job_validates_salary() {
        let map = values(&[
            ("job_title", "Engineer"),
            ("company_name", "Acme"),
            ("salary_min", "abc"),
            ("salary_max", "200"),
        ]);
        let err = build_new_job(|k| map.get(k).cloned().unwrap_or_default(), "active")
            .unwrap_err();
        assert_eq!(err, "Minimum salary must be a number");

        let map = values(&[
            ("job_title", "Engineer"),
            ("company_name", "Acme"),
            ("salary_min", "300"),
            ("salary_max", "200"),
        ]);
        let err = build_new_job(|k| map.get(k).cloned().unwrap_or_default(), "active")
            .unwrap_err();
        assert_eq!(err, "Maximum salary is below the minimum");
    }

    #[test]
    fn test_build_new_job_defaults() {
        let map = values(&[
            ("job_title", " Engineer "),
            ("company_name", "Acme"),
            ("salary_min", "50000"),
            ("salary_max", "80000"),
        ]);
        let job = build_new_job(|k| map.get(k).cloned().unwrap_or_default(), "Draft").unwrap();

        assert_eq!(job.job_title, "Engineer");
        assert_eq!(job.number_of_openings, 1);
        assert_eq!(job.application_deadline, None);
        assert_eq!(job.job_status, "draft");
    }

    #[test]
    fn test_build_new_job_sends_backend_vocabulary() {
        let map = values(&[
            ("job_title", "Engineer"),
            ("company_name", "Acme"),
            ("employment_type", "Full-time"),
            ("work_mode", "On-site"),
            ("salary_min", "50000"),
            ("salary_max", "80000"),
        ]);
        let job = build_new_job(|k| map.get(k).cloned().unwrap_or_default(), "active").unwrap();

        assert_eq!(job.employment_type, "full_time");
        assert_eq!(job.work_mode, "on_site");
        assert_eq!(job.job_status, "active");
    }
}
