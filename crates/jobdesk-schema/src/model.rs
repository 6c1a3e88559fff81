use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterUser {
    pub email: Option<String>,
    pub username: String,
    pub password: String,
    pub full_name: Option<String>,
    pub role: String,
    pub mobile_number: Option<String>,
    pub verification_method: String,
}

/// Response of `auth/me` and `auth/my-role`. Every field is optional because
/// the role fallback chain accepts whichever endpoint answers first.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentUser {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub mobile_number: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Job {
    pub id: i64,
    #[serde(default, alias = "title")]
    pub job_title: Option<String>,
    #[serde(default, alias = "company")]
    pub company_name: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub employment_type: Option<String>,
    #[serde(default)]
    pub work_mode: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub experience_required: Option<String>,
    #[serde(default)]
    pub education_required: Option<String>,
    #[serde(default)]
    pub skills_required: Option<String>,
    #[serde(default)]
    pub salary_type: Option<String>,
    #[serde(default)]
    pub salary_min: Option<f64>,
    #[serde(default)]
    pub salary_max: Option<f64>,
    #[serde(default)]
    pub job_summary: Option<String>,
    #[serde(default)]
    pub roles_responsibilities: Option<String>,
    #[serde(default)]
    pub key_requirements: Option<String>,
    #[serde(default)]
    pub application_deadline: Option<String>,
    #[serde(default)]
    pub how_to_apply: Option<String>,
    #[serde(default)]
    pub number_of_openings: Option<i64>,
    #[serde(default)]
    pub hiring_manager: Option<String>,
    #[serde(default)]
    pub recruiter_contact: Option<String>,
    #[serde(default, alias = "status")]
    pub job_status: Option<String>,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub posted_by: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NewJob {
    pub job_title: String,
    pub company_name: String,
    pub industry: String,
    pub employment_type: String,
    pub work_mode: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub experience_required: String,
    pub education_required: String,
    pub skills_required: String,
    pub salary_type: String,
    pub salary_min: f64,
    pub salary_max: f64,
    pub job_summary: String,
    pub roles_responsibilities: String,
    pub key_requirements: String,
    pub application_deadline: Option<String>,
    pub how_to_apply: String,
    pub number_of_openings: i64,
    pub hiring_manager: String,
    pub recruiter_contact: String,
    pub job_status: String,
    pub visibility: String,
    pub tags: String,
}

/// One page of job listings, normalized from whichever envelope the backend
/// chose to answer with.
#[derive(Debug, Clone, Default)]
pub struct JobPage {
    pub jobs: Vec<Job>,
    pub total: i64,
}

impl JobPage {
    /// Accepts `{results, count}`, `{jobs, total}`, `{data, total}`, a bare
    /// array, or a single job object. Anything else is an empty page.
    pub fn from_value(value: Value) -> Self {
        let (items, total) = match &value {
            Value::Object(map) => {
                let list = map
                    .get("results")
                    .or_else(|| map.get("jobs"))
                    .or_else(|| map.get("data"))
                    .and_then(|v| v.as_array())
                    .cloned();
                match list {
                    Some(list) => {
                        let total = map
                            .get("count")
                            .or_else(|| map.get("total"))
                            .and_then(|v| v.as_i64())
                            .unwrap_or(list.len() as i64);
                        (list, total)
                    }
                    // A lone object counts as a one-element list.
                    None => (vec![value.clone()], 1),
                }
            }
            Value::Array(list) => (list.clone(), list.len() as i64),
            _ => (vec![], 0),
        };

        let jobs: Vec<Job> = items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect();
        let total = total.max(jobs.len() as i64);

        Self { jobs, total }
    }

    pub fn total_pages(&self, page_size: i64) -> i64 {
        if self.total <= 0 || page_size <= 0 {
            1
        } else {
            (self.total + page_size - 1) / page_size
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct JobPreferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_location_preferences: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_salary_ctc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice_period: Option<String>,
}

impl JobPreferences {
    pub fn is_empty(&self) -> bool {
        self.preferred_job_title.is_none()
            && self.job_location_preferences.is_none()
            && self.employment_type.is_none()
            && self.expected_salary_ctc.is_none()
            && self.notice_period.is_none()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Education {
    pub degree_qualification: String,
    pub institution: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_of_study: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_year: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Project {
    pub project_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_github_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProfileData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_preferences: Option<JobPreferences>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<Vec<Education>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<Project>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_letter_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_approved: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_rejected: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_deactivated: Option<bool>,
}

/// `users/profile` wraps the account record and the editable profile
/// together; either half may be missing for a fresh account.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FullProfile {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub profile: Option<ProfileData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub notification_type: Option<String>,
    #[serde(default)]
    pub related_job_id: Option<i64>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationPage {
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub unread_count: i64,
}

/// `users/users` answers either `{users: [...]}` or a bare array.
pub fn users_from_value(value: Value) -> Vec<User> {
    let items = match value {
        Value::Object(mut map) => match map.remove("users") {
            Some(Value::Array(list)) => list,
            _ => vec![],
        },
        Value::Array(list) => list,
        _ => vec![],
    };
    items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_job_page_drf_envelope() {
        let page = JobPage::from_value(json!({
            "results": [
                {"id": 1, "job_title": "Backend Engineer"},
                {"id": 2, "job_title": "Data Analyst"},
                {"id": 3, "job_title": "SRE"},
            ],
            "count": 7,
        }));

        assert_eq!(page.jobs.len(), 3);
        assert_eq!(page.total, 7);
        assert_eq!(page.total_pages(10), 1);
    }

    #[test]
    fn test_job_page_bare_array() {
        let page = JobPage::from_value(json!([
            {"id": 4, "job_title": "QA"},
            {"id": 5, "job_title": "PM"},
        ]));

        assert_eq!(page.jobs.len(), 2);
        assert_eq!(page.total, 2);
    }

    #[test]
    fn test_job_page_data_total_envelope() {
        let page = JobPage::from_value(json!({
            "data": [{"id": 9, "title": "Designer", "company": "Acme"}],
            "total": 21,
        }));

        assert_eq!(page.jobs.len(), 1);
        assert_eq!(page.jobs[0].job_title.as_deref(), Some("Designer"));
        assert_eq!(page.jobs[0].company_name.as_deref(), Some("Acme"));
        assert_eq!(page.total, 21);
        assert_eq!(page.total_pages(10), 3);
    }

    #[test]
    fn test_job_page_single_object() {
        let page = JobPage::from_value(json!({"id": 1, "job_title": "Solo"}));

        assert_eq!(page.jobs.len(), 1);
        assert_eq!(page.total, 1);
    }

    #[test]
    fn test_total_pages_never_zero() {
        let page = JobPage::from_value(json!([]));

        assert_eq!(page.total_pages(10), 1);
    }

    #[test]
    fn test_users_from_wrapped_and_bare() {
        let wrapped = users_from_value(json!({"users": [{"id": 1}, {"id": 2}]}));
        let bare = users_from_value(json!([{"id": 3}]));

        assert_eq!(wrapped.len(), 2);
        assert_eq!(bare.len(), 1);
        assert_eq!(bare[0].id, 3);
    }

    #[test]
    fn test_job_preferences_skip_empty_fields() {
        let prefs = JobPreferences {
            preferred_job_title: Some("Engineer".to_string()),
            ..Default::default()
        };

        let value = serde_json::to_value(&prefs).unwrap();
        assert_eq!(value, json!({"preferred_job_title": "Engineer"}));
    }
}
