use reqwest::Method;
use serde_json::{json, Value};
use wasm_bindgen::UnwrapThrowExt;

use jobdesk_schema::*;

use crate::request::{post_form, request_json, require_token, RequestError};
use crate::utils::api_host;

fn endpoint(path: &str) -> String {
    format!("{}/{}", api_host(), path)
}

fn decode<T: serde::de::DeserializeOwned>(data: Option<Value>) -> Result<T, RequestError> {
    Ok(serde_json::from_value(data.unwrap_or(Value::Null))?)
}

async fn get_authed(url: &str) -> Result<Option<Value>, RequestError> {
    let token = require_token()?;
    request_json(Method::GET, url, Some(&token), None).await
}

/// Serializes only defined, non-empty values into the query string.
fn to_query_string(pairs: &[(&str, String)]) -> String {
    let params = web_sys::UrlSearchParams::new().unwrap_throw();
    for (key, value) in pairs {
        params.append(key, value);
    }
    params.to_string().into()
}

pub async fn user_login(username: String, password: String) -> Result<String, RequestError> {
    let data = post_form(
        &endpoint("auth/login"),
        &[("username", username.as_str()), ("password", password.as_str())],
    )
    .await?;

    let token: Token = decode(data)?;
    Ok(token.access_token)
}

pub async fn register_user(user: &RegisterUser) -> Result<(), RequestError> {
    let url = endpoint("auth/register");
    let payload = serde_json::to_value(user)?;

    match request_json(Method::POST, &url, None, Some(&payload)).await {
        Ok(_) => Ok(()),
        Err(err) => {
            // Some backend builds reject nulls for the unused contact field;
            // retry once with empty strings in their place.
            debug!("register rejected ({}), retrying with empty contact fields", err);
            let mut fallback = user.clone();
            fallback.email = Some(fallback.email.unwrap_or_default());
            fallback.mobile_number = Some(fallback.mobile_number.unwrap_or_default());
            let payload = serde_json::to_value(&fallback)?;
            request_json(Method::POST, &url, None, Some(&payload)).await?;
            Ok(())
        }
    }
}

/// Payload shapes the verification endpoint is known to accept, in probing
/// order. The backend's field name for the code is unstable across builds.
pub(crate) fn verification_payloads(target: &str, otp: &str, user_id: Option<i64>) -> Vec<Value> {
    let field = if target.contains('@') {
        "email"
    } else {
        "mobile_number"
    };
    vec![
        json!({field: target, "otp": otp}),
        json!({field: target, "verification_code": otp}),
        json!({field: target, "code": otp}),
        json!({field: target, "token": otp}),
        json!({field: target, "otp": otp, "user_id": user_id}),
    ]
}

pub(crate) fn should_try_next_shape(err: &RequestError) -> bool {
    err.status() == Some(400)
}

/// Probes the verify endpoint with each payload shape, advancing only on a
/// 400 response. Any other failure aborts immediately; exhausting every
/// shape is its own error.
pub async fn verify_email_or_mobile(
    target: &str,
    otp: &str,
    user_id: Option<i64>,
) -> Result<(), RequestError> {
    let url = endpoint("auth/verify-email");

    for payload in verification_payloads(target, otp, user_id) {
        match request_json(Method::POST, &url, None, Some(&payload)).await {
            Ok(_) => return Ok(()),
            Err(err) if should_try_next_shape(&err) => {
                debug!("verify-email rejected shape, trying next");
                continue;
            }
            Err(err) => return Err(err),
        }
    }

    Err(RequestError::VerificationExhausted)
}

fn contact_payload(target: &str) -> Value {
    if target.contains('@') {
        json!({"email": target})
    } else {
        json!({"mobile_number": target})
    }
}

pub async fn resend_otp(target: &str) -> Result<(), RequestError> {
    request_json(
        Method::POST,
        &endpoint("auth/resend-otp"),
        None,
        Some(&contact_payload(target)),
    )
    .await?;
    Ok(())
}

pub async fn check_email(email: &str) -> Result<(), RequestError> {
    request_json(
        Method::POST,
        &endpoint("auth/check-email"),
        None,
        Some(&json!({"email": email})),
    )
    .await?;
    Ok(())
}

pub async fn forgot_password(email: &str) -> Result<(), RequestError> {
    request_json(
        Method::POST,
        &endpoint("auth/forgot-password-otp"),
        None,
        Some(&json!({"email": email})),
    )
    .await?;
    Ok(())
}

pub async fn reset_password(
    email: &str,
    otp: &str,
    new_password: &str,
) -> Result<(), RequestError> {
    request_json(
        Method::POST,
        &endpoint("auth/reset-password"),
        None,
        Some(&json!({"email": email, "otp": otp, "new_password": new_password})),
    )
    .await?;
    Ok(())
}

pub async fn fetch_me() -> Result<CurrentUser, RequestError> {
    decode(get_authed(&endpoint("auth/me")).await?)
}

pub async fn fetch_my_role() -> Result<CurrentUser, RequestError> {
    decode(get_authed(&endpoint("auth/my-role")).await?)
}

pub async fn check_role(role: &str) -> Result<Option<Value>, RequestError> {
    get_authed(&endpoint(&format!("auth/check-role/{}", role))).await
}

pub(crate) fn current_user_from_profile(full: FullProfile) -> CurrentUser {
    let user = full.user.unwrap_or_default();
    let profile = full.profile.unwrap_or_default();
    CurrentUser {
        id: Some(user.id).filter(|id| *id != 0),
        username: user.username,
        email: user.email.or(profile.email),
        full_name: profile.full_name.or(user.full_name),
        role: user.role,
        is_active: user.is_active,
    }
}

/// Role fallback chain after login: `auth/me`, then the profile endpoint,
/// then `auth/my-role`. The first answer carrying a role wins; the caller
/// treats a missing role as a failed login.
pub async fn resolve_current_user() -> Result<CurrentUser, RequestError> {
    match fetch_me().await {
        Ok(user) if user.role.is_some() => return Ok(user),
        Ok(_) => debug!("auth/me answered without a role, trying profile"),
        Err(err) => debug!("auth/me failed ({}), trying profile", err),
    }

    match fetch_profile(None).await {
        Ok(full) => {
            let user = current_user_from_profile(full);
            if user.role.is_some() {
                return Ok(user);
            }
            debug!("profile answered without a role, trying auth/my-role");
        }
        Err(err) => debug!("profile failed ({}), trying auth/my-role", err),
    }

    fetch_my_role().await
}

/// Select labels and filter chips use display casing, but the backend
/// stores and filters on lowercase values with underscores for hyphens
/// ("Full-time" is stored as "full_time").
pub(crate) fn backend_choice(value: &str) -> String {
    value.to_lowercase().replace('-', "_")
}

#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub page: i64,
    pub size: i64,
    pub search: String,
    pub location: String,
    pub experience: String,
    pub job_type: String,
    pub industry: String,
    pub salary_min: String,
    pub salary_max: String,
}

impl JobFilter {
    pub fn for_page(page: i64, size: i64) -> Self {
        Self {
            page,
            size,
            ..Default::default()
        }
    }

    /// Only defined, non-empty values become query parameters.
    pub(crate) fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
        ];
        for (key, value) in [
            ("search", &self.search),
            ("location", &self.location),
            ("experience", &self.experience),
            ("job_type", &self.job_type),
            ("industry", &self.industry),
            ("salary_min", &self.salary_min),
            ("salary_max", &self.salary_max),
        ] {
            let value = value.trim();
            if !value.is_empty() {
                pairs.push((key, value.to_string()));
            }
        }
        pairs
    }
}

async fn fetch_job_page(path: &str, filter: &JobFilter) -> Result<JobPage, RequestError> {
    let url = format!("{}?{}", endpoint(path), to_query_string(&filter.to_pairs()));
    let data = get_authed(&url).await?;
    Ok(JobPage::from_value(data.unwrap_or(Value::Null)))
}

pub async fn fetch_jobs(filter: &JobFilter) -> Result<JobPage, RequestError> {
    fetch_job_page("jobs/", filter).await
}

pub async fn fetch_my_jobs(filter: &JobFilter) -> Result<JobPage, RequestError> {
    fetch_job_page("jobs/my-jobs/", filter).await
}

pub async fn fetch_job(id: i64) -> Result<Job, RequestError> {
    decode(get_authed(&endpoint(&format!("jobs/{}/", id))).await?)
}

pub async fn create_job(job: &NewJob) -> Result<Job, RequestError> {
    let token = require_token()?;
    let payload = serde_json::to_value(job)?;
    let data = request_json(
        Method::POST,
        &endpoint("jobs/"),
        Some(&token),
        Some(&payload),
    )
    .await?;
    decode(data)
}

pub async fn update_job(id: i64, patch: &Value) -> Result<Job, RequestError> {
    let token = require_token()?;
    let data = request_json(
        Method::PUT,
        &endpoint(&format!("jobs/{}/", id)),
        Some(&token),
        Some(patch),
    )
    .await?;
    decode(data)
}

pub async fn delete_job(id: i64) -> Result<(), RequestError> {
    let token = require_token()?;
    request_json(
        Method::DELETE,
        &endpoint(&format!("jobs/{}/", id)),
        Some(&token),
        None,
    )
    .await?;
    Ok(())
}

pub async fn fetch_users(skip: i64, limit: i64, search: &str) -> Result<Vec<User>, RequestError> {
    let mut pairs = vec![("skip", skip.to_string()), ("limit", limit.to_string())];
    if !search.trim().is_empty() {
        pairs.push(("search", search.trim().to_string()));
    }
    let url = format!("{}?{}", endpoint("users/users"), to_query_string(&pairs));
    let data = get_authed(&url).await?;
    Ok(users_from_value(data.unwrap_or(Value::Null)))
}

pub async fn fetch_user(id: i64) -> Result<User, RequestError> {
    decode(get_authed(&endpoint(&format!("users/users/{}", id))).await?)
}

pub async fn update_user(id: i64, patch: &Value) -> Result<User, RequestError> {
    let token = require_token()?;
    let data = request_json(
        Method::PUT,
        &endpoint(&format!("users/users/{}", id)),
        Some(&token),
        Some(patch),
    )
    .await?;
    decode(data)
}

pub async fn delete_user(id: i64) -> Result<(), RequestError> {
    let token = require_token()?;
    request_json(
        Method::DELETE,
        &endpoint(&format!("users/users/{}", id)),
        Some(&token),
        None,
    )
    .await?;
    Ok(())
}

pub async fn fetch_profile(user_id: Option<i64>) -> Result<FullProfile, RequestError> {
    let url = match user_id {
        Some(id) => format!("{}?user_id={}", endpoint("users/profile"), id),
        None => endpoint("users/profile"),
    };
    decode(get_authed(&url).await?)
}

pub async fn save_profile(profile: &ProfileData) -> Result<(), RequestError> {
    let token = require_token()?;
    let payload = serde_json::to_value(profile)?;
    request_json(
        Method::POST,
        &endpoint("users/profile"),
        Some(&token),
        Some(&payload),
    )
    .await?;
    Ok(())
}

pub async fn fetch_notifications(skip: i64, limit: i64) -> Result<NotificationPage, RequestError> {
    let url = format!(
        "{}?skip={}&limit={}",
        endpoint("notifications/"),
        skip,
        limit
    );
    decode(get_authed(&url).await?)
}

pub async fn mark_notification_read(id: i64) -> Result<(), RequestError> {
    let token = require_token()?;
    request_json(
        Method::PUT,
        &endpoint(&format!("notifications/{}/read", id)),
        Some(&token),
        None,
    )
    .await?;
    Ok(())
}

pub async fn mark_all_notifications_read() -> Result<(), RequestError> {
    let token = require_token()?;
    request_json(
        Method::POST,
        &endpoint("notifications/read_all"),
        Some(&token),
        None,
    )
    .await?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_verification_payloads_email_order() {
        let shapes = verification_payloads("a@b.com", "123456", None);

        assert_eq!(shapes.len(), 5);
        assert_eq!(shapes[0], json!({"email": "a@b.com", "otp": "123456"}));
        assert_eq!(
            shapes[1],
            json!({"email": "a@b.com", "verification_code": "123456"})
        );
        assert_eq!(shapes[2], json!({"email": "a@b.com", "code": "123456"}));
        assert_eq!(shapes[3], json!({"email": "a@b.com", "token": "123456"}));
        assert_eq!(
            shapes[4],
            json!({"email": "a@b.com", "otp": "123456", "user_id": null})
        );
    }

    #[test]
    fn test_verification_payloads_mobile_field() {
        let shapes = verification_payloads("+919812345678", "654321", Some(7));

        assert_eq!(
            shapes[0],
            json!({"mobile_number": "+919812345678", "otp": "654321"})
        );
        assert_eq!(
            shapes[4],
            json!({"mobile_number": "+919812345678", "otp": "654321", "user_id": 7})
        );
    }

    #[test]
    fn test_probe_advances_only_on_400() {
        let bad_request = RequestError::Status {
            status: 400,
            body: None,
        };
        let unauthorized = RequestError::Status {
            status: 401,
            body: None,
        };

        assert!(should_try_next_shape(&bad_request));
        assert!(!should_try_next_shape(&unauthorized));
        assert!(!should_try_next_shape(&RequestError::NoToken));
    }

    #[test]
    fn test_backend_choice_vocabulary() {
        assert_eq!(backend_choice("Full-time"), "full_time");
        assert_eq!(backend_choice("On-site"), "on_site");
        assert_eq!(backend_choice("Contract"), "contract");
        assert_eq!(backend_choice("Remote"), "remote");
    }

    #[test]
    fn test_job_filter_skips_empty_values() {
        let filter = JobFilter {
            search: "rust".to_string(),
            location: "  ".to_string(),
            salary_min: "50000".to_string(),
            ..JobFilter::for_page(2, 10)
        };

        let pairs = filter.to_pairs();
        assert_eq!(
            pairs,
            vec![
                ("page", "2".to_string()),
                ("size", "10".to_string()),
                ("search", "rust".to_string()),
                ("salary_min", "50000".to_string()),
            ]
        );
    }

    #[test]
    fn test_current_user_from_profile_prefers_profile_name() {
        let full = FullProfile {
            user: Some(User {
                id: 3,
                role: Some("user".to_string()),
                full_name: Some("account name".to_string()),
                ..Default::default()
            }),
            profile: Some(ProfileData {
                full_name: Some("Profile Name".to_string()),
                ..Default::default()
            }),
        };

        let user = current_user_from_profile(full);
        assert_eq!(user.id, Some(3));
        assert_eq!(user.role.as_deref(), Some("user"));
        assert_eq!(user.full_name.as_deref(), Some("Profile Name"));
    }

    #[test]
    fn test_current_user_from_empty_profile() {
        let user = current_user_from_profile(FullProfile::default());
        assert_eq!(user.id, None);
        assert_eq!(user.role, None);
    }
}
