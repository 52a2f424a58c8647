//! Typed client for the HR backend's JSON API.

pub mod models;
pub mod session;

use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use reqwest::redirect::Policy;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::config::BackendConfig;

use self::models::{
    AddressUpdate, AdminStats, AttendanceMark, AttendanceMarked, AttendanceReport, Credentials,
    Department, DepartmentCreated, Employee, EmployeeCreated, EmployeeStats, LeaveApplication,
    LeaveReceipt, LeaveRequest, Message, MyLeaves, MySalaries, NewDepartment, NewEmployee,
    NewSalary, PasswordChange, PhoneUpdate, Profile, SalaryAdded, SalaryRecord,
};
use self::session::{session_token_from_cookie, SessionError, SessionStore, SESSION_COOKIE};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not signed in or the session has expired")]
    Unauthorized,
    #[error("backend rejected the request with status {status}")]
    Rejected {
        status: StatusCode,
        detail: Option<String>,
    },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend returned a non-JSON response (content-type: {content_type})")]
    NotJson { content_type: String },
    #[error("unable to decode backend response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid endpoint url: {0}")]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ApiError {
    /// Server-provided `detail` text, when the backend sent one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// What a page shows: the server's own message or the page's fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_string()
    }
}

/// Where the backend sent the browser after a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRedirect {
    pub location: String,
    pub session_stored: bool,
}

#[derive(Debug, Clone)]
pub struct HrClient {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<dyn SessionStore>,
}

impl HrClient {
    pub fn new(config: &BackendConfig, session: Arc<dyn SessionStore>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .redirect(Policy::none())
            .timeout(config.timeout)
            .build()?;

        let mut base_url = config.base_url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    pub fn session(&self) -> &dyn SessionStore {
        self.session.as_ref()
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginRedirect, ApiError> {
        let url = self.endpoint("auth/login")?;
        let response = self
            .request(Method::POST, url)?
            .form(&Credentials { email, password })
            .send()
            .await?;

        let status = response.status();
        if status.is_redirection() {
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default()
                .to_string();

            let token = response
                .headers()
                .get_all(SET_COOKIE)
                .iter()
                .filter_map(|value| value.to_str().ok())
                .find_map(session_token_from_cookie);

            let session_stored = match token {
                Some(token) => {
                    self.session.save(&token)?;
                    true
                }
                None => false,
            };

            return Ok(LoginRedirect {
                location,
                session_stored,
            });
        }

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }

        let body = response.bytes().await?;
        Err(ApiError::Rejected {
            status,
            detail: extract_detail(&body),
        })
    }

    pub fn logout(&self) -> Result<(), ApiError> {
        self.session.clear()?;
        Ok(())
    }

    pub async fn admin_stats(&self) -> Result<AdminStats, ApiError> {
        self.get_json("admin/dashboard-stats").await
    }

    pub async fn all_employees(&self) -> Result<Vec<Employee>, ApiError> {
        self.get_json("admin/all_employees").await
    }

    pub async fn create_employee(
        &self,
        employee: &NewEmployee,
    ) -> Result<EmployeeCreated, ApiError> {
        let url = self.endpoint("admin/employees")?;
        let builder = self.request(Method::POST, url)?.json(employee);
        self.send_json(builder).await
    }

    pub async fn all_departments(&self) -> Result<Vec<Department>, ApiError> {
        self.get_json("admin/all_departments").await
    }

    pub async fn create_department(
        &self,
        department: &NewDepartment,
    ) -> Result<DepartmentCreated, ApiError> {
        let url = self.endpoint("admin/departments")?;
        let builder = self.request(Method::POST, url)?.json(department);
        self.send_json(builder).await
    }

    pub async fn department_employees(&self, department: &str) -> Result<Vec<Employee>, ApiError> {
        let url = self.segment_endpoint(&["admin", "department", department, "employees"])?;
        self.send_json(self.request(Method::GET, url)?).await
    }

    pub async fn employee_salaries(
        &self,
        employee_code: &str,
    ) -> Result<Vec<SalaryRecord>, ApiError> {
        let url = self.endpoint("admin/employee_fulsalary")?;
        let builder = self
            .request(Method::GET, url)?
            .query(&[("employee_id", employee_code)]);
        self.send_json(builder).await
    }

    pub async fn add_salary(&self, salary: &NewSalary) -> Result<SalaryAdded, ApiError> {
        self.post_form("admin/add_salary", salary).await
    }

    pub async fn mark_attendance(
        &self,
        mark: &AttendanceMark<'_>,
    ) -> Result<AttendanceMarked, ApiError> {
        self.post_form("admin/update_attendance", mark).await
    }

    pub async fn attendance_report(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<AttendanceReport, ApiError> {
        let url = self.endpoint("admin/attendance_report")?;
        let builder = self.request(Method::GET, url)?.query(&[
            ("start_date", start.format("%Y-%m-%d").to_string()),
            ("end_date", end.format("%Y-%m-%d").to_string()),
        ]);
        self.send_json(builder).await
    }

    pub async fn leaves(&self) -> Result<Vec<LeaveApplication>, ApiError> {
        self.get_json("admin/leaves").await
    }

    pub async fn approve_leave(&self, leave_id: i64) -> Result<Message, ApiError> {
        let url = self.endpoint(&format!("admin/leaves/{leave_id}/approve"))?;
        self.send_json(self.request(Method::PUT, url)?).await
    }

    pub async fn reject_leave(&self, leave_id: i64) -> Result<Message, ApiError> {
        let url = self.endpoint(&format!("admin/leaves/{leave_id}/reject"))?;
        self.send_json(self.request(Method::PUT, url)?).await
    }

    pub async fn employee_stats(&self) -> Result<EmployeeStats, ApiError> {
        self.get_json("employee/dashboard-stats").await
    }

    pub async fn apply_leave(&self, request: &LeaveRequest) -> Result<LeaveReceipt, ApiError> {
        self.post_form("employee/apply-leave", request).await
    }

    pub async fn my_leaves(&self) -> Result<MyLeaves, ApiError> {
        self.get_json("employee/my-leaves").await
    }

    pub async fn my_salaries(&self) -> Result<MySalaries, ApiError> {
        self.get_json("employee/my-salaries").await
    }

    pub async fn employee_profile(&self) -> Result<Profile, ApiError> {
        self.get_json("employee/profile").await
    }

    pub async fn settings_profile(&self) -> Result<Profile, ApiError> {
        self.get_json("settings/profile").await
    }

    pub async fn change_password(&self, change: &PasswordChange) -> Result<Message, ApiError> {
        self.post_json("settings/change-password", change).await
    }

    pub async fn update_phone(&self, update: &PhoneUpdate) -> Result<Message, ApiError> {
        self.post_json("settings/update-phone", update).await
    }

    pub async fn update_address(&self, update: &AddressUpdate) -> Result<Message, ApiError> {
        self.post_json("settings/update-address", update).await
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    /// Builds a URL from raw segments, percent-encoding each one.
    fn segment_endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> Result<RequestBuilder, ApiError> {
        debug!(%method, path = url.path(), "calling hr backend");
        let mut builder = self.http.request(method, url);
        if let Some(token) = self.session.load()? {
            builder = builder.header(COOKIE, session_cookie_header(&token));
        }
        Ok(builder)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        self.send_json(self.request(Method::GET, url)?).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        self.send_json(self.request(Method::POST, url)?.json(body))
            .await
    }

    async fn post_form<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        self.send_json(self.request(Method::POST, url)?.form(body))
            .await
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await?;
        decode_response(response).await
    }
}

async fn decode_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let body = response.bytes().await?;

    if !status.is_success() {
        debug!(%status, "hr backend rejected request");
        return Err(ApiError::Rejected {
            status,
            detail: extract_detail(&body),
        });
    }

    if !content_type.contains("application/json") {
        return Err(ApiError::NotJson { content_type });
    }

    Ok(serde_json::from_slice(&body)?)
}

/// FastAPI-style errors carry `{"detail": "..."}`; validation errors carry a
/// list there instead, which has no single message to show.
fn extract_detail(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("detail")
        .and_then(|detail| detail.as_str())
        .map(str::trim)
        .filter(|detail| !detail.is_empty())
        .map(str::to_string)
}

fn session_cookie_header(token: &str) -> String {
    if token.contains(char::is_whitespace) {
        format!("{SESSION_COOKIE}=\"{token}\"")
    } else {
        format!("{SESSION_COOKIE}={token}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::session::MemorySessionStore;

    fn client(base: &str) -> HrClient {
        let config = BackendConfig::new(Url::parse(base).expect("valid url"));
        HrClient::new(&config, Arc::new(MemorySessionStore::default())).expect("client builds")
    }

    #[test]
    fn extracts_string_detail_only() {
        assert_eq!(
            extract_detail(br#"{"detail":"Leave not found"}"#).as_deref(),
            Some("Leave not found")
        );
        assert_eq!(extract_detail(br#"{"detail":[{"loc":["body"]}]}"#), None);
        assert_eq!(extract_detail(b"<html>oops</html>"), None);
    }

    #[test]
    fn user_message_prefers_server_detail() {
        let rejected = ApiError::Rejected {
            status: StatusCode::BAD_REQUEST,
            detail: Some("Employee ID already exists".to_string()),
        };
        assert_eq!(
            rejected.user_message("Failed to create employee"),
            "Employee ID already exists"
        );
        assert_eq!(
            ApiError::Unauthorized.user_message("Failed to create employee"),
            "Failed to create employee"
        );
    }

    #[test]
    fn keeps_base_path_prefix() {
        let client = client("https://hr.example.com/api");
        let url = client.endpoint("admin/leaves").expect("joins");
        assert_eq!(url.as_str(), "https://hr.example.com/api/admin/leaves");
    }

    #[test]
    fn encodes_department_names_as_segments() {
        let client = client("http://localhost:8000");
        let url = client
            .segment_endpoint(&["admin", "department", "R&D / Labs", "employees"])
            .expect("builds");
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/admin/department/R&D%20%2F%20Labs/employees"
        );
    }

    #[test]
    fn quotes_tokens_with_spaces() {
        assert_eq!(session_cookie_header("abc"), "access_token=abc");
        assert_eq!(
            session_cookie_header("Bearer abc"),
            "access_token=\"Bearer abc\""
        );
    }
}
