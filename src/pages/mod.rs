//! Page controllers.
//!
//! Every controller follows the same contract: load data from the backend,
//! build a view, send the user to the login page on a 401, and otherwise
//! surface the server's message or the page's own fallback. Forms validate
//! locally before any request is made.

/// Unwraps a backend result inside a controller, returning early with the
/// page outcome on failure.
macro_rules! load {
    ($call:expr, $fallback:expr) => {
        match $call.await {
            Ok(value) => value,
            Err(err) => return $crate::pages::from_api_error(err, $fallback),
        }
    };
}

pub mod attendance;
pub mod auth;
pub mod dashboard;
pub mod departments;
pub mod employees;
pub mod leaves;
pub mod profile;
pub mod salaries;
pub mod settings;

use std::time::Duration;

use tracing::warn;

use crate::client::ApiError;

/// Delay before a successful create form moves on to its list page.
pub const REDIRECT_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    AdminDashboard,
    EmployeeDashboard,
    EmployeeList,
    ViewEmployee { id: i64 },
    CreateEmployee,
    DepartmentList,
    CreateDepartment,
    DepartmentTeam { department: String },
    SalaryList,
    EmployeeSalary { id: i64 },
    AddSalary { id: i64 },
    AttendanceList,
    AttendanceReport,
    LeaveList,
    LeavePage,
    ApplyLeave,
    MySalary,
    ViewProfile,
    Settings,
    Other(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/auth/login-page".to_string(),
            Route::AdminDashboard => "/admin/admin-dashboard".to_string(),
            Route::EmployeeDashboard => "/employee/employee-dashboard".to_string(),
            Route::EmployeeList => "/admin/employee-list".to_string(),
            Route::ViewEmployee { id } => format!("/admin/view_employee?id={id}"),
            Route::CreateEmployee => "/admin/create-employee".to_string(),
            Route::DepartmentList => "/admin/department-list".to_string(),
            Route::CreateDepartment => "/admin/create-department".to_string(),
            Route::DepartmentTeam { department } => {
                let encoded: String =
                    url::form_urlencoded::byte_serialize(department.as_bytes()).collect();
                format!("/admin/dep_team?department={encoded}")
            }
            Route::SalaryList => "/admin/salary-list".to_string(),
            Route::EmployeeSalary { id } => format!("/admin/employee-salary?id={id}"),
            Route::AddSalary { id } => format!("/admin/add-new-salary?employee_id={id}"),
            Route::AttendanceList => "/admin/attendance-list".to_string(),
            Route::AttendanceReport => "/admin/attendance-report".to_string(),
            Route::LeaveList => "/admin/leave-list".to_string(),
            Route::LeavePage => "/employee/leave-page".to_string(),
            Route::ApplyLeave => "/employee/apply-leave-page".to_string(),
            Route::MySalary => "/employee/my-salary-page".to_string(),
            Route::ViewProfile => "/employee/view-profile".to_string(),
            Route::Settings => "/settings/settings-page".to_string(),
            Route::Other(path) => path.clone(),
        }
    }

    /// Maps a `Location` header (absolute or relative) back onto a route.
    pub fn from_location(location: &str) -> Self {
        let parsed = url::Url::parse(location)
            .or_else(|_| url::Url::parse("http://localhost").and_then(|base| base.join(location)));
        let Ok(url) = parsed else {
            return Route::Other(location.to_string());
        };
        let param = |name: &str| {
            url.query_pairs()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.into_owned())
        };
        let id = |name: &str| param(name).and_then(|value| value.parse::<i64>().ok());

        let route = match url.path().trim_end_matches('/') {
            "/auth/login-page" | "/auth" | "" => Some(Route::Login),
            "/admin/admin-dashboard" => Some(Route::AdminDashboard),
            "/employee/employee-dashboard" => Some(Route::EmployeeDashboard),
            "/admin/employee-list" => Some(Route::EmployeeList),
            "/admin/view_employee" => id("id").map(|id| Route::ViewEmployee { id }),
            "/admin/create-employee" => Some(Route::CreateEmployee),
            "/admin/department-list" => Some(Route::DepartmentList),
            "/admin/create-department" => Some(Route::CreateDepartment),
            "/admin/dep_team" => {
                param("department").map(|department| Route::DepartmentTeam { department })
            }
            "/admin/salary-list" => Some(Route::SalaryList),
            "/admin/employee-salary" => id("id").map(|id| Route::EmployeeSalary { id }),
            "/admin/add-new-salary" => id("employee_id").map(|id| Route::AddSalary { id }),
            "/admin/attendance-list" => Some(Route::AttendanceList),
            "/admin/attendance-report" => Some(Route::AttendanceReport),
            "/admin/leave-list" => Some(Route::LeaveList),
            "/employee/leave-page" => Some(Route::LeavePage),
            "/employee/apply-leave-page" => Some(Route::ApplyLeave),
            "/employee/my-salary-page" => Some(Route::MySalary),
            "/employee/view-profile" => Some(Route::ViewProfile),
            "/settings/settings-page" => Some(Route::Settings),
            _ => None,
        };
        route.unwrap_or_else(|| Route::Other(location.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub route: Route,
    pub delay: Option<Duration>,
}

impl Navigation {
    pub fn to(route: Route) -> Self {
        Self { route, delay: None }
    }

    pub fn after(route: Route, delay: Duration) -> Self {
        Self {
            route,
            delay: Some(delay),
        }
    }

    pub fn login() -> Self {
        Self::to(Route::Login)
    }
}

/// Confirmation shown after a successful form submission or row action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub then: Option<Navigation>,
}

impl Notice {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            then: None,
        }
    }

    pub fn then(mut self, navigation: Navigation) -> Self {
        self.then = Some(navigation);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<V> {
    Render(V),
    Navigate(Navigation),
    Failed(String),
}

impl<V> Outcome<V> {
    pub fn map<U>(self, f: impl FnOnce(V) -> U) -> Outcome<U> {
        match self {
            Outcome::Render(view) => Outcome::Render(f(view)),
            Outcome::Navigate(navigation) => Outcome::Navigate(navigation),
            Outcome::Failed(message) => Outcome::Failed(message),
        }
    }

    pub fn rendered(&self) -> Option<&V> {
        match self {
            Outcome::Render(view) => Some(view),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            Outcome::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn navigation(&self) -> Option<&Navigation> {
        match self {
            Outcome::Navigate(navigation) => Some(navigation),
            _ => None,
        }
    }

    pub fn is_login_redirect(&self) -> bool {
        matches!(self, Outcome::Navigate(nav) if nav.route == Route::Login)
    }
}

/// Turns a backend failure into what the page shows. A 401 always means
/// "go sign in"; anything else becomes the server message or `fallback`.
pub(crate) fn from_api_error<V>(err: ApiError, fallback: &str) -> Outcome<V> {
    match err {
        ApiError::Unauthorized => Outcome::Navigate(Navigation::login()),
        err => {
            warn!(error = %err, "{fallback}");
            Outcome::Failed(err.user_message(fallback))
        }
    }
}
