use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Employee {
    pub id: i64,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub role: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub department_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub salary: Option<f64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub updated_at: Option<String>,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Department {
    pub id: i64,
    pub department_name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Leave categories accepted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveType {
    Annual,
    Sick,
    Personal,
    Maternity,
    Unpaid,
}

impl LeaveType {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Annual,
            Self::Sick,
            Self::Personal,
            Self::Maternity,
            Self::Unpaid,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Annual => "annual",
            Self::Sick => "sick",
            Self::Personal => "personal",
            Self::Maternity => "maternity",
            Self::Unpaid => "unpaid",
        }
    }
}

impl FromStr for LeaveType {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim().to_ascii_lowercase();
        Self::ordered()
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| {
                let allowed: Vec<&str> = Self::ordered().iter().map(|kind| kind.as_str()).collect();
                format!(
                    "invalid leave type '{raw}'. Allowed types: {}",
                    allowed.join(", ")
                )
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

impl AttendanceStatus {
    pub const fn ordered() -> [Self; 3] {
        [Self::Present, Self::Absent, Self::Late]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
            Self::Late => "late",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Present => "Present",
            Self::Absent => "Absent",
            Self::Late => "Late",
        }
    }
}

impl FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            "late" => Ok(Self::Late),
            other => Err(format!(
                "invalid attendance status '{other}' (expected present, absent or late)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LeaveApplication {
    pub id: i64,
    pub employee_id: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub leave_type: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: LeaveStatus,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MyLeave {
    pub id: i64,
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: LeaveStatus,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub reason: Option<String>,
    pub days: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MyLeaves {
    pub employee_id: String,
    pub total_applications: usize,
    #[serde(default)]
    pub leaves: Vec<MyLeave>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LeaveReceipt {
    #[serde(default)]
    pub message: Option<String>,
    pub leave_id: i64,
    pub status: LeaveStatus,
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub number_of_days: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SalaryRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub employee_id: Option<String>,
    pub month: String,
    pub basic_salary: f64,
    #[serde(default)]
    pub deduction: f64,
    pub net_salary: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MySalaries {
    pub employee_id: String,
    pub total_salaries: usize,
    #[serde(default)]
    pub salaries: Vec<SalaryRecord>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AttendanceEntry {
    #[serde(default)]
    pub id: Option<i64>,
    pub employee_id: String,
    pub employee_name: String,
    #[serde(default)]
    pub department_id: Option<i64>,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AttendanceReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_records: usize,
    #[serde(default)]
    pub attendance_data: Vec<AttendanceEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AdminStats {
    pub total_employees: u64,
    pub total_departments: u64,
    pub today_attendance: u64,
    pub pending_leaves: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmployeeStats {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub employee_status: Option<String>,
    pub monthly_attendance: u64,
    pub leave_balance: i64,
    #[serde(default)]
    pub current_salary: Option<f64>,
    #[serde(default)]
    pub total_leaves: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub employee_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub salary: Option<f64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub updated_at: Option<String>,
}

/// JSON body for `POST /admin/employees`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewEmployee {
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department_name: Option<String>,
    pub salary: Option<f64>,
    pub is_active: bool,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub role: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewDepartment {
    pub department_name: String,
    pub description: Option<String>,
}

/// Form body for `POST /admin/add_salary`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSalary {
    pub employee_id: String,
    pub month: String,
    pub basic_salary: f64,
    pub deduction: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AttendanceMark<'a> {
    pub employee_id: &'a str,
    pub status: AttendanceStatus,
}

/// Form body for `POST /employee/apply-leave`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaveRequest {
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PasswordChange {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhoneUpdate {
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddressUpdate {
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmployeeCreated {
    #[serde(default)]
    pub message: Option<String>,
    pub employee_id: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DepartmentCreated {
    #[serde(default)]
    pub message: Option<String>,
    pub department_id: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SalaryAdded {
    #[serde(default)]
    pub message: Option<String>,
    pub salary_id: i64,
    pub net_salary: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AttendanceMarked {
    #[serde(default)]
    pub message: Option<String>,
    pub attendance_id: i64,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub message: Option<String>,
}

fn default_active() -> bool {
    true
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
