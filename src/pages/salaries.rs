use tracing::warn;

use super::{from_api_error, Navigation, Notice, Outcome, Route};
use crate::client::models::{Employee, MySalaries, NewSalary, SalaryRecord};
use crate::client::{ApiError, HrClient};
use crate::view::format::{currency, month_label, number, or_na, parse_amount};
use crate::view::{Action, Field, Row, Table};

use super::employees::department_cell;

const SALARY_COLUMNS: [&str; 5] = ["S.No", "Month", "Basic Salary", "Deduction", "Net Salary"];

pub fn salary_list_table(employees: &[Employee]) -> Table {
    let rows = employees
        .iter()
        .enumerate()
        .map(|(index, employee)| {
            Row::new(
                employee.id.to_string(),
                vec![
                    (index + 1).to_string(),
                    or_na(employee.employee_id.as_deref()),
                    employee.full_name(),
                    department_cell(employee),
                    or_na(employee.role.as_deref()),
                    match employee.salary {
                        Some(salary) if salary != 0.0 => format!("${}", number(salary)),
                        _ => "N/A".to_string(),
                    },
                ],
            )
            .with_action(Action::link(
                "salary",
                "View Salary",
                Route::EmployeeSalary { id: employee.id },
            ))
        })
        .collect();

    Table::new(&[
        "S.No",
        "Employee ID",
        "Name",
        "Department",
        "Role",
        "Salary",
    ])
    .with_actions("Actions")
    .fill(rows, "No employees found")
}

pub async fn salary_list(client: &HrClient, search: Option<&str>) -> Outcome<Table> {
    let employees = load!(client.all_employees(), "Failed to load employees");
    let mut table = salary_list_table(&employees);
    if let Some(query) = search {
        table.filter_text(query);
    }
    Outcome::Render(table)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalaryDetails {
    pub title: String,
    pub subtitle: String,
    pub records: Table,
    pub add_salary: Navigation,
}

fn salary_rows(records: &[SalaryRecord], month: impl Fn(&str) -> String) -> Vec<Row> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let key = record
                .id
                .map(|id| id.to_string())
                .unwrap_or_else(|| (index + 1).to_string());
            Row::new(
                key,
                vec![
                    (index + 1).to_string(),
                    month(&record.month),
                    format!("${}", currency(record.basic_salary)),
                    format!("${}", currency(record.deduction)),
                    format!("${}", currency(record.net_salary)),
                ],
            )
        })
        .collect()
}

impl SalaryDetails {
    pub fn new(employee: &Employee, records: &[SalaryRecord]) -> Self {
        Self {
            title: format!("{} - Salary Details", employee.full_name()),
            subtitle: format!("Employee ID: {}", or_na(employee.employee_id.as_deref())),
            records: Table::new(&SALARY_COLUMNS).fill(
                salary_rows(records, |month| month.to_string()),
                "No salary records found",
            ),
            add_salary: Navigation::to(Route::AddSalary { id: employee.id }),
        }
    }
}

/// Salary history of one employee. The staff lookup and the salary fetch run
/// one after the other since the second call needs the staff code.
pub async fn employee_salary(client: &HrClient, id: i64) -> Outcome<SalaryDetails> {
    const FALLBACK: &str = "Failed to load salary details";

    let employees = load!(client.all_employees(), FALLBACK);
    let Some(employee) = employees.into_iter().find(|employee| employee.id == id) else {
        return Outcome::Failed("Employee not found".to_string());
    };
    let Some(code) = employee.employee_id.clone() else {
        return Outcome::Failed("Employee ID not found".to_string());
    };

    let records = load!(client.employee_salaries(&code), FALLBACK);
    Outcome::Render(SalaryDetails::new(&employee, &records))
}

/// Live state of the add-salary form. The net amount follows every edit of
/// either input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalaryForm {
    pub employee_code: String,
    pub month: String,
    basic_salary: String,
    deduction: String,
    net_salary: String,
}

impl SalaryForm {
    pub fn new(employee_code: impl Into<String>, month: impl Into<String>) -> Self {
        let mut form = Self {
            employee_code: employee_code.into(),
            month: month.into(),
            basic_salary: String::new(),
            deduction: String::new(),
            net_salary: String::new(),
        };
        form.recompute();
        form
    }

    pub fn set_basic_salary(&mut self, raw: impl Into<String>) {
        self.basic_salary = raw.into();
        self.recompute();
    }

    pub fn set_deduction(&mut self, raw: impl Into<String>) {
        self.deduction = raw.into();
        self.recompute();
    }

    pub fn basic_salary(&self) -> &str {
        &self.basic_salary
    }

    pub fn deduction(&self) -> &str {
        &self.deduction
    }

    pub fn net_salary(&self) -> &str {
        &self.net_salary
    }

    fn recompute(&mut self) {
        let net = parse_amount(&self.basic_salary) - parse_amount(&self.deduction);
        self.net_salary = format!("{net:.2}");
    }

    fn into_request(self) -> NewSalary {
        NewSalary {
            basic_salary: parse_amount(&self.basic_salary),
            deduction: parse_amount(&self.deduction),
            employee_id: self.employee_code.trim().to_string(),
            month: self.month.trim().to_string(),
        }
    }
}

/// Who the add-salary page is for: the header line and, once resolved, the
/// staff code the form submits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalaryTarget {
    pub header: String,
    pub employee_code: Option<String>,
}

impl SalaryTarget {
    fn unresolved(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            employee_code: None,
        }
    }
}

pub async fn salary_target(client: &HrClient, id: Option<i64>) -> Outcome<SalaryTarget> {
    let Some(id) = id else {
        return Outcome::Render(SalaryTarget::unresolved("No employee ID provided"));
    };

    match client.all_employees().await {
        Ok(employees) => Outcome::Render(
            match employees.iter().find(|employee| employee.id == id) {
                Some(employee) => SalaryTarget {
                    header: format!(
                        "Adding salary for: {} ({})",
                        employee.full_name(),
                        or_na(employee.employee_id.as_deref())
                    ),
                    employee_code: employee.employee_id.clone(),
                },
                None => SalaryTarget::unresolved("Employee not found"),
            },
        ),
        Err(ApiError::Unauthorized) => Outcome::Navigate(Navigation::login()),
        Err(err) => {
            warn!(error = %err, "failed to load employee info");
            Outcome::Render(SalaryTarget::unresolved(format!("Employee ID: {id}")))
        }
    }
}

/// Submits the form. `return_to` is the row id of the employee whose salary
/// page should open afterwards.
pub async fn add_salary(
    client: &HrClient,
    form: SalaryForm,
    return_to: Option<i64>,
) -> Outcome<Notice> {
    if form.employee_code.trim().is_empty() {
        return Outcome::Failed("Employee ID is required".to_string());
    }
    if form.month.trim().is_empty() {
        return Outcome::Failed("Month is required".to_string());
    }

    match client.add_salary(&form.into_request()).await {
        Ok(_) => {
            let route = match return_to {
                Some(id) => Route::EmployeeSalary { id },
                None => Route::SalaryList,
            };
            Outcome::Render(Notice::new("Salary added successfully!").then(Navigation::to(route)))
        }
        Err(err) => from_api_error(err, "Failed to add salary"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MySalaryPage {
    pub employee_code: String,
    pub total_records: usize,
    pub records: Table,
    /// Totals for basic pay, deductions and net pay; empty with no records.
    pub totals: Vec<Field>,
}

impl MySalaryPage {
    pub fn new(data: &MySalaries) -> Self {
        let totals = if data.salaries.is_empty() {
            Vec::new()
        } else {
            let sum = |pick: fn(&SalaryRecord) -> f64| data.salaries.iter().map(pick).sum::<f64>();
            vec![
                Field::new("Total Basic", format!("${}", currency(sum(|s| s.basic_salary)))),
                Field::new("Total Deductions", format!("${}", currency(sum(|s| s.deduction)))),
                Field::new("Total Net", format!("${}", currency(sum(|s| s.net_salary)))),
            ]
        };

        Self {
            employee_code: data.employee_id.clone(),
            total_records: data.total_salaries,
            records: Table::new(&SALARY_COLUMNS)
                .fill(salary_rows(&data.salaries, month_label), "No salary records found"),
            totals,
        }
    }
}

pub async fn my_salaries(client: &HrClient) -> Outcome<MySalaryPage> {
    let data = load!(client.my_salaries(), "Failed to load salary records");
    Outcome::Render(MySalaryPage::new(&data))
}
