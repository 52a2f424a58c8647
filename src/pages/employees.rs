use chrono::NaiveDate;

use super::{from_api_error, Navigation, Notice, Outcome, Route, REDIRECT_DELAY};
use crate::client::models::{Employee, NewEmployee};
use crate::client::HrClient;
use crate::view::format::{initials, long_date, or_na, parse_loose_date};
use crate::view::{Action, Field, Row, Table};

pub const EMPLOYEE_COLUMNS: [&str; 6] = [
    "S.No",
    "Employee ID",
    "Name",
    "Department",
    "Phone",
    "Address",
];

pub(crate) fn department_cell(employee: &Employee) -> String {
    employee
        .department_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

pub fn employee_table(employees: &[Employee]) -> Table {
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
                    or_na(employee.phone.as_deref()),
                    or_na(employee.address.as_deref()),
                ],
            )
            .with_action(Action::link(
                "view",
                "View",
                Route::ViewEmployee { id: employee.id },
            ))
        })
        .collect();

    Table::new(&EMPLOYEE_COLUMNS)
        .with_actions("Actions")
        .fill(rows, "No employees found")
}

/// `GET /admin/all_employees` rendered as the staff directory.
pub async fn employee_list(client: &HrClient, search: Option<&str>) -> Outcome<Table> {
    let employees = load!(client.all_employees(), "Failed to load employees");
    let mut table = employee_table(&employees);
    if let Some(query) = search {
        table.filter_text(query);
    }
    Outcome::Render(table)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeCard {
    pub initials: String,
    pub name: String,
    pub employee_code: String,
    pub details: Vec<Field>,
}

impl EmployeeCard {
    pub fn from_employee(employee: &Employee) -> Self {
        let name = employee.full_name();
        let long = |value: Option<&str>| {
            value
                .and_then(parse_loose_date)
                .map(long_date)
                .unwrap_or_else(|| "N/A".to_string())
        };

        Self {
            initials: initials(&name),
            employee_code: or_na(employee.employee_id.as_deref()),
            details: vec![
                Field::new("Department", department_cell(employee)),
                Field::new("Role", or_na(employee.role.as_deref())),
                Field::new("Contact Number", or_na(employee.phone.as_deref())),
                Field::new("Email", or_na(employee.email.as_deref())),
                Field::new("Address", or_na(employee.address.as_deref())),
                Field::new("Date of Birth", long(employee.date_of_birth.as_deref())),
                Field::new(
                    "Salary",
                    match employee.salary {
                        Some(salary) if salary != 0.0 => format!("${salary}"),
                        _ => "N/A".to_string(),
                    },
                ),
                Field::new(
                    "Status",
                    if employee.is_active { "Active" } else { "Inactive" },
                ),
                Field::new("Created", long(employee.created_at.as_deref())),
            ],
            name,
        }
    }
}

/// Detail card for the employee with row id `id`.
pub async fn view_employee(client: &HrClient, id: i64) -> Outcome<EmployeeCard> {
    let employees = load!(client.all_employees(), "Failed to load employee details");
    match employees.iter().find(|employee| employee.id == id) {
        Some(employee) => Outcome::Render(EmployeeCard::from_employee(employee)),
        None => Outcome::Failed("Employee not found".to_string()),
    }
}

/// Values collected by the new-employee form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EmployeeForm {
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

impl EmployeeForm {
    fn into_request(self) -> NewEmployee {
        let blank_to_none =
            |value: Option<String>| value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        NewEmployee {
            employee_id: self.employee_id.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: blank_to_none(self.phone),
            department_name: blank_to_none(self.department_name),
            salary: self.salary,
            is_active: self.is_active,
            address: blank_to_none(self.address),
            date_of_birth: self.date_of_birth,
            role: self.role.trim().to_ascii_lowercase(),
            password: self.password,
        }
    }

    fn missing_field(&self) -> Option<&'static str> {
        [
            ("Employee ID", &self.employee_id),
            ("First name", &self.first_name),
            ("Last name", &self.last_name),
            ("Email", &self.email),
            ("Role", &self.role),
            ("Password", &self.password),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| label)
    }
}

/// Department names offered by the new-employee form.
pub async fn employee_form_choices(client: &HrClient) -> Outcome<Vec<String>> {
    let departments = load!(client.all_departments(), "Failed to load departments");
    Outcome::Render(
        departments
            .into_iter()
            .map(|department| department.department_name)
            .collect(),
    )
}

pub async fn create_employee(client: &HrClient, form: EmployeeForm) -> Outcome<Notice> {
    if let Some(label) = form.missing_field() {
        return Outcome::Failed(format!("{label} is required"));
    }

    match client.create_employee(&form.into_request()).await {
        Ok(_) => Outcome::Render(
            Notice::new("Employee created successfully!")
                .then(Navigation::after(Route::EmployeeList, REDIRECT_DELAY)),
        ),
        Err(err) => from_api_error(err, "Failed to create employee"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::field_value;

    fn employee(id: i64) -> Employee {
        Employee {
            id,
            employee_id: Some(format!("EMP{id:03}")),
            first_name: "Mary Ann".into(),
            last_name: "Smith".into(),
            email: Some("mary@example.com".into()),
            phone: None,
            role: Some("employee".into()),
            is_active: false,
            department_id: Some(3),
            address: None,
            date_of_birth: Some("1990-04-12".into()),
            salary: Some(52000.0),
            created_at: Some("2024-01-05T09:30:00.000123".into()),
            updated_at: None,
        }
    }

    #[test]
    fn table_rows_fall_back_to_na() {
        let table = employee_table(&[employee(1)]);
        let row = table.row("1").expect("row keyed by id");
        assert_eq!(row.cells[1], "EMP001");
        assert_eq!(row.cells[4], "N/A");
        assert_eq!(row.action("view").map(|a| a.enabled), Some(true));
    }

    #[test]
    fn view_action_opens_the_detail_page() {
        let table = employee_table(&[employee(42)]);
        let target = table
            .row("42")
            .and_then(|row| row.action("view"))
            .and_then(|action| action.target.clone());
        assert_eq!(target, Some(Route::ViewEmployee { id: 42 }));
    }

    #[test]
    fn empty_directory_shows_placeholder_over_seven_columns() {
        let table = employee_table(&[]);
        let placeholder = table.placeholder().expect("placeholder");
        assert_eq!(placeholder.message, "No employees found");
        assert_eq!(placeholder.colspan, 7);
    }

    #[test]
    fn card_uses_long_dates_and_initials() {
        let card = EmployeeCard::from_employee(&employee(2));
        assert_eq!(card.initials, "MAS");
        assert_eq!(field_value(&card.details, "Date of Birth"), Some("April 12, 1990"));
        assert_eq!(field_value(&card.details, "Created"), Some("January 5, 2024"));
        assert_eq!(field_value(&card.details, "Status"), Some("Inactive"));
        assert_eq!(field_value(&card.details, "Salary"), Some("$52000"));
    }

    #[test]
    fn form_requires_identity_fields() {
        let form = EmployeeForm {
            employee_id: "EMP9".into(),
            first_name: "Ana".into(),
            ..EmployeeForm::default()
        };
        assert_eq!(form.missing_field(), Some("Last name"));
    }

    #[test]
    fn request_drops_blank_optionals() {
        let request = EmployeeForm {
            employee_id: " EMP9 ".into(),
            first_name: "Ana".into(),
            last_name: "Lima".into(),
            email: "ana@example.com".into(),
            phone: Some("  ".into()),
            department_name: Some("Finance".into()),
            role: "Employee".into(),
            password: "secret1".into(),
            ..EmployeeForm::default()
        }
        .into_request();

        assert_eq!(request.employee_id, "EMP9");
        assert_eq!(request.phone, None);
        assert_eq!(request.department_name.as_deref(), Some("Finance"));
        assert_eq!(request.role, "employee");
    }
}
