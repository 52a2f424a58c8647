use super::{from_api_error, Navigation, Notice, Outcome, Route, REDIRECT_DELAY};
use crate::client::models::{Department, Employee, NewDepartment};
use crate::client::HrClient;
use crate::view::format::or_na;
use crate::view::{Action, Row, Table};

pub fn department_table(departments: &[Department]) -> Table {
    let rows = departments
        .iter()
        .enumerate()
        .map(|(index, department)| {
            Row::new(
                department.department_name.clone(),
                vec![
                    (index + 1).to_string(),
                    department.id.to_string(),
                    department.department_name.clone(),
                ],
            )
            .with_action(Action::link(
                "view",
                "View",
                Route::DepartmentTeam {
                    department: department.department_name.clone(),
                },
            ))
        })
        .collect();

    Table::new(&["S.No", "ID", "Department Name"])
        .with_actions("Actions")
        .fill(rows, "No departments found")
}

pub async fn department_list(client: &HrClient, search: Option<&str>) -> Outcome<Table> {
    let departments = load!(client.all_departments(), "Failed to load departments");
    let mut table = department_table(&departments);
    if let Some(query) = search {
        table.filter_text(query);
    }
    Outcome::Render(table)
}

pub async fn create_department(
    client: &HrClient,
    name: &str,
    description: Option<&str>,
) -> Outcome<Notice> {
    let department_name = name.trim();
    if department_name.is_empty() {
        return Outcome::Failed("Department name is required".to_string());
    }

    let request = NewDepartment {
        department_name: department_name.to_string(),
        description: description
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string),
    };

    match client.create_department(&request).await {
        Ok(created) => {
            tracing::info!(department_id = created.department_id, "department created");
            Outcome::Render(
                Notice::new("Department created successfully!")
                    .then(Navigation::after(Route::DepartmentList, REDIRECT_DELAY)),
            )
        }
        Err(err) => from_api_error(err, "Failed to create department"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentTeam {
    pub title: String,
    pub subtitle: String,
    pub members: Table,
}

impl DepartmentTeam {
    pub fn new(department: &str, employees: &[Employee]) -> Self {
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
                        or_na(employee.role.as_deref()),
                        or_na(employee.phone.as_deref()),
                        or_na(employee.email.as_deref()),
                        if employee.is_active { "Active" } else { "Inactive" }.to_string(),
                    ],
                )
                .with_action(Action::link(
                    "view",
                    "View",
                    Route::ViewEmployee { id: employee.id },
                ))
            })
            .collect();

        Self {
            title: format!("{department} Department"),
            subtitle: format!("Team members in {department} department"),
            members: Table::new(&[
                "S.No",
                "Employee ID",
                "Name",
                "Role",
                "Phone",
                "Email",
                "Status",
            ])
            .with_actions("Actions")
            .fill(rows, format!("No employees found in {department} department")),
        }
    }
}

pub async fn department_team(
    client: &HrClient,
    department: &str,
    search: Option<&str>,
) -> Outcome<DepartmentTeam> {
    if department.trim().is_empty() {
        return Outcome::Failed("Department name not found".to_string());
    }

    let employees = load!(
        client.department_employees(department),
        "Failed to load department employees"
    );
    let mut team = DepartmentTeam::new(department, &employees);
    if let Some(query) = search {
        team.members.filter_text(query);
    }
    Outcome::Render(team)
}
