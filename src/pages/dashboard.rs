use tracing::warn;

use super::{Navigation, Outcome};
use crate::client::models::{AdminStats, EmployeeStats};
use crate::client::{ApiError, HrClient};
use crate::view::format::{currency, percentage};
use crate::view::Field;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminDashboard {
    pub stats: AdminStats,
    pub cards: Vec<Field>,
    /// `"78% present"`, only when there is at least one employee.
    pub attendance_note: Option<String>,
}

impl AdminDashboard {
    pub fn from_stats(stats: AdminStats) -> Self {
        let cards = vec![
            Field::new("Total Employees", stats.total_employees.to_string()),
            Field::new("Departments", stats.total_departments.to_string()),
            Field::new("Today's Attendance", stats.today_attendance.to_string()),
            Field::new("Pending Leaves", stats.pending_leaves.to_string()),
        ];
        let attendance_note = percentage(stats.today_attendance, stats.total_employees)
            .map(|pct| format!("{pct}% present"));

        Self {
            stats,
            cards,
            attendance_note,
        }
    }
}

pub async fn admin_dashboard(client: &HrClient) -> Outcome<AdminDashboard> {
    let stats = load!(client.admin_stats(), "Failed to load dashboard stats");
    Outcome::Render(AdminDashboard::from_stats(stats))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeDashboard {
    pub cards: Vec<Field>,
    /// Set when the stats could not be loaded and fallback values are shown.
    pub degraded: bool,
}

impl EmployeeDashboard {
    pub fn from_stats(stats: &EmployeeStats) -> Self {
        let salary = match stats.current_salary {
            Some(amount) if amount != 0.0 => format!("${}", currency(amount)),
            _ => "N/A".to_string(),
        };

        Self {
            cards: vec![
                Field::new(
                    "Status",
                    stats.employee_status.as_deref().unwrap_or("Unknown"),
                ),
                Field::new(
                    "Attendance This Month",
                    format!("{} days", stats.monthly_attendance),
                ),
                Field::new("Leave Balance", format!("{} days", stats.leave_balance)),
                Field::new("Current Salary", salary),
            ],
            degraded: false,
        }
    }

    pub fn fallback() -> Self {
        Self {
            cards: vec![
                Field::new("Status", "Unknown"),
                Field::new("Attendance This Month", "N/A"),
                Field::new("Leave Balance", "N/A"),
                Field::new("Current Salary", "N/A"),
            ],
            degraded: true,
        }
    }
}

/// Loads the signed-in employee's cards. Failures other than an expired
/// session still render, with placeholder values.
pub async fn employee_dashboard(client: &HrClient) -> Outcome<EmployeeDashboard> {
    match client.employee_stats().await {
        Ok(stats) => Outcome::Render(EmployeeDashboard::from_stats(&stats)),
        Err(ApiError::Unauthorized) => Outcome::Navigate(Navigation::login()),
        Err(err) => {
            warn!(error = %err, "failed to load employee stats");
            Outcome::Render(EmployeeDashboard::fallback())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::field_value;

    #[test]
    fn attendance_note_needs_employees() {
        let empty = AdminDashboard::from_stats(AdminStats {
            total_employees: 0,
            total_departments: 2,
            today_attendance: 0,
            pending_leaves: 1,
        });
        assert!(empty.attendance_note.is_none());

        let staffed = AdminDashboard::from_stats(AdminStats {
            total_employees: 9,
            total_departments: 2,
            today_attendance: 7,
            pending_leaves: 1,
        });
        assert_eq!(staffed.attendance_note.as_deref(), Some("78% present"));
        assert_eq!(field_value(&staffed.cards, "Pending Leaves"), Some("1"));
    }

    #[test]
    fn employee_cards_format_salary() {
        let dashboard = EmployeeDashboard::from_stats(&EmployeeStats {
            employee_status: Some("Active".into()),
            monthly_attendance: 12,
            leave_balance: 27,
            current_salary: Some(4200.0),
            total_leaves: 2,
        });
        assert_eq!(field_value(&dashboard.cards, "Current Salary"), Some("$4,200.00"));
        assert_eq!(field_value(&dashboard.cards, "Leave Balance"), Some("27 days"));
        assert!(!dashboard.degraded);
    }
}
