use chrono::NaiveDate;
use tracing::warn;

use super::{from_api_error, Navigation, Notice, Outcome, Route};
use crate::client::models::{
    Employee, LeaveApplication, LeaveReceipt, LeaveRequest, LeaveStatus, LeaveType, MyLeaves,
};
use crate::client::{ApiError, HrClient};
use crate::view::format::{capitalize_first, day_count, or_fallback, short_date, weekday_date};
use crate::view::{Action, Field, Row, Table};

const STATUS_COLUMN: &str = "Status";
const NO_REASON: &str = "No reason provided";

/// The admin's leave queue, with approve/reject actions on pending rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveDesk {
    pub summary: String,
    pub table: Table,
}

impl LeaveDesk {
    pub fn new(leaves: &[LeaveApplication], employees: &[Employee]) -> Self {
        let pending = leaves
            .iter()
            .filter(|leave| leave.status == LeaveStatus::Pending)
            .count();

        let rows = leaves
            .iter()
            .enumerate()
            .map(|(index, leave)| {
                let employee = employees.iter().find(|employee| {
                    employee.employee_id.as_deref() == Some(leave.employee_id.as_str())
                });
                let code = or_fallback(
                    employee.and_then(|employee| employee.employee_id.as_deref()),
                    "N/A",
                );
                let name = employee
                    .filter(|employee| {
                        !employee.first_name.is_empty() && !employee.last_name.is_empty()
                    })
                    .map(Employee::full_name)
                    .unwrap_or_else(|| "Unknown".to_string());
                let open = leave.status == LeaveStatus::Pending;

                Row::new(
                    leave.id.to_string(),
                    vec![
                        (index + 1).to_string(),
                        code,
                        name,
                        or_fallback(leave.leave_type.as_deref(), "N/A"),
                        short_date(leave.start_date),
                        short_date(leave.end_date),
                        or_fallback(leave.reason.as_deref(), NO_REASON),
                        leave.status.as_str().to_uppercase(),
                    ],
                )
                .with_action(Action::new("approve", "Approve").enabled_if(open))
                .with_action(Action::new("reject", "Reject").enabled_if(open))
            })
            .collect();

        Self {
            summary: format!("Total Applications: {} | Pending: {pending}", leaves.len()),
            table: Table::new(&[
                "#",
                "Employee ID",
                "Employee Name",
                "Leave Type",
                "Start Date",
                "End Date",
                "Reason",
                STATUS_COLUMN,
            ])
            .with_actions("Actions")
            .fill(rows, "No leave applications found"),
        }
    }

    /// Loads the applications, then the staff directory used to resolve
    /// names. A failed directory fetch leaves names unresolved.
    pub async fn load(client: &HrClient) -> Outcome<Self> {
        let leaves = load!(client.leaves(), "Failed to load leave applications");
        let employees = match client.all_employees().await {
            Ok(employees) => employees,
            Err(err) => {
                warn!(error = %err, "leave list continues without employee names");
                Vec::new()
            }
        };
        Outcome::Render(Self::new(&leaves, &employees))
    }

    pub async fn approve(&mut self, client: &HrClient, leave_id: i64) -> Outcome<Notice> {
        if let Err(err) = client.approve_leave(leave_id).await {
            return from_api_error(err, "Failed to approve leave");
        }
        self.settle(leave_id, LeaveStatus::Approved);
        Outcome::Render(Notice::new("Leave approved successfully!"))
    }

    pub async fn reject(&mut self, client: &HrClient, leave_id: i64) -> Outcome<Notice> {
        if let Err(err) = client.reject_leave(leave_id).await {
            return from_api_error(err, "Failed to reject leave");
        }
        self.settle(leave_id, LeaveStatus::Rejected);
        Outcome::Render(Notice::new("Leave rejected successfully!"))
    }

    fn settle(&mut self, leave_id: i64, status: LeaveStatus) {
        let key = leave_id.to_string();
        self.table
            .set_cell(&key, STATUS_COLUMN, status.as_str().to_uppercase());

        let Some(row) = self.table.row_mut(&key) else {
            return;
        };
        for action in &mut row.actions {
            action.enabled = false;
        }
        let relabel = match status {
            LeaveStatus::Approved => Some(("approve", "Approved")),
            LeaveStatus::Rejected => Some(("reject", "Rejected")),
            LeaveStatus::Pending => None,
        };
        if let Some((id, label)) = relabel {
            if let Some(action) = row.action_mut(id) {
                action.label = label.to_string();
            }
        }
    }

    /// `None` shows every application.
    pub fn filter_status(&mut self, status: Option<LeaveStatus>) {
        self.table
            .filter_column(STATUS_COLUMN, status.map(LeaveStatus::as_str));
    }
}

/// The employee's leave application form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveForm {
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
}

/// Live duration preview shown while the dates are being picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveSummary {
    pub duration: String,
    pub start: String,
    pub end: String,
}

impl LeaveForm {
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Hidden while the range is reversed.
    pub fn summary(&self) -> Option<LeaveSummary> {
        (self.end_date >= self.start_date).then(|| LeaveSummary {
            duration: day_count(self.days()),
            start: weekday_date(self.start_date),
            end: weekday_date(self.end_date),
        })
    }

    pub fn validate(&self, today: NaiveDate) -> Result<(), String> {
        if self.start_date < today {
            return Err("Start date cannot be in the past.".to_string());
        }
        if self.end_date < self.start_date {
            return Err("End date cannot be before start date.".to_string());
        }
        Ok(())
    }

    fn to_request(&self) -> LeaveRequest {
        LeaveRequest {
            leave_type: self.leave_type,
            start_date: self.start_date,
            end_date: self.end_date,
            reason: self
                .reason
                .as_deref()
                .map(str::trim)
                .filter(|reason| !reason.is_empty())
                .map(str::to_string),
        }
    }
}

pub fn receipt_fields(receipt: &LeaveReceipt) -> Vec<Field> {
    vec![
        Field::new("Leave ID", receipt.leave_id.to_string()),
        Field::new("Type", capitalize_first(&receipt.leave_type)),
        Field::new("Duration", day_count(receipt.number_of_days)),
        Field::new("Status", capitalize_first(receipt.status.as_str())),
    ]
}

/// Validates against `today`, then submits. Nothing is sent when
/// validation fails.
pub async fn apply_leave(
    client: &HrClient,
    form: &LeaveForm,
    today: NaiveDate,
) -> Outcome<Vec<Field>> {
    if let Err(message) = form.validate(today) {
        return Outcome::Failed(message);
    }

    match client.apply_leave(&form.to_request()).await {
        Ok(receipt) => Outcome::Render(receipt_fields(&receipt)),
        Err(ApiError::Transport(err)) => {
            warn!(error = %err, "leave application did not reach the backend");
            Outcome::Failed("Network error. Please try again.".to_string())
        }
        Err(err) => from_api_error(err, "Failed to submit leave application."),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MyLeavesPage {
    pub employee_code: String,
    pub total_applications: usize,
    pub table: Table,
    pub apply: Navigation,
}

impl MyLeavesPage {
    pub fn new(data: &MyLeaves) -> Self {
        let rows = data
            .leaves
            .iter()
            .map(|leave| {
                Row::new(
                    leave.id.to_string(),
                    vec![
                        leave.id.to_string(),
                        capitalize_first(&leave.leave_type),
                        short_date(leave.start_date),
                        short_date(leave.end_date),
                        day_count(leave.days),
                        capitalize_first(leave.status.as_str()),
                        or_fallback(leave.reason.as_deref(), NO_REASON),
                    ],
                )
            })
            .collect();

        Self {
            employee_code: data.employee_id.clone(),
            total_applications: data.total_applications,
            table: Table::new(&[
                "ID",
                "Type",
                "Start Date",
                "End Date",
                "Days",
                "Status",
                "Reason",
            ])
            .fill(rows, "No leave applications found"),
            apply: Navigation::to(Route::ApplyLeave),
        }
    }
}

pub async fn my_leaves(client: &HrClient) -> Outcome<MyLeavesPage> {
    let data = load!(client.my_leaves(), "Failed to load leave applications");
    Outcome::Render(MyLeavesPage::new(&data))
}

/// Parses the `all|pending|approved|rejected` choice of the status filter.
pub fn parse_status_filter(raw: &str) -> Result<Option<LeaveStatus>, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "all" | "" => Ok(None),
        "pending" => Ok(Some(LeaveStatus::Pending)),
        "approved" => Ok(Some(LeaveStatus::Approved)),
        "rejected" => Ok(Some(LeaveStatus::Rejected)),
        other => Err(format!(
            "invalid status filter '{other}' (expected all, pending, approved or rejected)"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::models::MyLeave;
    use crate::view::field_value;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn application(id: i64, code: &str, status: LeaveStatus) -> LeaveApplication {
        LeaveApplication {
            id,
            employee_id: code.into(),
            leave_type: Some("sick".into()),
            start_date: date(2024, 2, 1),
            end_date: date(2024, 2, 2),
            status,
            reason: None,
        }
    }

    fn staff(code: &str) -> Employee {
        Employee {
            id: 1,
            employee_id: Some(code.into()),
            first_name: "Ana".into(),
            last_name: "Lima".into(),
            email: None,
            phone: None,
            role: None,
            is_active: true,
            department_id: None,
            address: None,
            date_of_birth: None,
            salary: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn only_pending_rows_can_be_decided() {
        let desk = LeaveDesk::new(
            &[
                application(7, "EMP001", LeaveStatus::Pending),
                application(8, "EMP404", LeaveStatus::Approved),
            ],
            &[staff("EMP001")],
        );

        assert_eq!(desk.summary, "Total Applications: 2 | Pending: 1");
        let pending = desk.table.row("7").expect("row 7");
        assert_eq!(pending.cells[2], "Ana Lima");
        assert_eq!(pending.cells[6], "No reason provided");
        assert!(pending.actions.iter().all(|action| action.enabled));

        let decided = desk.table.row("8").expect("row 8");
        assert_eq!(decided.cells[1], "N/A");
        assert_eq!(decided.cells[2], "Unknown");
        assert!(decided.actions.iter().all(|action| !action.enabled));
    }

    #[test]
    fn settling_updates_status_and_locks_row() {
        let mut desk = LeaveDesk::new(&[application(7, "EMP001", LeaveStatus::Pending)], &[]);
        desk.settle(7, LeaveStatus::Rejected);

        let row = desk.table.row("7").expect("row");
        assert_eq!(row.cells[7], "REJECTED");
        assert!(row.actions.iter().all(|action| !action.enabled));
        assert_eq!(row.action("reject").map(|a| a.label.as_str()), Some("Rejected"));
        assert_eq!(row.action("approve").map(|a| a.label.as_str()), Some("Approve"));
    }

    #[test]
    fn empty_queue_placeholder_spans_nine_columns() {
        let desk = LeaveDesk::new(&[], &[]);
        assert_eq!(desk.summary, "Total Applications: 0 | Pending: 0");
        let placeholder = desk.table.placeholder().expect("placeholder");
        assert_eq!(placeholder.message, "No leave applications found");
        assert_eq!(placeholder.colspan, 9);
    }

    #[test]
    fn status_filter_hides_other_rows() {
        let mut desk = LeaveDesk::new(
            &[
                application(1, "EMP001", LeaveStatus::Pending),
                application(2, "EMP001", LeaveStatus::Approved),
            ],
            &[],
        );
        desk.filter_status(parse_status_filter("approved").expect("valid"));
        let visible: Vec<&str> = desk.table.visible_rows().map(|r| r.key.as_str()).collect();
        assert_eq!(visible, vec!["2"]);

        desk.filter_status(parse_status_filter("all").expect("valid"));
        assert_eq!(desk.table.visible_rows().count(), 2);
        assert!(parse_status_filter("archived").is_err());
    }

    #[test]
    fn form_validation_checks_past_and_order() {
        let today = date(2026, 10, 17);
        let mut form = LeaveForm {
            leave_type: LeaveType::Annual,
            start_date: date(2026, 10, 16),
            end_date: date(2026, 10, 20),
            reason: None,
        };
        assert_eq!(
            form.validate(today).expect_err("past start"),
            "Start date cannot be in the past."
        );

        form.start_date = date(2026, 10, 21);
        assert_eq!(
            form.validate(today).expect_err("reversed"),
            "End date cannot be before start date."
        );
        assert!(form.summary().is_none());

        form.end_date = date(2026, 10, 21);
        assert!(form.validate(today).is_ok());
        let summary = form.summary().expect("summary");
        assert_eq!(summary.duration, "1 day");
        assert_eq!(summary.start, "Wed, Oct 21, 2026");
    }

    #[test]
    fn blank_reason_is_not_sent() {
        let form = LeaveForm {
            leave_type: LeaveType::Personal,
            start_date: date(2026, 11, 2),
            end_date: date(2026, 11, 4),
            reason: Some("   ".into()),
        };
        assert_eq!(form.to_request().reason, None);
        assert_eq!(form.days(), 3);
    }

    #[test]
    fn receipt_capitalizes_type_and_status() {
        let fields = receipt_fields(&LeaveReceipt {
            message: None,
            leave_id: 12,
            status: LeaveStatus::Pending,
            leave_type: "annual".into(),
            start_date: date(2026, 11, 2),
            end_date: date(2026, 11, 4),
            number_of_days: 3,
        });
        assert_eq!(field_value(&fields, "Type"), Some("Annual"));
        assert_eq!(field_value(&fields, "Duration"), Some("3 days"));
        assert_eq!(field_value(&fields, "Status"), Some("Pending"));
    }

    #[test]
    fn my_leaves_rows_follow_employee_view() {
        let page = MyLeavesPage::new(&MyLeaves {
            employee_id: "EMP001".into(),
            total_applications: 1,
            leaves: vec![MyLeave {
                id: 4,
                leave_type: "sick".into(),
                start_date: date(2024, 5, 6),
                end_date: date(2024, 5, 6),
                status: LeaveStatus::Approved,
                reason: Some("flu".into()),
                days: 1,
            }],
        });
        assert_eq!(
            page.table.rows()[0].cells,
            vec!["4", "Sick", "May 6, 2024", "May 6, 2024", "1 day", "Approved", "flu"]
        );
        assert_eq!(page.apply.route, Route::ApplyLeave);
    }
}
