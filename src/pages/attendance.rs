use std::io::Write;

use chrono::{Duration, NaiveDate};

use super::{from_api_error, Notice, Outcome};
use crate::client::models::{AttendanceMark, AttendanceReport, AttendanceStatus, Employee};
use crate::client::HrClient;
use crate::view::format::{full_date, or_na, short_date};
use crate::view::{write_csv, Action, Row, Table};

use super::employees::department_cell;

/// Days covered by the report when no range is given.
pub const DEFAULT_REPORT_DAYS: i64 = 30;

/// Today's attendance sheet: one row per employee, keyed by staff code, with
/// a Present/Absent/Late action each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceSheet {
    pub date_label: String,
    pub table: Table,
}

impl AttendanceSheet {
    pub fn new(today: NaiveDate, employees: &[Employee]) -> Self {
        let rows = employees
            .iter()
            .enumerate()
            .map(|(index, employee)| {
                let code = or_na(employee.employee_id.as_deref());
                let row = Row::new(
                    code.clone(),
                    vec![
                        (index + 1).to_string(),
                        code,
                        employee.full_name(),
                        department_cell(employee),
                        or_na(employee.role.as_deref()),
                    ],
                );
                AttendanceStatus::ordered()
                    .into_iter()
                    .fold(row, |row, status| {
                        row.with_action(Action::new(status.as_str(), status.label()))
                    })
            })
            .collect();

        Self {
            date_label: full_date(today),
            table: Table::new(&["S.No", "Employee ID", "Name", "Department", "Role"])
                .with_actions("Mark Attendance")
                .fill(rows, "No employees found"),
        }
    }

    pub async fn load(client: &HrClient, today: NaiveDate) -> Outcome<Self> {
        let employees = load!(client.all_employees(), "Failed to load employees");
        Outcome::Render(Self::new(today, &employees))
    }

    /// Records `status` for one employee. On success every action of that
    /// row is re-enabled except the one just chosen.
    pub async fn mark(
        &mut self,
        client: &HrClient,
        employee_code: &str,
        status: AttendanceStatus,
    ) -> Outcome<Notice> {
        let mark = AttendanceMark {
            employee_id: employee_code,
            status,
        };
        if let Err(err) = client.mark_attendance(&mark).await {
            return from_api_error(err, "Failed to mark attendance");
        }

        self.record_mark(employee_code, status);
        Outcome::Render(Notice::new(format!(
            "Attendance marked as {} successfully!",
            status.as_str().to_uppercase()
        )))
    }

    fn record_mark(&mut self, employee_code: &str, status: AttendanceStatus) {
        if let Some(row) = self.table.row_mut(employee_code) {
            for action in &mut row.actions {
                action.enabled = action.id != status.as_str();
            }
        }
    }

    pub fn filter(&mut self, query: &str) {
        self.table.filter_text(query);
    }
}

/// Inclusive date range of an attendance report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, String> {
        if start > end {
            return Err("Start date cannot be after end date".to_string());
        }
        Ok(Self { start, end })
    }

    pub fn ending(today: NaiveDate) -> Self {
        Self {
            start: today - Duration::days(DEFAULT_REPORT_DAYS),
            end: today,
        }
    }

    /// Fills whichever bound is missing from the default window, then checks
    /// the order.
    pub fn resolve(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Self, String> {
        let default = Self::ending(today);
        Self::new(start.unwrap_or(default.start), end.unwrap_or(default.end))
    }

    pub fn title(&self) -> String {
        format!("Attendance Report ({} to {})", self.start, self.end)
    }

    pub fn file_name(&self) -> String {
        format!("attendance_report_{}_to_{}.csv", self.start, self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceReportView {
    pub range: ReportRange,
    pub summary: String,
    pub table: Table,
}

impl AttendanceReportView {
    pub fn new(range: ReportRange, report: &AttendanceReport) -> Self {
        let rows = report
            .attendance_data
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let key = entry
                    .id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| (index + 1).to_string());
                Row::new(
                    key,
                    vec![
                        (index + 1).to_string(),
                        entry.employee_id.clone(),
                        entry.employee_name.clone(),
                        entry
                            .department_id
                            .map(|id| id.to_string())
                            .unwrap_or_else(|| "N/A".to_string()),
                        short_date(entry.date),
                        entry.status.as_str().to_uppercase(),
                    ],
                )
            })
            .collect();

        Self {
            range,
            summary: format!(
                "Report from {} to {} - Total Records: {}",
                short_date(report.start_date),
                short_date(report.end_date),
                report.total_records
            ),
            table: Table::new(&[
                "S.No",
                "Employee ID",
                "Employee Name",
                "Department",
                "Date",
                "Status",
            ])
            .fill(rows, "No attendance records found for the selected date range"),
        }
    }

    /// Writes the visible rows as CSV and returns how many were written.
    pub fn export<W: Write>(&self, writer: W) -> Result<usize, csv::Error> {
        write_csv(&self.range.title(), &self.table, writer)
    }
}

pub async fn attendance_report(
    client: &HrClient,
    range: ReportRange,
) -> Outcome<AttendanceReportView> {
    let report = load!(
        client.attendance_report(range.start, range.end),
        "Failed to generate attendance report"
    );
    Outcome::Render(AttendanceReportView::new(range, &report))
}
