use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};

use crate::client::models::{AttendanceStatus, LeaveType};
use crate::client::session::{FileSessionStore, SessionStore};
use crate::client::HrClient;
use crate::config::{AppConfig, BackendConfig};
use crate::error::AppError;
use crate::pages::attendance::{attendance_report, AttendanceSheet, ReportRange};
use crate::pages::dashboard::{admin_dashboard, employee_dashboard};
use crate::pages::departments::{create_department, department_list, department_team};
use crate::pages::employees::{
    create_employee, employee_form_choices, employee_list, view_employee, EmployeeForm,
};
use crate::pages::leaves::{apply_leave, my_leaves, parse_status_filter, LeaveDesk, LeaveForm};
use crate::pages::profile::view_profile;
use crate::pages::salaries::{
    add_salary, employee_salary, my_salaries, salary_list, salary_target, SalaryForm,
};
use crate::pages::settings::{
    change_password, settings_profile, update_address, update_phone, AddressParts,
};
use crate::pages::{auth, Notice, Outcome, Route};
use crate::render;
use crate::view::Table;

#[derive(Parser, Debug)]
#[command(
    name = "hr-console",
    about = "Work with the HR management backend from the terminal",
    version
)]
struct Cli {
    /// Override the configured backend URL
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Override where the session credential is stored
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,
    /// Log more: -v for debug, -vv for trace
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and store the session credential
    Login(LoginArgs),
    /// Forget the stored session credential
    Logout,
    /// Administrator pages
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
    /// Pages for the signed-in employee
    Me {
        #[command(subcommand)]
        command: MeCommand,
    },
    /// Account settings for either role
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
}

#[derive(Args, Debug)]
struct LoginArgs {
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
}

#[derive(Args, Debug, Default)]
struct SearchArgs {
    /// Only show rows containing this text (case-insensitive)
    #[arg(long)]
    search: Option<String>,
}

#[derive(Subcommand, Debug)]
enum AdminCommand {
    /// Headcount, departments, attendance and pending leave totals
    Dashboard,
    Employees {
        #[command(subcommand)]
        command: EmployeeCommand,
    },
    Departments {
        #[command(subcommand)]
        command: DepartmentCommand,
    },
    Salaries {
        #[command(subcommand)]
        command: SalaryCommand,
    },
    Attendance {
        #[command(subcommand)]
        command: AttendanceCommand,
    },
    Leaves {
        #[command(subcommand)]
        command: LeaveCommand,
    },
}

#[derive(Subcommand, Debug)]
enum EmployeeCommand {
    List(SearchArgs),
    /// Detail card for one employee (by row id)
    Show {
        #[arg(long)]
        id: i64,
    },
    Create(CreateEmployeeArgs),
}

#[derive(Args, Debug)]
struct CreateEmployeeArgs {
    #[arg(long)]
    employee_id: String,
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: Option<String>,
    /// Department name, as listed by `admin departments list`
    #[arg(long)]
    department: Option<String>,
    #[arg(long)]
    salary: Option<f64>,
    /// Create the account as inactive
    #[arg(long)]
    inactive: bool,
    #[arg(long)]
    address: Option<String>,
    /// Date of birth (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    date_of_birth: Option<NaiveDate>,
    #[arg(long, default_value = "employee")]
    role: String,
    #[arg(long)]
    password: String,
}

#[derive(Subcommand, Debug)]
enum DepartmentCommand {
    List(SearchArgs),
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Members of one department
    Team {
        #[arg(long)]
        name: String,
        #[command(flatten)]
        search: SearchArgs,
    },
}

#[derive(Subcommand, Debug)]
enum SalaryCommand {
    List(SearchArgs),
    /// Salary history of one employee (by row id)
    Show {
        #[arg(long)]
        id: i64,
    },
    Add(AddSalaryArgs),
}

#[derive(Args, Debug)]
struct AddSalaryArgs {
    /// Row id of the employee; used for the header and the follow-up page
    #[arg(long)]
    id: Option<i64>,
    /// Staff code to submit; resolved from --id when omitted
    #[arg(long)]
    employee_code: Option<String>,
    /// Salary month (YYYY-MM)
    #[arg(long, value_parser = parse_month)]
    month: String,
    #[arg(long)]
    basic: String,
    #[arg(long, default_value = "")]
    deduction: String,
}

#[derive(Subcommand, Debug)]
enum AttendanceCommand {
    /// Today's attendance sheet
    Sheet(SearchArgs),
    Mark {
        /// Staff code, as shown in the Employee ID column
        #[arg(long)]
        employee_id: String,
        #[arg(long, value_parser = parse_attendance_status)]
        status: AttendanceStatus,
    },
    Report(ReportArgs),
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// First day of the report (defaults to 30 days ago)
    #[arg(long, value_parser = parse_date)]
    start: Option<NaiveDate>,
    /// Last day of the report (defaults to today)
    #[arg(long, value_parser = parse_date)]
    end: Option<NaiveDate>,
    #[command(flatten)]
    search: SearchArgs,
    /// Write the visible rows as CSV into this directory
    #[arg(long)]
    export_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum LeaveCommand {
    List {
        /// all, pending, approved or rejected
        #[arg(long, default_value = "all")]
        status: String,
    },
    Approve(DecisionArgs),
    Reject(DecisionArgs),
}

#[derive(Args, Debug)]
struct DecisionArgs {
    #[arg(long)]
    id: i64,
    /// Skip the confirmation prompt
    #[arg(long)]
    yes: bool,
}

#[derive(Subcommand, Debug)]
enum MeCommand {
    Dashboard,
    Leaves,
    ApplyLeave(ApplyLeaveArgs),
    Salaries,
    Profile,
}

#[derive(Args, Debug)]
struct ApplyLeaveArgs {
    /// annual, sick, personal, maternity or unpaid
    #[arg(long = "type", value_parser = parse_leave_type)]
    leave_type: LeaveType,
    #[arg(long, value_parser = parse_date)]
    start: NaiveDate,
    #[arg(long, value_parser = parse_date)]
    end: NaiveDate,
    #[arg(long)]
    reason: Option<String>,
}

#[derive(Subcommand, Debug)]
enum SettingsCommand {
    Show,
    Password {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
        #[arg(long)]
        confirm: String,
    },
    Phone {
        #[arg(long)]
        phone: String,
    },
    Address(AddressArgs),
}

#[derive(Args, Debug)]
struct AddressArgs {
    #[arg(long, default_value = "")]
    street: String,
    #[arg(long, default_value = "")]
    city: String,
    #[arg(long, default_value = "")]
    state: String,
    #[arg(long, default_value = "")]
    zip: String,
    #[arg(long, default_value = "")]
    country: String,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;

    if let Some(raw) = cli.api_url.as_deref() {
        config.backend.base_url = BackendConfig::parse_base_url(raw)?;
    }
    if let Some(path) = cli.session_file {
        config.session.path = path;
    }

    crate::telemetry::init(&config.telemetry, cli.verbose)?;
    debug!(
        environment = ?config.environment,
        api = %config.backend.base_url,
        session = %config.session.path.display(),
        "hr console configured"
    );

    let session: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(config.session.path));
    let client = HrClient::new(&config.backend, session)?;
    let today = Local::now().date_naive();

    match cli.command {
        Command::Login(args) => match auth::login(&client, &args.email, &args.password).await {
            Outcome::Navigate(next) => {
                println!("Signed in.\n{}", render::navigation(&next));
                Ok(())
            }
            Outcome::Failed(message) => Err(AppError::Page(message)),
            Outcome::Render(()) => Ok(()),
        },
        Command::Logout => {
            if let Outcome::Navigate(next) = auth::logout(&client)? {
                println!("Signed out.\n{}", render::navigation(&next));
            }
            Ok(())
        }
        Command::Admin { command } => run_admin(&client, command, today).await,
        Command::Me { command } => run_me(&client, command, today).await,
        Command::Settings { command } => run_settings(&client, command).await,
    }
}

async fn run_admin(
    client: &HrClient,
    command: AdminCommand,
    today: NaiveDate,
) -> Result<(), AppError> {
    match command {
        AdminCommand::Dashboard => present(admin_dashboard(client).await, |dashboard| {
            let mut out = render::fields("Admin Dashboard", &dashboard.cards);
            if let Some(note) = dashboard.attendance_note {
                out.push_str(&format!("  ({note})\n"));
            }
            out
        }),
        AdminCommand::Employees { command } => match command {
            EmployeeCommand::List(args) => present(
                employee_list(client, args.search.as_deref()).await,
                |table| titled("Employees", &table),
            ),
            EmployeeCommand::Show { id } => present(view_employee(client, id).await, |card| {
                let heading = format!("[{}] {} ({})", card.initials, card.name, card.employee_code);
                render::fields(&heading, &card.details)
            }),
            EmployeeCommand::Create(args) => {
                let departments = expect_render(employee_form_choices(client).await)?;
                if let Some(wanted) = args.department.as_deref() {
                    if !departments.iter().any(|name| name == wanted) {
                        return Err(AppError::Input(format!(
                            "unknown department '{wanted}'. Available: {}",
                            departments.join(", ")
                        )));
                    }
                }

                let form = EmployeeForm {
                    employee_id: args.employee_id,
                    first_name: args.first_name,
                    last_name: args.last_name,
                    email: args.email,
                    phone: args.phone,
                    department_name: args.department,
                    salary: args.salary,
                    is_active: !args.inactive,
                    address: args.address,
                    date_of_birth: args.date_of_birth,
                    role: args.role,
                    password: args.password,
                };
                present(create_employee(client, form).await, notice)
            }
        },
        AdminCommand::Departments { command } => match command {
            DepartmentCommand::List(args) => present(
                department_list(client, args.search.as_deref()).await,
                |table| titled("Departments", &table),
            ),
            DepartmentCommand::Create { name, description } => present(
                create_department(client, &name, description.as_deref()).await,
                notice,
            ),
            DepartmentCommand::Team { name, search } => present(
                department_team(client, &name, search.search.as_deref()).await,
                |team| {
                    let members = render::table(&team.members);
                    format!("{}\n{}\n\n{members}", team.title, team.subtitle)
                },
            ),
        },
        AdminCommand::Salaries { command } => match command {
            SalaryCommand::List(args) => present(
                salary_list(client, args.search.as_deref()).await,
                |table| titled("Salaries", &table),
            ),
            SalaryCommand::Show { id } => present(employee_salary(client, id).await, |details| {
                format!(
                    "{}\n{}\n\n{}\nAdd Salary {}",
                    details.title,
                    details.subtitle,
                    render::table(&details.records),
                    render::navigation(&details.add_salary)
                )
            }),
            SalaryCommand::Add(args) => {
                let target = expect_render(salary_target(client, args.id).await)?;
                println!("{}", target.header);

                let Some(code) = args.employee_code.or(target.employee_code) else {
                    return Err(AppError::Input(
                        "no staff code to submit; pass --employee-code".to_string(),
                    ));
                };
                let mut form = SalaryForm::new(code, args.month);
                form.set_basic_salary(args.basic);
                form.set_deduction(args.deduction);
                println!("Net salary: {}", form.net_salary());

                present(add_salary(client, form, args.id).await, notice)
            }
        },
        AdminCommand::Attendance { command } => match command {
            AttendanceCommand::Sheet(args) => {
                let mut sheet = expect_render(AttendanceSheet::load(client, today).await)?;
                if let Some(query) = args.search.as_deref() {
                    sheet.filter(query);
                }
                println!("{}\n\n{}", sheet.date_label, render::table(&sheet.table));
                Ok(())
            }
            AttendanceCommand::Mark {
                employee_id,
                status,
            } => {
                let mut sheet = expect_render(AttendanceSheet::load(client, today).await)?;
                let outcome = sheet.mark(client, &employee_id, status).await;
                present(outcome, notice)?;
                sheet.filter(&employee_id);
                println!("\n{}", render::table(&sheet.table));
                Ok(())
            }
            AttendanceCommand::Report(args) => run_report(client, args, today).await,
        },
        AdminCommand::Leaves { command } => run_leaves(client, command).await,
    }
}

async fn run_report(client: &HrClient, args: ReportArgs, today: NaiveDate) -> Result<(), AppError> {
    let range = ReportRange::resolve(args.start, args.end, today).map_err(AppError::Page)?;
    let mut report = expect_render(attendance_report(client, range).await)?;
    if let Some(query) = args.search.search.as_deref() {
        report.table.filter_text(query);
    }

    println!("{}\n\n{}", report.summary, render::table(&report.table));

    if let Some(dir) = args.export_dir {
        let path = dir.join(range.file_name());
        let file = std::fs::File::create(&path)?;
        let written = report.export(io::BufWriter::new(file))?;
        info!(path = %path.display(), rows = written, "attendance report exported");
        println!("Exported {written} rows to {}", path.display());
    }
    Ok(())
}

async fn run_leaves(client: &HrClient, command: LeaveCommand) -> Result<(), AppError> {
    match command {
        LeaveCommand::List { status } => {
            let filter = parse_status_filter(&status).map_err(AppError::Input)?;
            let mut desk = expect_render(LeaveDesk::load(client).await)?;
            desk.filter_status(filter);
            println!("{}\n\n{}", desk.summary, render::table(&desk.table));
            Ok(())
        }
        LeaveCommand::Approve(args) => {
            let mut desk = expect_render(LeaveDesk::load(client).await)?;
            if !args.yes && !confirm("Are you sure you want to approve this leave application?")? {
                return Ok(());
            }
            let outcome = desk.approve(client, args.id).await;
            present(outcome, notice)?;
            println!("\n{}", render::table(&desk.table));
            Ok(())
        }
        LeaveCommand::Reject(args) => {
            let mut desk = expect_render(LeaveDesk::load(client).await)?;
            if !args.yes && !confirm("Are you sure you want to reject this leave application?")? {
                return Ok(());
            }
            let outcome = desk.reject(client, args.id).await;
            present(outcome, notice)?;
            println!("\n{}", render::table(&desk.table));
            Ok(())
        }
    }
}

async fn run_me(client: &HrClient, command: MeCommand, today: NaiveDate) -> Result<(), AppError> {
    match command {
        MeCommand::Dashboard => present(employee_dashboard(client).await, |dashboard| {
            let mut out = render::fields("My Dashboard", &dashboard.cards);
            if dashboard.degraded {
                out.push_str("  (stats unavailable; showing placeholders)\n");
            }
            out
        }),
        MeCommand::Leaves => present(my_leaves(client).await, |page| {
            format!(
                "Employee ID: {}\nTotal Applications: {}\n\n{}\nApply for Leave {}",
                page.employee_code,
                page.total_applications,
                render::table(&page.table),
                render::navigation(&page.apply)
            )
        }),
        MeCommand::ApplyLeave(args) => {
            let form = LeaveForm {
                leave_type: args.leave_type,
                start_date: args.start,
                end_date: args.end,
                reason: args.reason,
            };
            if let Some(summary) = form.summary() {
                println!("{} ({} to {})", summary.duration, summary.start, summary.end);
            }
            present(apply_leave(client, &form, today).await, |receipt| {
                render::fields("Leave application submitted", &receipt)
            })
        }
        MeCommand::Salaries => present(my_salaries(client).await, |page| {
            let mut out = format!(
                "Employee ID: {}\nTotal Records: {}\n\n{}",
                page.employee_code,
                page.total_records,
                render::table(&page.records)
            );
            if !page.totals.is_empty() {
                out.push('\n');
                out.push_str(&render::fields("Summary", &page.totals));
            }
            out
        }),
        MeCommand::Profile => present(view_profile(client).await, |view| {
            let heading = format!(
                "[{}] {} - {} ({})",
                view.initials, view.name, view.role, view.status
            );
            let mut out = render::fields(&heading, &view.personal);
            out.push_str(&render::fields("Employment", &view.employment));
            out
        }),
    }
}

async fn run_settings(client: &HrClient, command: SettingsCommand) -> Result<(), AppError> {
    match command {
        SettingsCommand::Show => present(settings_profile(client).await, |view| {
            render::fields("Profile", &view.details)
        }),
        SettingsCommand::Password {
            current,
            new,
            confirm,
        } => present(change_password(client, &current, &new, &confirm).await, notice),
        SettingsCommand::Phone { phone } => present(update_phone(client, &phone).await, notice),
        SettingsCommand::Address(args) => {
            let parts = AddressParts {
                street: args.street,
                city: args.city,
                state: args.state,
                zip: args.zip,
                country: args.country,
            };
            present(update_address(client, &parts).await, notice)
        }
    }
}

fn titled(title: &str, table: &Table) -> String {
    format!("{title}\n\n{}", render::table(table))
}

fn notice(notice: Notice) -> String {
    render::notice(&notice)
}

/// Prints a rendered page, or turns a redirect or failure into an error.
fn present<V>(outcome: Outcome<V>, render_view: impl FnOnce(V) -> String) -> Result<(), AppError> {
    let view = expect_render(outcome)?;
    println!("{}", render_view(view).trim_end());
    Ok(())
}

fn expect_render<V>(outcome: Outcome<V>) -> Result<V, AppError> {
    match outcome {
        Outcome::Render(view) => Ok(view),
        Outcome::Navigate(next) if next.route == Route::Login => Err(AppError::Page(
            "not signed in or the session has expired; run `hr-console login`".to_string(),
        )),
        Outcome::Navigate(next) => Err(AppError::Page(render::navigation(&next))),
        Outcome::Failed(message) => Err(AppError::Page(message)),
    }
}

fn confirm(question: &str) -> Result<bool, AppError> {
    print!("{question} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn parse_month(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d")
        .map(|_| trimmed.to_string())
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM ({err})"))
}

fn parse_leave_type(raw: &str) -> Result<LeaveType, String> {
    raw.parse()
}

fn parse_attendance_status(raw: &str) -> Result<AttendanceStatus, String> {
    raw.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_nested_admin_commands() {
        let cli = Cli::try_parse_from([
            "hr-console",
            "--api-url",
            "http://hr.local",
            "admin",
            "leaves",
            "approve",
            "--id",
            "7",
            "--yes",
        ])
        .expect("parses");

        assert_eq!(cli.api_url.as_deref(), Some("http://hr.local"));
        match cli.command {
            Command::Admin {
                command: AdminCommand::Leaves {
                    command: LeaveCommand::Approve(args),
                },
            } => {
                assert_eq!(args.id, 7);
                assert!(args.yes);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_leave_type_and_bad_month() {
        assert!(Cli::try_parse_from([
            "hr-console", "me", "apply-leave", "--type", "vacation", "--start", "2026-11-02",
            "--end", "2026-11-03",
        ])
        .is_err());

        assert_eq!(parse_month(" 2024-03 "), Ok("2024-03".to_string()));
        assert!(parse_month("March").is_err());
    }

    #[test]
    fn failures_and_login_redirects_become_errors() {
        let failed: Outcome<()> = Outcome::Failed("Employee not found".into());
        assert_eq!(
            expect_render(failed).expect_err("fails").to_string(),
            "Employee not found"
        );

        let expired: Outcome<()> = Outcome::Navigate(crate::pages::Navigation::login());
        assert!(expect_render(expired)
            .expect_err("redirect")
            .to_string()
            .contains("hr-console login"));
    }
}
