//! Plain-text rendering of page views for the terminal.

use std::fmt::Write;

use crate::pages::{Navigation, Notice};
use crate::view::{Action, Field, Table};

const GAP: &str = "  ";

fn action_label(action: &Action) -> String {
    let label = match &action.target {
        Some(route) => format!("{} {}", action.label, route.path()),
        None => action.label.clone(),
    };
    if action.enabled {
        format!("[{label}]")
    } else {
        format!("({label})")
    }
}

/// Renders the header and visible rows with padded columns. A placeholder
/// is printed on its own line beneath the header.
pub fn table(table: &Table) -> String {
    let headers = table.headers();
    let has_actions = headers.len() > table.data_columns().len();

    let lines: Vec<Vec<String>> = table
        .visible_rows()
        .map(|row| {
            let mut cells = row.cells.clone();
            if has_actions {
                cells.push(
                    row.actions
                        .iter()
                        .map(action_label)
                        .collect::<Vec<_>>()
                        .join(" "),
                );
            }
            cells
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|header| header.chars().count()).collect();
    for cells in &lines {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, headers.iter().copied(), &widths);
    let rule: usize = widths.iter().sum::<usize>() + GAP.len() * widths.len().saturating_sub(1);
    let _ = writeln!(out, "{}", "-".repeat(rule));

    if let Some(placeholder) = table.placeholder() {
        let _ = writeln!(out, "{}", placeholder.message);
        return out;
    }

    for cells in &lines {
        push_line(&mut out, cells.iter().map(String::as_str), &widths);
    }
    out
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    let _ = writeln!(out, "{}", padded.join(GAP).trim_end());
}

/// Renders a titled block of `label: value` lines with aligned values.
pub fn fields(title: &str, fields: &[Field]) -> String {
    let width = fields
        .iter()
        .map(|field| field.label.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    if !title.is_empty() {
        let _ = writeln!(out, "{title}");
    }
    for field in fields {
        let label = format!("{}:", field.label);
        let _ = writeln!(out, "  {label:<width$}  {}", field.value, width = width + 1);
    }
    out
}

pub fn navigation(navigation: &Navigation) -> String {
    match navigation.delay {
        Some(delay) => format!(
            "-> {} (after {}s)",
            navigation.route.path(),
            delay.as_secs()
        ),
        None => format!("-> {}", navigation.route.path()),
    }
}

pub fn notice(notice: &Notice) -> String {
    match &notice.then {
        Some(next) => format!("{}\n{}", notice.message, navigation(next)),
        None => notice.message.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::Route;
    use crate::view::Row;
    use std::time::Duration;

    #[test]
    fn pads_columns_and_marks_disabled_actions() {
        let table = Table::new(&["#", "Name"]).with_actions("Actions").fill(
            vec![
                Row::new("7", vec!["1".into(), "Ana Lima".into()])
                    .with_action(Action::new("approve", "Approved").enabled_if(false))
                    .with_action(Action::new("reject", "Reject").enabled_if(false)),
                Row::new("8", vec!["2".into(), "Bo".into()])
                    .with_action(Action::new("approve", "Approve")),
            ],
            "none",
        );

        let text = super::table(&table);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "#  Name      Actions");
        assert_eq!(lines[2], "1  Ana Lima  (Approved) (Reject)");
        assert_eq!(lines[3], "2  Bo        [Approve]");
    }

    #[test]
    fn link_actions_show_their_path() {
        let table = Table::new(&["Name"]).with_actions("Actions").fill(
            vec![Row::new("42", vec!["Ana".into()])
                .with_action(Action::link("view", "View", Route::ViewEmployee { id: 42 }))],
            "none",
        );
        let text = super::table(&table);
        assert_eq!(text.lines().nth(2), Some("Ana   [View /admin/view_employee?id=42]"));
    }

    #[test]
    fn placeholder_follows_header() {
        let table = Table::new(&["S.No", "Month"]).fill(Vec::new(), "No salary records found");
        let text = super::table(&table);
        assert_eq!(text.lines().last(), Some("No salary records found"));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn fields_align_values() {
        let text = super::fields(
            "Profile",
            &[Field::new("Role", "Employee"), Field::new("Employee ID", "EMP001")],
        );
        assert_eq!(text, "Profile\n  Role:         Employee\n  Employee ID:  EMP001\n");
    }

    #[test]
    fn notice_mentions_delayed_redirect() {
        let rendered = notice(
            &Notice::new("Employee created successfully!")
                .then(Navigation::after(Route::EmployeeList, Duration::from_secs(2))),
        );
        assert_eq!(
            rendered,
            "Employee created successfully!\n-> /admin/employee-list (after 2s)"
        );
    }
}
