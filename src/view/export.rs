use std::io::Write;

use super::table::Table;

/// Writes the visible rows of `table` as CSV beneath a two-line header: the
/// report title, then the column names. Action columns are left out and
/// cells holding commas or quotes are quoted. Returns the number of data
/// rows written.
pub fn write_csv<W: Write>(title: &str, table: &Table, writer: W) -> Result<usize, csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(writer);

    csv_writer.write_record([title])?;
    csv_writer.write_record(table.data_columns())?;

    let mut written = 0;
    for row in table.visible_rows() {
        csv_writer.write_record(&row.cells)?;
        written += 1;
    }

    csv_writer.flush()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::table::Row;

    fn report() -> Table {
        Table::new(&["S.No", "Employee Name", "Date", "Status"]).fill(
            vec![
                Row::new(
                    "1",
                    vec![
                        "1".into(),
                        "Lima, Ana".into(),
                        "Jan 5, 2024".into(),
                        "PRESENT".into(),
                    ],
                ),
                Row::new(
                    "2",
                    vec!["2".into(), "Bo Chen".into(), "Jan 6, 2024".into(), "LATE".into()],
                ),
                Row::new(
                    "3",
                    vec!["3".into(), "Cy Park".into(), "Jan 6, 2024".into(), "ABSENT".into()],
                ),
            ],
            "No attendance records found for the selected date range",
        )
    }

    #[test]
    fn quotes_comma_cells_and_counts_visible_rows() {
        let mut table = report();
        table.filter_text("jan 6");

        let mut out = Vec::new();
        let written = write_csv("Attendance Report (2024-01-01 to 2024-01-31)", &table, &mut out)
            .expect("csv writes");
        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(written, 2);
        assert_eq!(lines.len(), 2 + 2);
        assert_eq!(lines[0], "Attendance Report (2024-01-01 to 2024-01-31)");
        assert_eq!(lines[1], "S.No,Employee Name,Date,Status");
        assert_eq!(lines[2], "2,Bo Chen,\"Jan 6, 2024\",LATE");
    }

    #[test]
    fn placeholder_tables_export_only_the_header() {
        let table = Table::new(&["S.No", "Status"]).fill(Vec::new(), "nothing");
        let mut out = Vec::new();
        let written = write_csv("Empty", &table, &mut out).expect("csv writes");
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(written, 0);
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn every_visible_row_becomes_one_line() {
        let table = report();
        let mut out = Vec::new();
        write_csv("Attendance Report", &table, &mut out).expect("csv writes");
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(text.lines().count(), 3 + 2);
        assert!(text.contains("\"Lima, Ana\""));
    }
}
