use crate::pages::Route;

/// A clickable control attached to a table row. Link-style actions carry the
/// page they open; in-place actions (approve, mark) have no target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub id: &'static str,
    pub label: String,
    pub enabled: bool,
    pub target: Option<Route>,
}

impl Action {
    pub fn new(id: &'static str, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            enabled: true,
            target: None,
        }
    }

    pub fn link(id: &'static str, label: impl Into<String>, target: Route) -> Self {
        Self {
            target: Some(target),
            ..Self::new(id, label)
        }
    }

    pub fn enabled_if(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// One record of a table: its display cells plus the actions offered on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Identity of the record behind the row (leave id, staff code, ...).
    pub key: String,
    pub cells: Vec<String>,
    pub actions: Vec<Action>,
    pub visible: bool,
}

impl Row {
    pub fn new(key: impl Into<String>, cells: Vec<String>) -> Self {
        Self {
            key: key.into(),
            cells,
            actions: Vec::new(),
            visible: true,
        }
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub fn action(&self, id: &str) -> Option<&Action> {
        self.actions.iter().find(|action| action.id == id)
    }

    pub fn action_mut(&mut self, id: &str) -> Option<&mut Action> {
        self.actions.iter_mut().find(|action| action.id == id)
    }
}

/// Single row shown instead of data, stretched over every column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub message: String,
    pub colspan: usize,
}

/// Column headers, rows and the empty-state placeholder of one listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Vec<&'static str>,
    action_column: Option<&'static str>,
    rows: Vec<Row>,
    placeholder: Option<Placeholder>,
}

impl Table {
    pub fn new(columns: &[&'static str]) -> Self {
        Self {
            columns: columns.to_vec(),
            action_column: None,
            rows: Vec::new(),
            placeholder: None,
        }
    }

    pub fn with_actions(mut self, header: &'static str) -> Self {
        self.action_column = Some(header);
        self
    }

    /// Fills the body, or shows `empty_message` when there is nothing to list.
    pub fn fill(mut self, rows: Vec<Row>, empty_message: impl Into<String>) -> Self {
        if rows.is_empty() {
            self.show_placeholder(empty_message);
        } else {
            self.placeholder = None;
            self.rows = rows;
        }
        self
    }

    pub fn show_placeholder(&mut self, message: impl Into<String>) {
        self.rows.clear();
        self.placeholder = Some(Placeholder {
            message: message.into(),
            colspan: self.column_count(),
        });
    }

    pub fn data_columns(&self) -> &[&'static str] {
        &self.columns
    }

    pub fn headers(&self) -> Vec<&'static str> {
        let mut headers = self.columns.clone();
        headers.extend(self.action_column);
        headers
    }

    pub fn column_count(&self) -> usize {
        self.columns.len() + usize::from(self.action_column.is_some())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| *column == name)
    }

    pub fn placeholder(&self) -> Option<&Placeholder> {
        self.placeholder.as_ref()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, key: &str) -> Option<&Row> {
        self.rows.iter().find(|row| row.key == key)
    }

    pub fn row_mut(&mut self, key: &str) -> Option<&mut Row> {
        self.rows.iter_mut().find(|row| row.key == key)
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|row| row.visible)
    }

    /// Replaces one cell of the row identified by `key`. Returns false when
    /// the row or column does not exist.
    pub fn set_cell(&mut self, key: &str, column: &str, value: impl Into<String>) -> bool {
        let Some(index) = self.column_index(column) else {
            return false;
        };
        match self
            .row_mut(key)
            .and_then(|row| row.cells.get_mut(index))
        {
            Some(cell) => {
                *cell = value.into();
                true
            }
            None => false,
        }
    }

    /// Case-insensitive search over the data cells; action labels are not
    /// searched. An empty query shows every row.
    pub fn filter_text(&mut self, query: &str) {
        let needle = query.trim().to_lowercase();
        for row in &mut self.rows {
            row.visible = needle.is_empty()
                || row
                    .cells
                    .iter()
                    .any(|cell| cell.to_lowercase().contains(&needle));
        }
    }

    /// Shows only rows whose `column` cell equals `value` (ignoring case).
    /// `None` shows every row.
    pub fn filter_column(&mut self, column: &str, value: Option<&str>) {
        let index = self.column_index(column);
        let wanted = value.map(|value| value.trim().to_lowercase());
        for row in &mut self.rows {
            row.visible = match (&wanted, index) {
                (None, _) => true,
                (Some(wanted), Some(index)) => row
                    .cells
                    .get(index)
                    .is_some_and(|cell| cell.trim().to_lowercase() == *wanted),
                (Some(_), None) => false,
            };
        }
    }
}
