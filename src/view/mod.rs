//! View models the pages produce and the terminal renderer consumes.

pub mod export;
pub mod format;
pub mod table;

pub use export::write_csv;
pub use table::{Action, Placeholder, Row, Table};

/// A labelled value on a card or summary panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
}

impl Field {
    pub fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

pub fn field_value<'a>(fields: &'a [Field], label: &str) -> Option<&'a str> {
    fields
        .iter()
        .find(|field| field.label == label)
        .map(|field| field.value.as_str())
}
