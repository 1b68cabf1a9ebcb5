use std::fmt;

/// A product row (or a user-supplied choice) that cannot be turned into a domain value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataValidationError {
    /// 1-based data row, when the error comes from a loaded table.
    pub row: Option<usize>,
    pub field: &'static str,
    pub detail: String,
}

impl DataValidationError {
    pub fn missing(field: &'static str) -> Self {
        Self {
            row: None,
            field,
            detail: "required value is missing".to_string(),
        }
    }

    pub fn invalid(field: &'static str, value: &str) -> Self {
        Self {
            row: None,
            field,
            detail: format!("unrecognized value {value:?}"),
        }
    }

    pub fn with_detail(field: &'static str, detail: impl Into<String>) -> Self {
        Self {
            row: None,
            field,
            detail: detail.into(),
        }
    }

    pub fn at_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }
}

impl fmt::Display for DataValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row {
            Some(row) => write!(
                f,
                "data validation error (row={row}, field={}): {}",
                self.field, self.detail
            ),
            None => write!(
                f,
                "data validation error (field={}): {}",
                self.field, self.detail
            ),
        }
    }
}

impl std::error::Error for DataValidationError {}
