use thiserror::Error;

/// Errors raised while building or editing an in-memory catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// An RA or Dec token could not be read as sexagesimal or degrees
    #[error("Angle not understood: {0}")]
    AngleFormat(String),

    /// Column alias is not part of the allow-list
    #[error("Column '{0}' is not currently allowed")]
    UnknownColumn(String),

    /// A value of the wrong kind was assigned to a column
    #[error("Column {column} expects {expected} values")]
    ColumnKind {
        column: &'static str,
        expected: &'static str,
    },

    /// A column does not have one value per row
    #[error("Column {column} has {found} rows, table has {expected}")]
    LengthMismatch {
        column: &'static str,
        expected: usize,
        found: usize,
    },

    /// A literal could not be parsed for its column
    #[error("Invalid value for {column}: {value}")]
    InvalidValue { column: &'static str, value: String },
}

impl CatalogError {
    pub fn angle_format(msg: impl Into<String>) -> Self {
        Self::AngleFormat(msg.into())
    }

    pub fn unknown_column(name: impl Into<String>) -> Self {
        Self::UnknownColumn(name.into())
    }

    pub fn invalid_value(column: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            column,
            value: value.into(),
        }
    }
}
