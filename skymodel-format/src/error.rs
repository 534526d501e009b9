use skymodel_core::CatalogError;

/// Errors that can occur while reading or writing sky model files.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No valid format line found: {0}")]
    MissingFormat(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Column '{0}' is not currently allowed")]
    UnknownColumn(String),

    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),

    #[error("Required column {0} missing from format line")]
    MissingColumn(&'static str),

    #[error("Line {line}: {message}")]
    MalformedRow { line: u64, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl FormatError {
    pub fn missing_format(msg: impl Into<String>) -> Self {
        Self::MissingFormat(msg.into())
    }

    pub fn unsupported_format(msg: impl Into<String>) -> Self {
        Self::UnsupportedFormat(msg.into())
    }

    pub fn unsupported_feature(msg: impl Into<String>) -> Self {
        Self::UnsupportedFeature(msg.into())
    }

    pub fn malformed_row(line: u64, msg: impl Into<String>) -> Self {
        Self::MalformedRow {
            line,
            message: msg.into(),
        }
    }
}
