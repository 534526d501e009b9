use skymodel_format::FormatError;
use skymodel_lib::OperationError;
use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Reading or writing a model failed
    #[error("{0}")]
    Format(#[from] FormatError),

    #[error("{0}")]
    Operation(#[from] OperationError),

    /// Step file could not be read
    #[error("Config error: {0}")]
    Config(String),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
