use skymodel_core::CatalogError;
use skymodel_format::FormatError;
use thiserror::Error;

/// Errors from catalog operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// An option string (match mode, keep policy) was not recognised
    #[error("Invalid value '{value}' for {option}")]
    InvalidOption { option: &'static str, value: String },
}

impl OperationError {
    pub fn invalid_option(option: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidOption {
            option,
            value: value.into(),
        }
    }
}
