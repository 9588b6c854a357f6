//! Error taxonomy for resolving and validating sources.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::source::Side;

/// Coarse classification of every way an invocation can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingFile,
    UnsupportedFileType,
    MissingRequiredProperty,
    PropertyNotFound,
    MalformedData,
    InvalidSchema,
    SchemaViolations,
    UnexpectedFault,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::MissingFile => write!(f, "missing file"),
            ErrorKind::UnsupportedFileType => write!(f, "unsupported file type"),
            ErrorKind::MissingRequiredProperty => write!(f, "missing required property"),
            ErrorKind::PropertyNotFound => write!(f, "property not found"),
            ErrorKind::MalformedData => write!(f, "malformed data"),
            ErrorKind::InvalidSchema => write!(f, "invalid schema"),
            ErrorKind::SchemaViolations => write!(f, "schema violations"),
            ErrorKind::UnexpectedFault => write!(f, "unexpected fault"),
        }
    }
}

/// Failure to turn a file path plus property path into a value.
///
/// Every variant carries the normalized file path so the message can be shown
/// to the operator as-is.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("The following file doesn't exist: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error(
        "Only JSON (.json) and Rhai (.rhai) files are supported and they must use the proper extension.\n{}",
        path.display()
    )]
    UnsupportedFileType { path: PathBuf },

    #[error(
        "A property is required to get {side} from a Rhai file.\nMissing parameter: {flag}\nFile where the property should exist: {}",
        path.display(),
        flag = side.prop_flag()
    )]
    MissingRequiredProperty { side: Side, path: PathBuf },

    #[error(
        "Property segment '{segment}' not found (property path '{property}').\nFile path: {}",
        path.display()
    )]
    PropertyNotFound {
        segment: String,
        property: String,
        path: PathBuf,
    },

    #[error(
        "Rhai config files are disabled for this run; refusing to evaluate {}",
        path.display()
    )]
    ScriptsDisabled { path: PathBuf },

    #[error("Failed to load {}: {detail}", path.display())]
    MalformedData { path: PathBuf, detail: String },

    #[error("Failed to compile JSON schema from {}: {detail}", path.display())]
    InvalidSchema { path: PathBuf, detail: String },
}

impl ResolveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResolveError::MissingFile { .. } => ErrorKind::MissingFile,
            ResolveError::UnsupportedFileType { .. } | ResolveError::ScriptsDisabled { .. } => {
                ErrorKind::UnsupportedFileType
            }
            ResolveError::MissingRequiredProperty { .. } => ErrorKind::MissingRequiredProperty,
            ResolveError::PropertyNotFound { .. } => ErrorKind::PropertyNotFound,
            ResolveError::MalformedData { .. } => ErrorKind::MalformedData,
            ResolveError::InvalidSchema { .. } => ErrorKind::InvalidSchema,
        }
    }
}
