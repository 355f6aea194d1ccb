use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced to the user while building, submitting or reporting on a measurement.
#[derive(Debug, Error)]
pub enum Error {
    /// A command line value was malformed
    #[error("{0}")]
    InvalidArgument(String),

    /// A value the measurement needs was not supplied
    #[error("{0}")]
    MissingArgument(String),

    /// Two supplied values cannot be used together
    #[error("{0}")]
    ConflictingArgument(String),

    /// The configuration file describes something we cannot act on
    #[error("{0}")]
    InvalidConfiguration(String),

    /// The Atlas API rejected the request
    #[error("{0}")]
    Api(String),

    #[error("template not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    #[error("template `{template}` references `{{{key}}}` but no such value was supplied")]
    MissingSubstitution { template: String, key: String },

    #[error("template `{template}` is malformed: {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("no report formatter named `{0}`")]
    UnknownFormatter(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
