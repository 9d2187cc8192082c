use thiserror::Error;

pub const VALIDATION_MESSAGE: &str = "Please select a bank and a file.";
pub const FALLBACK_MESSAGE: &str = "Something went wrong";

/// Why a submission ended in `Failed`. The `Display` text is exactly what the
/// error panel shows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// Missing bank or file; raised before any request is built.
    #[error("Please select a bank and a file.")]
    Validation,

    /// Failing status with an `error` field in the body.
    #[error("{0}")]
    Service(String),

    /// Failing status without a usable `error` field.
    #[error("Something went wrong")]
    ServiceUnspecified,

    /// The request never completed or the body was not JSON.
    #[error("{0}")]
    Transport(String),
}

impl SubmitError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        SubmitError::Transport(err.to_string())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SubmitError::Validation => "validation",
            SubmitError::Service(_) => "service",
            SubmitError::ServiceUnspecified => "service_unspecified",
            SubmitError::Transport(_) => "transport",
        }
    }
}
