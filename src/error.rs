use thiserror::Error;

/// Failures reported by the external collaborator services (network,
/// server-side validation, missing records).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Network failure: {0}")]
    Network(String),

    #[error("Rejected by service: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    /// A read call failed. The navigator halts with the view unloaded and
    /// does not retry.
    #[error("Fetch failed: {0}")]
    FetchFailure(ServiceError),

    /// A create/update/delete call failed. The originating form keeps its
    /// entered values so the user can retry or cancel; no reload happens.
    #[error("Mutation failed: {0}")]
    MutationFailure(ServiceError),

    /// An affordance was invoked that the view-gate disallows. This is a
    /// programming-contract violation, not a recoverable user error.
    #[error("Authorization denied: {0}")]
    AuthorizationDenied(String),

    /// A form was submitted with invalid input. Rejected locally, before
    /// any service call.
    #[error("Invalid input: {0}")]
    ValidationFailure(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::ValidationFailure(message.into())
    }

    pub fn denied(message: impl Into<String>) -> Self {
        AppError::AuthorizationDenied(message.into())
    }
}
