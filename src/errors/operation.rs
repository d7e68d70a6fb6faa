//! Operation construction and validation errors.

/// Errors raised while constructing or validating operations.
///
/// These correspond to malformed caller input: a required field that is
/// empty or absent, or a batch with nothing in it. They are never retried
/// internally and always surface to the immediate caller.
#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    #[error("invalid operation: {field} is required")]
    FieldRequired { field: &'static str },

    #[error("invalid operation: {field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("invalid operation: operation list is empty")]
    EmptyOperations,

    #[error("invalid operation: claim list is empty")]
    EmptyClaims,
}
