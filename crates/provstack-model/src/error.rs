//! Canonical outcome taxonomy for provisioning operations.
//!
//! Every backend-specific failure is classified exactly once, at the point
//! of the backend call, into [`ProvisionError`]. No raw backend error shape
//! crosses a manager boundary: callers match on this enum (or on
//! [`ErrorKind`]) and never inspect vendor error strings.

/// Canonical provisioning error.
///
/// The variants mirror the terminal status codes of the RPC surface. Only
/// [`ProvisionError::Internal`] is retryable; everything else is terminal
/// and must not be retried with backoff by the caller's control loop.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    /// Malformed or missing required input; the caller must fix the request.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of the offending field.
        message: String,
    },

    /// A referenced bucket or identity does not exist.
    #[error("not found: {message}")]
    NotFound {
        /// Description of the missing entity.
        message: String,
    },

    /// The entity already exists; terminal, not retried.
    #[error("already exists: {message}")]
    AlreadyExists {
        /// Description of the conflicting entity.
        message: String,
    },

    /// The operation cannot proceed in the entity's current state,
    /// e.g. deleting a bucket that is not empty.
    #[error("failed precondition: {message}")]
    FailedPrecondition {
        /// Description of the violated precondition.
        message: String,
    },

    /// Backend or transport failure; safe to retry with backoff.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Discriminant of [`ProvisionError`], used for status mapping and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// See [`ProvisionError::InvalidArgument`].
    InvalidArgument,
    /// See [`ProvisionError::NotFound`].
    NotFound,
    /// See [`ProvisionError::AlreadyExists`].
    AlreadyExists,
    /// See [`ProvisionError::FailedPrecondition`].
    FailedPrecondition,
    /// See [`ProvisionError::Internal`].
    Internal,
}

impl ProvisionError {
    /// Build an [`ProvisionError::InvalidArgument`] from anything printable.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Build a [`ProvisionError::NotFound`] from anything printable.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Build an [`ProvisionError::AlreadyExists`] from anything printable.
    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::AlreadyExists {
            message: message.into(),
        }
    }

    /// Build a [`ProvisionError::FailedPrecondition`] from anything printable.
    pub fn failed_precondition(message: impl Into<String>) -> Self {
        Self::FailedPrecondition {
            message: message.into(),
        }
    }

    /// The discriminant of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::FailedPrecondition { .. } => ErrorKind::FailedPrecondition,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Whether an external control loop may retry the operation with backoff.
    ///
    /// Multi-step operations in this adapter are idempotent from scratch, so
    /// a retry of an [`ErrorKind::Internal`] failure re-derives the same end
    /// state; every other kind is terminal.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Internal
    }
}

/// Convenience result type for provisioning operations.
pub type ProvisionResult<T> = Result<T, ProvisionError>;
