use thiserror::Error;

/// Unified error type for election, registry, pool and ledger operations.
///
/// Every variant renders a stable message that is safe to hand back to API
/// callers verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ElectionError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("voter {0} has already voted")]
    AlreadyVoted(String),

    #[error("invalid credential: private key does not match the registered voter")]
    InvalidCredential,

    #[error("operation not allowed: {0}")]
    InvalidState(String),

    #[error("cannot {action} an election that is {from}")]
    InvalidTransition { from: String, action: String },

    #[error("no pending votes to mine")]
    EmptyPool,

    #[error("chain violation: {0}")]
    ChainViolation(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ElectionError {
    /// True for variants that indicate a broken invariant rather than a bad request.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::ChainViolation(_) | Self::Internal(_))
    }
}

impl From<serde_json::Error> for ElectionError {
    fn from(e: serde_json::Error) -> Self {
        Self::Internal(format!("encoding failed: {e}"))
    }
}

impl From<tokio::task::JoinError> for ElectionError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Internal(format!("background task failed: {e}"))
    }
}

/// Convenience alias
pub type Result<T> = std::result::Result<T, ElectionError>;
