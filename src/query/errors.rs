//! Query error types
//!
//! Every variant except `Collaborator` is a caller error: the API was misused and retrying the
//! same call cannot succeed. `Collaborator` carries a fetch or permission failure unchanged.

use thiserror::Error;

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Boxed error raised by a fetch or permission collaborator
pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Query errors
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Invalid page size: 0 (page size must be > 0)")]
    InvalidPageSize,

    #[error("Invalid page number: 0 (page numbers start at 1)")]
    InvalidPageNumber,

    #[error("Invalid page count: 0 (at least one page must be requested)")]
    InvalidPageCount,

    #[error("Query {0} has already been executed")]
    AlreadyExecuted(String),

    #[error("Total result count was not requested")]
    TotalNotRequested,

    #[error("Results span {0} pages; a single page was expected")]
    MultiplePages(u32),

    #[error(transparent)]
    Collaborator(CollaboratorError),
}

impl QueryError {
    /// Wraps a fetch or permission failure without altering its message or source
    pub fn collaborator<E>(err: E) -> Self
    where
        E: Into<CollaboratorError>,
    {
        QueryError::Collaborator(err.into())
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::InvalidPageSize => "CQ_INVALID_PAGE_SIZE",
            QueryError::InvalidPageNumber => "CQ_INVALID_PAGE_NUMBER",
            QueryError::InvalidPageCount => "CQ_INVALID_PAGE_COUNT",
            QueryError::AlreadyExecuted(_) => "CQ_ALREADY_EXECUTED",
            QueryError::TotalNotRequested => "CQ_TOTAL_NOT_REQUESTED",
            QueryError::MultiplePages(_) => "CQ_MULTIPLE_PAGES",
            QueryError::Collaborator(_) => "CQ_COLLABORATOR_FAILED",
        }
    }

    /// Returns true if the error is API misuse rather than a collaborator failure
    pub fn is_caller_error(&self) -> bool {
        !matches!(self, QueryError::Collaborator(_))
    }

    /// Returns the collaborator error if it is of type `E`
    pub fn downcast_collaborator<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            QueryError::Collaborator(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }
}
