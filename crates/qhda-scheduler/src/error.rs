//! Error types for the scheduler

use thiserror::Error;

/// Scheduler errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// Order at the given batch position has an empty identifier
    #[error("order at index {0} has an empty identifier")]
    EmptyOrderId(usize),

    /// Two orders in the batch share an identifier
    #[error("duplicate order identifier {0:?}")]
    DuplicateOrderId(String),

    /// A read or write key failed validation
    #[error("order {order:?} has malformed resource key {key:?}: {reason}")]
    MalformedResourceKey {
        /// Offending order
        order: String,
        /// Offending key
        key: String,
        /// Why the key was rejected
        reason: &'static str,
    },

    /// A caller-supplied conflict matrix is inconsistent with the batch
    #[error("malformed conflict matrix: {0}")]
    MalformedConflictMatrix(String),

    /// Batch exceeds the configured safety ceiling
    #[error("batch of {size} orders exceeds the limit of {limit}")]
    BatchTooLarge {
        /// Submitted batch size
        size: usize,
        /// Configured ceiling
        limit: usize,
    },

    /// Computation was abandoned by the caller
    #[error("scheduling cancelled")]
    Cancelled,

    /// A colorer produced an assignment that puts two conflicting orders in one slot
    #[error("colorer {colorer} placed conflicting orders {first:?} and {second:?} in slot {slot}")]
    InvalidColoring {
        /// Name of the colorer
        colorer: &'static str,
        /// First order of the offending pair
        first: String,
        /// Second order of the offending pair
        second: String,
        /// Shared slot
        slot: usize,
    },
}

/// Coarse classification used by callers to map errors onto status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed batch, rejected before graph construction
    Validation,
    /// Batch too large, rejected before any computation
    Capacity,
    /// Abandoned by the caller
    Cancelled,
    /// Solver bug
    Internal,
}

impl ErrorKind {
    /// Stable wire name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation_error",
            ErrorKind::Capacity => "capacity_error",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::Internal => "internal_error",
        }
    }
}

impl SchedulerError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SchedulerError::EmptyOrderId(_)
            | SchedulerError::DuplicateOrderId(_)
            | SchedulerError::MalformedResourceKey { .. }
            | SchedulerError::MalformedConflictMatrix(_) => ErrorKind::Validation,
            SchedulerError::BatchTooLarge { .. } => ErrorKind::Capacity,
            SchedulerError::Cancelled => ErrorKind::Cancelled,
            SchedulerError::InvalidColoring { .. } => ErrorKind::Internal,
        }
    }
}

/// Result type for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;
