//! Cooperative cancellation at batch granularity

use crate::error::{SchedulerError, SchedulerResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag a caller raises to abandon a scheduling run
///
/// Clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancelFlag {
    /// Create a flag that is not raised
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether the flag has been raised
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Fail with [`SchedulerError::Cancelled`] once the flag is raised
    pub fn check(&self) -> SchedulerResult<()> {
        if self.is_cancelled() {
            Err(SchedulerError::Cancelled)
        } else {
            Ok(())
        }
    }
}
