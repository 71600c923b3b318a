//! Admission gate trait for conversion requests.
//!
//! Implementations bound how many conversion batches may execute at the same
//! time. A request acquires one slot before any codec work starts and holds it
//! until the whole batch has been processed.

use async_trait::async_trait;

use crate::error::AppError;

/// One unit of conversion capacity.
///
/// The slot is returned to its gate when this value is dropped, so release
/// happens on every exit path (success, error, panic unwinding, cancellation).
pub struct AdmissionSlot {
    _permit: Box<dyn Send + Sync>,
}

impl AdmissionSlot {
    /// Wrap a gate-specific permit. Dropping the slot drops the permit.
    pub fn new(permit: impl Send + Sync + 'static) -> Self {
        Self {
            _permit: Box::new(permit),
        }
    }
}

impl std::fmt::Debug for AdmissionSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdmissionSlot").finish_non_exhaustive()
    }
}

/// Gate that bounds the number of in-flight conversion batches.
///
/// `acquire` waits without timeout until a slot is free. Waiters must be
/// served without starvation.
#[async_trait]
pub trait AdmissionGate: Send + Sync {
    /// Wait for a free slot and take exclusive use of it.
    ///
    /// Fails only if the gate has been shut down.
    async fn acquire(&self) -> Result<AdmissionSlot, AppError>;

    /// Total number of slots this gate manages.
    fn capacity(&self) -> usize;

    /// Slots not currently held by any request.
    fn available_slots(&self) -> usize;
}
