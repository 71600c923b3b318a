//! Semaphore-backed admission gate
//!
//! Bounds how many conversion batches run at once. Tokio's semaphore queues
//! waiters in FIFO order, so a request that starts waiting first is admitted
//! first and nobody starves.

use std::sync::Arc;

use async_trait::async_trait;
use pixpress_core::admission_gate::{AdmissionGate, AdmissionSlot};
use pixpress_core::AppError;
use tokio::sync::Semaphore;

/// Admission gate with a fixed number of slots.
#[derive(Clone, Debug)]
pub struct SemaphoreGate {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

impl SemaphoreGate {
    /// Create a gate with `capacity` slots (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }
}

#[async_trait]
impl AdmissionGate for SemaphoreGate {
    async fn acquire(&self) -> Result<AdmissionSlot, AppError> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| AppError::Internal("admission gate closed".to_string()))?;
        Ok(AdmissionSlot::new(permit))
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn available_slots(&self) -> usize {
        self.semaphore.available_permits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn test_capacity_is_at_least_one() {
        assert_eq!(SemaphoreGate::new(0).capacity(), 1);
        assert_eq!(SemaphoreGate::new(3).capacity(), 3);
    }

    #[tokio::test]
    async fn test_slot_is_released_on_drop() {
        let gate = SemaphoreGate::new(2);
        assert_eq!(gate.available_slots(), 2);

        let slot = gate.acquire().await.unwrap();
        assert_eq!(gate.available_slots(), 1);

        drop(slot);
        assert_eq!(gate.available_slots(), 2);
    }

    #[tokio::test]
    async fn test_acquire_waits_for_free_slot() {
        let gate = SemaphoreGate::new(1);
        let held = gate.acquire().await.unwrap();

        let waiter = {
            let gate = gate.clone();
            tokio::spawn(async move {
                let _slot = gate.acquire().await.unwrap();
            })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiter.is_finished());

        drop(held);
        tokio::time::timeout(Duration::from_secs(5), waiter)
            .await
            .expect("waiter should be admitted once the slot is free")
            .unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_never_exceeds_capacity() {
        let gate = SemaphoreGate::new(2);
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..10 {
            let gate = gate.clone();
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            handles.push(tokio::spawn(async move {
                let _slot = gate.acquire().await.unwrap();
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert!(peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(gate.available_slots(), 2);
    }

    #[tokio::test]
    async fn test_waiters_are_admitted_in_arrival_order() {
        let gate = SemaphoreGate::new(1);
        let held = gate.acquire().await.unwrap();
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));

        let mut handles = Vec::new();
        for i in 0..4 {
            let gate = gate.clone();
            let order = order.clone();
            handles.push(tokio::spawn(async move {
                let _slot = gate.acquire().await.unwrap();
                order.lock().unwrap().push(i);
            }));
            // Let each waiter enqueue before spawning the next
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        drop(held);
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3]);
    }
}
