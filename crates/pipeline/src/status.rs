//! The global system-active flag and its guarded toggle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::traits::StatusStore;
use crate::PipelineError;

/// How long a toggle may take before the caller's view is reverted.
pub const TOGGLE_TIMEOUT: Duration = Duration::from_secs(10);

/// What a toggle attempt produced.
#[derive(Debug)]
pub enum ToggleOutcome {
    /// The store accepted the new value.
    Updated(bool),
    /// Another toggle was already in flight; this one was dropped.
    Ignored,
    /// The store failed or timed out; `value` is what the caller
    /// should display (the pre-toggle state).
    Reverted { value: bool, cause: PipelineError },
}

/// Serializes status writes: one toggle at a time, with a hard
/// deadline so a hung store cannot wedge the admin surface.
pub struct StatusToggle<S> {
    store: Arc<S>,
    timeout: Duration,
    in_flight: AtomicBool,
}

impl<S: StatusStore> StatusToggle<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_timeout(store, TOGGLE_TIMEOUT)
    }

    pub fn with_timeout(store: Arc<S>, timeout: Duration) -> Self {
        Self {
            store,
            timeout,
            in_flight: AtomicBool::new(false),
        }
    }

    pub async fn set(&self, desired: bool) -> ToggleOutcome {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            warn!(desired, "toggle already in flight, ignoring");
            return ToggleOutcome::Ignored;
        }

        let outcome = match tokio::time::timeout(self.timeout, self.store.set_active(desired)).await
        {
            Ok(Ok(value)) => ToggleOutcome::Updated(value),
            Ok(Err(cause)) => {
                warn!(desired, %cause, "status update failed, reverting");
                ToggleOutcome::Reverted {
                    value: !desired,
                    cause,
                }
            }
            Err(_) => {
                warn!(desired, "status update timed out, reverting");
                ToggleOutcome::Reverted {
                    value: !desired,
                    cause: PipelineError::Timeout(self.timeout),
                }
            }
        };

        self.in_flight.store(false, Ordering::SeqCst);
        outcome
    }
}

/// Storefront-side check. Fails open: if the flag cannot be read the
/// storefront keeps serving rather than going dark.
pub async fn is_system_active(store: &dyn StatusStore) -> bool {
    match store.is_active().await {
        Ok(active) => active,
        Err(error) => {
            warn!(%error, "status check failed, assuming active");
            true
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use assert_matches::assert_matches;
    use async_trait::async_trait;

    struct FakeStatusStore {
        value: Mutex<bool>,
        fail_reads: bool,
        write_delay: Option<Duration>,
    }

    impl FakeStatusStore {
        fn new(value: bool) -> Self {
            Self {
                value: Mutex::new(value),
                fail_reads: false,
                write_delay: None,
            }
        }
    }

    #[async_trait]
    impl StatusStore for FakeStatusStore {
        async fn is_active(&self) -> Result<bool, PipelineError> {
            if self.fail_reads {
                return Err(PipelineError::Store("read failed".to_string()));
            }
            Ok(*self.value.lock().unwrap())
        }

        async fn set_active(&self, is_active: bool) -> Result<bool, PipelineError> {
            if let Some(delay) = self.write_delay {
                tokio::time::sleep(delay).await;
            }
            *self.value.lock().unwrap() = is_active;
            Ok(is_active)
        }
    }

    #[tokio::test]
    async fn toggle_updates_the_store() {
        let store = Arc::new(FakeStatusStore::new(true));
        let toggle = StatusToggle::new(Arc::clone(&store));

        assert_matches!(toggle.set(false).await, ToggleOutcome::Updated(false));
        assert!(!store.is_active().await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_store_reverts_to_previous_value() {
        let mut store = FakeStatusStore::new(true);
        store.write_delay = Some(Duration::from_secs(60));
        let toggle = StatusToggle::with_timeout(Arc::new(store), Duration::from_secs(10));

        let outcome = toggle.set(false).await;
        assert_matches!(
            outcome,
            ToggleOutcome::Reverted {
                value: true,
                cause: PipelineError::Timeout(_),
            }
        );
        // The lock is released for the next attempt.
        assert!(!toggle.in_flight.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn concurrent_toggle_is_ignored() {
        let store = Arc::new(FakeStatusStore::new(true));
        let toggle = StatusToggle::new(store);
        toggle.in_flight.store(true, Ordering::SeqCst);

        assert_matches!(toggle.set(false).await, ToggleOutcome::Ignored);
    }

    #[tokio::test]
    async fn status_check_fails_open() {
        let mut store = FakeStatusStore::new(false);
        store.fail_reads = true;

        assert!(is_system_active(&store).await);
    }

    #[tokio::test]
    async fn status_check_reads_the_flag() {
        let store = FakeStatusStore::new(false);
        assert!(!is_system_active(&store).await);
    }
}
