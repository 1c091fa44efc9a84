//! Time-slot reconciliation: delete persisted slots no longer offered
//! by the upstream registry.

use std::collections::HashSet;

use crate::traits::TimeSlotStore;
use crate::PipelineError;

/// What a reconciliation pass did.
#[derive(Debug, Default)]
pub struct ReconcileOutcome {
    /// Orphaned slots successfully deleted.
    pub deleted: Vec<String>,
    /// Orphaned slots whose delete failed; retried on the next pass.
    pub failed: Vec<String>,
}

/// Delete every persisted time slot absent from `authoritative`.
///
/// Pure set difference; an individual delete failure is logged and the
/// pass continues. Idempotent: a second pass with the same inputs
/// deletes nothing.
pub async fn reconcile(
    store: &dyn TimeSlotStore,
    authoritative: &[String],
) -> Result<ReconcileOutcome, PipelineError> {
    let valid: HashSet<&str> = authoritative.iter().map(String::as_str).collect();
    let persisted = store.slots().await?;

    let orphans: Vec<String> = persisted
        .into_iter()
        .filter(|slot| !valid.contains(slot.as_str()))
        .collect();

    if orphans.is_empty() {
        return Ok(ReconcileOutcome::default());
    }

    tracing::info!(count = orphans.len(), "Reconciling orphaned time slots");

    let mut outcome = ReconcileOutcome::default();
    for slot in orphans {
        match store.delete(&slot).await {
            Ok(()) => {
                tracing::info!(time_slot = %slot, "Deleted orphaned time slot");
                outcome.deleted.push(slot);
            }
            Err(e) => {
                tracing::error!(time_slot = %slot, error = %e, "Failed to delete orphaned time slot");
                outcome.failed.push(slot);
            }
        }
    }

    Ok(outcome)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
