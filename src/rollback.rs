//! LIFO undo log over allocation operations.
//!
//! Only allocations are recorded — occupy/release/cancel are considered
//! final decisions and are never rolled back (§4.4). Rolling back k steps
//! pops k records in reverse chronological order and restores exactly the
//! state each record remembers: the slot's prior availability and the
//! request's prior state.

use crate::ids::{OperationId, RequestId, SlotId};
use crate::registry::RequestRegistry;
use crate::request::RequestState;
use crate::topology::TopologyStore;

#[derive(Debug, Clone)]
pub struct OperationRecord {
    pub id: OperationId,
    pub request_id: RequestId,
    pub slot_id: SlotId,
    pub previous_slot_available: bool,
    pub previous_request_state: RequestState,
    pub timestamp: i64,
}

#[derive(Debug, Default)]
pub struct RollbackLog {
    entries: Vec<OperationRecord>,
}

impl RollbackLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: OperationRecord) {
        self.entries.push(record);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[OperationRecord] {
        &self.entries
    }

    /// Undoes up to `count` of the most recent allocations, applying the
    /// inverse to both the topology store and the request registry. Stops
    /// early if the log runs dry. Never fails in a structured sense (§4.4):
    /// a record whose slot or request has since vanished is logged and
    /// skipped rather than aborting the whole rollback, so the count
    /// returned always reflects exactly how many records were popped.
    pub fn rollback(&mut self, count: usize, topology: &mut TopologyStore, registry: &mut RequestRegistry) -> usize {
        let mut undone = 0;

        for _ in 0..count {
            let Some(record) = self.entries.pop() else {
                break;
            };

            if let Err(err) = topology.set_slot_availability(&record.slot_id, record.previous_slot_available) {
                log::warn!(
                    "rollback: slot {} no longer present, skipping restore: {err}",
                    record.slot_id
                );
            }

            match record.previous_request_state {
                RequestState::Requested => {
                    if let Err(err) = registry.restore_to_requested(&record.request_id) {
                        log::warn!(
                            "rollback: request {} no longer present, skipping restore: {err}",
                            record.request_id
                        );
                    }
                }
                other => {
                    // An allocation is only ever recorded against a request
                    // that was REQUESTED beforehand; this branch exists so
                    // adding a future allocation source doesn't silently
                    // lose data.
                    debug_assert!(
                        matches!(other, RequestState::Requested),
                        "unexpected prior state for an allocation record: {other:?}"
                    );
                }
            }

            undone += 1;
        }

        undone
    }
}
