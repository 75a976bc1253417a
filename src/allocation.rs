//! Allocation policy: same-zone first, then a one-hop adjacent-zone fallback.
//!
//! This is the only place that decides *which* slot a request gets; the
//! registry and topology store just hold the result. Every successful call
//! produces exactly one [`OperationRecord`] so it can be undone later.

use crate::errors::{AllocatorError, AllocatorResult};
use crate::ids::{IdGenerator, RequestId, SlotId, ZoneId};
use crate::registry::RequestRegistry;
use crate::rollback::{OperationRecord, RollbackLog};
use crate::topology::TopologyStore;

pub struct AllocationEngine {
    pub cross_zone_penalty: u32,
}

impl AllocationEngine {
    pub fn new(cross_zone_penalty: u32) -> Self {
        Self { cross_zone_penalty }
    }

    /// Finds the first available slot for `requested_zone`, falling back to
    /// the zone's declared adjacent zones (in declared order) if it has
    /// none free. Returns the chosen slot id, the zone it actually came
    /// from, and whether that was a cross-zone fallback.
    fn find_candidate(
        &self,
        topology: &TopologyStore,
        requested_zone: &ZoneId,
    ) -> AllocatorResult<(SlotId, ZoneId, bool)> {
        let in_zone = topology.available_slots_in_zone(requested_zone)?;
        if let Some(slot) = in_zone.first() {
            return Ok((slot.id.clone(), requested_zone.clone(), false));
        }

        for adjacent in topology.adjacent_zones(requested_zone)? {
            let candidates = topology.available_slots_in_zone(adjacent)?;
            if let Some(slot) = candidates.first() {
                return Ok((slot.id.clone(), adjacent.clone(), true));
            }
        }

        Err(AllocatorError::NoAvailableSlots {
            requested_zone: requested_zone.to_string(),
        })
    }

    /// Drives a REQUESTED → ALLOCATED transition: picks a slot, marks it
    /// unavailable, updates the request, and logs an undo record. Nothing
    /// is mutated unless a candidate slot was actually found.
    #[allow(clippy::too_many_arguments)]
    pub fn allocate(
        &self,
        request_id: &RequestId,
        requested_zone: &ZoneId,
        topology: &mut TopologyStore,
        registry: &mut RequestRegistry,
        rollback_log: &mut RollbackLog,
        ids: &dyn IdGenerator,
        now_ms: i64,
    ) -> AllocatorResult<()> {
        // Fail fast on an unknown or already-progressed request before
        // touching the topology store.
        let current_state = registry.get(request_id)?.state;
        if !current_state.can_transition_to(crate::request::RequestState::Allocated) {
            return Err(AllocatorError::InvalidTransition {
                from: current_state,
                to: crate::request::RequestState::Allocated,
            });
        }

        let (slot_id, zone_id, is_cross_zone) = self.find_candidate(topology, requested_zone)?;
        let penalty = if is_cross_zone { self.cross_zone_penalty } else { 0 };

        let previous_state =
            registry.enter_allocated(request_id, slot_id.clone(), zone_id, now_ms, is_cross_zone, penalty)?;
        topology.set_slot_availability(&slot_id, false)?;

        rollback_log.append(OperationRecord {
            id: ids.next_operation_id(),
            request_id: request_id.clone(),
            slot_id,
            previous_slot_available: true,
            previous_request_state: previous_state,
            timestamp: now_ms,
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{AreaId, DefaultIdGenerator, VehicleId};
    use crate::request::{Request, RequestState};
    use crate::topology::{Area, Zone};

    fn two_zone_topology() -> TopologyStore {
        let mut store = TopologyStore::new();
        let area_a = Area::new(AreaId::from("a1"), "A1", ZoneId::from("zone-a"), vec![]);
        store.add_zone(Zone::new(
            ZoneId::from("zone-a"),
            "Zone A",
            vec![area_a],
            vec![ZoneId::from("zone-b")],
        ));
        let area_b = Area::new(
            AreaId::from("b1"),
            "B1",
            ZoneId::from("zone-b"),
            vec![SlotId::from("b-s1")],
        );
        store.add_zone(Zone::new(ZoneId::from("zone-b"), "Zone B", vec![area_b], vec![]));
        store
    }

    #[test]
    fn falls_back_to_adjacent_zone_when_requested_zone_is_full() {
        let mut topology = two_zone_topology();
        let mut registry = RequestRegistry::new();
        let mut log = RollbackLog::new();
        let ids = DefaultIdGenerator::new();
        let engine = AllocationEngine::new(10);

        registry.insert(Request::new(
            RequestId::from("REQ-1"),
            VehicleId::from("v1"),
            ZoneId::from("zone-a"),
            0,
        ));

        engine
            .allocate(
                &RequestId::from("REQ-1"),
                &ZoneId::from("zone-a"),
                &mut topology,
                &mut registry,
                &mut log,
                &ids,
                100,
            )
            .unwrap();

        let request = registry.get(&RequestId::from("REQ-1")).unwrap();
        assert_eq!(request.state, RequestState::Allocated);
        assert!(request.is_cross_zone);
        assert_eq!(request.cross_zone_penalty, 10);
        assert_eq!(request.allocated_zone_id, Some(ZoneId::from("zone-b")));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn no_available_slots_anywhere_is_reported() {
        let mut topology = TopologyStore::new();
        topology.add_zone(Zone::new(ZoneId::from("zone-a"), "Zone A", vec![], vec![]));
        let mut registry = RequestRegistry::new();
        let mut log = RollbackLog::new();
        let ids = DefaultIdGenerator::new();
        let engine = AllocationEngine::new(10);

        registry.insert(Request::new(
            RequestId::from("REQ-1"),
            VehicleId::from("v1"),
            ZoneId::from("zone-a"),
            0,
        ));

        let err = engine
            .allocate(
                &RequestId::from("REQ-1"),
                &ZoneId::from("zone-a"),
                &mut topology,
                &mut registry,
                &mut log,
                &ids,
                100,
            )
            .unwrap_err();

        assert!(matches!(err, AllocatorError::NoAvailableSlots { .. }));
        assert!(log.is_empty());
    }
}
