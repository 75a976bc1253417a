//! The single entry point for hosts: [`Allocator`] wires together the
//! topology store, request registry, rollback log, and allocation engine,
//! and is the only place state-changing operations are dispatched from.

use log::{info, warn};

use crate::allocation::AllocationEngine;
use crate::analytics::{self, Analytics};
use crate::clock::{Clock, SystemClock};
use crate::config::AllocatorConfig;
use crate::errors::{AllocatorError, AllocatorResult};
use crate::ids::{DefaultIdGenerator, IdGenerator, RequestId, VehicleId, ZoneId};
use crate::registry::RequestRegistry;
use crate::request::{Request, RequestState};
use crate::rollback::{OperationRecord, RollbackLog};
use crate::topology::{TopologyStore, Zone};
use crate::vehicle::{Vehicle, VehicleRegistry};

/// Façade over the four core components. Construct with [`Allocator::new`]
/// for production defaults, or [`Allocator::with_collaborators`] to inject a
/// test clock/id generator.
pub struct Allocator {
    topology: TopologyStore,
    requests: RequestRegistry,
    vehicles: VehicleRegistry,
    rollback_log: RollbackLog,
    engine: AllocationEngine,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdGenerator>,
}

impl Allocator {
    pub fn new(config: AllocatorConfig) -> Self {
        Self::with_collaborators(config, Box::new(SystemClock), Box::new(DefaultIdGenerator::new()))
    }

    pub fn with_collaborators(
        config: AllocatorConfig,
        clock: Box<dyn Clock>,
        ids: Box<dyn IdGenerator>,
    ) -> Self {
        Self {
            topology: TopologyStore::new(),
            requests: RequestRegistry::new(),
            vehicles: VehicleRegistry::new(),
            rollback_log: RollbackLog::new(),
            engine: AllocationEngine::new(config.cross_zone_penalty),
            clock,
            ids,
        }
    }

    // -- Topology admin -----------------------------------------------

    pub fn add_zone(&mut self, zone: Zone) -> AllocatorResult<()> {
        if zone.id.as_str().trim().is_empty() {
            return Err(AllocatorError::MalformedInput {
                reason: "zone id must be non-empty".to_string(),
            });
        }

        info!("zone loaded: zone_id={}", zone.id);
        self.topology.add_zone(zone);
        Ok(())
    }

    pub fn add_vehicle(&mut self, vehicle: Vehicle) -> AllocatorResult<()> {
        if vehicle.id.as_str().trim().is_empty() {
            return Err(AllocatorError::MalformedInput {
                reason: "vehicle id must be non-empty".to_string(),
            });
        }

        info!("vehicle registered: vehicle_id={}", vehicle.id);
        self.vehicles.add(vehicle);
        Ok(())
    }

    // -- Read queries ---------------------------------------------------

    pub fn zones(&self) -> impl Iterator<Item = &Zone> {
        self.topology.zones_in_order()
    }

    pub fn vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.iter_in_order()
    }

    pub fn requests(&self) -> impl Iterator<Item = &Request> {
        self.requests.iter_in_order()
    }

    pub fn operation_history(&self) -> &[OperationRecord] {
        self.rollback_log.entries()
    }

    pub fn get_request(&self, request_id: &RequestId) -> AllocatorResult<&Request> {
        self.requests.get(request_id)
    }

    pub fn analytics(&self) -> Analytics {
        analytics::compute(&self.topology, &self.requests)
    }

    // -- State-changing operations ---------------------------------------

    pub fn create_request(&mut self, vehicle_id: VehicleId, requested_zone_id: ZoneId) -> AllocatorResult<Request> {
        if vehicle_id.as_str().trim().is_empty() || requested_zone_id.as_str().trim().is_empty() {
            return Err(AllocatorError::MalformedInput {
                reason: "vehicle id and requested zone id must be non-empty".to_string(),
            });
        }

        let request_id = self.ids.next_request_id();
        let now = self.clock.now_ms();
        let request = Request::new(request_id, vehicle_id, requested_zone_id, now);
        self.requests.insert(request.clone());

        info!(
            "request created: request_id={} zone_id={}",
            request.id, request.requested_zone_id
        );
        Ok(request)
    }

    pub fn allocate(&mut self, request_id: &RequestId) -> AllocatorResult<Request> {
        let requested_zone = self.requests.get(request_id)?.requested_zone_id.clone();
        let now = self.clock.now_ms();

        match self.engine.allocate(
            request_id,
            &requested_zone,
            &mut self.topology,
            &mut self.requests,
            &mut self.rollback_log,
            self.ids.as_ref(),
            now,
        ) {
            Ok(()) => {
                let request = self.requests.get(request_id)?;
                info!(
                    "request allocated: request_id={} slot_id={:?} zone_id={:?} cross_zone={} penalty={}",
                    request_id,
                    request.allocated_slot_id,
                    request.allocated_zone_id,
                    request.is_cross_zone,
                    request.cross_zone_penalty,
                );
                Ok(request.clone())
            }
            Err(err) => {
                warn!("allocate rejected: request_id={} error={err}", request_id);
                Err(err)
            }
        }
    }

    pub fn occupy(&mut self, request_id: &RequestId) -> AllocatorResult<Request> {
        let now = self.clock.now_ms();
        match self.requests.enter_occupied(request_id, now) {
            Ok(_) => {
                info!("request occupied: request_id={}", request_id);
                Ok(self.requests.get(request_id)?.clone())
            }
            Err(err) => {
                warn!("occupy rejected: request_id={} error={err}", request_id);
                Err(err)
            }
        }
    }

    pub fn release(&mut self, request_id: &RequestId) -> AllocatorResult<Request> {
        let slot_id = self.requests.get(request_id)?.allocated_slot_id.clone();
        let now = self.clock.now_ms();

        match self.requests.enter_released(request_id, now) {
            Ok(_) => {
                if let Some(slot_id) = slot_id {
                    self.topology.set_slot_availability(&slot_id, true)?;
                }
                info!("request released: request_id={}", request_id);
                Ok(self.requests.get(request_id)?.clone())
            }
            Err(err) => {
                warn!("release rejected: request_id={} error={err}", request_id);
                Err(err)
            }
        }
    }

    pub fn cancel(&mut self, request_id: &RequestId) -> AllocatorResult<Request> {
        let current_state = self.requests.get(request_id)?.state;
        let slot_id = self.requests.get(request_id)?.allocated_slot_id.clone();

        match self.requests.enter_cancelled(request_id) {
            Ok(_) => {
                if current_state == RequestState::Allocated {
                    if let Some(slot_id) = slot_id {
                        self.topology.set_slot_availability(&slot_id, true)?;
                    }
                }
                info!("request cancelled: request_id={}", request_id);
                Ok(self.requests.get(request_id)?.clone())
            }
            Err(err) => {
                warn!("cancel rejected: request_id={} error={err}", request_id);
                Err(err)
            }
        }
    }

    /// Undoes up to `count` of the most recent allocations. Never fails in a
    /// structured sense; returns how many were actually undone.
    pub fn rollback(&mut self, count: usize) -> usize {
        let undone = self.rollback_log.rollback(count, &mut self.topology, &mut self.requests);
        info!("rollback applied: requested={count} undone={undone}");
        undone
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FakeClock;
    use crate::ids::{AreaId, SequentialIdGenerator, SlotId};
    use crate::topology::Area;

    fn allocator_with_zone() -> Allocator {
        let mut allocator = Allocator::with_collaborators(
            AllocatorConfig::default(),
            Box::new(FakeClock::new(1000)),
            Box::new(SequentialIdGenerator::new()),
        );
        let area = Area::new(
            AreaId::from("a1"),
            "Area 1",
            ZoneId::from("zone-a"),
            vec![SlotId::from("slot-a1-1"), SlotId::from("slot-a1-2")],
        );
        allocator
            .add_zone(Zone::new(ZoneId::from("zone-a"), "Zone A", vec![area], vec![]))
            .unwrap();
        allocator
    }

    #[test]
    fn same_zone_allocation_picks_first_available_slot() {
        let mut allocator = allocator_with_zone();
        let request = allocator
            .create_request(VehicleId::from("v1"), ZoneId::from("zone-a"))
            .unwrap();

        let allocated = allocator.allocate(&request.id).unwrap();
        assert_eq!(allocated.allocated_slot_id, Some(SlotId::from("slot-a1-1")));
        assert!(!allocated.is_cross_zone);
    }

    #[test]
    fn full_happy_path_orders_timestamps() {
        let mut allocator = allocator_with_zone();
        let request = allocator
            .create_request(VehicleId::from("v1"), ZoneId::from("zone-a"))
            .unwrap();

        allocator.allocate(&request.id).unwrap();
        allocator.occupy(&request.id).unwrap();
        let released = allocator.release(&request.id).unwrap();

        assert!(released.release_time.unwrap() > released.occupied_time.unwrap());
        assert!(released.occupied_time.unwrap() > released.allocation_time.unwrap());
        assert!(released.allocation_time.unwrap() > released.request_time);
    }

    #[test]
    fn cancel_frees_an_allocated_slot() {
        let mut allocator = allocator_with_zone();
        let request = allocator
            .create_request(VehicleId::from("v1"), ZoneId::from("zone-a"))
            .unwrap();
        allocator.allocate(&request.id).unwrap();

        let cancelled = allocator.cancel(&request.id).unwrap();
        assert_eq!(cancelled.state, RequestState::Cancelled);

        let slots = allocator.analytics();
        assert_eq!(slots.zone_utilization["zone-a"], 0.0);
    }

    #[test]
    fn rollback_restores_exact_prior_state() {
        let mut allocator = allocator_with_zone();
        let request = allocator
            .create_request(VehicleId::from("v1"), ZoneId::from("zone-a"))
            .unwrap();
        allocator.allocate(&request.id).unwrap();

        let undone = allocator.rollback(1);
        assert_eq!(undone, 1);

        let restored = allocator.get_request(&request.id).unwrap();
        assert_eq!(restored.state, RequestState::Requested);
        assert_eq!(restored.allocated_slot_id, None);
        assert!(allocator.operation_history().is_empty());
    }

    #[test]
    fn release_before_occupy_is_rejected() {
        let mut allocator = allocator_with_zone();
        let request = allocator
            .create_request(VehicleId::from("v1"), ZoneId::from("zone-a"))
            .unwrap();
        allocator.allocate(&request.id).unwrap();

        let err = allocator.release(&request.id).unwrap_err();
        assert!(matches!(err, AllocatorError::InvalidTransition { .. }));
        assert_eq!(allocator.get_request(&request.id).unwrap().state, RequestState::Allocated);
    }

    #[test]
    fn add_zone_rejects_a_blank_id() {
        let mut allocator = allocator_with_zone();
        let err = allocator
            .add_zone(Zone::new(ZoneId::from("  "), "Blank", vec![], vec![]))
            .unwrap_err();
        assert!(matches!(err, AllocatorError::MalformedInput { .. }));
    }

    #[test]
    fn add_vehicle_rejects_a_blank_id() {
        let mut allocator = allocator_with_zone();
        let err = allocator
            .add_vehicle(Vehicle::new(VehicleId::from(""), "ABC-123", ZoneId::from("zone-a")))
            .unwrap_err();
        assert!(matches!(err, AllocatorError::MalformedInput { .. }));
    }
}
