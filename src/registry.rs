//! Owns every [`Request`] and is the sole place the request FSM is enforced.
//!
//! Slot availability lives in the topology store, not here; callers (the
//! allocation engine, the façade, the rollback log) are responsible for
//! keeping the two in step. Each `enter_*` method re-validates the source
//! state immediately before mutating, so a rejected transition never leaves
//! a request half-updated.

use std::collections::HashMap;

use crate::errors::AllocatorError;
use crate::ids::{RequestId, SlotId, VehicleId, ZoneId};
use crate::request::{Request, RequestState};

#[derive(Debug, Default)]
pub struct RequestRegistry {
    requests: HashMap<RequestId, Request>,
    order: Vec<RequestId>,
}

impl RequestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, request: Request) {
        self.order.push(request.id.clone());
        self.requests.insert(request.id.clone(), request);
    }

    pub fn get(&self, id: &RequestId) -> Result<&Request, AllocatorError> {
        self.requests.get(id).ok_or_else(|| AllocatorError::RequestNotFound {
            request_id: id.to_string(),
        })
    }

    pub fn iter_in_order(&self) -> impl Iterator<Item = &Request> {
        self.order.iter().filter_map(move |id| self.requests.get(id))
    }

    fn get_mut(&mut self, id: &RequestId) -> Result<&mut Request, AllocatorError> {
        self.requests.get_mut(id).ok_or_else(|| AllocatorError::RequestNotFound {
            request_id: id.to_string(),
        })
    }

    fn guard(
        current: RequestState,
        target: RequestState,
    ) -> Result<(), AllocatorError> {
        if current.can_transition_to(target) {
            Ok(())
        } else {
            Err(AllocatorError::InvalidTransition {
                from: current,
                to: target,
            })
        }
    }

    /// REQUESTED → ALLOCATED. Returns the state the request was in before
    /// the transition, for the rollback log to capture.
    pub fn enter_allocated(
        &mut self,
        id: &RequestId,
        slot_id: SlotId,
        zone_id: ZoneId,
        now_ms: i64,
        is_cross_zone: bool,
        cross_zone_penalty: u32,
    ) -> Result<RequestState, AllocatorError> {
        let request = self.get_mut(id)?;
        Self::guard(request.state, RequestState::Allocated)?;
        let previous = request.state;

        request.allocated_slot_id = Some(slot_id);
        request.allocated_zone_id = Some(zone_id);
        request.allocation_time = Some(now_ms);
        request.is_cross_zone = is_cross_zone;
        request.cross_zone_penalty = cross_zone_penalty;
        request.state = RequestState::Allocated;

        Ok(previous)
    }

    /// ALLOCATED → OCCUPIED.
    pub fn enter_occupied(&mut self, id: &RequestId, now_ms: i64) -> Result<RequestState, AllocatorError> {
        let request = self.get_mut(id)?;
        Self::guard(request.state, RequestState::Occupied)?;
        let previous = request.state;

        request.occupied_time = Some(now_ms);
        request.state = RequestState::Occupied;

        Ok(previous)
    }

    /// OCCUPIED → RELEASED.
    pub fn enter_released(&mut self, id: &RequestId, now_ms: i64) -> Result<RequestState, AllocatorError> {
        let request = self.get_mut(id)?;
        Self::guard(request.state, RequestState::Released)?;
        let previous = request.state;

        request.release_time = Some(now_ms);
        request.state = RequestState::Released;

        Ok(previous)
    }

    /// REQUESTED or ALLOCATED → CANCELLED.
    pub fn enter_cancelled(&mut self, id: &RequestId) -> Result<RequestState, AllocatorError> {
        let request = self.get_mut(id)?;
        Self::guard(request.state, RequestState::Cancelled)?;
        let previous = request.state;

        request.state = RequestState::Cancelled;

        Ok(previous)
    }

    /// Undoes the effect of [`Self::enter_allocated`], bypassing the FSM
    /// table entirely: rollback is an inverse operation, not a transition a
    /// caller requested.
    pub fn restore_to_requested(&mut self, id: &RequestId) -> Result<(), AllocatorError> {
        let request = self.get_mut(id)?;
        request.allocated_slot_id = None;
        request.allocated_zone_id = None;
        request.allocation_time = None;
        request.is_cross_zone = false;
        request.cross_zone_penalty = 0;
        request.state = RequestState::Requested;
        Ok(())
    }
}
