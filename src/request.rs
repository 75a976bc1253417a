//! The request lifecycle state machine and the request record itself.

use crate::ids::{RequestId, SlotId, VehicleId, ZoneId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestState {
    Requested,
    Allocated,
    Occupied,
    Released,
    Cancelled,
}

impl RequestState {
    /// Targets reachable from this state via a user-requested transition.
    /// Rollback is driven separately and is never checked against this table.
    pub fn allowed_transitions(self) -> &'static [RequestState] {
        match self {
            RequestState::Requested => &[RequestState::Allocated, RequestState::Cancelled],
            RequestState::Allocated => &[RequestState::Occupied, RequestState::Cancelled],
            RequestState::Occupied => &[RequestState::Released],
            RequestState::Released => &[],
            RequestState::Cancelled => &[],
        }
    }

    pub fn can_transition_to(self, target: RequestState) -> bool {
        self.allowed_transitions().contains(&target)
    }
}

#[derive(Debug, Clone)]
pub struct Request {
    pub id: RequestId,
    pub vehicle_id: VehicleId,
    pub requested_zone_id: ZoneId,
    pub allocated_slot_id: Option<SlotId>,
    pub allocated_zone_id: Option<ZoneId>,
    pub state: RequestState,

    pub request_time: i64,
    pub allocation_time: Option<i64>,
    pub occupied_time: Option<i64>,
    pub release_time: Option<i64>,

    pub is_cross_zone: bool,
    pub cross_zone_penalty: u32,
}

impl Request {
    pub fn new(id: RequestId, vehicle_id: VehicleId, requested_zone_id: ZoneId, request_time: i64) -> Self {
        Self {
            id,
            vehicle_id,
            requested_zone_id,
            allocated_slot_id: None,
            allocated_zone_id: None,
            state: RequestState::Requested,
            request_time,
            allocation_time: None,
            occupied_time: None,
            release_time: None,
            is_cross_zone: false,
            cross_zone_penalty: 0,
        }
    }
}
