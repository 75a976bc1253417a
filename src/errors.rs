//! Error types returned by the allocator façade.
//!
//! Every fallible façade method returns `Result<T, AllocatorError>`. No
//! operation panics on caller-supplied bad ids, and no operation leaves
//! state partially mutated before returning an error.

use crate::request::RequestState;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocatorError {
    #[error("zone not found: {zone_id}")]
    ZoneNotFound { zone_id: String },

    #[error("slot not found: {slot_id}")]
    SlotNotFound { slot_id: String },

    #[error("request not found: {request_id}")]
    RequestNotFound { request_id: String },

    #[error("cannot transition request from {from:?} to {to:?}")]
    InvalidTransition {
        from: RequestState,
        to: RequestState,
    },

    #[error("no available slots for zone {requested_zone} or its adjacent zones")]
    NoAvailableSlots { requested_zone: String },

    #[error("malformed input: {reason}")]
    MalformedInput { reason: String },
}

pub type AllocatorResult<T> = Result<T, AllocatorError>;
