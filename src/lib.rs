#![forbid(unsafe_code)]

//! # Smart Parking Allocator
//!
//! A deterministic, single-process, in-memory parking allocation engine.
//! Hosts load a zone/area/slot topology, register vehicles, and drive
//! requests through `createRequest → allocate → occupy → release` (or
//! `cancel`), with bounded undo over prior allocations.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use parking_allocator::{Allocator, AllocatorConfig, Zone, Area, VehicleId, ZoneId};
//!
//! # fn main() -> Result<(), parking_allocator::AllocatorError> {
//! let mut allocator = Allocator::new(AllocatorConfig::default());
//!
//! let area = Area::new("area-1".into(), "Area 1", ZoneId::from("zone-a"), vec!["slot-1".into()]);
//! allocator.add_zone(Zone::new(ZoneId::from("zone-a"), "Zone A", vec![area], vec![]))?;
//!
//! let request = allocator.create_request(VehicleId::from("v1"), ZoneId::from("zone-a"))?;
//! let allocated = allocator.allocate(&request.id)?;
//! allocator.occupy(&allocated.id)?;
//! allocator.release(&allocated.id)?;
//! # Ok(()) }
//! ```
//!
//! ## Modules
//! - [`topology`] — zones, areas, slots, and the adjacency list
//! - [`request`] — the request record and its lifecycle state machine
//! - [`registry`] — owns requests and enforces the state machine
//! - [`allocation`] — the same-zone/adjacent-zone allocation policy
//! - [`rollback`] — the undo log over allocation operations
//! - [`analytics`] — derived, uncached reporting over live state
//! - [`facade`] — [`Allocator`], the single entry point

mod allocation;
mod analytics;
mod clock;
mod config;
mod errors;
mod facade;
mod ids;
mod registry;
mod request;
mod rollback;
mod topology;
mod vehicle;

pub use allocation::AllocationEngine;
pub use analytics::Analytics;
pub use clock::{Clock, SystemClock};
pub use config::AllocatorConfig;
pub use errors::{AllocatorError, AllocatorResult};
pub use facade::Allocator;
pub use ids::{AreaId, DefaultIdGenerator, IdGenerator, OperationId, RequestId, SlotId, VehicleId, ZoneId};
pub use registry::RequestRegistry;
pub use request::{Request, RequestState};
pub use rollback::{OperationRecord, RollbackLog};
pub use topology::{Area, Slot, TopologyStore, Zone};
pub use vehicle::{Vehicle, VehicleRegistry};

#[cfg(any(test, feature = "test-util"))]
pub use clock::FakeClock;
#[cfg(any(test, feature = "test-util"))]
pub use ids::SequentialIdGenerator;

pub mod prelude {
    pub use crate::{Allocator, AllocatorConfig, AllocatorError, Request, RequestState};
}
