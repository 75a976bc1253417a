//! Identifier types and the id-generation collaborator.
//!
//! Zone/area/slot/vehicle ids are host-supplied strings, taken verbatim from
//! the topology and vehicle data the host loads — the core never reformats
//! them. Request and operation ids are core-generated and carry a
//! recognizable prefix (`REQ-`, `OP-`) followed by a monotonic-plus-random
//! suffix; only their stability and uniqueness are contractual.

use rand::Rng;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

string_id!(ZoneId);
string_id!(AreaId);
string_id!(SlotId);
string_id!(VehicleId);
string_id!(RequestId);
string_id!(OperationId);

/// Produces stable, unique ids for core-generated entities (requests,
/// operation records). Injected at façade-construction time so hosts can
/// substitute a deterministic generator in tests.
pub trait IdGenerator: Send + Sync {
    fn next_request_id(&self) -> RequestId;
    fn next_operation_id(&self) -> OperationId;
}

/// Production id generator: a monotonic counter plus a short random suffix,
/// so ids stay unique even across process restarts that reset the counter.
#[derive(Debug, Default)]
pub struct DefaultIdGenerator {
    counter: AtomicU64,
}

impl DefaultIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_suffix(&self) -> (u64, u32) {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let rand_part = rand::rng().random_range(0..1_000_000);
        (n, rand_part)
    }
}

impl IdGenerator for DefaultIdGenerator {
    fn next_request_id(&self) -> RequestId {
        let (n, r) = self.next_suffix();
        RequestId::from(format!("REQ-{n}-{r:06}"))
    }

    fn next_operation_id(&self) -> OperationId {
        let (n, r) = self.next_suffix();
        OperationId::from(format!("OP-{n}-{r:06}"))
    }
}

/// Fully deterministic id generator for tests: no randomness, so assertions
/// can name exact ids.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    requests: AtomicU64,
    operations: AtomicU64,
}

#[cfg(any(test, feature = "test-util"))]
impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(any(test, feature = "test-util"))]
impl IdGenerator for SequentialIdGenerator {
    fn next_request_id(&self) -> RequestId {
        let n = self.requests.fetch_add(1, Ordering::Relaxed);
        RequestId::from(format!("REQ-{n}"))
    }

    fn next_operation_id(&self) -> OperationId {
        let n = self.operations.fetch_add(1, Ordering::Relaxed);
        OperationId::from(format!("OP-{n}"))
    }
}
