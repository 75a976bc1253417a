//! Vehicles are opaque to the allocation policy: the core stores them for
//! lookup and reporting but never requires `preferred_zone_id` to match a
//! request's `requested_zone_id`.

use std::collections::HashMap;

use crate::ids::{VehicleId, ZoneId};

#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: VehicleId,
    pub license_plate: String,
    pub preferred_zone_id: ZoneId,
}

impl Vehicle {
    pub fn new(id: VehicleId, license_plate: impl Into<String>, preferred_zone_id: ZoneId) -> Self {
        Self {
            id,
            license_plate: license_plate.into(),
            preferred_zone_id,
        }
    }
}

#[derive(Debug, Default)]
pub struct VehicleRegistry {
    vehicles: HashMap<VehicleId, Vehicle>,
    order: Vec<VehicleId>,
}

impl VehicleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-adding an id replaces the prior record, mirroring the topology
    /// store's admin semantics.
    pub fn add(&mut self, vehicle: Vehicle) {
        if !self.vehicles.contains_key(&vehicle.id) {
            self.order.push(vehicle.id.clone());
        }
        self.vehicles.insert(vehicle.id.clone(), vehicle);
    }

    pub fn get(&self, id: &VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(id)
    }

    pub fn iter_in_order(&self) -> impl Iterator<Item = &Vehicle> {
        self.order.iter().filter_map(move |id| self.vehicles.get(id))
    }
}
