//! The zone → area → slot resource graph and its adjacency list.
//!
//! Declared order is load-bearing: first-available slot selection iterates
//! areas in the order the zone declares them and slots in the order the
//! area declares them. The store keeps that order in `Vec`s and layers a
//! secondary index on top for O(1) [`TopologyStore::find_slot`] /
//! [`TopologyStore::set_slot_availability`] lookups.

use std::collections::HashMap;

use crate::errors::AllocatorError;
use crate::ids::{AreaId, SlotId, ZoneId};

#[derive(Debug, Clone)]
pub struct Slot {
    pub id: SlotId,
    pub area_id: AreaId,
    pub zone_id: ZoneId,
    available: bool,
}

impl Slot {
    pub fn is_available(&self) -> bool {
        self.available
    }
}

#[derive(Debug, Clone)]
pub struct Area {
    pub id: AreaId,
    pub name: String,
    pub zone_id: ZoneId,
    slots: Vec<Slot>,
}

impl Area {
    /// Builds an area with `slot_ids` in declared order, each slot starting
    /// out available. Areas are immutable after load.
    pub fn new(id: AreaId, name: impl Into<String>, zone_id: ZoneId, slot_ids: Vec<SlotId>) -> Self {
        let slots = slot_ids
            .into_iter()
            .map(|slot_id| Slot {
                id: slot_id,
                area_id: id.clone(),
                zone_id: zone_id.clone(),
                available: true,
            })
            .collect();

        Self {
            id,
            name: name.into(),
            zone_id,
            slots,
        }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }
}

#[derive(Debug, Clone)]
pub struct Zone {
    pub id: ZoneId,
    pub name: String,
    areas: Vec<Area>,
    adjacent_zones: Vec<ZoneId>,
}

impl Zone {
    pub fn new(id: ZoneId, name: impl Into<String>, areas: Vec<Area>, adjacent_zones: Vec<ZoneId>) -> Self {
        Self {
            id,
            name: name.into(),
            areas,
            adjacent_zones,
        }
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    pub fn adjacent_zones(&self) -> &[ZoneId] {
        &self.adjacent_zones
    }

    pub fn total_slots(&self) -> usize {
        self.areas.iter().map(|a| a.slots().len()).sum()
    }
}

/// Location of a slot within the store, used for O(1) lookups and mutation
/// without re-scanning the zone/area vectors.
#[derive(Debug, Clone, Copy)]
struct SlotLocation {
    zone_id_idx: usize,
    area_idx: usize,
    slot_idx: usize,
}

#[derive(Debug, Default)]
pub struct TopologyStore {
    zones: HashMap<ZoneId, Zone>,
    zone_order: Vec<ZoneId>,
    slot_index: HashMap<SlotId, SlotLocation>,
}

impl TopologyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads (or replaces) a zone. Re-adding an id replaces the prior record;
    /// the host is responsible for not leaving dangling references (§9, open
    /// question i) — e.g. requests already allocated into slots that no
    /// longer exist after a replace are not reconciled by the store.
    pub fn add_zone(&mut self, zone: Zone) {
        let zone_id = zone.id.clone();

        if let Some(old) = self.zones.get(&zone_id) {
            for area in old.areas() {
                for slot in area.slots() {
                    self.slot_index.remove(&slot.id);
                }
            }
        } else {
            self.zone_order.push(zone_id.clone());
        }

        let zone_id_idx = self
            .zone_order
            .iter()
            .position(|z| *z == zone_id)
            .unwrap_or(self.zone_order.len());

        for (area_idx, area) in zone.areas().iter().enumerate() {
            for (slot_idx, slot) in area.slots().iter().enumerate() {
                self.slot_index.insert(
                    slot.id.clone(),
                    SlotLocation {
                        zone_id_idx,
                        area_idx,
                        slot_idx,
                    },
                );
            }
        }

        self.zones.insert(zone_id, zone);
    }

    pub fn get_zone(&self, zone_id: &ZoneId) -> Option<&Zone> {
        self.zones.get(zone_id)
    }

    /// Zones in the order they were first loaded (stable across replaces).
    pub fn zones_in_order(&self) -> impl Iterator<Item = &Zone> {
        self.zone_order.iter().filter_map(move |id| self.zones.get(id))
    }

    pub fn find_slot(&self, slot_id: &SlotId) -> Result<(&Slot, &Area, &Zone), AllocatorError> {
        let loc = self
            .slot_index
            .get(slot_id)
            .ok_or_else(|| AllocatorError::SlotNotFound {
                slot_id: slot_id.to_string(),
            })?;

        let zone_id = self
            .zone_order
            .get(loc.zone_id_idx)
            .expect("slot index refers to a zone slot still in zone_order");
        let zone = self.zones.get(zone_id).expect("slot index refers to a loaded zone");
        let area = &zone.areas()[loc.area_idx];
        let slot = &area.slots()[loc.slot_idx];
        Ok((slot, area, zone))
    }

    pub fn available_slots_in_zone(&self, zone_id: &ZoneId) -> Result<Vec<&Slot>, AllocatorError> {
        let zone = self.zones.get(zone_id).ok_or_else(|| AllocatorError::ZoneNotFound {
            zone_id: zone_id.to_string(),
        })?;

        Ok(zone
            .areas()
            .iter()
            .flat_map(|area| area.slots().iter())
            .filter(|slot| slot.is_available())
            .collect())
    }

    /// Total slots in a zone regardless of availability; 0 for an unknown
    /// zone so utilization computations over all zones stay total.
    pub fn total_slots_in_zone(&self, zone_id: &ZoneId) -> usize {
        self.zones.get(zone_id).map(Zone::total_slots).unwrap_or(0)
    }

    pub fn adjacent_zones(&self, zone_id: &ZoneId) -> Result<&[ZoneId], AllocatorError> {
        self.zones
            .get(zone_id)
            .map(|z| z.adjacent_zones())
            .ok_or_else(|| AllocatorError::ZoneNotFound {
                zone_id: zone_id.to_string(),
            })
    }

    pub fn set_slot_availability(&mut self, slot_id: &SlotId, value: bool) -> Result<(), AllocatorError> {
        let loc = *self
            .slot_index
            .get(slot_id)
            .ok_or_else(|| AllocatorError::SlotNotFound {
                slot_id: slot_id.to_string(),
            })?;

        let zone_id = self.zone_order[loc.zone_id_idx].clone();
        let zone = self.zones.get_mut(&zone_id).expect("slot index refers to a loaded zone");
        // SAFETY-free: areas are stored but not directly mutable through the
        // public API, so reach in via a private accessor.
        zone.set_slot_availability(loc.area_idx, loc.slot_idx, value);
        Ok(())
    }
}

impl Zone {
    fn set_slot_availability(&mut self, area_idx: usize, slot_idx: usize, value: bool) {
        self.areas[area_idx].slots[slot_idx].available = value;
    }
}
