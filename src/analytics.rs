//! Derived analytics over live state. Nothing here is cached; every field
//! is recomputed on demand so it can never drift out of sync with the
//! topology store or request registry.

use std::collections::HashMap;

use crate::registry::RequestRegistry;
use crate::request::RequestState;
use crate::topology::TopologyStore;

#[derive(Debug, Clone, PartialEq)]
pub struct Analytics {
    pub total_requests: usize,
    pub completed_requests: usize,
    pub cancelled_requests: usize,
    pub average_parking_duration: f64,
    pub zone_utilization: HashMap<String, f64>,
    pub peak_usage_zones: Vec<String>,
    pub cross_zone_allocations: usize,
}

pub fn compute(topology: &TopologyStore, registry: &RequestRegistry) -> Analytics {
    let requests: Vec<_> = registry.iter_in_order().collect();

    let total_requests = requests.len();
    let completed_requests = requests.iter().filter(|r| r.state == RequestState::Released).count();
    let cancelled_requests = requests.iter().filter(|r| r.state == RequestState::Cancelled).count();
    let cross_zone_allocations = requests.iter().filter(|r| r.is_cross_zone).count();

    let durations: Vec<i64> = requests
        .iter()
        .filter(|r| r.state == RequestState::Released)
        .filter_map(|r| match (r.occupied_time, r.release_time) {
            (Some(occupied), Some(release)) => Some(release - occupied),
            _ => None,
        })
        .collect();
    let average_parking_duration = if durations.is_empty() {
        0.0
    } else {
        durations.iter().sum::<i64>() as f64 / durations.len() as f64
    };

    let mut zone_utilization = HashMap::new();
    let mut ordered_ids = Vec::new();
    for zone in topology.zones_in_order() {
        let total = topology.total_slots_in_zone(&zone.id);
        let available = topology
            .available_slots_in_zone(&zone.id)
            .map(|slots| slots.len())
            .unwrap_or(0);
        let utilization = if total == 0 {
            0.0
        } else {
            100.0 * (total - available) as f64 / total as f64
        };
        zone_utilization.insert(zone.id.to_string(), utilization);
        ordered_ids.push(zone.id.to_string());
    }

    let mut ranked = ordered_ids;
    ranked.sort_by(|a, b| {
        zone_utilization[b]
            .partial_cmp(&zone_utilization[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let peak_usage_zones = ranked.into_iter().take(3).collect();

    Analytics {
        total_requests,
        completed_requests,
        cancelled_requests,
        average_parking_duration,
        zone_utilization,
        peak_usage_zones,
        cross_zone_allocations,
    }
}
