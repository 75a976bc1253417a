use parking_allocator::{Allocator, AllocatorConfig, Area, VehicleId, Zone, ZoneId};

fn main() {
    env_logger::init();

    // ---- 1) Configure the allocator -----------------------------------
    let config = AllocatorConfig { cross_zone_penalty: 15 };
    let mut allocator = Allocator::new(config);

    // ---- 2) Load topology: two adjacent zones --------------------------
    let area_a = Area::new(
        "area-a1".into(),
        "North Lot",
        ZoneId::from("zone-a"),
        vec!["slot-a1-1".into(), "slot-a1-2".into()],
    );
    allocator
        .add_zone(Zone::new(
            ZoneId::from("zone-a"),
            "Zone A",
            vec![area_a],
            vec![ZoneId::from("zone-b")],
        ))
        .expect("non-empty zone id");

    let area_b = Area::new(
        "area-b1".into(),
        "South Lot",
        ZoneId::from("zone-b"),
        vec!["slot-b1-1".into()],
    );
    allocator
        .add_zone(Zone::new(ZoneId::from("zone-b"), "Zone B", vec![area_b], vec![]))
        .expect("non-empty zone id");

    // ---- 3) Drive a request through its lifecycle ----------------------
    let request = allocator
        .create_request(VehicleId::from("car-1"), ZoneId::from("zone-a"))
        .expect("valid ids");
    println!("[event] request created: {}", request.id);

    let allocated = allocator.allocate(&request.id).expect("a slot should be free");
    println!(
        "[event] allocated slot={:?} zone={:?} cross_zone={}",
        allocated.allocated_slot_id, allocated.allocated_zone_id, allocated.is_cross_zone
    );

    allocator.occupy(&allocated.id).expect("allocated requests can be occupied");
    println!("[event] occupied");

    let released = allocator.release(&allocated.id).expect("occupied requests can be released");
    println!("[event] released at {}", released.release_time.unwrap());

    // ---- 4) Read back analytics -----------------------------------------
    let analytics = allocator.analytics();
    println!(
        "[event] analytics: total={} completed={} avg_duration={}",
        analytics.total_requests, analytics.completed_requests, analytics.average_parking_duration
    );

    println!("Done. Exiting.");
}
