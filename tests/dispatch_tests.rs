//! Request queue, fleet ordering and the dispatch pass

use fleet_sim::simulation::{
    dispatch_hour, Fleet, MetricsAccumulator, RequestQueue, SimParams, SimStation, StationId,
    StationSpec, VehicleId,
};

fn station(index: usize, trip_hours: f64) -> SimStation {
    let spec = StationSpec::new(format!("S{index}"), 100.0, 50.0);
    SimStation::new(StationId(index), &spec, trip_hours)
}

fn whole_day_params(num_vehicles: usize) -> SimParams {
    SimParams {
        num_vehicles,
        daily_work_hours: 24.0,
        work_day_start_hour: 0.0,
        ..SimParams::default()
    }
}

#[test]
fn test_queue_insert_is_idempotent() {
    let mut queue = RequestQueue::new();

    assert!(queue.insert_if_absent(StationId(3), 10));
    assert!(!queue.insert_if_absent(StationId(3), 11));
    assert!(!queue.insert_if_absent(StationId(3), 12));

    assert_eq!(queue.len(), 1);
    assert_eq!(queue.get(StationId(3)).map(|r| r.triggered_at), Some(10));
}

#[test]
fn test_queue_orders_by_trigger_hour_then_insertion() {
    let mut queue = RequestQueue::new();
    queue.insert_if_absent(StationId(0), 7);
    queue.insert_if_absent(StationId(1), 3);
    queue.insert_if_absent(StationId(2), 7);
    queue.insert_if_absent(StationId(3), 5);

    let order: Vec<usize> = queue.iter().map(|r| r.station.0).collect();
    assert_eq!(order, [1, 3, 0, 2]);
}

#[test]
fn test_queue_remove_by_station() {
    let mut queue = RequestQueue::new();
    queue.insert_if_absent(StationId(0), 1);
    queue.insert_if_absent(StationId(1), 2);

    let removed = queue.remove(StationId(0)).expect("queued");
    assert_eq!(removed.station, StationId(0));
    assert!(!queue.contains(StationId(0)));
    assert!(queue.remove(StationId(0)).is_none());
    assert_eq!(queue.snapshot().len(), 1);

    // A removed station can be queued again
    assert!(queue.insert_if_absent(StationId(0), 9));
    let order: Vec<usize> = queue.iter().map(|r| r.station.0).collect();
    assert_eq!(order, [1, 0]);
}

#[test]
fn test_fleet_orders_by_availability_then_id() {
    let mut fleet = Fleet::new(3);
    fleet.get_mut(VehicleId(0)).expect("vehicle").assign(0.0, 5.0);
    fleet.get_mut(VehicleId(2)).expect("vehicle").assign(0.0, 1.0);

    assert_eq!(
        fleet.by_availability(),
        [VehicleId(1), VehicleId(2), VehicleId(0)]
    );
    assert_eq!(fleet.total_hours_worked(), 6.0);
}

#[test]
fn test_vehicle_availability_never_moves_backwards() {
    let mut fleet = Fleet::new(1);
    let vehicle = fleet.get_mut(VehicleId(0)).expect("vehicle");

    vehicle.assign(10.0, 2.0);
    assert_eq!(vehicle.busy_until.0, 12.0);
    vehicle.assign(4.0, 1.0);
    assert_eq!(vehicle.busy_until.0, 12.0);
    assert_eq!(vehicle.hours_worked, 3.0);
}

/// Two stations, one vehicle: the older request is served first
#[test]
fn test_dispatch_serves_oldest_request_first() {
    let params = whole_day_params(1);
    let mut stations = vec![station(0, 5.0), station(1, 5.0)];
    let mut queue = RequestQueue::new();
    let mut fleet = Fleet::new(1);
    let mut metrics = MetricsAccumulator::new(2);

    queue.insert_if_absent(StationId(0), 5);
    queue.insert_if_absent(StationId(1), 3);

    let outcome = dispatch_hour(6, &params, &mut queue, &mut fleet, &mut stations, &mut metrics);

    assert_eq!(outcome.trips, 1);
    assert_eq!(outcome.deferred, 1);
    assert_eq!(metrics.trips()[0].station, StationId(1));
    assert!(queue.contains(StationId(0)));
    assert!(!queue.contains(StationId(1)));
}

/// Equal trigger hours fall back to the order the requests were raised
#[test]
fn test_dispatch_ties_keep_insertion_order() {
    let params = whole_day_params(1);
    let mut stations = vec![station(0, 5.0), station(1, 5.0)];
    let mut queue = RequestQueue::new();
    let mut fleet = Fleet::new(1);
    let mut metrics = MetricsAccumulator::new(2);

    queue.insert_if_absent(StationId(1), 4);
    queue.insert_if_absent(StationId(0), 4);

    dispatch_hour(4, &params, &mut queue, &mut fleet, &mut stations, &mut metrics);
    assert_eq!(metrics.trips()[0].station, StationId(1));

    // Next hour the vehicle is booked until 9, so the second trip starts then
    let outcome = dispatch_hour(5, &params, &mut queue, &mut fleet, &mut stations, &mut metrics);
    assert_eq!(outcome.trips, 1);
    let second = metrics.trips()[1];
    assert_eq!(second.station, StationId(0));
    assert_eq!(second.start, 9.0);
    assert_eq!(second.end, 14.0);
    assert!(queue.is_empty());
}

#[test]
fn test_dispatch_uses_each_vehicle_at_most_once_per_hour() {
    let params = whole_day_params(2);
    let mut stations = vec![station(0, 1.0), station(1, 1.0), station(2, 1.0)];
    let mut queue = RequestQueue::new();
    let mut fleet = Fleet::new(2);
    let mut metrics = MetricsAccumulator::new(3);

    for i in 0..3 {
        queue.insert_if_absent(StationId(i), 0);
    }

    let outcome = dispatch_hour(0, &params, &mut queue, &mut fleet, &mut stations, &mut metrics);

    assert_eq!(outcome.trips, 2);
    assert_eq!(outcome.deferred, 1);
    let vehicles: Vec<VehicleId> = metrics.trips().iter().map(|t| t.vehicle).collect();
    assert_eq!(vehicles, [VehicleId(0), VehicleId(1)]);
    assert!(queue.contains(StationId(2)));
}

#[test]
fn test_dispatch_respects_shift_end() {
    let params = SimParams {
        num_vehicles: 1,
        daily_work_hours: 8.0,
        work_day_start_hour: 0.0,
        ..SimParams::default()
    };
    let mut stations = vec![station(0, 3.0)];
    let mut queue = RequestQueue::new();
    let mut fleet = Fleet::new(1);
    let mut metrics = MetricsAccumulator::new(1);

    // 6 + 3 runs past the 8h shift
    queue.insert_if_absent(StationId(0), 6);
    let outcome = dispatch_hour(6, &params, &mut queue, &mut fleet, &mut stations, &mut metrics);
    assert_eq!(outcome.trips, 0);
    assert_eq!(outcome.deferred, 1);
    assert_eq!(outcome.failures, 0);

    // Next day's shift opens at hour 24
    let outcome = dispatch_hour(24, &params, &mut queue, &mut fleet, &mut stations, &mut metrics);
    assert_eq!(outcome.trips, 1);
    let trip = metrics.trips()[0];
    assert!(trip.end <= trip.shift_end);
    assert_eq!(trip.shift_end, 32.0);
}

#[test]
fn test_dispatch_waits_for_shift_start() {
    let params = SimParams {
        num_vehicles: 1,
        daily_work_hours: 8.0,
        work_day_start_hour: 6.0,
        ..SimParams::default()
    };
    let mut stations = vec![station(0, 2.0)];
    let mut queue = RequestQueue::new();
    let mut fleet = Fleet::new(1);
    let mut metrics = MetricsAccumulator::new(1);

    queue.insert_if_absent(StationId(0), 2);
    dispatch_hour(2, &params, &mut queue, &mut fleet, &mut stations, &mut metrics);

    let trip = metrics.trips()[0];
    assert_eq!(trip.start, 6.0);
    assert_eq!(trip.end, 8.0);
    assert_eq!(trip.shift_end, 14.0);
    assert_eq!(fleet.get(VehicleId(0)).map(|v| v.busy_until.0), Some(8.0));
}

#[test]
fn test_dispatch_picks_earliest_free_vehicle() {
    let params = whole_day_params(2);
    let mut stations = vec![station(0, 2.0)];
    let mut queue = RequestQueue::new();
    let mut fleet = Fleet::new(2);
    let mut metrics = MetricsAccumulator::new(1);

    fleet.get_mut(VehicleId(0)).expect("vehicle").assign(0.0, 6.0);
    fleet.get_mut(VehicleId(1)).expect("vehicle").assign(0.0, 3.0);

    queue.insert_if_absent(StationId(0), 1);
    dispatch_hour(1, &params, &mut queue, &mut fleet, &mut stations, &mut metrics);

    let trip = metrics.trips()[0];
    assert_eq!(trip.vehicle, VehicleId(1));
    assert_eq!(trip.start, 3.0);
}
