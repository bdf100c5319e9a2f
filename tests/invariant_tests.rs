//! Properties that must hold for any valid run

use std::collections::HashMap;

use fleet_sim::simulation::{
    generate_stations, run_simulation, FailurePolicy, SimParams, SimWorld, TripTimeParams,
    VehicleId,
};

fn busy_params(num_vehicles: usize, policy: FailurePolicy) -> SimParams {
    SimParams {
        num_vehicles,
        simulation_days: 30,
        failure_policy: policy,
        ..SimParams::default()
    }
}

fn policies() -> [FailurePolicy; 2] {
    [
        FailurePolicy::CapacityExceeded,
        FailurePolicy::GracePeriod { hours: 24 },
    ]
}

#[test]
fn test_every_request_is_served_failed_or_pending() {
    for seed in 0..5 {
        for policy in policies() {
            let scenario = generate_stations(seed, 15, &TripTimeParams::default()).expect("scenario");
            let report = run_simulation(&scenario.stations, &scenario.trip_times, busy_params(2, policy))
                .expect("valid scenario");

            assert_eq!(
                report.requests_raised,
                report.total_trips + report.total_failures + report.pending_requests,
                "seed {seed}, {policy:?}"
            );
            assert_eq!(
                report.total_failures,
                report.failures_by_station.values().map(|&n| n as usize).sum::<usize>()
            );
        }
    }
}

#[test]
fn test_utilization_stays_within_bounds() {
    for seed in 0..5 {
        for vehicles in [1, 2, 5] {
            let scenario = generate_stations(seed, 20, &TripTimeParams::default()).expect("scenario");
            let report = run_simulation(
                &scenario.stations,
                &scenario.trip_times,
                busy_params(vehicles, FailurePolicy::CapacityExceeded),
            )
            .expect("valid scenario");

            assert!(
                (0.0..=100.0).contains(&report.utilization_percent),
                "utilization {} out of range",
                report.utilization_percent
            );
        }
    }
}

#[test]
fn test_every_trip_fits_inside_its_shift() {
    let scenario = generate_stations(7, 25, &TripTimeParams::default()).expect("scenario");
    let params = SimParams {
        work_day_start_hour: 6.0,
        ..busy_params(3, FailurePolicy::CapacityExceeded)
    };
    let report = run_simulation(&scenario.stations, &scenario.trip_times, params).expect("valid");

    assert!(report.total_trips > 0);
    for trip in &report.trips {
        assert!(trip.start >= trip.hour as f64);
        assert!(trip.start >= trip.shift_end - 8.0);
        assert!(trip.end <= trip.shift_end, "{trip:?} runs past its shift");
    }
}

/// Trips booked on one vehicle never overlap
#[test]
fn test_vehicle_timelines_never_overlap() {
    let scenario = generate_stations(3, 25, &TripTimeParams::default()).expect("scenario");
    let report = run_simulation(
        &scenario.stations,
        &scenario.trip_times,
        busy_params(2, FailurePolicy::CapacityExceeded),
    )
    .expect("valid");

    let mut last_end: HashMap<VehicleId, f64> = HashMap::new();
    for trip in &report.trips {
        let previous = last_end.insert(trip.vehicle, trip.end).unwrap_or(0.0);
        assert!(trip.start >= previous, "{trip:?} starts before {previous}");
    }
}

#[test]
fn test_availability_is_monotone_across_ticks() {
    let scenario = generate_stations(11, 10, &TripTimeParams::default()).expect("scenario");
    let mut world = SimWorld::new(
        &scenario.stations,
        &scenario.trip_times,
        busy_params(2, FailurePolicy::CapacityExceeded),
    )
    .expect("valid");

    let mut previous: Vec<f64> = world.fleet().iter().map(|v| v.busy_until.0).collect();
    while world.tick().is_some() {
        let current: Vec<f64> = world.fleet().iter().map(|v| v.busy_until.0).collect();
        for (before, after) in previous.iter().zip(&current) {
            assert!(after >= before);
        }
        // At most one request per station at any time
        assert!(world.queue().len() <= world.stations().len());
        previous = current;
    }
}

#[test]
fn test_runs_are_deterministic() {
    let scenario = generate_stations(5, 12, &TripTimeParams::default()).expect("scenario");
    let params = busy_params(2, FailurePolicy::CapacityExceeded);

    let first = run_simulation(&scenario.stations, &scenario.trip_times, params.clone()).expect("valid");
    let second = run_simulation(&scenario.stations, &scenario.trip_times, params).expect("valid");
    assert_eq!(first, second);
}
