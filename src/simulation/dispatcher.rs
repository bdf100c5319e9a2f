//! Hourly matching of pending requests to vehicles
//!
//! Requests are served oldest trigger first. Each request goes to the vehicle
//! that frees up earliest and can still finish the round trip before its
//! shift ends. A vehicle takes at most one new trip per hour.

use log::debug;
use serde::Serialize;
use std::collections::HashSet;

use super::fleet::Fleet;
use super::metrics::MetricsAccumulator;
use super::params::{FailurePolicy, SimParams};
use super::request_queue::RequestQueue;
use super::station::SimStation;
use super::types::{StationId, VehicleId};

/// One committed round trip
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TripRecord {
    pub vehicle: VehicleId,
    pub station: StationId,
    /// Hour tick in which the trip was dispatched
    pub hour: u32,
    pub start: f64,
    pub end: f64,
    pub shift_end: f64,
}

/// What happened during one dispatch pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub trips: usize,
    /// Failures recorded by the grace-period policy
    pub failures: usize,
    /// Requests left waiting for a later hour
    pub deferred: usize,
}

/// Run one dispatch pass for `hour`
///
/// # Arguments
/// * `hour` - The current clock hour
/// * `params` - Run configuration (shift window and failure policy)
/// * `queue` - Pending requests; served and failed requests are removed
/// * `fleet` - Vehicles; assigned vehicles have their timeline advanced
/// * `stations` - Station store; serviced stations are emptied
/// * `metrics` - Receives one record per trip or failure
pub fn dispatch_hour(
    hour: u32,
    params: &SimParams,
    queue: &mut RequestQueue,
    fleet: &mut Fleet,
    stations: &mut [SimStation],
    metrics: &mut MetricsAccumulator,
) -> DispatchOutcome {
    let mut outcome = DispatchOutcome::default();
    if queue.is_empty() {
        return outcome;
    }

    let (_, shift_end) = params.shift_bounds(hour);
    let mut assigned_this_hour: HashSet<VehicleId> = HashSet::new();

    for request in queue.snapshot() {
        let Some(station) = stations.get_mut(request.station.0) else {
            continue;
        };

        let choice = find_vehicle(hour, params, fleet, station.trip_hours, &assigned_this_hour);

        match choice {
            Some((vehicle_id, start)) => {
                let Some(vehicle) = fleet.get_mut(vehicle_id) else {
                    continue;
                };
                let end = vehicle.assign(start, station.trip_hours);
                station.reset();
                queue.remove(station.id);
                assigned_this_hour.insert(vehicle_id);
                metrics.record_trip(TripRecord {
                    vehicle: vehicle_id,
                    station: station.id,
                    hour,
                    start,
                    end,
                    shift_end,
                });
                outcome.trips += 1;
                debug!(
                    "hour {}: {} -> '{}' ({:.2}h to {:.2}h)",
                    hour, vehicle_id, station.name, start, end
                );
            }
            None => match params.failure_policy {
                FailurePolicy::GracePeriod { hours } if hour - request.triggered_at > hours => {
                    station.reset();
                    queue.remove(station.id);
                    metrics.record_failure(station.id);
                    outcome.failures += 1;
                    debug!(
                        "hour {}: '{}' waited {}h without a vehicle, counted as failure",
                        hour,
                        station.name,
                        hour - request.triggered_at
                    );
                }
                _ => outcome.deferred += 1,
            },
        }
    }

    outcome
}

/// First vehicle, by earliest availability, that can complete a trip of
/// `trip_hours` within the current shift. Returns the vehicle and its start time.
fn find_vehicle(
    hour: u32,
    params: &SimParams,
    fleet: &Fleet,
    trip_hours: f64,
    skip: &HashSet<VehicleId>,
) -> Option<(VehicleId, f64)> {
    let (shift_start, shift_end) = params.shift_bounds(hour);

    fleet
        .by_availability()
        .into_iter()
        .filter(|id| !skip.contains(id))
        .filter_map(|id| fleet.get(id).map(|v| (id, v.busy_until.0)))
        .map(|(id, busy_until)| (id, (hour as f64).max(busy_until).max(shift_start)))
        .find(|(_, start)| start + trip_hours <= shift_end)
}
