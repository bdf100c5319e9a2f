//! Main simulation world that ties everything together
//!
//! `SimWorld` owns the station store, the request queue, the fleet and the
//! metrics, and advances them one hour per `tick`. Within an hour the steps
//! always run in this order: accumulate, overflow check, trigger check,
//! dispatch.

use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};

use super::dispatcher::{dispatch_hour, DispatchOutcome};
use super::error::SimulationError;
use super::fleet::Fleet;
use super::metrics::{MetricsAccumulator, SimulationReport};
use super::params::{FailurePolicy, SimParams};
use super::request_queue::RequestQueue;
use super::station::{SimStation, StationSpec};
use super::types::StationId;

/// The main simulation world
pub struct SimWorld {
    /// Run configuration, fixed for the lifetime of the world
    params: SimParams,

    /// All stations, indexed by `StationId`
    stations: Vec<SimStation>,

    /// Outstanding collection requests
    queue: RequestQueue,

    /// All vehicles
    fleet: Fleet,

    metrics: MetricsAccumulator,

    /// Next hour to simulate
    hour: u32,
}

impl SimWorld {
    /// Validate the inputs and build a world at hour 0
    ///
    /// Every fatal input problem is reported here, before any hour runs.
    pub fn new(
        specs: &[StationSpec],
        trip_times: &HashMap<String, f64>,
        params: SimParams,
    ) -> Result<Self, SimulationError> {
        params.validate()?;

        let mut seen = HashSet::new();
        let mut stations = Vec::with_capacity(specs.len());

        for (index, spec) in specs.iter().enumerate() {
            if !seen.insert(spec.name.as_str()) {
                return Err(SimulationError::DuplicateStation {
                    station: spec.name.clone(),
                });
            }
            if !(spec.capacity_kg > 0.0 && spec.capacity_kg.is_finite()) {
                return Err(SimulationError::invalid(
                    format!("capacity_kg[{}]", spec.name),
                    spec.capacity_kg,
                    "capacity must be positive",
                ));
            }
            if spec.accumulation_rate_kg_day.is_nan() || spec.accumulation_rate_kg_day.is_infinite() {
                return Err(SimulationError::invalid(
                    format!("accumulation_rate_kg_day[{}]", spec.name),
                    spec.accumulation_rate_kg_day,
                    "rate must be a finite number",
                ));
            }

            let trip_hours = *trip_times.get(&spec.name).ok_or_else(|| {
                SimulationError::MissingTripDuration {
                    station: spec.name.clone(),
                }
            })?;
            if !(trip_hours >= 0.0 && trip_hours.is_finite()) {
                return Err(SimulationError::invalid(
                    format!("trip_duration[{}]", spec.name),
                    trip_hours,
                    "trip duration must be a non-negative number of hours",
                ));
            }

            if spec.accumulation_rate_kg_day <= 0.0 {
                warn!(
                    "Station '{}' has accumulation rate {} kg/day; it will never trigger or fail",
                    spec.name, spec.accumulation_rate_kg_day
                );
            }
            if trip_hours > params.daily_work_hours {
                warn!(
                    "Station '{}' needs a {:.2}h round trip but shifts last {:.2}h; it can never be serviced",
                    spec.name, trip_hours, params.daily_work_hours
                );
            }

            stations.push(SimStation::new(StationId(index), spec, trip_hours));
        }

        info!(
            "Simulating {} stations with {} vehicles over {} days",
            stations.len(),
            params.num_vehicles,
            params.simulation_days
        );

        Ok(Self {
            fleet: Fleet::new(params.num_vehicles),
            metrics: MetricsAccumulator::new(stations.len()),
            queue: RequestQueue::new(),
            stations,
            params,
            hour: 0,
        })
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn stations(&self) -> &[SimStation] {
        &self.stations
    }

    pub fn queue(&self) -> &RequestQueue {
        &self.queue
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn metrics(&self) -> &MetricsAccumulator {
        &self.metrics
    }

    /// Next hour to be simulated
    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn is_finished(&self) -> bool {
        self.hour >= self.params.horizon_hours()
    }

    /// Simulate one hour. Returns `None` once the horizon has been reached.
    pub fn tick(&mut self) -> Option<DispatchOutcome> {
        if self.is_finished() {
            return None;
        }
        let hour = self.hour;

        self.accumulate(hour);
        if self.params.failure_policy == FailurePolicy::CapacityExceeded {
            self.check_overflows(hour);
        }
        self.check_triggers(hour);

        let outcome = dispatch_hour(
            hour,
            &self.params,
            &mut self.queue,
            &mut self.fleet,
            &mut self.stations,
            &mut self.metrics,
        );

        self.hour += 1;
        Some(outcome)
    }

    /// Simulate every remaining hour and report
    pub fn run(&mut self) -> SimulationReport {
        while self.tick().is_some() {}

        let report = self.report();
        info!(
            "Run complete: utilization {:.1}%, {} trips, {} failures, {} pending",
            report.utilization_percent,
            report.total_trips,
            report.total_failures,
            report.pending_requests
        );
        report
    }

    /// Snapshot of the metrics at the current hour
    pub fn report(&self) -> SimulationReport {
        self.metrics.finish(
            &self.stations,
            &self.fleet,
            self.queue.len(),
            self.params.available_vehicle_hours(),
        )
    }

    fn accumulate(&mut self, hour: u32) {
        if !self.params.is_active_hour(hour) {
            return;
        }
        for station in &mut self.stations {
            station.accumulate(self.params.active_window_hours);
        }
    }

    /// A station over capacity fails only if it is already waiting for service
    fn check_overflows(&mut self, hour: u32) {
        for station in &mut self.stations {
            if station.is_overflowing() && self.queue.contains(station.id) {
                self.queue.remove(station.id);
                station.reset();
                self.metrics.record_failure(station.id);
                debug!("hour {}: '{}' overflowed while queued", hour, station.name);
            }
        }
    }

    fn check_triggers(&mut self, hour: u32) {
        for station in &self.stations {
            if station.reached_trigger(self.params.trigger_fraction)
                && self.queue.insert_if_absent(station.id, hour)
            {
                self.metrics.record_request();
                debug!(
                    "hour {}: '{}' requested collection at {:.0}%",
                    hour,
                    station.name,
                    station.fill_percent()
                );
            }
        }
    }

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        println!(
            "Hour {}/{} | queued: {} | trips: {} | failures: {}",
            self.hour,
            self.params.horizon_hours(),
            self.queue.len(),
            self.metrics.total_trips(),
            self.metrics.total_failures()
        );

        println!("--- Stations ---");
        for station in &self.stations {
            println!(
                "  {}: {:.1}/{:.1} kg ({:.0}%), trip {:.2}h{}",
                station.name,
                station.level_kg(),
                station.capacity_kg,
                station.fill_percent(),
                station.trip_hours,
                if self.queue.contains(station.id) {
                    ", queued"
                } else {
                    ""
                }
            );
        }

        println!("--- Vehicles ---");
        for vehicle in self.fleet.iter() {
            println!(
                "  {}: busy until {:.2}h, worked {:.2}h",
                vehicle.id, vehicle.busy_until.0, vehicle.hours_worked
            );
        }
    }
}

/// Validate the inputs, run the full horizon and return the report
pub fn run_simulation(
    stations: &[StationSpec],
    trip_times: &HashMap<String, f64>,
    params: SimParams,
) -> Result<SimulationReport, SimulationError> {
    let mut world = SimWorld::new(stations, trip_times, params)?;
    Ok(world.run())
}
