//! Run statistics gathered while the clock advances
//!
//! The accumulator only counts events; KPIs such as utilization are derived
//! once, when the horizon has been reached.

use serde::Serialize;
use std::collections::BTreeMap;

use super::dispatcher::TripRecord;
use super::fleet::Fleet;
use super::station::SimStation;
use super::types::StationId;

#[derive(Debug, Clone, Default)]
pub struct MetricsAccumulator {
    requests_raised: usize,
    failures: Vec<u32>,
    trips: Vec<TripRecord>,
}

impl MetricsAccumulator {
    pub fn new(station_count: usize) -> Self {
        Self {
            requests_raised: 0,
            failures: vec![0; station_count],
            trips: Vec::new(),
        }
    }

    pub fn record_request(&mut self) {
        self.requests_raised += 1;
    }

    pub fn record_trip(&mut self, trip: TripRecord) {
        self.trips.push(trip);
    }

    pub fn record_failure(&mut self, station: StationId) {
        if let Some(count) = self.failures.get_mut(station.0) {
            *count += 1;
        }
    }

    pub fn total_trips(&self) -> usize {
        self.trips.len()
    }

    pub fn total_failures(&self) -> usize {
        self.failures.iter().map(|&n| n as usize).sum()
    }

    pub fn failures_for(&self, station: StationId) -> u32 {
        self.failures.get(station.0).copied().unwrap_or(0)
    }

    pub fn trips(&self) -> &[TripRecord] {
        &self.trips
    }

    /// Freeze the counters into a report
    pub fn finish(
        &self,
        stations: &[SimStation],
        fleet: &Fleet,
        pending_requests: usize,
        available_vehicle_hours: f64,
    ) -> SimulationReport {
        let failures_by_station = stations
            .iter()
            .map(|s| (s.name.clone(), self.failures_for(s.id)))
            .collect();

        SimulationReport {
            utilization_percent: utilization_percent(fleet.total_hours_worked(), available_vehicle_hours),
            total_trips: self.total_trips(),
            total_failures: self.total_failures(),
            failures_by_station,
            requests_raised: self.requests_raised,
            pending_requests,
            vehicle_hours: fleet.iter().map(|v| v.hours_worked).collect(),
            trips: self.trips.clone(),
        }
    }
}

/// Share of available vehicle-hours spent on trips, 0 when nothing was available
pub fn utilization_percent(hours_worked: f64, hours_available: f64) -> f64 {
    if hours_available > 0.0 {
        hours_worked / hours_available * 100.0
    } else {
        0.0
    }
}

/// Result of a completed run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub utilization_percent: f64,
    pub total_trips: usize,
    pub total_failures: usize,
    pub failures_by_station: BTreeMap<String, u32>,
    pub requests_raised: usize,
    /// Requests still queued when the horizon ended
    pub pending_requests: usize,
    /// Hours worked per vehicle, indexed by vehicle id
    pub vehicle_hours: Vec<f64>,
    pub trips: Vec<TripRecord>,
}

impl SimulationReport {
    /// Print a short text summary
    pub fn print_summary(&self) {
        println!("=== Fleet Simulation Summary ===");
        println!("Utilization: {:.1}%", self.utilization_percent);
        println!("Total trips: {}", self.total_trips);
        println!("Total failures: {}", self.total_failures);
        println!("Requests raised: {}", self.requests_raised);
        println!("Pending at horizon: {}", self.pending_requests);

        println!("--- Vehicles ---");
        for (id, hours) in self.vehicle_hours.iter().enumerate() {
            println!("  Vehicle {}: {:.1}h worked", id, hours);
        }

        let failing: Vec<_> = self
            .failures_by_station
            .iter()
            .filter(|(_, count)| **count > 0)
            .collect();
        if !failing.is_empty() {
            println!("--- Failures by station ---");
            for (name, count) in failing {
                println!("  {}: {}", name, count);
            }
        }
    }
}
