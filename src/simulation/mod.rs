//! Standalone fleet dispatch simulation
//!
//! This module contains the hour-stepped simulation of collection stations
//! and the vehicles that empty them. It has no presentation dependencies and
//! can be driven from the console or from tests.

mod dispatcher;
mod error;
mod fleet;
mod metrics;
mod params;
mod request_queue;
mod scenario;
mod station;
mod station_metrics;
mod trip_times;
mod types;
mod world;

pub use dispatcher::{dispatch_hour, DispatchOutcome, TripRecord};
pub use error::SimulationError;
pub use fleet::{Fleet, SimVehicle};
pub use metrics::{utilization_percent, MetricsAccumulator, SimulationReport};
pub use params::{
    FailurePolicy, SimParams, DEFAULT_DAILY_WORK_HOURS, DEFAULT_NUM_VEHICLES,
    DEFAULT_SIMULATION_DAYS, DEFAULT_TRIGGER_FRACTION, DEFAULT_WORK_DAY_START_HOUR,
};
pub use request_queue::{CollectionRequest, RequestQueue};
pub use scenario::{
    expansion_analysis, generate_stations, load_scenario, ExpansionAnalysis, Scenario,
    ScenarioFile, DEFAULT_DEPOT,
};
pub use station::{SimStation, StationSpec};
pub use station_metrics::{
    estimate_station_metrics, parse_timestamp, stations_from_history, CollectionEvent,
    StationEstimate, StationSite, MIN_COLLECTION_KG, MIN_INTERVAL_DAYS,
};
pub use trip_times::{compute_trip_times, GeoPoint, TripTimeParams, EARTH_RADIUS_KM};
pub use types::{day_of, hour_of_day, StationId, VehicleId, HOURS_PER_DAY};
pub use world::{run_simulation, SimWorld};
