//! Run configuration for the dispatch simulation
//!
//! A `SimParams` value is built once by the caller and handed to the world;
//! nothing inside the simulation mutates it.

use serde::Serialize;

use super::error::SimulationError;
use super::types::{day_of, hour_of_day, HOURS_PER_DAY};

/// Default number of vehicles in the fleet
pub const DEFAULT_NUM_VEHICLES: usize = 2;
/// Default length of a vehicle's working day in hours
pub const DEFAULT_DAILY_WORK_HOURS: f64 = 8.0;
/// Default fill level, as a fraction of capacity, that raises a request
pub const DEFAULT_TRIGGER_FRACTION: f64 = 0.85;
/// Default simulation horizon in days
pub const DEFAULT_SIMULATION_DAYS: u32 = 75;
/// Default shift start; an evening shift collects what the day produced
pub const DEFAULT_WORK_DAY_START_HOUR: f64 = 16.0;

/// How an unserved station is turned into a recorded failure
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub enum FailurePolicy {
    /// A queued station fails the hour its level exceeds capacity.
    #[default]
    CapacityExceeded,
    /// A queued station fails when dispatch finds no vehicle for it and it
    /// has waited strictly longer than `hours` since it was triggered.
    GracePeriod { hours: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimParams {
    pub num_vehicles: usize,
    pub daily_work_hours: f64,
    /// Offset of the shift start from midnight
    pub work_day_start_hour: f64,
    /// First hour of the day in which waste accumulates
    pub active_window_start_hour: u32,
    pub active_window_hours: f64,
    pub trigger_fraction: f64,
    pub simulation_days: u32,
    pub failure_policy: FailurePolicy,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            num_vehicles: DEFAULT_NUM_VEHICLES,
            daily_work_hours: DEFAULT_DAILY_WORK_HOURS,
            work_day_start_hour: DEFAULT_WORK_DAY_START_HOUR,
            active_window_start_hour: 0,
            active_window_hours: HOURS_PER_DAY as f64,
            trigger_fraction: DEFAULT_TRIGGER_FRACTION,
            simulation_days: DEFAULT_SIMULATION_DAYS,
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl SimParams {
    /// Copy of these parameters with a different fleet size
    pub fn with_vehicles(&self, num_vehicles: usize) -> Self {
        Self {
            num_vehicles,
            ..self.clone()
        }
    }

    /// Check every field against its domain
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.num_vehicles == 0 {
            return Err(SimulationError::invalid(
                "num_vehicles",
                self.num_vehicles,
                "at least one vehicle is required",
            ));
        }
        if !(self.daily_work_hours > 0.0 && self.daily_work_hours <= HOURS_PER_DAY as f64) {
            return Err(SimulationError::invalid(
                "daily_work_hours",
                self.daily_work_hours,
                "must be in (0, 24]",
            ));
        }
        if !(self.work_day_start_hour >= 0.0 && self.work_day_start_hour < HOURS_PER_DAY as f64) {
            return Err(SimulationError::invalid(
                "work_day_start_hour",
                self.work_day_start_hour,
                "must be in [0, 24)",
            ));
        }
        if self.active_window_start_hour >= HOURS_PER_DAY {
            return Err(SimulationError::invalid(
                "active_window_start_hour",
                self.active_window_start_hour,
                "must be in [0, 24)",
            ));
        }
        if !(self.active_window_hours > 0.0 && self.active_window_hours <= HOURS_PER_DAY as f64) {
            return Err(SimulationError::invalid(
                "active_window_hours",
                self.active_window_hours,
                "must be in (0, 24]",
            ));
        }
        if !(self.trigger_fraction > 0.0 && self.trigger_fraction <= 1.0) {
            return Err(SimulationError::invalid(
                "trigger_fraction",
                self.trigger_fraction,
                "must be in (0, 1]",
            ));
        }
        if self.simulation_days == 0 {
            return Err(SimulationError::invalid(
                "simulation_days",
                self.simulation_days,
                "horizon must be at least one day",
            ));
        }
        if self.simulation_days.checked_mul(HOURS_PER_DAY).is_none() {
            return Err(SimulationError::invalid(
                "simulation_days",
                self.simulation_days,
                "horizon in hours does not fit the simulation clock",
            ));
        }
        Ok(())
    }

    /// Total number of simulated hours
    pub fn horizon_hours(&self) -> u32 {
        self.simulation_days.saturating_mul(HOURS_PER_DAY)
    }

    /// Whether waste accumulates during `hour`
    pub fn is_active_hour(&self, hour: u32) -> bool {
        let offset = (hour_of_day(hour) + HOURS_PER_DAY - self.active_window_start_hour) % HOURS_PER_DAY;
        (offset as f64) < self.active_window_hours
    }

    /// Start and end of the shift for the day containing `hour`
    pub fn shift_bounds(&self, hour: u32) -> (f64, f64) {
        let start = (day_of(hour) * HOURS_PER_DAY) as f64 + self.work_day_start_hour;
        (start, start + self.daily_work_hours)
    }

    /// Vehicle-hours the fleet could work over the whole horizon
    pub fn available_vehicle_hours(&self) -> f64 {
        self.num_vehicles as f64 * self.daily_work_hours * self.simulation_days as f64
    }
}
