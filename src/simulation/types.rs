//! Core types for the dispatch simulation
//!
//! These are standalone types shared by every part of the simulation.

use serde::Serialize;
use std::fmt;

/// Number of simulated hours in one day
pub const HOURS_PER_DAY: u32 = 24;

/// Index of a station in the world's station store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct StationId(pub usize);

/// Index of a vehicle in the fleet
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct VehicleId(pub usize);

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "station#{}", self.0)
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vehicle#{}", self.0)
    }
}

/// Day index of an hour counted from the start of the run
pub fn day_of(hour: u32) -> u32 {
    hour / HOURS_PER_DAY
}

/// Hour within its day, in `0..24`
pub fn hour_of_day(hour: u32) -> u32 {
    hour % HOURS_PER_DAY
}
