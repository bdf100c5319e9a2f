//! Collection stations and their waste levels

use serde::{Deserialize, Serialize};

use super::trip_times::GeoPoint;
use super::types::StationId;

/// A station as supplied by the caller, before the run starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationSpec {
    pub name: String,
    pub capacity_kg: f64,
    pub accumulation_rate_kg_day: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
}

impl StationSpec {
    pub fn new(name: impl Into<String>, capacity_kg: f64, accumulation_rate_kg_day: f64) -> Self {
        Self {
            name: name.into(),
            capacity_kg,
            accumulation_rate_kg_day,
            location: None,
        }
    }

    pub fn at(mut self, location: GeoPoint) -> Self {
        self.location = Some(location);
        self
    }
}

/// A station inside a running simulation
#[derive(Debug, Clone)]
pub struct SimStation {
    pub id: StationId,
    pub name: String,
    pub capacity_kg: f64,
    /// Kilograms added per day; never negative once the world is built
    pub rate_kg_day: f64,
    /// Round trip from the depot, in hours
    pub trip_hours: f64,
    level_kg: f64,
}

impl SimStation {
    pub fn new(id: StationId, spec: &StationSpec, trip_hours: f64) -> Self {
        Self {
            id,
            name: spec.name.clone(),
            capacity_kg: spec.capacity_kg,
            rate_kg_day: spec.accumulation_rate_kg_day.max(0.0),
            trip_hours,
            level_kg: 0.0,
        }
    }

    pub fn level_kg(&self) -> f64 {
        self.level_kg
    }

    /// Add one active hour's worth of waste
    pub fn accumulate(&mut self, active_window_hours: f64) {
        self.level_kg += self.rate_kg_day / active_window_hours;
    }

    pub fn is_overflowing(&self) -> bool {
        self.level_kg > self.capacity_kg
    }

    fn trigger_level(&self, trigger_fraction: f64) -> f64 {
        self.capacity_kg * trigger_fraction
    }

    pub fn reached_trigger(&self, trigger_fraction: f64) -> bool {
        self.level_kg >= self.trigger_level(trigger_fraction)
    }

    /// Empty the station. Only a completed trip or a recorded failure may call this.
    pub(crate) fn reset(&mut self) {
        self.level_kg = 0.0;
    }

    /// Fill level as a percentage of capacity
    pub fn fill_percent(&self) -> f64 {
        self.level_kg / self.capacity_kg * 100.0
    }
}
