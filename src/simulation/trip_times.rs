//! Round-trip durations from the depot to each station
//!
//! The simulation core only ever sees the resulting name -> hours map; this
//! module is the provider that turns coordinates into that map.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::station::StationSpec;

/// Mean Earth radius in kilometres
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to `other` in kilometres
    pub fn haversine_km(&self, other: &GeoPoint) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let dlat = lat2 - lat1;
        let dlon = (other.lon - self.lon).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * c
    }
}

/// Travel assumptions used to turn distances into trip durations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TripTimeParams {
    pub avg_speed_kmh: f64,
    /// Time spent loading at the station
    pub service_time_min: f64,
    /// Time spent unloading back at the depot
    pub unloading_time_min: f64,
    /// Ratio of road distance to straight-line distance
    pub road_network_factor: f64,
}

impl Default for TripTimeParams {
    fn default() -> Self {
        Self {
            avg_speed_kmh: 35.0,
            service_time_min: 25.0,
            unloading_time_min: 40.0,
            road_network_factor: 1.3,
        }
    }
}

impl TripTimeParams {
    /// One-way driving time in hours between two points
    pub fn travel_hours(&self, from: &GeoPoint, to: &GeoPoint) -> f64 {
        from.haversine_km(to) * self.road_network_factor / self.avg_speed_kmh
    }

    /// Depot -> station -> depot, including service and unloading
    pub fn round_trip_hours(&self, depot: &GeoPoint, station: &GeoPoint) -> f64 {
        2.0 * self.travel_hours(depot, station)
            + (self.service_time_min + self.unloading_time_min) / 60.0
    }
}

/// Compute round-trip hours for every station that has a location.
/// Stations without a location are left out of the map.
pub fn compute_trip_times(
    depot: &GeoPoint,
    stations: &[StationSpec],
    params: &TripTimeParams,
) -> Result<HashMap<String, f64>> {
    if !(params.avg_speed_kmh > 0.0) {
        bail!("average speed must be positive, got {}", params.avg_speed_kmh);
    }
    if params.road_network_factor < 0.0 || params.service_time_min < 0.0 || params.unloading_time_min < 0.0 {
        bail!("road factor, service and unloading times must not be negative");
    }

    Ok(stations
        .iter()
        .filter_map(|s| {
            s.location
                .map(|loc| (s.name.clone(), params.round_trip_hours(depot, &loc)))
        })
        .collect())
}
