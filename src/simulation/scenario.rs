//! Scenario inputs: scenario files, seeded synthetic scenarios and the
//! "what if we add a station" comparison.

use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::metrics::SimulationReport;
use super::params::SimParams;
use super::station::StationSpec;
use super::station_metrics::{stations_from_history, CollectionEvent, StationSite};
use super::trip_times::{compute_trip_times, GeoPoint, TripTimeParams};
use super::world::run_simulation;

/// Depot used for generated scenarios
pub const DEFAULT_DEPOT: GeoPoint = GeoPoint {
    lat: 49.8047,
    lon: 73.1094,
};

/// On-disk scenario description
///
/// Stations are listed directly, or as `sites` whose capacity and rate are
/// estimated from `collections`, or both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioFile {
    #[serde(default)]
    pub depot: Option<GeoPoint>,
    #[serde(default)]
    pub stations: Vec<StationSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sites: Vec<StationSite>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collections: Vec<CollectionEvent>,
    /// Explicit round trips in hours; these win over computed ones
    #[serde(default)]
    pub trip_times: HashMap<String, f64>,
}

/// Stations plus the trip-time map the simulation consumes
#[derive(Debug, Clone)]
pub struct Scenario {
    pub stations: Vec<StationSpec>,
    pub trip_times: HashMap<String, f64>,
}

impl ScenarioFile {
    /// Resolve estimated stations, then trip times: computed from locations
    /// first, explicit entries on top
    pub fn into_scenario(mut self, trip_params: &TripTimeParams, trigger_fraction: f64) -> Result<Scenario> {
        if !self.sites.is_empty() {
            let estimated = stations_from_history(&self.sites, &self.collections, trigger_fraction)
                .context("Could not estimate stations from collection history")?;
            self.stations.extend(estimated);
        }

        let mut trip_times = match self.depot {
            Some(depot) => compute_trip_times(&depot, &self.stations, trip_params)?,
            None => {
                if let Some(s) = self.stations.iter().find(|s| s.location.is_some()) {
                    bail!("station '{}' has a location but the scenario has no depot", s.name);
                }
                HashMap::new()
            }
        };
        trip_times.extend(self.trip_times);

        Ok(Scenario {
            stations: self.stations,
            trip_times,
        })
    }
}

/// Read a JSON scenario file
///
/// `trigger_fraction` is only used when stations are estimated from history.
pub fn load_scenario(path: &Path, trip_params: &TripTimeParams, trigger_fraction: f64) -> Result<Scenario> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Could not read scenario file {}", path.display()))?;
    let file: ScenarioFile = serde_json::from_str(&text)
        .with_context(|| format!("Could not parse scenario file {}", path.display()))?;
    file.into_scenario(trip_params, trigger_fraction)
        .with_context(|| format!("Could not build a scenario from {}", path.display()))
}

/// Build a reproducible synthetic scenario of `count` stations around `DEFAULT_DEPOT`
pub fn generate_stations(seed: u64, count: usize, trip_params: &TripTimeParams) -> Result<Scenario> {
    let mut rng = StdRng::seed_from_u64(seed);

    let stations: Vec<StationSpec> = (0..count)
        .map(|i| {
            let location = GeoPoint::new(
                DEFAULT_DEPOT.lat + rng.random_range(-0.08..0.08),
                DEFAULT_DEPOT.lon + rng.random_range(-0.12..0.12),
            );
            StationSpec::new(
                format!("Station {:02}", i + 1),
                rng.random_range(300.0..1500.0),
                rng.random_range(40.0..400.0),
            )
            .at(location)
        })
        .collect();

    let trip_times = compute_trip_times(&DEFAULT_DEPOT, &stations, trip_params)?;
    Ok(Scenario {
        stations,
        trip_times,
    })
}

/// Baseline against one extra station, with and without one extra vehicle
#[derive(Debug, Clone, Serialize)]
pub struct ExpansionAnalysis {
    pub existing_stations: usize,
    pub baseline: SimulationReport,
    pub with_new_station: SimulationReport,
    pub with_new_station_and_vehicle: SimulationReport,
}

/// Run the three expansion scenarios over the first `existing` stations
pub fn expansion_analysis(
    stations: &[StationSpec],
    trip_times: &HashMap<String, f64>,
    params: &SimParams,
    existing: usize,
) -> Result<ExpansionAnalysis> {
    if existing >= stations.len() {
        bail!(
            "need more than {} stations to add one, scenario has {}",
            existing,
            stations.len()
        );
    }
    let current = &stations[..existing];
    let expanded = &stations[..existing + 1];

    let baseline = run_simulation(current, trip_times, params.clone())
        .context("Baseline run failed")?;
    let with_new_station = run_simulation(expanded, trip_times, params.clone())
        .context("Run with the new station failed")?;
    let with_new_station_and_vehicle =
        run_simulation(expanded, trip_times, params.with_vehicles(params.num_vehicles + 1))
            .context("Run with the new station and an extra vehicle failed")?;

    Ok(ExpansionAnalysis {
        existing_stations: existing,
        baseline,
        with_new_station,
        with_new_station_and_vehicle,
    })
}
