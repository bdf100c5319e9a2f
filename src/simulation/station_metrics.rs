//! Station capacities and accumulation rates estimated from collection history
//!
//! A station's capacity is taken to be what a typical pickup removes divided by
//! the trigger fraction, since pickups happen when the trigger level is reached.
//! Its rate is the mean of `weight / days since the previous pickup`.

use anyhow::{bail, Result};
use chrono::NaiveDateTime;
use log::{debug, info};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

use super::station::StationSpec;
use super::trip_times::GeoPoint;

/// Pickups at or below this weight are ignored when estimating capacity
pub const MIN_COLLECTION_KG: f64 = 10.0;

/// Intervals this short or shorter are ignored when estimating rates
pub const MIN_INTERVAL_DAYS: f64 = 0.5;

const SECONDS_PER_DAY: f64 = 86_400.0;

const TIMESTAMP_FORMATS: [&str; 3] = ["%d.%m.%Y %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// One recorded pickup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionEvent {
    pub station: String,
    #[serde(serialize_with = "serialize_timestamp", deserialize_with = "deserialize_timestamp")]
    pub time: NaiveDateTime,
    pub net_weight_kg: f64,
}

/// A station known only by name and position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationSite {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StationEstimate {
    pub capacity_kg: f64,
    pub accumulation_rate_kg_day: f64,
}

/// Parse the timestamp formats found in collection exports
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text.trim(), format).ok())
}

fn serialize_timestamp<S: Serializer>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&time.format(TIMESTAMP_FORMATS[1]).to_string())
}

fn deserialize_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
    let text = String::deserialize(deserializer)?;
    parse_timestamp(&text)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognised timestamp '{text}'")))
}

/// Estimate capacity and daily rate for every station with enough history
///
/// Pickups sharing a station and timestamp are one pickup. Stations with a
/// single pickup, no pickup above `MIN_COLLECTION_KG`, or no positive rate are
/// left out.
pub fn estimate_station_metrics(
    events: &[CollectionEvent],
    trigger_fraction: f64,
) -> BTreeMap<String, StationEstimate> {
    let mut history: BTreeMap<&str, BTreeMap<NaiveDateTime, f64>> = BTreeMap::new();
    for event in events {
        *history
            .entry(event.station.as_str())
            .or_default()
            .entry(event.time)
            .or_default() += event.net_weight_kg;
    }

    let mut estimates = BTreeMap::new();
    for (station, pickups) in history {
        if pickups.len() < 2 {
            continue;
        }

        let counted: Vec<f64> = pickups
            .values()
            .copied()
            .filter(|&kg| kg > MIN_COLLECTION_KG)
            .collect();
        if counted.is_empty() {
            continue;
        }
        let capacity_kg = mean(&counted) / trigger_fraction;

        let pickups: Vec<(NaiveDateTime, f64)> = pickups.into_iter().collect();
        let rates: Vec<f64> = pickups
            .windows(2)
            .filter_map(|pair| {
                let days = (pair[1].0 - pair[0].0).num_seconds() as f64 / SECONDS_PER_DAY;
                (days > MIN_INTERVAL_DAYS).then(|| pair[1].1 / days)
            })
            .collect();
        let accumulation_rate_kg_day = if rates.is_empty() { 0.0 } else { mean(&rates) };

        if accumulation_rate_kg_day > 0.0 {
            debug!(
                "'{}': capacity {:.1}kg, {:.1}kg/day from {} pickups",
                station,
                capacity_kg,
                accumulation_rate_kg_day,
                pickups.len()
            );
            estimates.insert(
                station.to_string(),
                StationEstimate {
                    capacity_kg,
                    accumulation_rate_kg_day,
                },
            );
        }
    }
    estimates
}

/// Build station specs for `sites`, filling stations without usable history
/// with the mean capacity and rate of those that have it
pub fn stations_from_history(
    sites: &[StationSite],
    events: &[CollectionEvent],
    trigger_fraction: f64,
) -> Result<Vec<StationSpec>> {
    if !(trigger_fraction > 0.0 && trigger_fraction <= 1.0) {
        bail!("trigger fraction {} must be in (0, 1]", trigger_fraction);
    }

    let estimates = estimate_station_metrics(events, trigger_fraction);
    if estimates.is_empty() {
        bail!("no station has enough collection history to estimate capacity and rate");
    }

    let fallback = StationEstimate {
        capacity_kg: mean(&estimates.values().map(|e| e.capacity_kg).collect::<Vec<_>>()),
        accumulation_rate_kg_day: mean(
            &estimates
                .values()
                .map(|e| e.accumulation_rate_kg_day)
                .collect::<Vec<_>>(),
        ),
    };

    let mut filled = 0;
    let stations = sites
        .iter()
        .map(|site| {
            let estimate = estimates.get(&site.name).copied().unwrap_or_else(|| {
                filled += 1;
                fallback
            });
            StationSpec {
                name: site.name.clone(),
                capacity_kg: estimate.capacity_kg,
                accumulation_rate_kg_day: estimate.accumulation_rate_kg_day,
                location: site.location,
            }
        })
        .collect();

    info!(
        "Estimated {} stations from collection history, {} filled with fleet averages",
        sites.len() - filled,
        filled
    );
    Ok(stations)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
