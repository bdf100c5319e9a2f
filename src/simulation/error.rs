//! Errors the simulation core reports to its caller
//!
//! Every variant is fatal and raised before the first simulated hour.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("no trip duration for station '{station}'")]
    MissingTripDuration { station: String },

    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: &'static str,
    },

    #[error("station '{station}' is listed more than once")]
    DuplicateStation { station: String },
}

impl SimulationError {
    pub fn invalid(name: impl Into<String>, value: impl ToString, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            value: value.to_string(),
            reason,
        }
    }
}
