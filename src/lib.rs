//! Fleet Dispatch Simulation Library
//!
//! Estimates whether a fleet of service vehicles can keep a set of
//! collection stations from overflowing.

pub mod simulation;
